//! Common types and utilities for the Zoom API

use futures::TryStreamExt;
use serde::{Deserialize, Serialize, Serializer};
use std::future::Future;

use super::error::ApiError;

/// Error body Zoom attaches to non-2xx responses
#[derive(Debug, Clone, Default, Deserialize, thiserror::Error)]
#[error("Zoom error code {code:?}: {message:?}")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Field presence for PATCH payloads.
///
/// `Absent` leaves the remote value untouched, `Null` clears it and
/// `Value` overwrites it. Fields must be annotated with
/// `#[serde(default, skip_serializing_if = "Optional::is_absent")]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Optional<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Optional<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Optional::Absent)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Optional::Value(v) => Some(v),
            _ => None,
        }
    }

    /// `Value` when planned, `Null` when a previously applied value must be
    /// cleared, otherwise `Absent`
    pub fn clearing(prior: Option<&T>, planned: Option<T>) -> Self {
        match (planned, prior) {
            (Some(v), _) => Optional::Value(v),
            (None, Some(_)) => Optional::Null,
            (None, None) => Optional::Absent,
        }
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Optional::Value(v),
            None => Optional::Absent,
        }
    }
}

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Optional::Value(v) => v.serialize(serializer),
            Optional::Null | Optional::Absent => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiQueryParams {
    params: Vec<(String, String)>,
}

impl ApiQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn add_optional<K: Into<String>, V: ToString>(mut self, key: K, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.params.push((key.into(), v.to_string()));
        }
        self
    }

    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

/// Cursor pagination used by Zoom list endpoints
#[derive(Debug, Clone, Default)]
pub struct PaginationParams {
    pub page_size: Option<u32>,
    pub next_page_token: Option<String>,
}

impl PaginationParams {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
            next_page_token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.next_page_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn to_query_params(&self) -> ApiQueryParams {
        ApiQueryParams::new()
            .add_optional("page_size", self.page_size)
            .add_optional("next_page_token", self.next_page_token.as_deref())
    }
}

/// A single page of a list endpoint
pub trait Page {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

/// Follow `next_page_token` until the remote reports no further page
pub async fn collect_all_pages<P, F, Fut>(fetch: F) -> Result<Vec<P::Item>, ApiError>
where
    P: Page,
    F: Fn(Option<String>) -> Fut,
    Fut: Future<Output = Result<P, ApiError>>,
{
    let pages = futures::stream::try_unfold(Some(None::<String>), |cursor| {
        let fetch = &fetch;
        async move {
            let Some(token) = cursor else {
                return Ok::<_, ApiError>(None);
            };
            let (items, next) = fetch(token).await?.into_parts();
            let next = next.filter(|t| !t.is_empty()).map(Some);
            Ok(Some((items, next)))
        }
    });

    let pages: Vec<Vec<P::Item>> = pages.try_collect().await?;
    Ok(pages.into_iter().flatten().collect())
}

/// Percent-encode a path segment
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Patch {
        #[serde(skip_serializing_if = "Optional::is_absent")]
        phone_number: Optional<String>,
        #[serde(skip_serializing_if = "Optional::is_absent")]
        description: Optional<String>,
        #[serde(skip_serializing_if = "Optional::is_absent")]
        max_wait_time: Optional<i32>,
    }

    #[test]
    fn optional_serializes_three_states() {
        let patch = Patch {
            phone_number: Optional::Value("+15550100".to_string()),
            description: Optional::Null,
            max_wait_time: Optional::Absent,
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"phone_number": "+15550100", "description": null})
        );
    }

    #[test]
    fn optional_clearing_only_nulls_previously_set_values() {
        let prior = "old".to_string();
        assert_eq!(
            Optional::clearing(Some(&prior), Some("new".to_string())),
            Optional::Value("new".to_string())
        );
        assert_eq!(Optional::<String>::clearing(Some(&prior), None), Optional::Null);
        assert_eq!(Optional::<String>::clearing(None, None), Optional::Absent);
        assert_eq!(Optional::from(Some(3)), Optional::Value(3));
        assert_eq!(Optional::<i32>::from(None), Optional::Absent);
    }

    #[test]
    fn query_params_encode_values() {
        let query = ApiQueryParams::new()
            .add("holiday_id", "a b")
            .add_optional("call_forwarding_id", None::<String>)
            .to_query_string();
        assert_eq!(query, "?holiday_id=a%20b");
        assert_eq!(ApiQueryParams::new().to_query_string(), "");
    }

    #[test]
    fn pagination_skips_empty_token() {
        let query = PaginationParams::new(300)
            .with_token(Some(String::new()))
            .to_query_params()
            .to_query_string();
        assert_eq!(query, "?page_size=300");

        let query = PaginationParams::new(100)
            .with_token(Some("tok".to_string()))
            .to_query_params()
            .to_query_string();
        assert_eq!(query, "?page_size=100&next_page_token=tok");
    }

    struct NumberPage(Vec<u32>, Option<String>);

    impl Page for NumberPage {
        type Item = u32;

        fn into_parts(self) -> (Vec<u32>, Option<String>) {
            (self.0, self.1)
        }
    }

    #[tokio::test]
    async fn collect_all_pages_follows_tokens_in_order() {
        let seen = std::sync::Mutex::new(Vec::new());
        let items = collect_all_pages(|token: Option<String>| {
            seen.lock().unwrap().push(token.clone());
            async move {
                Ok(match token.as_deref() {
                    None => NumberPage(vec![1, 2], Some("p2".to_string())),
                    Some("p2") => NumberPage(vec![3], Some(String::new())),
                    Some(other) => panic!("unexpected token {}", other),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("p2".to_string())]
        );
    }

    #[tokio::test]
    async fn collect_all_pages_stops_on_error() {
        let result = collect_all_pages(|_token: Option<String>| async {
            Err::<NumberPage, _>(ApiError::ServiceUnavailable)
        })
        .await;
        assert!(matches!(result, Err(ApiError::ServiceUnavailable)));
    }

    #[test]
    fn error_body_tolerates_missing_fields() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"code":300}"#).unwrap();
        assert_eq!(body.code, Some(300));
        assert!(body.message.is_none());
    }
}
