use serde::{Deserialize, Serialize};

use super::common::{collect_all_pages, segment, Page, PaginationParams};
use super::error::ApiError;
use super::PhoneNumberRef;
use crate::api::Client;

/// Max page size of the phone user listing
pub const USERS_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserNumber {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhoneUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub extension_id: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<UserNumber>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhoneUsersPage {
    #[serde(default)]
    pub users: Vec<PhoneUser>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl Page for PhoneUsersPage {
    type Item = PhoneUser;

    fn into_parts(self) -> (Vec<PhoneUser>, Option<String>) {
        (self.users, self.next_page_token)
    }
}

#[derive(Debug, Clone, Serialize)]
struct AssignNumbersRequest<'a> {
    phone_numbers: &'a [PhoneNumberRef],
}

/// Phone user API operations
pub struct UsersApi<'a> {
    client: &'a Client,
}

impl<'a> UsersApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /phone/users/{userId}
    pub async fn get(&self, user_id: &str) -> Result<PhoneUser, ApiError> {
        self.client
            .get(&format!("/phone/users/{}", segment(user_id)))
            .await
    }

    /// GET /phone/users, every page
    pub async fn list(&self) -> Result<Vec<PhoneUser>, ApiError> {
        collect_all_pages(|token| {
            let params = PaginationParams::new(USERS_PAGE_SIZE)
                .with_token(token)
                .to_query_params();
            async move {
                self.client
                    .get_with_params::<PhoneUsersPage>("/phone/users", &params)
                    .await
            }
        })
        .await
    }

    /// Phone users whose extension is one of `extension_ids`
    pub async fn list_by_extension_ids(
        &self,
        extension_ids: &[String],
    ) -> Result<Vec<PhoneUser>, ApiError> {
        if extension_ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = self.list().await?;
        Ok(users
            .into_iter()
            .filter(|u| {
                u.extension_id
                    .as_ref()
                    .is_some_and(|ext| extension_ids.contains(ext))
            })
            .collect())
    }

    /// POST /phone/users/{userId}/phone_numbers
    pub async fn assign_numbers(
        &self,
        user_id: &str,
        phone_numbers: &[PhoneNumberRef],
    ) -> Result<(), ApiError> {
        self.client
            .post(
                &format!("/phone/users/{}/phone_numbers", segment(user_id)),
                &AssignNumbersRequest { phone_numbers },
            )
            .await
    }

    /// DELETE /phone/users/{userId}/phone_numbers/{phoneNumberId}
    pub async fn unassign_number(&self, user_id: &str, phone_number_id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!(
                "/phone/users/{}/phone_numbers/{}",
                segment(user_id),
                segment(phone_number_id)
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn list_by_extension_ids_filters_every_page() {
        let mut server = Server::new_async().await;
        let _first = server
            .mock("GET", "/phone/users")
            .match_query(Matcher::Exact("page_size=100".into()))
            .with_body(
                r#"{"users":[{"id":"u1","email":"a@example.com","extension_id":"e1"},{"id":"u2","email":"b@example.com","extension_id":"e2"}],"next_page_token":"n"}"#,
            )
            .create_async()
            .await;
        let _second = server
            .mock("GET", "/phone/users")
            .match_query(Matcher::Exact("page_size=100&next_page_token=n".into()))
            .with_body(r#"{"users":[{"id":"u3","email":"c@example.com","extension_id":"e3"}]}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let users = client
            .users()
            .list_by_extension_ids(&["e1".to_string(), "e3".to_string()])
            .await
            .unwrap();

        let emails: Vec<_> = users.iter().filter_map(|u| u.email.as_deref()).collect();
        assert_eq!(emails, vec!["a@example.com", "c@example.com"]);
    }

    #[tokio::test]
    async fn list_by_extension_ids_skips_listing_for_no_ids() {
        let server = Server::new_async().await;
        let client = create_test_client(&server.url());
        assert!(client
            .users()
            .list_by_extension_ids(&[])
            .await
            .unwrap()
            .is_empty());
    }
}
