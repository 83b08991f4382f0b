//! Holiday hours call handling resource
//!
//! Unlike business and closed hours a holiday is a real remote object: it is
//! created on first apply, identified by `holiday_id` and deleted on destroy.

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::import::import_state_split_id;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure, ResourceWithImportState,
    UpdateResourceRequest, UpdateResourceResponse, ValidateResourceConfigRequest,
    ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, ObjectNestingMode, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic};

use super::model::CallHandlingProfile;
use super::reconciler::CallHandlingReconciler;
use super::{
    call_forwarding_attribute, call_handling_attribute, create_profile, extension_id_attribute,
    read_profile, update_profile, validate_profile,
};
use crate::api::call_handling::SettingType;
use crate::resources::{configure_provider_data, decode_model, not_configured};

const PERIOD: SettingType = SettingType::HolidayHours;

#[derive(Default)]
pub struct HolidayHoursResource {
    provider_data: Option<crate::ZoomProviderData>,
}

impl HolidayHoursResource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Resource for HolidayHoursResource {
    fn type_name(&self) -> &str {
        "zoom_phone_call_handling_holiday_hours"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages one holiday of an extension and its call handling")
            .attribute(extension_id_attribute())
            .attribute(
                AttributeBuilder::new("holiday_id", AttributeType::String)
                    .description("Holiday ID assigned by Zoom")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::nested(
                    "holiday",
                    ObjectNestingMode::Single,
                    vec![
                        AttributeBuilder::new("name", AttributeType::String)
                            .description("Name of the holiday")
                            .required()
                            .build(),
                        AttributeBuilder::new("from", AttributeType::String)
                            .description("Start of the holiday, RFC 3339")
                            .required()
                            .build(),
                        AttributeBuilder::new("to", AttributeType::String)
                            .description("End of the holiday, RFC 3339")
                            .required()
                            .build(),
                    ],
                )
                .description("Date range of the holiday")
                .required()
                .build(),
            )
            .attribute(call_handling_attribute(PERIOD))
            .attribute(call_forwarding_attribute())
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: validate_profile(PERIOD, &request.config),
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        create_profile(
            self.provider_data.as_ref(),
            &ctx,
            PERIOD,
            request.planned_state,
        )
        .await
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        read_profile(
            self.provider_data.as_ref(),
            &ctx,
            PERIOD,
            request.current_state,
        )
        .await
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        update_profile(
            self.provider_data.as_ref(),
            &ctx,
            PERIOD,
            request.prior_state,
            request.planned_state,
        )
        .await
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let Some(provider_data) = &self.provider_data else {
            return DeleteResourceResponse {
                diagnostics: vec![not_configured()],
            };
        };
        let prior: CallHandlingProfile = match decode_model(&request.prior_state, "prior state") {
            Ok(prior) => prior,
            Err(diag) => {
                return DeleteResourceResponse {
                    diagnostics: vec![diag],
                }
            }
        };
        let holiday_id = prior.holiday_id.unwrap_or_default();

        let reconciler = CallHandlingReconciler::new(&provider_data.client, PERIOD);
        if let Err(e) = reconciler
            .delete_holiday(&ctx, &prior.extension_id, &holiday_id)
            .await
        {
            return DeleteResourceResponse {
                diagnostics: vec![Diagnostic::error(
                    "Error deleting phone call handling",
                    format!(
                        "Could not delete holiday {} of extension {}, unexpected error: {}",
                        holiday_id, prior.extension_id, e
                    ),
                )],
            };
        }

        tracing::info!(
            extension_id = %prior.extension_id,
            holiday_id = %holiday_id,
            "Deleted holiday"
        );
        DeleteResourceResponse {
            diagnostics: vec![],
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for HolidayHoursResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        configure_provider_data(request, &mut self.provider_data)
    }
}

#[async_trait]
impl ResourceWithImportState for HolidayHoursResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_split_id(
            &ctx,
            &[
                AttributePath::new("extension_id"),
                AttributePath::new("holiday_id"),
            ],
            "extension_id/holiday_id",
            &request,
            &mut response,
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use crate::ZoomProviderData;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use tfplug::DynamicValue;

    fn configured(server_url: &str) -> HolidayHoursResource {
        HolidayHoursResource {
            provider_data: Some(ZoomProviderData::new(create_test_client(server_url))),
        }
    }

    fn holiday() -> serde_json::Value {
        json!({
            "name": "New Year",
            "from": "2025-01-01T00:00:00Z",
            "to": "2025-01-02T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_schema_has_holiday_block() {
        let schema = HolidayHoursResource::new()
            .schema(Context::new(), ResourceSchemaRequest)
            .await
            .schema;

        let holiday_id = schema.attribute("holiday_id").unwrap();
        assert!(holiday_id.computed);
        assert!(!holiday_id.required);
        let holiday = schema.attribute("holiday").unwrap();
        assert!(holiday.nested_attribute("from").is_some());
        assert!(schema.attribute("custom_hours").is_none());
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_dates() {
        let response = HolidayHoursResource::new()
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "zoom_phone_call_handling_holiday_hours".to_string(),
                    config: DynamicValue::new(json!({
                        "extension_id": "ext-1",
                        "holiday": {"name": "New Year", "from": "tomorrow", "to": "2025-01-02T00:00:00Z"},
                        "call_handling": {}
                    })),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert!(response.diagnostics[0]
            .detail
            .starts_with("holiday.from must be an RFC 3339 timestamp"));
    }

    #[tokio::test]
    async fn test_create_adds_holiday_and_records_id() {
        let mut server = Server::new_async().await;
        let get = server
            .mock("GET", "/phone/extension/ext-1/call_handling/settings")
            .expect(0)
            .create_async()
            .await;
        let post = server
            .mock(
                "POST",
                "/phone/extension/ext-1/call_handling/settings/holiday_hours",
            )
            .match_body(Matcher::Json(json!({
                "sub_setting_type": "holiday",
                "settings": holiday()
            })))
            .with_status(201)
            .with_body(r#"{"holiday_id": "hol-1"}"#)
            .expect(1)
            .create_async()
            .await;
        let patch = server
            .mock(
                "PATCH",
                "/phone/extension/ext-1/call_handling/settings/holiday_hours",
            )
            .match_body(Matcher::Json(json!({
                "sub_setting_type": "call_handling",
                "settings": {"holiday_id": "hol-1", "call_not_answer_action": 1}
            })))
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let response = configured(&server.url())
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "zoom_phone_call_handling_holiday_hours".to_string(),
                    planned_state: DynamicValue::new(json!({
                        "extension_id": "ext-1",
                        "holiday_id": null,
                        "holiday": holiday(),
                        "call_handling": {"call_not_answer_action": 1}
                    })),
                    config: DynamicValue::null(),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(
            response
                .new_state
                .get_string(&AttributePath::new("holiday_id"))
                .unwrap(),
            "hol-1"
        );
        get.assert_async().await;
        post.assert_async().await;
        patch.assert_async().await;
    }

    #[tokio::test]
    async fn test_read_of_removed_holiday_clears_state() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", "/phone/extension/ext-1/call_handling/settings")
            .with_body(r#"{"business_hours": [], "holiday_hours": [{"holiday_id": "other", "details": []}]}"#)
            .create_async()
            .await;

        let response = configured(&server.url())
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "zoom_phone_call_handling_holiday_hours".to_string(),
                    current_state: DynamicValue::new(json!({
                        "extension_id": "ext-1",
                        "holiday_id": "hol-1",
                        "holiday": holiday()
                    })),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn test_delete_treats_missing_holiday_as_deleted() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock(
                "DELETE",
                "/phone/extension/ext-1/call_handling/settings/holiday_hours",
            )
            .match_query(Matcher::UrlEncoded("holiday_id".into(), "hol-1".into()))
            .with_status(404)
            .with_body(r#"{"code": 404, "message": "Holiday not found"}"#)
            .expect(1)
            .create_async()
            .await;

        let response = configured(&server.url())
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "zoom_phone_call_handling_holiday_hours".to_string(),
                    prior_state: DynamicValue::new(json!({
                        "extension_id": "ext-1",
                        "holiday_id": "hol-1",
                        "holiday": holiday()
                    })),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_import_requires_both_ids() {
        let resource = HolidayHoursResource::new();

        let response = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "zoom_phone_call_handling_holiday_hours".to_string(),
                    id: "ext-1/hol-1".to_string(),
                },
            )
            .await;
        assert!(response.diagnostics.is_empty());
        let state = &response.imported_resources[0].state;
        assert_eq!(
            state.get_string(&AttributePath::new("holiday_id")).unwrap(),
            "hol-1"
        );

        let response = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "zoom_phone_call_handling_holiday_hours".to_string(),
                    id: "ext-1".to_string(),
                },
            )
            .await;
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Invalid import ID");
    }
}
