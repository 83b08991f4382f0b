//! Business hours call handling resource

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
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
use tfplug::types::AttributePath;

use super::{
    call_forwarding_attribute, call_handling_attribute, create_profile, extension_id_attribute,
    read_profile, reset_profile, update_profile, validate_profile,
};
use crate::api::call_handling::SettingType;
use crate::resources::configure_provider_data;

const PERIOD: SettingType = SettingType::BusinessHours;

#[derive(Default)]
pub struct BusinessHoursResource {
    provider_data: Option<crate::ZoomProviderData>,
}

impl BusinessHoursResource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Resource for BusinessHoursResource {
    fn type_name(&self) -> &str {
        "zoom_phone_call_handling_business_hours"
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
            .description("Manages the business hours call handling of an extension")
            .attribute(extension_id_attribute())
            .attribute(
                AttributeBuilder::nested(
                    "custom_hours",
                    ObjectNestingMode::Single,
                    vec![
                        AttributeBuilder::new("type", AttributeType::Number)
                            .description("1 for 24 hours, 7 days a week; 2 for custom hours")
                            .required()
                            .build(),
                        AttributeBuilder::new("allow_members_to_reset", AttributeType::Bool)
                            .description("Allow call queue members to set their own business hours")
                            .optional()
                            .build(),
                        AttributeBuilder::nested(
                            "settings",
                            ObjectNestingMode::List,
                            vec![
                                AttributeBuilder::new("weekday", AttributeType::Number)
                                    .description("Day of the week, 1 (Sunday) to 7 (Saturday)")
                                    .required()
                                    .build(),
                                AttributeBuilder::new("type", AttributeType::Number)
                                    .description("0 disabled, 1 all day, 2 custom range")
                                    .required()
                                    .build(),
                                AttributeBuilder::new("from", AttributeType::String)
                                    .description("Start time in HH:mm, only when type is 2")
                                    .optional()
                                    .build(),
                                AttributeBuilder::new("to", AttributeType::String)
                                    .description("End time in HH:mm, only when type is 2")
                                    .optional()
                                    .build(),
                            ],
                        )
                        .description("Sunday to Saturday schedule, required when type is 2")
                        .optional()
                        .build(),
                    ],
                )
                .description("Business hours schedule")
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
        reset_profile(
            self.provider_data.as_ref(),
            &ctx,
            PERIOD,
            request.prior_state,
        )
        .await
    }
}

#[async_trait]
impl ResourceWithConfigure for BusinessHoursResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        configure_provider_data(request, &mut self.provider_data)
    }
}

#[async_trait]
impl ResourceWithImportState for BusinessHoursResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(
            &ctx,
            AttributePath::new("extension_id"),
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

    fn configured(server_url: &str) -> BusinessHoursResource {
        BusinessHoursResource {
            provider_data: Some(ZoomProviderData::new(create_test_client(server_url))),
        }
    }

    fn custom_week() -> serde_json::Value {
        json!([
            {"weekday": 1, "type": 0},
            {"weekday": 2, "type": 2, "from": "09:00", "to": "17:00"},
            {"weekday": 3, "type": 2, "from": "09:00", "to": "17:00"},
            {"weekday": 4, "type": 2, "from": "09:00", "to": "17:00"},
            {"weekday": 5, "type": 2, "from": "09:00", "to": "17:00"},
            {"weekday": 6, "type": 2, "from": "09:00", "to": "17:00"},
            {"weekday": 7, "type": 0}
        ])
    }

    #[test]
    fn test_resource_type_name() {
        assert_eq!(
            BusinessHoursResource::new().type_name(),
            "zoom_phone_call_handling_business_hours"
        );
    }

    #[tokio::test]
    async fn test_schema_has_business_only_attributes() {
        let response = BusinessHoursResource::new()
            .schema(Context::new(), ResourceSchemaRequest)
            .await;
        let schema = response.schema;

        assert!(schema.attribute("extension_id").unwrap().required);
        assert!(schema.attribute("custom_hours").unwrap().required);
        let call_handling = schema.attribute("call_handling").unwrap();
        assert!(call_handling.nested_attribute("receive_call").is_some());
        assert!(call_handling.nested_attribute("call_distribution").is_some());
        assert!(call_handling
            .nested_attribute("busy_require_press1_before_connecting")
            .is_some());
    }

    #[tokio::test]
    async fn test_validate_rejects_custom_type_without_week() {
        let response = BusinessHoursResource::new()
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "zoom_phone_call_handling_business_hours".to_string(),
                    config: DynamicValue::new(json!({
                        "extension_id": "ext-1",
                        "custom_hours": {"type": 2},
                        "call_handling": {}
                    })),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].detail,
            "custom_hours type 2 must have Sunday-Saturday settings"
        );
    }

    #[tokio::test]
    async fn test_create_without_provider_data() {
        let response = BusinessHoursResource::new()
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "zoom_phone_call_handling_business_hours".to_string(),
                    planned_state: DynamicValue::null(),
                    config: DynamicValue::null(),
                },
            )
            .await;
        assert_eq!(response.diagnostics[0].summary, "Provider not configured");
    }

    #[tokio::test]
    async fn test_create_patches_each_sub_setting_in_order() {
        let mut server = Server::new_async().await;
        let settings_path = "/phone/extension/ext-1/call_handling/settings";
        let business_path = "/phone/extension/ext-1/call_handling/settings/business_hours";

        let read = server
            .mock("GET", settings_path)
            .with_body(
                json!({"business_hours": [
                    {"sub_setting_type": "custom_hours", "settings": {"type": 1}},
                    {"sub_setting_type": "call_handling", "settings": {}},
                    {"sub_setting_type": "call_forwarding", "settings": {
                        "call_forwarding_settings": [
                            {"id": "cf-m", "description": "Zoom Mobile Apps", "enable": true},
                            {"id": "cf-d", "description": "Zoom Desktop Apps", "enable": true},
                            {"id": "cf-a", "description": "Zoom Phone Appliance Apps", "enable": true}
                        ]}}
                ]})
                .to_string(),
            )
            .expect(2)
            .create_async()
            .await;
        let custom_hours = server
            .mock("PATCH", business_path)
            .match_body(Matcher::PartialJson(json!({
                "sub_setting_type": "custom_hours",
                "settings": {"type": 2, "custom_hours_settings": custom_week()}
            })))
            .with_status(204)
            .expect(1)
            .create_async()
            .await;
        let call_handling = server
            .mock("PATCH", business_path)
            .match_body(Matcher::PartialJson(json!({
                "sub_setting_type": "call_handling",
                "settings": {"max_wait_time": 60, "ring_mode": "simultaneous"}
            })))
            .with_status(204)
            .expect(1)
            .create_async()
            .await;
        let call_forwarding = server
            .mock("PATCH", business_path)
            .match_body(Matcher::Json(json!({
                "sub_setting_type": "call_forwarding",
                "settings": {
                    "require_press_1_before_connecting": true,
                    "call_forwarding_settings": [
                        {"id": "cf-m", "enable": false},
                        {"id": "cf-d", "enable": true},
                        {"id": "cf-a", "enable": true}
                    ]
                }
            })))
            .with_status(204)
            .expect(1)
            .create_async()
            .await;
        let add_forwarding = server
            .mock("POST", business_path)
            .match_body(Matcher::Json(json!({
                "sub_setting_type": "call_forwarding",
                "settings": {"description": "desk", "phone_number": "+15550101"}
            })))
            .with_status(201)
            .with_body(r#"{"call_forwarding_id": "cf-new"}"#)
            .expect(1)
            .create_async()
            .await;

        let planned = DynamicValue::new(json!({
            "extension_id": "ext-1",
            "custom_hours": {"type": 2, "allow_members_to_reset": null, "settings": custom_week()},
            "call_handling": {"max_wait_time": 60, "ring_mode": "simultaneous"},
            "call_forwarding": {
                "require_press_1_before_connecting": true,
                "enable_zoom_mobile_apps": false,
                "enable_zoom_desktop_apps": true,
                "enable_zoom_phone_appliance_apps": true,
                "settings": [{"description": "desk", "enable": true, "phone_number": "+15550101"}]
            }
        }));

        let response = configured(&server.url())
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "zoom_phone_call_handling_business_hours".to_string(),
                    planned_state: planned,
                    config: DynamicValue::null(),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(
            response
                .new_state
                .get_string(
                    &AttributePath::new("call_forwarding")
                        .attribute("settings")
                        .index(0)
                        .attribute("id")
                )
                .unwrap(),
            "cf-new"
        );
        read.assert_async().await;
        custom_hours.assert_async().await;
        call_handling.assert_async().await;
        call_forwarding.assert_async().await;
        add_forwarding.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_custom_hours_never_reach_the_api() {
        let mut server = Server::new_async().await;
        let any = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let response = configured(&server.url())
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "zoom_phone_call_handling_business_hours".to_string(),
                    planned_state: DynamicValue::new(json!({
                        "extension_id": "ext-1",
                        "custom_hours": {"type": 1, "settings": custom_week()},
                        "call_handling": {}
                    })),
                    config: DynamicValue::null(),
                },
            )
            .await;

        assert_eq!(
            response.diagnostics[0].detail,
            "custom_hours type 1 cannot have settings"
        );
        any.assert_async().await;
    }

    #[tokio::test]
    async fn test_read_reports_gone_extension() {
        let mut server = Server::new_async().await;
        let _read = server
            .mock("GET", "/phone/extension/ext-1/call_handling/settings")
            .with_status(400)
            .with_body(r#"{"code": 300, "message": "Extension does not exist"}"#)
            .create_async()
            .await;

        let response = configured(&server.url())
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "zoom_phone_call_handling_business_hours".to_string(),
                    current_state: DynamicValue::new(json!({"extension_id": "ext-1"})),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn test_import_sets_extension_id() {
        let response = BusinessHoursResource::new()
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "zoom_phone_call_handling_business_hours".to_string(),
                    id: "ext-1".to_string(),
                },
            )
            .await;

        assert_eq!(response.imported_resources.len(), 1);
        assert_eq!(
            response.imported_resources[0]
                .state
                .get_string(&AttributePath::new("extension_id"))
                .unwrap(),
            "ext-1"
        );
    }
}
