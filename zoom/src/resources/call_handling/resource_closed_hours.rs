//! Closed hours call handling resource

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
use tfplug::schema::SchemaBuilder;
use tfplug::types::AttributePath;

use super::{
    call_forwarding_attribute, call_handling_attribute, create_profile, extension_id_attribute,
    read_profile, reset_profile, update_profile, validate_profile,
};
use crate::api::call_handling::SettingType;
use crate::resources::configure_provider_data;

const PERIOD: SettingType = SettingType::ClosedHours;

#[derive(Default)]
pub struct ClosedHoursResource {
    provider_data: Option<crate::ZoomProviderData>,
}

impl ClosedHoursResource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Resource for ClosedHoursResource {
    fn type_name(&self) -> &str {
        "zoom_phone_call_handling_closed_hours"
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
            .description(
                "Manages the closed hours call handling of an extension. \
                 Requires business hours with custom_hours.type = 2.",
            )
            .attribute(extension_id_attribute())
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
impl ResourceWithConfigure for ClosedHoursResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        configure_provider_data(request, &mut self.provider_data)
    }
}

#[async_trait]
impl ResourceWithImportState for ClosedHoursResource {
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
