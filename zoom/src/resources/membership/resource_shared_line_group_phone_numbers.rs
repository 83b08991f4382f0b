//! Shared line group phone numbers resource
//!
//! Besides the assigned set, a shared line group has a primary number used
//! by desk phones. It must be one of the assigned numbers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tfplug::context::Context;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure, ResourceWithImportState,
    UpdateResourceRequest, UpdateResourceResponse, ValidateResourceConfigRequest,
    ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};

use super::phone_numbers::{
    create_assignment, delete_assignment, import_assignment, phone_numbers_attribute,
    read_assignment, update_assignment, validate_assignment, NumberAssignment, NumberOwner,
    NumberSet,
    PhoneNumberModel,
};
use crate::resources::configure_provider_data;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedLineGroupPhoneNumbersModel {
    pub shared_line_group_id: String,
    #[serde(default)]
    pub primary_number: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumberModel>,
}

impl NumberAssignment for SharedLineGroupPhoneNumbersModel {
    const OWNER: NumberOwner = NumberOwner::SharedLineGroup;
    const OWNER_ATTRIBUTE: &'static str = "shared_line_group_id";

    fn owner_id(&self) -> &str {
        &self.shared_line_group_id
    }

    fn phone_numbers(&self) -> &[PhoneNumberModel] {
        &self.phone_numbers
    }

    fn primary_number(&self) -> Option<&str> {
        self.primary_number.as_deref()
    }

    fn with_remote(&self, set: NumberSet) -> Self {
        Self {
            shared_line_group_id: self.shared_line_group_id.clone(),
            primary_number: set.primary_number,
            phone_numbers: set.numbers,
        }
    }
}

type Model = SharedLineGroupPhoneNumbersModel;

#[derive(Default)]
pub struct SharedLineGroupPhoneNumbersResource {
    provider_data: Option<crate::ZoomProviderData>,
}

impl SharedLineGroupPhoneNumbersResource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Resource for SharedLineGroupPhoneNumbersResource {
    fn type_name(&self) -> &str {
        "zoom_phone_shared_line_group_phone_numbers"
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
            .description("Manages the phone numbers and primary number of a shared line group")
            .attribute(
                AttributeBuilder::new(Model::OWNER_ATTRIBUTE, AttributeType::String)
                    .description("Unique identifier of the shared line group")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("primary_number", AttributeType::String)
                    .description(
                        "Number desk phones use for the shared line; must be one of phone_numbers",
                    )
                    .required()
                    .build(),
            )
            .attribute(phone_numbers_attribute(Model::OWNER))
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
            diagnostics: validate_assignment::<Model>(&request.config),
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        create_assignment::<Model>(self.provider_data.as_ref(), &ctx, request.planned_state).await
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        read_assignment::<Model>(self.provider_data.as_ref(), &ctx, request.current_state).await
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        update_assignment::<Model>(
            self.provider_data.as_ref(),
            &ctx,
            request.prior_state,
            request.planned_state,
        )
        .await
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_assignment::<Model>(self.provider_data.as_ref(), &ctx, request.prior_state).await
    }
}

#[async_trait]
impl ResourceWithConfigure for SharedLineGroupPhoneNumbersResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        configure_provider_data(request, &mut self.provider_data)
    }
}

#[async_trait]
impl ResourceWithImportState for SharedLineGroupPhoneNumbersResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_assignment::<Model>(self.provider_data.as_ref(), &ctx, request).await
    }
}
