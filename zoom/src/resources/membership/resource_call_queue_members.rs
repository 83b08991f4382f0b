//! Call queue members resource

use async_trait::async_trait;
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

use super::members::{
    create_members, delete_members, import_members, member_attributes, read_members,
    update_members, validate_config, CallQueueMembersModel, GroupMembers,
};
use crate::resources::configure_provider_data;

type Model = CallQueueMembersModel;

#[derive(Default)]
pub struct CallQueueMembersResource {
    provider_data: Option<crate::ZoomProviderData>,
}

impl CallQueueMembersResource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Resource for CallQueueMembersResource {
    fn type_name(&self) -> &str {
        "zoom_phone_call_queue_members"
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
        let mut builder = SchemaBuilder::new()
            .version(0)
            .description(
                "Manages users and common areas answering a call queue. Members added \
                 outside this resource are left untouched.",
            )
            .attribute(
                AttributeBuilder::new(Model::GROUP_ATTRIBUTE, AttributeType::String)
                    .description("Unique identifier of the call queue")
                    .required()
                    .build(),
            );
        for attribute in member_attributes() {
            builder = builder.attribute(attribute);
        }

        ResourceSchemaResponse {
            schema: builder.build(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: validate_config::<Model>(&request.config),
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        create_members::<Model>(self.provider_data.as_ref(), &ctx, request.planned_state).await
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        read_members::<Model>(self.provider_data.as_ref(), &ctx, request.current_state).await
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        update_members::<Model>(
            self.provider_data.as_ref(),
            &ctx,
            request.prior_state,
            request.planned_state,
        )
        .await
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_members::<Model>(self.provider_data.as_ref(), &ctx, request.prior_state).await
    }
}

#[async_trait]
impl ResourceWithConfigure for CallQueueMembersResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        configure_provider_data(request, &mut self.provider_data)
    }
}

#[async_trait]
impl ResourceWithImportState for CallQueueMembersResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_members::<Model>(self.provider_data.as_ref(), &ctx, request).await
    }
}
