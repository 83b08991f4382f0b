//! Group membership of call queues and shared line groups: users and
//! common areas.
//!
//! A group may be managed by several configurations at once, so every
//! operation is fenced by the entries a resource declares: reads report
//! only those, and removals only touch members recorded in state.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tfplug::import::import_state_passthrough_id;
use tfplug::resource::{
    CreateResourceResponse, DeleteResourceResponse, ImportResourceStateRequest,
    ImportResourceStateResponse, ImportedResource, ReadResourceResponse, UpdateResourceResponse,
};
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, ObjectNestingMode};
use tfplug::{AttributePath, Context, Diagnostic, DynamicValue};

use crate::api::call_queues::{AddMembers, CallQueueMember, MemberUserRef};
use crate::api::error::ignore_not_found;
use crate::api::shared_line_groups::SharedLineGroupMember;
use crate::api::{ApiError, Client, Outcome};
use crate::reconcile::{
    checkpoint, compute_delta, retain_declared, Identifier, Keyed, ReconcileError,
    MEMBER_CHUNK_SIZE,
};
use crate::resources::{decode_model, encode_state, not_configured, reconcile_diagnostic};
use crate::ZoomProviderData;

const LEVEL_USER: &str = "user";
const LEVEL_COMMON_AREA: &str = "commonArea";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberGroup {
    CallQueue,
    SharedLineGroup,
}

impl MemberGroup {
    fn label(&self) -> &'static str {
        match self {
            MemberGroup::CallQueue => "call queue",
            MemberGroup::SharedLineGroup => "shared line group",
        }
    }
}

impl std::fmt::Display for MemberGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Terraform model of a group members resource
pub trait GroupMembers: Serialize + DeserializeOwned {
    const GROUP: MemberGroup;
    /// Attribute holding the group id
    const GROUP_ATTRIBUTE: &'static str;

    fn group_id(&self) -> &str;
    fn declared_users(&self) -> Option<&[UserMemberModel]>;
    fn declared_common_areas(&self) -> Option<&[CommonAreaMemberModel]>;

    /// Same group, with the given member lists
    fn with_members(
        &self,
        users: Option<Vec<UserMemberModel>>,
        common_areas: Option<Vec<CommonAreaMemberModel>>,
    ) -> Self;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallQueueMembersModel {
    pub call_queue_id: String,
    #[serde(default)]
    pub common_areas: Option<Vec<CommonAreaMemberModel>>,
    #[serde(default)]
    pub users: Option<Vec<UserMemberModel>>,
}

impl CallQueueMembersModel {
    pub fn users(&self) -> &[UserMemberModel] {
        self.users.as_deref().unwrap_or_default()
    }

    pub fn common_areas(&self) -> &[CommonAreaMemberModel] {
        self.common_areas.as_deref().unwrap_or_default()
    }
}

impl GroupMembers for CallQueueMembersModel {
    const GROUP: MemberGroup = MemberGroup::CallQueue;
    const GROUP_ATTRIBUTE: &'static str = "call_queue_id";

    fn group_id(&self) -> &str {
        &self.call_queue_id
    }

    fn declared_users(&self) -> Option<&[UserMemberModel]> {
        self.users.as_deref()
    }

    fn declared_common_areas(&self) -> Option<&[CommonAreaMemberModel]> {
        self.common_areas.as_deref()
    }

    fn with_members(
        &self,
        users: Option<Vec<UserMemberModel>>,
        common_areas: Option<Vec<CommonAreaMemberModel>>,
    ) -> Self {
        Self {
            call_queue_id: self.call_queue_id.clone(),
            common_areas,
            users,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedLineGroupMembersModel {
    pub shared_line_group_id: String,
    #[serde(default)]
    pub common_areas: Option<Vec<CommonAreaMemberModel>>,
    #[serde(default)]
    pub users: Option<Vec<UserMemberModel>>,
}

impl GroupMembers for SharedLineGroupMembersModel {
    const GROUP: MemberGroup = MemberGroup::SharedLineGroup;
    const GROUP_ATTRIBUTE: &'static str = "shared_line_group_id";

    fn group_id(&self) -> &str {
        &self.shared_line_group_id
    }

    fn declared_users(&self) -> Option<&[UserMemberModel]> {
        self.users.as_deref()
    }

    fn declared_common_areas(&self) -> Option<&[CommonAreaMemberModel]> {
        self.common_areas.as_deref()
    }

    fn with_members(
        &self,
        users: Option<Vec<UserMemberModel>>,
        common_areas: Option<Vec<CommonAreaMemberModel>>,
    ) -> Self {
        Self {
            shared_line_group_id: self.shared_line_group_id.clone(),
            common_areas,
            users,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMemberModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extension_id: Option<String>,
    #[serde(default)]
    pub receive_call: Option<bool>,
}

impl Keyed for UserMemberModel {
    fn identifier(&self) -> Option<Identifier> {
        Identifier::from_parts(self.id.as_deref(), self.email.as_deref())
    }
}

/// Common areas have no natural key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonAreaMemberModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extension_id: Option<String>,
    #[serde(default)]
    pub receive_call: Option<bool>,
}

impl Keyed for CommonAreaMemberModel {
    fn identifier(&self) -> Option<Identifier> {
        Identifier::from_parts(self.id.as_deref(), None)
    }
}

pub fn validate_members<M: GroupMembers>(model: &M) -> Result<(), ReconcileError> {
    let users = model.declared_users().unwrap_or_default();
    let common_areas = model.declared_common_areas().unwrap_or_default();
    if users.iter().any(|u| u.identifier().is_none()) {
        return Err(ReconcileError::validation(
            "either `id` or `email` must be specified on user",
        ));
    }
    if common_areas.iter().any(|c| c.identifier().is_none()) {
        return Err(ReconcileError::validation(
            "`id` must be specified on common area",
        ));
    }
    Ok(())
}

/// Members of a group as listed remotely, split by kind
#[derive(Debug, Default)]
struct RemoteMembers {
    users: Vec<UserMemberModel>,
    common_areas: Vec<CommonAreaMemberModel>,
}

pub struct MemberReconciler<'a> {
    client: &'a Client,
    group: MemberGroup,
}

impl<'a> MemberReconciler<'a> {
    pub fn new(client: &'a Client, group: MemberGroup) -> Self {
        Self { client, group }
    }

    /// Call queues list members with a level; shared line groups report
    /// them grouped by kind on the group itself
    async fn fetch(&self, group_id: &str) -> Result<Vec<CallQueueMember>, ApiError> {
        match self.group {
            MemberGroup::CallQueue => self.client.call_queues().list_members(group_id).await,
            MemberGroup::SharedLineGroup => {
                let group = self.client.shared_line_groups().get(group_id).await?;
                let members = group.members.unwrap_or_default();
                let leveled = |level: &str| {
                    let level = level.to_string();
                    move |member: SharedLineGroupMember| CallQueueMember {
                        id: member.id,
                        name: member.name,
                        level: Some(level.clone()),
                        receive_call: None,
                        extension_id: member.extension_id,
                    }
                };
                Ok(members
                    .users
                    .into_iter()
                    .map(leveled(LEVEL_USER))
                    .chain(members.common_areas.into_iter().map(leveled(LEVEL_COMMON_AREA)))
                    .collect())
            }
        }
    }

    async fn list(
        &self,
        ctx: &Context,
        group_id: &str,
    ) -> Outcome<Vec<CallQueueMember>, ReconcileError> {
        if let Err(e) = checkpoint(ctx) {
            return Outcome::Error(e);
        }
        Outcome::from_lookup(self.fetch(group_id).await).map_err(ReconcileError::remote(format!(
            "error reading members of {} {}",
            self.group, group_id
        )))
    }

    async fn remote_members(
        &self,
        ctx: &Context,
        group_id: &str,
    ) -> Outcome<RemoteMembers, ReconcileError> {
        let members = match self.list(ctx, group_id).await {
            Outcome::Found(members) => members,
            Outcome::Gone => return Outcome::Gone,
            Outcome::Error(e) => return Outcome::Error(e),
        };
        match self.resolve(group_id, members).await {
            Ok(members) => Outcome::Found(members),
            Err(e) => Outcome::Error(e),
        }
    }

    /// Members the model declares, as they are remotely. A list the model
    /// leaves unset stays unset.
    pub async fn read<M: GroupMembers>(
        &self,
        ctx: &Context,
        declared: &M,
    ) -> Outcome<M, ReconcileError> {
        self.remote_members(ctx, declared.group_id())
            .await
            .map(|remote| {
                declared.with_members(
                    declared
                        .declared_users()
                        .map(|users| retain_declared(remote.users, users)),
                    declared
                        .declared_common_areas()
                        .map(|common_areas| retain_declared(remote.common_areas, common_areas)),
                )
            })
    }

    /// Every remote member of the group, for adopting an existing group.
    /// Empty kinds stay unset.
    pub async fn read_all<M: GroupMembers>(
        &self,
        ctx: &Context,
        group: &M,
    ) -> Outcome<M, ReconcileError> {
        self.remote_members(ctx, group.group_id())
            .await
            .map(|remote| {
                group.with_members(
                    (!remote.users.is_empty()).then_some(remote.users),
                    (!remote.common_areas.is_empty()).then_some(remote.common_areas),
                )
            })
    }

    /// Split by level and resolve user emails through the phone user directory
    async fn resolve(
        &self,
        group_id: &str,
        members: Vec<CallQueueMember>,
    ) -> Result<RemoteMembers, ReconcileError> {
        let extension_ids: Vec<String> = members
            .iter()
            .filter(|m| m.level.as_deref() == Some(LEVEL_USER))
            .filter_map(|m| m.extension_id.clone())
            .collect();
        let directory = self
            .client
            .users()
            .list_by_extension_ids(&extension_ids)
            .await
            .map_err(ReconcileError::remote(format!(
                "error resolving users of {} {}",
                self.group, group_id
            )))?;

        let mut remote = RemoteMembers::default();
        for member in members {
            match member.level.as_deref() {
                Some(LEVEL_USER) => {
                    let email = directory
                        .iter()
                        .find(|u| u.extension_id.is_some() && u.extension_id == member.extension_id)
                        .map(|u| u.email.clone())
                        .ok_or_else(|| {
                            ReconcileError::Unexpected(format!(
                                "user not found for extension {}",
                                member.extension_id.as_deref().unwrap_or_default()
                            ))
                        })?;
                    remote.users.push(UserMemberModel {
                        id: member.id,
                        email,
                        name: member.name,
                        extension_id: member.extension_id,
                        receive_call: member.receive_call,
                    });
                }
                Some(LEVEL_COMMON_AREA) => remote.common_areas.push(CommonAreaMemberModel {
                    id: member.id,
                    name: member.name,
                    extension_id: member.extension_id,
                    receive_call: member.receive_call,
                }),
                level => {
                    return Err(ReconcileError::Unexpected(format!(
                        "unexpected level: {}",
                        level.unwrap_or_default()
                    )))
                }
            }
        }
        Ok(remote)
    }

    /// Converge the group's members to `plan`. Only members recorded in
    /// `state` are removed; without a state nothing is.
    pub async fn sync<M: GroupMembers>(
        &self,
        ctx: &Context,
        plan: &M,
        state: Option<&M>,
    ) -> Result<(), ReconcileError> {
        validate_members(plan)?;
        let group_id = plan.group_id();

        let asis = match self.remote_members(ctx, group_id).await {
            Outcome::Found(asis) => asis,
            Outcome::Gone => {
                return Err(ReconcileError::NotFound(format!(
                    "{} {} not found",
                    self.group, group_id
                )))
            }
            Outcome::Error(e) => return Err(e),
        };

        let plan_users = plan.declared_users().unwrap_or_default();
        let plan_common_areas = plan.declared_common_areas().unwrap_or_default();
        let state_users = state.and_then(M::declared_users).unwrap_or_default();
        let state_common_areas = state.and_then(M::declared_common_areas).unwrap_or_default();

        let users = compute_delta(plan_users, &asis.users).within_state(state_users);
        let common_areas =
            compute_delta(plan_common_areas, &asis.common_areas).within_state(state_common_areas);

        let unassign: Vec<&str> = users
            .unassign
            .iter()
            .filter_map(|u| u.id.as_deref())
            .chain(common_areas.unassign.iter().filter_map(|c| c.id.as_deref()))
            .collect();
        self.remove(ctx, group_id, &unassign).await?;

        let common_area_ids: Vec<String> = common_areas
            .assign
            .iter()
            .filter_map(|c| c.id.clone())
            .collect();
        for chunk in common_area_ids.chunks(MEMBER_CHUNK_SIZE) {
            self.add(
                ctx,
                group_id,
                AddMembers {
                    common_area_ids: chunk.to_vec(),
                    ..Default::default()
                },
            )
            .await?;
        }

        let user_refs: Vec<MemberUserRef> = users.assign.iter().map(|u| user_ref(u)).collect();
        for chunk in user_refs.chunks(MEMBER_CHUNK_SIZE) {
            self.add(
                ctx,
                group_id,
                AddMembers {
                    users: chunk.to_vec(),
                    ..Default::default()
                },
            )
            .await?;
        }

        Ok(())
    }

    async fn add(
        &self,
        ctx: &Context,
        group_id: &str,
        members: AddMembers,
    ) -> Result<(), ReconcileError> {
        checkpoint(ctx)?;
        let count = members.common_area_ids.len() + members.users.len();
        let result = match self.group {
            MemberGroup::CallQueue => self.client.call_queues().add_members(group_id, members).await,
            MemberGroup::SharedLineGroup => {
                self.client
                    .shared_line_groups()
                    .add_members(group_id, members)
                    .await
            }
        };
        result.map_err(ReconcileError::remote(format!(
            "error adding members to {} {}",
            self.group, group_id
        )))?;
        tracing::debug!(group = %self.group, group_id = %group_id, count, "Added members");
        Ok(())
    }

    async fn remove(
        &self,
        ctx: &Context,
        group_id: &str,
        member_ids: &[&str],
    ) -> Result<(), ReconcileError> {
        for member_id in member_ids {
            checkpoint(ctx)?;
            let result = match self.group {
                MemberGroup::CallQueue => {
                    self.client
                        .call_queues()
                        .remove_member(group_id, member_id)
                        .await
                }
                MemberGroup::SharedLineGroup => {
                    self.client
                        .shared_line_groups()
                        .remove_member(group_id, member_id)
                        .await
                }
            };
            ignore_not_found(result).map_err(ReconcileError::remote(format!(
                "error removing member {} from {} {}",
                member_id, self.group, group_id
            )))?;
            tracing::debug!(
                group = %self.group,
                group_id = %group_id,
                member_id = %member_id,
                "Removed member"
            );
        }
        Ok(())
    }

    /// Remove the members recorded in `state` that are still assigned.
    /// A vanished group has none left.
    pub async fn delete<M: GroupMembers>(
        &self,
        ctx: &Context,
        state: &M,
    ) -> Result<(), ReconcileError> {
        let group_id = state.group_id();
        let remote = match self.list(ctx, group_id).await {
            Outcome::Found(remote) => remote,
            Outcome::Gone => return Ok(()),
            Outcome::Error(e) => return Err(e),
        };

        let recorded: Vec<&str> = state
            .declared_users()
            .unwrap_or_default()
            .iter()
            .filter_map(|u| u.id.as_deref())
            .chain(
                state
                    .declared_common_areas()
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|c| c.id.as_deref()),
            )
            .collect();
        let member_ids: Vec<&str> = remote
            .iter()
            .filter_map(|m| m.id.as_deref())
            .filter(|id| recorded.contains(id))
            .collect();

        self.remove(ctx, group_id, &member_ids).await
    }
}

/// The id wins when both keys are known
fn user_ref(user: &UserMemberModel) -> MemberUserRef {
    match user.identifier() {
        Some(Identifier::ById(id)) | Some(Identifier::Both { id, .. }) => MemberUserRef {
            id: Some(id),
            email: None,
        },
        Some(Identifier::ByNaturalKey(email)) => MemberUserRef {
            id: None,
            email: Some(email),
        },
        None => MemberUserRef::default(),
    }
}

fn computed(name: &str, r#type: AttributeType, description: &str) -> Attribute {
    AttributeBuilder::new(name, r#type)
        .description(description)
        .computed()
        .build()
}

/// `common_areas` and `users` set attributes shared by the member resources
pub(crate) fn member_attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::nested(
            "common_areas",
            ObjectNestingMode::Set,
            vec![
                AttributeBuilder::new("id", AttributeType::String)
                    .description("Common area ID")
                    .required()
                    .build(),
                computed("name", AttributeType::String, "Name of the common area"),
                computed("extension_id", AttributeType::String, "Extension ID of the common area"),
                computed("receive_call", AttributeType::Bool, "Whether the member receives calls"),
            ],
        )
        .description("Common area members")
        .optional()
        .build(),
        AttributeBuilder::nested(
            "users",
            ObjectNestingMode::Set,
            vec![
                AttributeBuilder::new("id", AttributeType::String)
                    .description("User ID. `id` or `email` must be specified.")
                    .optional()
                    .computed()
                    .build(),
                AttributeBuilder::new("email", AttributeType::String)
                    .description("Email address of the user. `id` or `email` must be specified.")
                    .optional()
                    .computed()
                    .build(),
                computed("name", AttributeType::String, "Name of the user"),
                computed("extension_id", AttributeType::String, "Extension ID of the user"),
                computed("receive_call", AttributeType::Bool, "Whether the member receives calls"),
            ],
        )
        .description("User members")
        .optional()
        .build(),
    ]
}

pub(crate) fn validate_config<M: GroupMembers>(config: &DynamicValue) -> Vec<Diagnostic> {
    let model: M = match config.decode() {
        Ok(model) => model,
        Err(e) => return vec![Diagnostic::error("Invalid configuration", e.to_string())],
    };
    match validate_members(&model) {
        Ok(()) => vec![],
        Err(e) => vec![Diagnostic::error("Invalid member configuration", e.to_string())
            .with_attribute(AttributePath::new("users"))],
    }
}

fn member_count<M: GroupMembers>(model: &M) -> usize {
    model.declared_users().map_or(0, <[_]>::len)
        + model.declared_common_areas().map_or(0, <[_]>::len)
}

/// Sync then read back, so naturally keyed members get their ids
async fn converge<M: GroupMembers>(
    ctx: &Context,
    reconciler: &MemberReconciler<'_>,
    plan: &M,
    prior: Option<&M>,
) -> Result<M, ReconcileError> {
    reconciler.sync(ctx, plan, prior).await?;
    match reconciler.read(ctx, plan).await {
        Outcome::Found(state) => Ok(state),
        Outcome::Gone => Err(ReconcileError::NotFound(format!(
            "{} {} not found after assignment",
            M::GROUP,
            plan.group_id()
        ))),
        Outcome::Error(e) => Err(e),
    }
}

pub(crate) async fn create_members<M: GroupMembers>(
    provider_data: Option<&ZoomProviderData>,
    ctx: &Context,
    planned_state: DynamicValue,
) -> CreateResourceResponse {
    let fail = |planned_state, diagnostic| CreateResourceResponse {
        new_state: planned_state,
        diagnostics: vec![diagnostic],
    };

    let Some(provider_data) = provider_data else {
        return fail(planned_state, not_configured());
    };
    let plan: M = match decode_model(&planned_state, "planned state") {
        Ok(plan) => plan,
        Err(diag) => return fail(planned_state, diag),
    };

    let reconciler = MemberReconciler::new(&provider_data.client, M::GROUP);
    let state = match converge(ctx, &reconciler, &plan, None).await {
        Ok(state) => state,
        Err(e) => {
            return fail(
                planned_state,
                reconcile_diagnostic(&format!("Error creating phone {} members", M::GROUP), e),
            )
        }
    };

    match encode_state(&state) {
        Ok(new_state) => {
            tracing::info!(
                group = %M::GROUP,
                group_id = %plan.group_id(),
                count = member_count(&state),
                "Created members"
            );
            CreateResourceResponse {
                new_state,
                diagnostics: vec![],
            }
        }
        Err(diag) => fail(planned_state, diag),
    }
}

pub(crate) async fn read_members<M: GroupMembers>(
    provider_data: Option<&ZoomProviderData>,
    ctx: &Context,
    current_state: DynamicValue,
) -> ReadResourceResponse {
    let fail = |current_state, diagnostic| ReadResourceResponse {
        new_state: Some(current_state),
        diagnostics: vec![diagnostic],
    };

    let Some(provider_data) = provider_data else {
        return fail(current_state, not_configured());
    };
    let prior: M = match decode_model(&current_state, "current state") {
        Ok(prior) => prior,
        Err(diag) => return fail(current_state, diag),
    };

    let reconciler = MemberReconciler::new(&provider_data.client, M::GROUP);
    match reconciler.read(ctx, &prior).await {
        Outcome::Found(state) => match encode_state(&state) {
            Ok(new_state) => ReadResourceResponse {
                new_state: Some(new_state),
                diagnostics: vec![],
            },
            Err(diag) => fail(current_state, diag),
        },
        Outcome::Gone => {
            tracing::warn!(
                group = %M::GROUP,
                group_id = %prior.group_id(),
                "Group no longer exists, removing members from state"
            );
            ReadResourceResponse {
                new_state: None,
                diagnostics: vec![],
            }
        }
        Outcome::Error(e) => fail(
            current_state,
            reconcile_diagnostic(&format!("Error reading phone {} members", M::GROUP), e),
        ),
    }
}

pub(crate) async fn update_members<M: GroupMembers>(
    provider_data: Option<&ZoomProviderData>,
    ctx: &Context,
    prior_state: DynamicValue,
    planned_state: DynamicValue,
) -> UpdateResourceResponse {
    let fail = |prior_state, diagnostic| UpdateResourceResponse {
        new_state: prior_state,
        diagnostics: vec![diagnostic],
    };

    let Some(provider_data) = provider_data else {
        return fail(prior_state, not_configured());
    };
    let prior: M = match decode_model(&prior_state, "prior state") {
        Ok(prior) => prior,
        Err(diag) => return fail(prior_state, diag),
    };
    let plan: M = match decode_model(&planned_state, "planned state") {
        Ok(plan) => plan,
        Err(diag) => return fail(prior_state, diag),
    };

    let reconciler = MemberReconciler::new(&provider_data.client, M::GROUP);
    let state = match converge(ctx, &reconciler, &plan, Some(&prior)).await {
        Ok(state) => state,
        Err(e) => {
            return fail(
                prior_state,
                reconcile_diagnostic(&format!("Error updating phone {} members", M::GROUP), e),
            )
        }
    };

    match encode_state(&state) {
        Ok(new_state) => {
            tracing::info!(group = %M::GROUP, group_id = %plan.group_id(), "Updated members");
            UpdateResourceResponse {
                new_state,
                diagnostics: vec![],
            }
        }
        Err(diag) => fail(prior_state, diag),
    }
}

pub(crate) async fn delete_members<M: GroupMembers>(
    provider_data: Option<&ZoomProviderData>,
    ctx: &Context,
    prior_state: DynamicValue,
) -> DeleteResourceResponse {
    let fail = |diagnostic| DeleteResourceResponse {
        diagnostics: vec![diagnostic],
    };

    let Some(provider_data) = provider_data else {
        return fail(not_configured());
    };
    let prior: M = match decode_model(&prior_state, "prior state") {
        Ok(prior) => prior,
        Err(diag) => return fail(diag),
    };

    let reconciler = MemberReconciler::new(&provider_data.client, M::GROUP);
    if let Err(e) = reconciler.delete(ctx, &prior).await {
        return fail(reconcile_diagnostic(
            &format!("Error deleting phone {} members", M::GROUP),
            e,
        ));
    }

    tracing::info!(group = %M::GROUP, group_id = %prior.group_id(), "Removed members");
    DeleteResourceResponse {
        diagnostics: vec![],
    }
}

/// Import adopts every member the group currently has
pub(crate) async fn import_members<M: GroupMembers>(
    provider_data: Option<&ZoomProviderData>,
    ctx: &Context,
    request: ImportResourceStateRequest,
) -> ImportResourceStateResponse {
    let mut response = ImportResourceStateResponse {
        imported_resources: vec![],
        diagnostics: vec![],
    };
    import_state_passthrough_id(
        ctx,
        AttributePath::new(M::GROUP_ATTRIBUTE),
        &request,
        &mut response,
    );
    let Some(imported) = response.imported_resources.pop() else {
        return response;
    };

    match adopt::<M>(provider_data, ctx, &imported.state).await {
        Ok(state) => response.imported_resources.push(ImportedResource {
            type_name: imported.type_name,
            state,
        }),
        Err(diag) => response.diagnostics.push(diag),
    }
    response
}

async fn adopt<M: GroupMembers>(
    provider_data: Option<&ZoomProviderData>,
    ctx: &Context,
    imported: &DynamicValue,
) -> Result<DynamicValue, Diagnostic> {
    let summary = format!("Error importing phone {} members", M::GROUP);
    let provider_data = provider_data.ok_or_else(not_configured)?;
    let group: M = decode_model(imported, "imported state")?;

    let reconciler = MemberReconciler::new(&provider_data.client, M::GROUP);
    match reconciler.read_all(ctx, &group).await {
        Outcome::Found(state) => encode_state(&state),
        Outcome::Gone => Err(Diagnostic::error(
            summary,
            format!("{} {} not found", M::GROUP, group.group_id()),
        )),
        Outcome::Error(e) => Err(reconcile_diagnostic(&summary, e)),
    }
}
