//! Phone number assignment to call queues, shared line groups and users.
//!
//! The three owners expose the same shape: read the owner to list its
//! numbers, assign in chunks by id or by literal number, unassign by id.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tfplug::import::import_state_passthrough_id;
use tfplug::resource::{
    CreateResourceResponse, DeleteResourceResponse, ImportResourceStateRequest,
    ImportResourceStateResponse, ImportedResource, ReadResourceResponse, UpdateResourceResponse,
};
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, ObjectNestingMode};
use tfplug::{AttributePath, Context, Diagnostic, DynamicValue};

use super::ignore_gone;
use crate::api::error::ignore_not_found;
use crate::api::shared_line_groups::SharedLineGroupPatch;
use crate::api::{ApiError, Client, Optional, Outcome, PhoneNumberRef};
use crate::reconcile::{
    checkpoint, compute_delta, retain_declared, Identifier, Keyed, ReconcileError,
    PHONE_NUMBER_CHUNK_SIZE,
};
use crate::resources::{decode_model, encode_state, not_configured, reconcile_diagnostic};
use crate::ZoomProviderData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberOwner {
    CallQueue,
    SharedLineGroup,
    User,
}

impl NumberOwner {
    fn label(&self) -> &'static str {
        match self {
            NumberOwner::CallQueue => "call queue",
            NumberOwner::SharedLineGroup => "shared line group",
            NumberOwner::User => "user",
        }
    }
}

impl std::fmt::Display for NumberOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumberModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    /// Call queues only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Keyed for PhoneNumberModel {
    fn identifier(&self) -> Option<Identifier> {
        Identifier::from_parts(self.id.as_deref(), self.number.as_deref())
    }
}

/// Numbers currently assigned to an owner
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSet {
    pub primary_number: Option<String>,
    pub numbers: Vec<PhoneNumberModel>,
}

impl NumberSet {
    /// Only the numbers matching an entry of `declared`
    pub fn declared(self, declared: &[PhoneNumberModel]) -> Self {
        Self {
            primary_number: self.primary_number,
            numbers: retain_declared(self.numbers, declared),
        }
    }
}

pub fn validate_numbers(
    numbers: &[PhoneNumberModel],
    primary_number: Option<&str>,
) -> Result<(), ReconcileError> {
    if numbers.iter().any(|n| n.identifier().is_none()) {
        return Err(ReconcileError::validation(
            "either `id` or `number` must be specified on phone number",
        ));
    }
    if let Some(primary) = primary_number.filter(|p| !p.is_empty()) {
        if !numbers.iter().any(|n| n.number.as_deref() == Some(primary)) {
            return Err(ReconcileError::validation(format!(
                "primary number {} must be included in phone_numbers",
                primary
            )));
        }
    }
    Ok(())
}

pub struct PhoneNumberReconciler<'a> {
    client: &'a Client,
    owner: NumberOwner,
}

impl<'a> PhoneNumberReconciler<'a> {
    pub fn new(client: &'a Client, owner: NumberOwner) -> Self {
        Self { client, owner }
    }

    async fn fetch(&self, owner_id: &str) -> Result<NumberSet, ApiError> {
        let to_model = |id: Option<String>, number: Option<String>, source: Option<String>| {
            PhoneNumberModel { id, number, source }
        };
        let set = match self.owner {
            NumberOwner::CallQueue => {
                let queue = self.client.call_queues().get(owner_id).await?;
                NumberSet {
                    primary_number: None,
                    numbers: queue
                        .phone_numbers
                        .into_iter()
                        .map(|n| to_model(n.id, n.number, n.source))
                        .collect(),
                }
            }
            NumberOwner::SharedLineGroup => {
                let group = self.client.shared_line_groups().get(owner_id).await?;
                NumberSet {
                    primary_number: group.primary_number,
                    numbers: group
                        .phone_numbers
                        .into_iter()
                        .map(|n| to_model(n.id, n.number, None))
                        .collect(),
                }
            }
            NumberOwner::User => {
                let user = self.client.users().get(owner_id).await?;
                NumberSet {
                    primary_number: None,
                    numbers: user
                        .phone_numbers
                        .into_iter()
                        .map(|n| to_model(n.id, n.number, None))
                        .collect(),
                }
            }
        };
        Ok(set)
    }

    pub async fn read(&self, ctx: &Context, owner_id: &str) -> Outcome<NumberSet, ReconcileError> {
        if let Err(e) = checkpoint(ctx) {
            return Outcome::Error(e);
        }
        Outcome::from_lookup(self.fetch(owner_id).await).map_err(ReconcileError::remote(format!(
            "error reading phone numbers of {} {}",
            self.owner, owner_id
        )))
    }

    /// Converge the owner's numbers to `plan`, then its primary number when
    /// one is given. With `state`, only numbers recorded there are removed.
    pub async fn sync(
        &self,
        ctx: &Context,
        owner_id: &str,
        plan: &[PhoneNumberModel],
        state: Option<&[PhoneNumberModel]>,
        primary_number: Option<&str>,
    ) -> Result<(), ReconcileError> {
        validate_numbers(plan, primary_number)?;

        let asis = match self.read(ctx, owner_id).await {
            Outcome::Found(asis) => asis,
            Outcome::Gone => {
                return Err(ReconcileError::NotFound(format!(
                    "{} {} not found",
                    self.owner, owner_id
                )))
            }
            Outcome::Error(e) => return Err(e),
        };

        let mut delta = compute_delta(plan, &asis.numbers);
        if let Some(state) = state {
            delta = delta.within_state(state);
        }

        for phone_number_id in delta.unassign.iter().filter_map(|n| n.id.as_deref()) {
            checkpoint(ctx)?;
            ignore_not_found(self.unassign(owner_id, phone_number_id).await).map_err(
                ReconcileError::remote(format!(
                    "error unassigning phone number {} from {} {}",
                    phone_number_id, self.owner, owner_id
                )),
            )?;
            tracing::debug!(
                owner = %self.owner,
                owner_id = %owner_id,
                phone_number_id = %phone_number_id,
                "Unassigned phone number"
            );
        }

        let (by_id, by_number): (Vec<&PhoneNumberModel>, Vec<&PhoneNumberModel>) = delta
            .assign
            .into_iter()
            .partition(|n| n.id.as_deref().is_some_and(|id| !id.is_empty()));
        let by_id: Vec<PhoneNumberRef> = by_id
            .iter()
            .filter_map(|n| n.id.as_deref())
            .map(PhoneNumberRef::by_id)
            .collect();
        let by_number: Vec<PhoneNumberRef> = by_number
            .iter()
            .filter_map(|n| n.number.as_deref())
            .map(PhoneNumberRef::by_number)
            .collect();

        for chunk in by_id
            .chunks(PHONE_NUMBER_CHUNK_SIZE)
            .chain(by_number.chunks(PHONE_NUMBER_CHUNK_SIZE))
        {
            checkpoint(ctx)?;
            self.assign(owner_id, chunk)
                .await
                .map_err(ReconcileError::remote(format!(
                    "error assigning phone numbers to {} {}",
                    self.owner, owner_id
                )))?;
            tracing::debug!(
                owner = %self.owner,
                owner_id = %owner_id,
                count = chunk.len(),
                "Assigned phone numbers"
            );
        }

        if let Some(primary) = primary_number.filter(|p| !p.is_empty()) {
            if asis.primary_number.as_deref() != Some(primary) {
                checkpoint(ctx)?;
                self.client
                    .shared_line_groups()
                    .update(
                        owner_id,
                        &SharedLineGroupPatch {
                            primary_number: Optional::Value(primary.to_string()),
                        },
                    )
                    .await
                    .map_err(ReconcileError::remote(format!(
                        "error updating primary number of {} {}",
                        self.owner, owner_id
                    )))?;
            }
        }

        Ok(())
    }

    /// Unassign every number. Users have no bulk endpoint, so their numbers
    /// are removed one by one.
    pub async fn delete(&self, ctx: &Context, owner_id: &str) -> Result<(), ReconcileError> {
        let context = format!(
            "error unassigning phone numbers of {} {}",
            self.owner, owner_id
        );
        checkpoint(ctx)?;
        match self.owner {
            NumberOwner::CallQueue => ignore_gone(
                self.client
                    .call_queues()
                    .unassign_all_numbers(owner_id)
                    .await,
            )
            .map_err(ReconcileError::remote(context)),
            NumberOwner::SharedLineGroup => ignore_gone(
                self.client
                    .shared_line_groups()
                    .unassign_all_numbers(owner_id)
                    .await,
            )
            .map_err(ReconcileError::remote(context)),
            NumberOwner::User => {
                let Some(asis) = self.read(ctx, owner_id).await.into_result()? else {
                    return Ok(());
                };
                for phone_number_id in asis.numbers.iter().filter_map(|n| n.id.as_deref()) {
                    checkpoint(ctx)?;
                    ignore_not_found(self.unassign(owner_id, phone_number_id).await)
                        .map_err(ReconcileError::remote(context.clone()))?;
                }
                Ok(())
            }
        }
    }

    async fn assign(&self, owner_id: &str, refs: &[PhoneNumberRef]) -> Result<(), ApiError> {
        match self.owner {
            NumberOwner::CallQueue => self.client.call_queues().assign_numbers(owner_id, refs).await,
            NumberOwner::SharedLineGroup => {
                self.client
                    .shared_line_groups()
                    .assign_numbers(owner_id, refs)
                    .await
            }
            NumberOwner::User => self.client.users().assign_numbers(owner_id, refs).await,
        }
    }

    async fn unassign(&self, owner_id: &str, phone_number_id: &str) -> Result<(), ApiError> {
        match self.owner {
            NumberOwner::CallQueue => {
                self.client
                    .call_queues()
                    .unassign_number(owner_id, phone_number_id)
                    .await
            }
            NumberOwner::SharedLineGroup => {
                self.client
                    .shared_line_groups()
                    .unassign_number(owner_id, phone_number_id)
                    .await
            }
            NumberOwner::User => {
                self.client
                    .users()
                    .unassign_number(owner_id, phone_number_id)
                    .await
            }
        }
    }
}

/// Terraform model of a phone number assignment resource
pub(crate) trait NumberAssignment: Serialize + DeserializeOwned {
    const OWNER: NumberOwner;
    /// Attribute holding the owner id
    const OWNER_ATTRIBUTE: &'static str;

    fn owner_id(&self) -> &str;
    fn phone_numbers(&self) -> &[PhoneNumberModel];

    fn primary_number(&self) -> Option<&str> {
        None
    }

    /// State reported for the remote `set`, keyed like `self`
    fn with_remote(&self, set: NumberSet) -> Self;
}

pub(crate) fn phone_numbers_attribute(owner: NumberOwner) -> Attribute {
    let mut attributes = vec![
        AttributeBuilder::new("id", AttributeType::String)
            .description("Phone number ID. `id` or `number` must be specified.")
            .optional()
            .computed()
            .build(),
        AttributeBuilder::new("number", AttributeType::String)
            .description("Phone number in E164 format. `id` or `number` must be specified.")
            .optional()
            .computed()
            .build(),
    ];
    if owner == NumberOwner::CallQueue {
        attributes.push(
            AttributeBuilder::new("source", AttributeType::String)
                .description("Source of the phone number: internal or external")
                .optional()
                .computed()
                .build(),
        );
    }

    AttributeBuilder::nested("phone_numbers", ObjectNestingMode::Set, attributes)
        .description("Phone numbers assigned to the owner")
        .required()
        .build()
}

pub(crate) fn validate_assignment<M: NumberAssignment>(config: &DynamicValue) -> Vec<Diagnostic> {
    let model: M = match config.decode() {
        Ok(model) => model,
        Err(e) => return vec![Diagnostic::error("Invalid configuration", e.to_string())],
    };
    match validate_numbers(model.phone_numbers(), model.primary_number()) {
        Ok(()) => vec![],
        Err(e) => vec![
            Diagnostic::error("Invalid phone number configuration", e.to_string())
                .with_attribute(AttributePath::new("phone_numbers")),
        ],
    }
}

async fn converge<M: NumberAssignment>(
    ctx: &Context,
    reconciler: &PhoneNumberReconciler<'_>,
    plan: &M,
    prior: Option<&M>,
) -> Result<M, ReconcileError> {
    reconciler
        .sync(
            ctx,
            plan.owner_id(),
            plan.phone_numbers(),
            prior.map(M::phone_numbers),
            plan.primary_number(),
        )
        .await?;

    match reconciler.read(ctx, plan.owner_id()).await {
        Outcome::Found(set) => Ok(plan.with_remote(set.declared(plan.phone_numbers()))),
        Outcome::Gone => Err(ReconcileError::NotFound(format!(
            "{} {} not found after assignment",
            M::OWNER,
            plan.owner_id()
        ))),
        Outcome::Error(e) => Err(e),
    }
}

pub(crate) async fn create_assignment<M: NumberAssignment>(
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

    let reconciler = PhoneNumberReconciler::new(&provider_data.client, M::OWNER);
    let state = match converge(ctx, &reconciler, &plan, None).await {
        Ok(state) => state,
        Err(e) => {
            return fail(
                planned_state,
                reconcile_diagnostic(&format!("Error creating phone {} phone numbers", M::OWNER), e),
            )
        }
    };

    match encode_state(&state) {
        Ok(new_state) => {
            tracing::info!(
                owner = %M::OWNER,
                owner_id = %plan.owner_id(),
                count = state.phone_numbers().len(),
                "Assigned phone numbers"
            );
            CreateResourceResponse {
                new_state,
                diagnostics: vec![],
            }
        }
        Err(diag) => fail(planned_state, diag),
    }
}

pub(crate) async fn read_assignment<M: NumberAssignment>(
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

    let reconciler = PhoneNumberReconciler::new(&provider_data.client, M::OWNER);
    match reconciler.read(ctx, prior.owner_id()).await {
        Outcome::Found(set) => {
            let state = prior.with_remote(set.declared(prior.phone_numbers()));
            match encode_state(&state) {
                Ok(new_state) => ReadResourceResponse {
                    new_state: Some(new_state),
                    diagnostics: vec![],
                },
                Err(diag) => fail(current_state, diag),
            }
        }
        Outcome::Gone => {
            tracing::warn!(
                owner = %M::OWNER,
                owner_id = %prior.owner_id(),
                "Owner no longer exists, removing phone numbers from state"
            );
            ReadResourceResponse {
                new_state: None,
                diagnostics: vec![],
            }
        }
        Outcome::Error(e) => fail(
            current_state,
            reconcile_diagnostic(&format!("Error reading phone {} phone numbers", M::OWNER), e),
        ),
    }
}

pub(crate) async fn update_assignment<M: NumberAssignment>(
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

    let reconciler = PhoneNumberReconciler::new(&provider_data.client, M::OWNER);
    let state = match converge(ctx, &reconciler, &plan, Some(&prior)).await {
        Ok(state) => state,
        Err(e) => {
            return fail(
                prior_state,
                reconcile_diagnostic(&format!("Error updating phone {} phone numbers", M::OWNER), e),
            )
        }
    };

    match encode_state(&state) {
        Ok(new_state) => {
            tracing::info!(
                owner = %M::OWNER,
                owner_id = %plan.owner_id(),
                "Updated phone number assignment"
            );
            UpdateResourceResponse {
                new_state,
                diagnostics: vec![],
            }
        }
        Err(diag) => fail(prior_state, diag),
    }
}

pub(crate) async fn delete_assignment<M: NumberAssignment>(
    provider_data: Option<&ZoomProviderData>,
    ctx: &Context,
    prior_state: DynamicValue,
) -> DeleteResourceResponse {
    let Some(provider_data) = provider_data else {
        return DeleteResourceResponse {
            diagnostics: vec![not_configured()],
        };
    };
    let prior: M = match decode_model(&prior_state, "prior state") {
        Ok(prior) => prior,
        Err(diag) => {
            return DeleteResourceResponse {
                diagnostics: vec![diag],
            }
        }
    };

    let reconciler = PhoneNumberReconciler::new(&provider_data.client, M::OWNER);
    if let Err(e) = reconciler.delete(ctx, prior.owner_id()).await {
        return DeleteResourceResponse {
            diagnostics: vec![reconcile_diagnostic(
                &format!("Error deleting phone {} phone numbers", M::OWNER),
                e,
            )],
        };
    }

    tracing::info!(
        owner = %M::OWNER,
        owner_id = %prior.owner_id(),
        "Unassigned all phone numbers"
    );
    DeleteResourceResponse {
        diagnostics: vec![],
    }
}

/// Import adopts every number the owner currently has
pub(crate) async fn import_assignment<M: NumberAssignment>(
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
        AttributePath::new(M::OWNER_ATTRIBUTE),
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

async fn adopt<M: NumberAssignment>(
    provider_data: Option<&ZoomProviderData>,
    ctx: &Context,
    imported: &DynamicValue,
) -> Result<DynamicValue, Diagnostic> {
    let summary = format!("Error importing phone {} phone numbers", M::OWNER);
    let provider_data = provider_data.ok_or_else(not_configured)?;
    let owner: M = decode_model(imported, "imported state")?;

    let reconciler = PhoneNumberReconciler::new(&provider_data.client, M::OWNER);
    match reconciler.read(ctx, owner.owner_id()).await {
        Outcome::Found(set) => encode_state(&owner.with_remote(set)),
        Outcome::Gone => Err(Diagnostic::error(
            summary,
            format!("{} {} not found", M::OWNER, owner.owner_id()),
        )),
        Outcome::Error(e) => Err(reconcile_diagnostic(&summary, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn number(id: Option<&str>, number: Option<&str>) -> PhoneNumberModel {
        PhoneNumberModel {
            id: id.map(str::to_string),
            number: number.map(str::to_string),
            source: None,
        }
    }

    #[test]
    fn numbers_need_a_key() {
        let err = validate_numbers(&[number(None, None)], None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "either `id` or `number` must be specified on phone number"
        );
    }

    #[test]
    fn primary_must_be_assigned() {
        let numbers = [number(Some("pn-1"), Some("+15550100")), number(None, Some("+15550101"))];
        assert!(validate_numbers(&numbers, Some("+15550101")).is_ok());

        let err = validate_numbers(&numbers, Some("+15550199")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "primary number +15550199 must be included in phone_numbers"
        );
    }

    #[tokio::test]
    async fn test_assign_chunks_by_five_per_kind() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", "/phone/users/u1")
            .with_body(r#"{"id": "u1", "phone_numbers": []}"#)
            .create_async()
            .await;
        let assign = server
            .mock("POST", "/phone/users/u1/phone_numbers")
            .with_status(201)
            .expect(4)
            .create_async()
            .await;

        let plan: Vec<PhoneNumberModel> = (0..7)
            .map(|i| number(Some(&format!("pn-{}", i)), None))
            .chain((0..3).map(|i| number(None, Some(&format!("+1555010{}", i)))))
            .collect();

        let client = create_test_client(&server.url());
        PhoneNumberReconciler::new(&client, NumberOwner::User)
            .sync(&Context::new(), "u1", &plan, None, None)
            .await
            .unwrap();

        // ids: 5 + 2, numbers: 3
        assign.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_keeps_numbers_assigned_elsewhere() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", "/phone/call_queues/cq-1")
            .with_body(
                json!({
                    "id": "cq-1",
                    "phone_numbers": [
                        {"id": "pn-1", "number": "+15550101", "source": "internal"},
                        {"id": "pn-2", "number": "+15550102", "source": "internal"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;
        let unassign = server
            .mock("DELETE", "/phone/call_queues/cq-1/phone_numbers/pn-1")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;
        let other = server
            .mock("DELETE", "/phone/call_queues/cq-1/phone_numbers/pn-2")
            .expect(0)
            .create_async()
            .await;
        let assign = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let state = [number(Some("pn-1"), Some("+15550101"))];
        PhoneNumberReconciler::new(&client, NumberOwner::CallQueue)
            .sync(&Context::new(), "cq-1", &[], Some(&state[..]), None)
            .await
            .unwrap();

        unassign.assert_async().await;
        other.assert_async().await;
        assign.assert_async().await;
    }

    #[tokio::test]
    async fn test_user_delete_unassigns_each_number() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", "/phone/users/u1")
            .with_body(r#"{"id": "u1", "phone_numbers": [{"id": "pn-1"}, {"id": "pn-2"}]}"#)
            .create_async()
            .await;
        let first = server
            .mock("DELETE", "/phone/users/u1/phone_numbers/pn-1")
            .with_status(204)
            .create_async()
            .await;
        let second = server
            .mock("DELETE", "/phone/users/u1/phone_numbers/pn-2")
            .with_status(404)
            .with_body(r#"{"code": 404, "message": "Not found"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        PhoneNumberReconciler::new(&client, NumberOwner::User)
            .delete(&Context::new(), "u1")
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_of_vanished_group_succeeds() {
        let mut server = Server::new_async().await;
        let _delete = server
            .mock("DELETE", "/phone/shared_line_groups/slg-1/phone_numbers")
            .with_status(400)
            .with_body(r#"{"code": 300, "message": "Shared line group does not exist"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let result = PhoneNumberReconciler::new(&client, NumberOwner::SharedLineGroup)
            .delete(&Context::new(), "slg-1")
            .await;
        assert!(result.is_ok());
    }
}
