use serde::{Deserialize, Serialize};

use super::call_queues::AddMembers;
use super::common::{segment, Optional};
use super::error::ApiError;
use super::PhoneNumberRef;
use crate::api::Client;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedLineGroupNumber {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedLineGroupMember {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extension_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedLineGroupMembers {
    #[serde(default)]
    pub users: Vec<SharedLineGroupMember>,
    #[serde(default)]
    pub common_areas: Vec<SharedLineGroupMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedLineGroup {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub primary_number: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<SharedLineGroupNumber>,
    /// Absent when the group has no members
    #[serde(default)]
    pub members: Option<SharedLineGroupMembers>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SharedLineGroupPatch {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub primary_number: Optional<String>,
}

#[derive(Debug, Clone, Serialize)]
struct AddMembersRequest {
    members: AddMembers,
}

#[derive(Debug, Clone, Serialize)]
struct AssignNumbersRequest<'a> {
    phone_numbers: &'a [PhoneNumberRef],
}

/// Shared line group API operations
pub struct SharedLineGroupsApi<'a> {
    client: &'a Client,
}

impl<'a> SharedLineGroupsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /phone/shared_line_groups/{sharedLineGroupId}
    pub async fn get(&self, shared_line_group_id: &str) -> Result<SharedLineGroup, ApiError> {
        self.client
            .get(&format!(
                "/phone/shared_line_groups/{}",
                segment(shared_line_group_id)
            ))
            .await
    }

    /// PATCH /phone/shared_line_groups/{sharedLineGroupId}
    pub async fn update(
        &self,
        shared_line_group_id: &str,
        patch: &SharedLineGroupPatch,
    ) -> Result<(), ApiError> {
        self.client
            .patch(
                &format!(
                    "/phone/shared_line_groups/{}",
                    segment(shared_line_group_id)
                ),
                patch,
            )
            .await
    }

    /// POST /phone/shared_line_groups/{sharedLineGroupId}/members
    pub async fn add_members(
        &self,
        shared_line_group_id: &str,
        members: AddMembers,
    ) -> Result<(), ApiError> {
        self.client
            .post(
                &format!(
                    "/phone/shared_line_groups/{}/members",
                    segment(shared_line_group_id)
                ),
                &AddMembersRequest { members },
            )
            .await
    }

    /// DELETE /phone/shared_line_groups/{sharedLineGroupId}/members/{memberId}
    pub async fn remove_member(
        &self,
        shared_line_group_id: &str,
        member_id: &str,
    ) -> Result<(), ApiError> {
        self.client
            .delete(&format!(
                "/phone/shared_line_groups/{}/members/{}",
                segment(shared_line_group_id),
                segment(member_id)
            ))
            .await
    }

    /// POST /phone/shared_line_groups/{sharedLineGroupId}/phone_numbers
    pub async fn assign_numbers(
        &self,
        shared_line_group_id: &str,
        phone_numbers: &[PhoneNumberRef],
    ) -> Result<(), ApiError> {
        self.client
            .post(
                &format!(
                    "/phone/shared_line_groups/{}/phone_numbers",
                    segment(shared_line_group_id)
                ),
                &AssignNumbersRequest { phone_numbers },
            )
            .await
    }

    /// DELETE /phone/shared_line_groups/{sharedLineGroupId}/phone_numbers/{phoneNumberId}
    pub async fn unassign_number(
        &self,
        shared_line_group_id: &str,
        phone_number_id: &str,
    ) -> Result<(), ApiError> {
        self.client
            .delete(&format!(
                "/phone/shared_line_groups/{}/phone_numbers/{}",
                segment(shared_line_group_id),
                segment(phone_number_id)
            ))
            .await
    }

    /// DELETE /phone/shared_line_groups/{sharedLineGroupId}/phone_numbers
    pub async fn unassign_all_numbers(&self, shared_line_group_id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!(
                "/phone/shared_line_groups/{}/phone_numbers",
                segment(shared_line_group_id)
            ))
            .await
    }
}
