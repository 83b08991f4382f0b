use serde::{Deserialize, Serialize};

use super::common::{collect_all_pages, segment, Page, PaginationParams};
use super::error::ApiError;
use super::PhoneNumberRef;
use crate::api::Client;

/// Max page size of the call queue member listing
pub const MEMBERS_PAGE_SIZE: u32 = 300;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallQueueMember {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// `user` or `commonArea`
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub receive_call: Option<bool>,
    #[serde(default)]
    pub extension_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallQueueMembersPage {
    #[serde(default)]
    pub call_queue_members: Vec<CallQueueMember>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl Page for CallQueueMembersPage {
    type Item = CallQueueMember;

    fn into_parts(self) -> (Vec<CallQueueMember>, Option<String>) {
        (self.call_queue_members, self.next_page_token)
    }
}

/// A user member reference; exactly the populated key is sent
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MemberUserRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AddMembers {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub common_area_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<MemberUserRef>,
}

#[derive(Debug, Clone, Serialize)]
struct AddMembersRequest {
    members: AddMembers,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallQueueNumber {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallQueue {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extension_id: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<CallQueueNumber>,
}

#[derive(Debug, Clone, Serialize)]
struct AssignNumbersRequest<'a> {
    phone_numbers: &'a [PhoneNumberRef],
}

/// Call queue API operations
pub struct CallQueuesApi<'a> {
    client: &'a Client,
}

impl<'a> CallQueuesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /phone/call_queues/{callQueueId}
    pub async fn get(&self, call_queue_id: &str) -> Result<CallQueue, ApiError> {
        self.client
            .get(&format!("/phone/call_queues/{}", segment(call_queue_id)))
            .await
    }

    /// GET /phone/call_queues/{callQueueId}/members, every page
    pub async fn list_members(&self, call_queue_id: &str) -> Result<Vec<CallQueueMember>, ApiError> {
        let path = format!("/phone/call_queues/{}/members", segment(call_queue_id));
        collect_all_pages(|token| {
            let params = PaginationParams::new(MEMBERS_PAGE_SIZE)
                .with_token(token)
                .to_query_params();
            let path = path.clone();
            async move {
                self.client
                    .get_with_params::<CallQueueMembersPage>(&path, &params)
                    .await
            }
        })
        .await
    }

    /// POST /phone/call_queues/{callQueueId}/members
    pub async fn add_members(&self, call_queue_id: &str, members: AddMembers) -> Result<(), ApiError> {
        self.client
            .post(
                &format!("/phone/call_queues/{}/members", segment(call_queue_id)),
                &AddMembersRequest { members },
            )
            .await
    }

    /// DELETE /phone/call_queues/{callQueueId}/members/{memberId}
    pub async fn remove_member(&self, call_queue_id: &str, member_id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!(
                "/phone/call_queues/{}/members/{}",
                segment(call_queue_id),
                segment(member_id)
            ))
            .await
    }

    /// POST /phone/call_queues/{callQueueId}/phone_numbers
    pub async fn assign_numbers(
        &self,
        call_queue_id: &str,
        phone_numbers: &[PhoneNumberRef],
    ) -> Result<(), ApiError> {
        self.client
            .post(
                &format!("/phone/call_queues/{}/phone_numbers", segment(call_queue_id)),
                &AssignNumbersRequest { phone_numbers },
            )
            .await
    }

    /// DELETE /phone/call_queues/{callQueueId}/phone_numbers/{phoneNumberId}
    pub async fn unassign_number(
        &self,
        call_queue_id: &str,
        phone_number_id: &str,
    ) -> Result<(), ApiError> {
        self.client
            .delete(&format!(
                "/phone/call_queues/{}/phone_numbers/{}",
                segment(call_queue_id),
                segment(phone_number_id)
            ))
            .await
    }

    /// DELETE /phone/call_queues/{callQueueId}/phone_numbers
    pub async fn unassign_all_numbers(&self, call_queue_id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!(
                "/phone/call_queues/{}/phone_numbers",
                segment(call_queue_id)
            ))
            .await
    }
}
