//! Set-membership resources: members of call queues and shared line groups,
//! and phone number assignments of call queues, shared line groups and users.

pub mod members;
pub mod phone_numbers;

mod resource_call_queue_members;
mod resource_call_queue_phone_numbers;
mod resource_shared_line_group_members;
mod resource_shared_line_group_phone_numbers;
mod resource_user_phone_numbers;

pub use resource_call_queue_members::CallQueueMembersResource;
pub use resource_call_queue_phone_numbers::CallQueuePhoneNumbersResource;
pub use resource_shared_line_group_members::SharedLineGroupMembersResource;
pub use resource_shared_line_group_phone_numbers::SharedLineGroupPhoneNumbersResource;
pub use resource_user_phone_numbers::UserPhoneNumbersResource;

use crate::api::error::ignore_not_found;
use crate::api::ApiError;

/// Bulk unassignment on an owner that no longer exists have nothing to remove
pub(crate) fn ignore_gone(result: Result<(), ApiError>) -> Result<(), ApiError> {
    match result {
        Err(e) if e.is_already_deleted() => {
            tracing::debug!("Owner already deleted: {}", e);
            Ok(())
        }
        other => ignore_not_found(other),
    }
}
