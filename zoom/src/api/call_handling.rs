//! Call handling settings of a phone extension

use serde::{Deserialize, Serialize};

use super::common::{segment, ApiQueryParams, Optional};
use super::error::ApiError;
use crate::api::Client;

/// Period a call handling profile applies to; also the `{settingType}` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingType {
    BusinessHours,
    ClosedHours,
    HolidayHours,
}

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::BusinessHours => "business_hours",
            SettingType::ClosedHours => "closed_hours",
            SettingType::HolidayHours => "holiday_hours",
        }
    }
}

impl std::fmt::Display for SettingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SUB_SETTING_CUSTOM_HOURS: &str = "custom_hours";
pub const SUB_SETTING_CALL_HANDLING: &str = "call_handling";
pub const SUB_SETTING_CALL_FORWARDING: &str = "call_forwarding";
pub const SUB_SETTING_HOLIDAY: &str = "holiday";

/// Combined call handling payload of an extension
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallHandlingSettings {
    #[serde(default)]
    pub business_hours: Vec<SubSetting>,
    #[serde(default)]
    pub closed_hours: Vec<SubSetting>,
    #[serde(default)]
    pub holiday_hours: Vec<HolidayHours>,
}

impl CallHandlingSettings {
    /// Sub-settings of one period; holidays are selected by id
    pub fn period(&self, setting_type: SettingType, holiday_id: Option<&str>) -> Option<&[SubSetting]> {
        match setting_type {
            SettingType::BusinessHours => Some(&self.business_hours),
            SettingType::ClosedHours => Some(&self.closed_hours),
            SettingType::HolidayHours => {
                let holiday_id = holiday_id.filter(|id| !id.is_empty())?;
                self.holiday_hours
                    .iter()
                    .find(|h| h.holiday_id.as_deref() == Some(holiday_id))
                    .map(|h| h.details.as_slice())
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidayHours {
    #[serde(default)]
    pub holiday_id: Option<String>,
    #[serde(default)]
    pub details: Vec<SubSetting>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubSetting {
    #[serde(default)]
    pub sub_setting_type: Option<String>,
    #[serde(default)]
    pub settings: SettingsPayload,
}

/// Find the first sub-setting of the given type
pub fn find_sub_setting<'a>(items: &'a [SubSetting], sub_setting_type: &str) -> Option<&'a SettingsPayload> {
    items
        .iter()
        .find(|item| item.sub_setting_type.as_deref() == Some(sub_setting_type))
        .map(|item| &item.settings)
}

/// Union of every sub-setting shape; which fields are populated depends on
/// `sub_setting_type`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPayload {
    // custom_hours
    #[serde(default, rename = "type")]
    pub r#type: Option<i32>,
    #[serde(default)]
    pub allow_members_to_reset: Option<bool>,
    #[serde(default)]
    pub custom_hours_settings: Vec<CustomHoursSettingPayload>,

    // call_handling
    #[serde(default)]
    pub call_not_answer_action: Option<i32>,
    #[serde(default)]
    pub allow_callers_check_voicemail: Option<bool>,
    #[serde(default)]
    pub connect_to_operator: Option<bool>,
    #[serde(default)]
    pub max_call_in_queue: Option<i32>,
    #[serde(default)]
    pub max_wait_time: Option<i32>,
    #[serde(default)]
    pub receive_call: Option<bool>,
    #[serde(default)]
    pub ring_mode: Option<String>,
    #[serde(default)]
    pub wrap_up_time: Option<i32>,
    #[serde(default)]
    pub call_distribution: Option<CallDistributionPayload>,
    #[serde(default)]
    pub audio_while_connecting: Option<IdRef>,
    #[serde(default)]
    pub greeting_prompt: Option<IdRef>,
    #[serde(default)]
    pub music_on_hold: Option<IdRef>,
    #[serde(default)]
    pub routing: Option<RoutingPayload>,
    #[serde(default)]
    pub busy_routing: Option<BusyRoutingPayload>,

    // call_forwarding (and the forwarded extension of call_handling)
    #[serde(default)]
    pub require_press_1_before_connecting: Option<bool>,
    #[serde(default)]
    pub call_forwarding_settings: Vec<CallForwardingEntry>,

    // holiday
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomHoursSettingPayload {
    #[serde(default)]
    pub weekday: Option<i32>,
    #[serde(default, rename = "type")]
    pub r#type: Option<i32>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CallDistributionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_multiple_calls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring_duration: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_offline_device_phone_number: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdRef {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutingPayload {
    #[serde(default)]
    pub require_press_1_before_connecting: Option<bool>,
    #[serde(default)]
    pub overflow_play_callee_voicemail_greeting: Option<bool>,
    #[serde(default)]
    pub play_callee_voicemail_greeting: Option<bool>,
    #[serde(default)]
    pub forward_to: Option<ForwardToPayload>,
    #[serde(default)]
    pub operator: Option<ForwardToPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusyRoutingPayload {
    #[serde(default)]
    pub action: Option<i32>,
    #[serde(default)]
    pub require_press_1_before_connecting: Option<bool>,
    #[serde(default)]
    pub play_callee_voicemail_greeting: Option<bool>,
    #[serde(default)]
    pub forward_to: Option<ForwardToPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForwardToPayload {
    #[serde(default)]
    pub extension_id: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallForwardingEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enable: Option<bool>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub external_contact: Option<ExternalContactRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExternalContactRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_contact_id: Option<String>,
}

/// `{"sub_setting_type": .., "settings": ..}` envelope for POST and PATCH
#[derive(Debug, Clone, Serialize)]
pub struct SubSettingRequest<T> {
    pub sub_setting_type: &'static str,
    pub settings: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct HolidayRequest {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub holiday_id: Optional<String>,
    pub name: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallForwardingCreateRequest {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub holiday_id: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub description: Optional<String>,
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidayCreated {
    #[serde(default)]
    pub holiday_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallForwardingCreated {
    #[serde(default)]
    pub call_forwarding_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CustomHoursPatch {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub allow_members_to_reset: Optional<bool>,
    pub custom_hours_settings: Vec<CustomHoursSettingPatch>,
    #[serde(rename = "type", skip_serializing_if = "Optional::is_absent")]
    pub r#type: Optional<i32>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CustomHoursSettingPatch {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub from: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub to: Optional<String>,
    #[serde(rename = "type", skip_serializing_if = "Optional::is_absent")]
    pub r#type: Optional<i32>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub weekday: Optional<i32>,
}

/// Flat call_handling PATCH body shared by every period
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CallHandlingPatch {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub holiday_id: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub allow_callers_check_voicemail: Optional<bool>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub allow_members_to_reset: Optional<bool>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub audio_while_connecting_id: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub call_distribution: Optional<CallDistributionPayload>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub call_not_answer_action: Optional<i32>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub busy_on_another_call_action: Optional<i32>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub busy_require_press_1_before_connecting: Optional<bool>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub un_answered_require_press_1_before_connecting: Optional<bool>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub overflow_play_callee_voicemail_greeting: Optional<bool>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub play_callee_voicemail_greeting: Optional<bool>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub busy_play_callee_voicemail_greeting: Optional<bool>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub phone_number: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub description: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub busy_phone_number: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub busy_description: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub connect_to_operator: Optional<bool>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub forward_to_extension_id: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub busy_forward_to_extension_id: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub greeting_prompt_id: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub max_call_in_queue: Optional<i32>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub max_wait_time: Optional<i32>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub music_on_hold_id: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub operator_extension_id: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub receive_call: Optional<bool>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub ring_mode: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub voicemail_greeting_id: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub wrap_up_time: Optional<i32>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CallForwardingPatch {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub holiday_id: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub require_press_1_before_connecting: Optional<bool>,
    pub call_forwarding_settings: Vec<CallForwardingEntryPatch>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CallForwardingEntryPatch {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub id: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub description: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub enable: Optional<bool>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub phone_number: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub external_contact: Optional<ExternalContactRef>,
}

/// Call handling API for one extension's settings
pub struct CallHandlingApi<'a> {
    client: &'a Client,
}

impl<'a> CallHandlingApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn settings_path(extension_id: &str) -> String {
        format!(
            "/phone/extension/{}/call_handling/settings",
            segment(extension_id)
        )
    }

    fn setting_type_path(extension_id: &str, setting_type: SettingType) -> String {
        format!(
            "{}/{}",
            Self::settings_path(extension_id),
            setting_type.as_str()
        )
    }

    /// GET /phone/extension/{extensionId}/call_handling/settings
    pub async fn get(&self, extension_id: &str) -> Result<CallHandlingSettings, ApiError> {
        self.client.get(&Self::settings_path(extension_id)).await
    }

    /// POST /phone/extension/{extensionId}/call_handling/settings/holiday_hours
    pub async fn add_holiday(
        &self,
        extension_id: &str,
        holiday: HolidayRequest,
    ) -> Result<HolidayCreated, ApiError> {
        let body = SubSettingRequest {
            sub_setting_type: SUB_SETTING_HOLIDAY,
            settings: holiday,
        };
        self.client
            .post(
                &Self::setting_type_path(extension_id, SettingType::HolidayHours),
                &body,
            )
            .await
    }

    /// POST /phone/extension/{extensionId}/call_handling/settings/{settingType}
    pub async fn add_call_forwarding(
        &self,
        extension_id: &str,
        setting_type: SettingType,
        entry: CallForwardingCreateRequest,
    ) -> Result<CallForwardingCreated, ApiError> {
        let body = SubSettingRequest {
            sub_setting_type: SUB_SETTING_CALL_FORWARDING,
            settings: entry,
        };
        self.client
            .post(&Self::setting_type_path(extension_id, setting_type), &body)
            .await
    }

    /// PATCH /phone/extension/{extensionId}/call_handling/settings/{settingType}
    pub async fn patch<T: Serialize>(
        &self,
        extension_id: &str,
        setting_type: SettingType,
        sub_setting_type: &'static str,
        settings: T,
    ) -> Result<(), ApiError> {
        let body = SubSettingRequest {
            sub_setting_type,
            settings,
        };
        self.client
            .patch(&Self::setting_type_path(extension_id, setting_type), &body)
            .await
    }

    /// DELETE /phone/extension/{extensionId}/call_handling/settings/holiday_hours?holiday_id=
    pub async fn delete_holiday(&self, extension_id: &str, holiday_id: &str) -> Result<(), ApiError> {
        let params = ApiQueryParams::new().add("holiday_id", holiday_id);
        self.client
            .delete_with_params(
                &Self::setting_type_path(extension_id, SettingType::HolidayHours),
                &params,
            )
            .await
    }

    /// DELETE /phone/extension/{extensionId}/call_handling/settings/{settingType}?call_forwarding_id=
    pub async fn delete_call_forwarding(
        &self,
        extension_id: &str,
        setting_type: SettingType,
        call_forwarding_id: &str,
    ) -> Result<(), ApiError> {
        let params = ApiQueryParams::new().add("call_forwarding_id", call_forwarding_id);
        self.client
            .delete_with_params(&Self::setting_type_path(extension_id, setting_type), &params)
            .await
    }
}
