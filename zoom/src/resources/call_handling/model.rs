//! Typed state of a call handling profile and its conversion from the
//! combined remote payload

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::api::call_handling::{
    find_sub_setting, CallDistributionPayload, CallForwardingEntry, SettingType, SubSetting,
    SUB_SETTING_CALL_FORWARDING, SUB_SETTING_CALL_HANDLING, SUB_SETTING_CUSTOM_HOURS,
    SUB_SETTING_HOLIDAY,
};

pub const ZOOM_MOBILE_APPS: &str = "Zoom Mobile Apps";
pub const ZOOM_DESKTOP_APPS: &str = "Zoom Desktop Apps";
pub const ZOOM_PHONE_APPLIANCE_APPS: &str = "Zoom Phone Appliance Apps";

/// Forwarding entries the platform owns; they are toggled, never created or deleted
pub fn is_platform_entry(description: Option<&str>) -> bool {
    matches!(
        description,
        Some(ZOOM_MOBILE_APPS) | Some(ZOOM_DESKTOP_APPS) | Some(ZOOM_PHONE_APPLIANCE_APPS)
    )
}

/// One call handling profile: business, closed or holiday hours of an extension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallHandlingProfile {
    pub extension_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday: Option<HolidayModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_hours: Option<CustomHoursModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_handling: Option<CallHandlingModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_forwarding: Option<CallForwardingModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HolidayModel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomHoursModel {
    #[serde(default, rename = "type")]
    pub r#type: Option<i32>,
    #[serde(default)]
    pub allow_members_to_reset: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Vec<CustomHoursSettingModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomHoursSettingModel {
    #[serde(default)]
    pub weekday: Option<i32>,
    #[serde(default, rename = "type")]
    pub r#type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallDistributionModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_multiple_calls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring_duration: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_offline_device_phone_number: Option<bool>,
}

impl From<CallDistributionModel> for CallDistributionPayload {
    fn from(model: CallDistributionModel) -> Self {
        CallDistributionPayload {
            handle_multiple_calls: model.handle_multiple_calls,
            ring_duration: model.ring_duration,
            ring_mode: model.ring_mode,
            skip_offline_device_phone_number: model.skip_offline_device_phone_number,
        }
    }
}

impl From<&CallDistributionPayload> for CallDistributionModel {
    fn from(payload: &CallDistributionPayload) -> Self {
        CallDistributionModel {
            handle_multiple_calls: payload.handle_multiple_calls,
            ring_duration: payload.ring_duration,
            ring_mode: payload.ring_mode.clone(),
            skip_offline_device_phone_number: payload.skip_offline_device_phone_number,
        }
    }
}

/// Routing rules. Which attributes exist depends on the period, see
/// [`CALL_HANDLING_ATTRIBUTES`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallHandlingModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_callers_check_voicemail: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_members_to_reset: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_while_connecting_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_distribution: Option<CallDistributionModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_not_answer_action: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_on_another_call_action: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_require_press1_before_connecting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unanswered_require_press1_before_connecting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow_play_callee_voicemail_greeting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_callee_voicemail_greeting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_play_callee_voicemail_greeting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_phone_number_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_to_operator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_to_extension_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_forward_to_extension_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting_prompt_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_call_in_queue: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wait_time: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_on_hold_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_extension_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receive_call: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voicemail_greeting_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap_up_time: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallForwardingModel {
    #[serde(default)]
    pub require_press_1_before_connecting: Option<bool>,
    #[serde(default)]
    pub enable_zoom_mobile_apps: Option<bool>,
    #[serde(default)]
    pub enable_zoom_desktop_apps: Option<bool>,
    #[serde(default)]
    pub enable_zoom_phone_appliance_apps: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Vec<CallForwardingSettingModel>>,
}

impl CallForwardingModel {
    /// Remote defaults: no press-1 prompt, every app ringing, no custom targets
    pub fn reset() -> Self {
        CallForwardingModel {
            require_press_1_before_connecting: Some(false),
            enable_zoom_mobile_apps: Some(true),
            enable_zoom_desktop_apps: Some(true),
            enable_zoom_phone_appliance_apps: Some(true),
            settings: Some(vec![]),
        }
    }

    /// Planned enable flag of a platform entry
    pub fn platform_flag(&self, description: &str) -> Option<bool> {
        match description {
            ZOOM_MOBILE_APPS => self.enable_zoom_mobile_apps,
            ZOOM_DESKTOP_APPS => self.enable_zoom_desktop_apps,
            ZOOM_PHONE_APPLIANCE_APPS => self.enable_zoom_phone_appliance_apps,
            _ => None,
        }
    }

    pub fn entries(&self) -> &[CallForwardingSettingModel] {
        self.settings.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallForwardingSettingModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enable: Option<bool>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl CallForwardingSettingModel {
    /// Server id, when the entry was already created
    pub fn existing_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Periods a call_handling attribute exists in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    AllPeriods,
    BusinessAndClosed,
    BusinessOnly,
}

impl Scope {
    pub fn includes(self, period: SettingType) -> bool {
        match self {
            Scope::AllPeriods => true,
            Scope::BusinessAndClosed => period != SettingType::HolidayHours,
            Scope::BusinessOnly => period == SettingType::BusinessHours,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    String,
    Number,
    Bool,
    CallDistribution,
}

pub struct CallHandlingAttribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub scope: Scope,
    pub description: &'static str,
}

const fn attr(
    name: &'static str,
    kind: AttributeKind,
    scope: Scope,
    description: &'static str,
) -> CallHandlingAttribute {
    CallHandlingAttribute {
        name,
        kind,
        scope,
        description,
    }
}

#[rustfmt::skip]
pub const CALL_HANDLING_ATTRIBUTES: &[CallHandlingAttribute] = &[
    attr("allow_callers_check_voicemail", AttributeKind::Bool, Scope::AllPeriods, "Allow callers to check voicemail"),
    attr("allow_members_to_reset", AttributeKind::Bool, Scope::BusinessOnly, "Allow call queue members to reset"),
    attr("audio_while_connecting_id", AttributeKind::String, Scope::BusinessOnly, "Audio played while connecting"),
    attr("call_distribution", AttributeKind::CallDistribution, Scope::BusinessOnly, "Call distribution for call queues"),
    attr("call_not_answer_action", AttributeKind::Number, Scope::AllPeriods, "Action when a call is not answered"),
    attr("busy_on_another_call_action", AttributeKind::Number, Scope::BusinessAndClosed, "Action when the callee is busy on another call"),
    attr("busy_require_press1_before_connecting", AttributeKind::Bool, Scope::BusinessAndClosed, "Ask the forwarded callee to press 1 when busy"),
    attr("unanswered_require_press1_before_connecting", AttributeKind::Bool, Scope::AllPeriods, "Ask the forwarded callee to press 1 when unanswered"),
    attr("overflow_play_callee_voicemail_greeting", AttributeKind::Bool, Scope::AllPeriods, "Play the callee's voicemail greeting on overflow"),
    attr("play_callee_voicemail_greeting", AttributeKind::Bool, Scope::AllPeriods, "Play the callee's voicemail greeting"),
    attr("busy_play_callee_voicemail_greeting", AttributeKind::Bool, Scope::BusinessAndClosed, "Play the callee's voicemail greeting when busy"),
    attr("phone_number", AttributeKind::String, Scope::AllPeriods, "External number calls are forwarded to"),
    attr("phone_number_description", AttributeKind::String, Scope::AllPeriods, "Description of the forwarding number"),
    attr("busy_phone_number", AttributeKind::String, Scope::BusinessAndClosed, "External number calls are forwarded to when busy"),
    attr("busy_phone_number_description", AttributeKind::String, Scope::BusinessAndClosed, "Description of the busy forwarding number"),
    attr("connect_to_operator", AttributeKind::Bool, Scope::AllPeriods, "Allow callers to reach an operator"),
    attr("forward_to_extension_id", AttributeKind::String, Scope::AllPeriods, "Extension calls are forwarded to"),
    attr("busy_forward_to_extension_id", AttributeKind::String, Scope::BusinessAndClosed, "Extension calls are forwarded to when busy"),
    attr("greeting_prompt_id", AttributeKind::String, Scope::BusinessAndClosed, "Greeting prompt"),
    attr("max_call_in_queue", AttributeKind::Number, Scope::BusinessOnly, "Maximum number of calls waiting in queue"),
    attr("max_wait_time", AttributeKind::Number, Scope::AllPeriods, "Maximum wait time in seconds"),
    attr("music_on_hold_id", AttributeKind::String, Scope::BusinessOnly, "Music on hold"),
    attr("operator_extension_id", AttributeKind::String, Scope::AllPeriods, "Operator extension"),
    attr("receive_call", AttributeKind::Bool, Scope::BusinessOnly, "Whether the extension receives calls"),
    attr("ring_mode", AttributeKind::String, Scope::AllPeriods, "Ring mode, simultaneous or sequential"),
    attr("voicemail_greeting_id", AttributeKind::String, Scope::BusinessOnly, "Voicemail greeting"),
    attr("wrap_up_time", AttributeKind::Number, Scope::BusinessOnly, "Wrap up time in seconds"),
];

impl CallHandlingModel {
    /// Drop attributes the period does not have
    pub fn restrict(&mut self, period: SettingType) {
        if !Scope::BusinessOnly.includes(period) {
            self.allow_members_to_reset = None;
            self.audio_while_connecting_id = None;
            self.call_distribution = None;
            self.max_call_in_queue = None;
            self.music_on_hold_id = None;
            self.receive_call = None;
            self.voicemail_greeting_id = None;
            self.wrap_up_time = None;
        }
        if !Scope::BusinessAndClosed.includes(period) {
            self.busy_on_another_call_action = None;
            self.busy_require_press1_before_connecting = None;
            self.busy_play_callee_voicemail_greeting = None;
            self.busy_phone_number = None;
            self.busy_phone_number_description = None;
            self.busy_forward_to_extension_id = None;
            self.greeting_prompt_id = None;
        }
    }
}

/// Keep the prior representation of a timestamp when both denote the same instant
fn same_instant(prior: Option<&String>, remote: Option<String>) -> Option<String> {
    match (prior, remote) {
        (Some(prior), Some(remote)) => {
            match (
                DateTime::parse_from_rfc3339(prior),
                DateTime::parse_from_rfc3339(&remote),
            ) {
                (Ok(a), Ok(b)) if a == b => Some(prior.clone()),
                _ => Some(remote),
            }
        }
        (_, remote) => remote,
    }
}

impl CallHandlingProfile {
    /// Build state from the remote sub-settings of one period.
    ///
    /// Write-only shapes (`call_distribution`, `call_forwarding`, the list of
    /// custom hour settings) are reported only when `prior` declared them.
    pub fn from_remote(
        period: SettingType,
        items: &[SubSetting],
        prior: &CallHandlingProfile,
    ) -> Self {
        let custom_hours = (period == SettingType::BusinessHours)
            .then(|| custom_hours_from_remote(items, prior.custom_hours.as_ref()));

        let holiday = (period == SettingType::HolidayHours).then(|| {
            let remote = find_sub_setting(items, SUB_SETTING_HOLIDAY);
            let prior = prior.holiday.as_ref();
            HolidayModel {
                name: remote.and_then(|s| s.name.clone()),
                from: same_instant(
                    prior.and_then(|h| h.from.as_ref()),
                    remote.and_then(|s| s.from.clone()),
                ),
                to: same_instant(
                    prior.and_then(|h| h.to.as_ref()),
                    remote.and_then(|s| s.to.clone()),
                ),
            }
        });

        let mut call_handling = call_handling_from_remote(items, prior.call_handling.as_ref());
        call_handling.restrict(period);

        let call_forwarding = prior.call_forwarding.as_ref().and_then(|prior| {
            find_sub_setting(items, SUB_SETTING_CALL_FORWARDING)
                .map(|remote| call_forwarding_from_remote(remote, prior))
        });

        CallHandlingProfile {
            extension_id: prior.extension_id.clone(),
            holiday_id: prior.holiday_id.clone(),
            holiday,
            custom_hours,
            call_handling: Some(call_handling),
            call_forwarding,
        }
    }
}

fn custom_hours_from_remote(
    items: &[SubSetting],
    prior: Option<&CustomHoursModel>,
) -> CustomHoursModel {
    let remote = find_sub_setting(items, SUB_SETTING_CUSTOM_HOURS);
    let declared = prior.map(|p| p.settings.is_some()).unwrap_or(false);

    let settings: Vec<CustomHoursSettingModel> = remote
        .map(|r| r.custom_hours_settings.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|item| {
            // remote reports placeholder times for non-custom days
            let custom = item.r#type == Some(2);
            CustomHoursSettingModel {
                weekday: item.weekday,
                r#type: item.r#type,
                from: item.from.clone().filter(|_| custom),
                to: item.to.clone().filter(|_| custom),
            }
        })
        .collect();

    CustomHoursModel {
        r#type: remote.and_then(|r| r.r#type),
        allow_members_to_reset: remote.and_then(|r| r.allow_members_to_reset),
        settings: (declared || !settings.is_empty()).then_some(settings),
    }
}

fn call_handling_from_remote(
    items: &[SubSetting],
    prior: Option<&CallHandlingModel>,
) -> CallHandlingModel {
    let Some(remote) = find_sub_setting(items, SUB_SETTING_CALL_HANDLING) else {
        return CallHandlingModel::default();
    };
    let routing = remote.routing.as_ref();
    let busy = remote.busy_routing.as_ref();
    let greeting_prompt_id = remote.greeting_prompt.as_ref().and_then(|g| g.id.clone());
    let distribution_declared = prior
        .map(|p| p.call_distribution.is_some())
        .unwrap_or(false);

    CallHandlingModel {
        allow_callers_check_voicemail: remote.allow_callers_check_voicemail,
        allow_members_to_reset: remote.allow_members_to_reset,
        audio_while_connecting_id: remote
            .audio_while_connecting
            .as_ref()
            .and_then(|a| a.id.clone()),
        call_distribution: remote
            .call_distribution
            .as_ref()
            .filter(|_| distribution_declared)
            .map(CallDistributionModel::from),
        call_not_answer_action: remote.call_not_answer_action,
        busy_on_another_call_action: busy.and_then(|b| b.action),
        busy_require_press1_before_connecting: busy
            .and_then(|b| b.require_press_1_before_connecting),
        unanswered_require_press1_before_connecting: routing
            .and_then(|r| r.require_press_1_before_connecting),
        overflow_play_callee_voicemail_greeting: routing
            .and_then(|r| r.overflow_play_callee_voicemail_greeting),
        // the remote reports one flag for both greetings
        play_callee_voicemail_greeting: routing
            .and_then(|r| r.overflow_play_callee_voicemail_greeting),
        busy_play_callee_voicemail_greeting: busy
            .and_then(|b| b.play_callee_voicemail_greeting),
        phone_number: routing
            .and_then(|r| r.forward_to.as_ref())
            .and_then(|f| f.phone_number.clone()),
        phone_number_description: routing
            .and_then(|r| r.forward_to.as_ref())
            .and_then(|f| f.description.clone()),
        busy_phone_number: busy
            .and_then(|b| b.forward_to.as_ref())
            .and_then(|f| f.phone_number.clone()),
        busy_phone_number_description: busy
            .and_then(|b| b.forward_to.as_ref())
            .and_then(|f| f.description.clone()),
        connect_to_operator: remote.connect_to_operator,
        forward_to_extension_id: remote
            .call_forwarding_settings
            .first()
            .and_then(|f| f.id.clone()),
        busy_forward_to_extension_id: busy
            .and_then(|b| b.forward_to.as_ref())
            .and_then(|f| f.extension_id.clone()),
        greeting_prompt_id: greeting_prompt_id.clone(),
        max_call_in_queue: remote.max_call_in_queue,
        max_wait_time: remote.max_wait_time,
        music_on_hold_id: remote.music_on_hold.as_ref().and_then(|m| m.id.clone()),
        operator_extension_id: routing
            .and_then(|r| r.operator.as_ref())
            .and_then(|o| o.extension_id.clone()),
        receive_call: remote.receive_call,
        ring_mode: remote.ring_mode.clone(),
        voicemail_greeting_id: greeting_prompt_id,
        wrap_up_time: remote.wrap_up_time,
    }
}

fn call_forwarding_from_remote(
    remote: &crate::api::call_handling::SettingsPayload,
    prior: &CallForwardingModel,
) -> CallForwardingModel {
    let flag = |description: &str| {
        remote
            .call_forwarding_settings
            .iter()
            .find(|e| e.description.as_deref() == Some(description))
            .and_then(|e| e.enable)
    };

    let settings: Vec<CallForwardingSettingModel> = managed_entries(&remote.call_forwarding_settings)
        .map(|e| CallForwardingSettingModel {
            id: e.id.clone(),
            description: e.description.clone(),
            enable: e.enable,
            phone_number: e.phone_number.clone(),
        })
        .collect();

    CallForwardingModel {
        require_press_1_before_connecting: remote.require_press_1_before_connecting,
        enable_zoom_mobile_apps: flag(ZOOM_MOBILE_APPS),
        enable_zoom_desktop_apps: flag(ZOOM_DESKTOP_APPS),
        enable_zoom_phone_appliance_apps: flag(ZOOM_PHONE_APPLIANCE_APPS),
        settings: (prior.settings.is_some() || !settings.is_empty()).then_some(settings),
    }
}

/// Forwarding entries a profile manages: user entries that ring a phone
/// number. Platform entries and external contacts are left alone.
pub fn managed_entries(
    entries: &[CallForwardingEntry],
) -> impl Iterator<Item = &CallForwardingEntry> {
    entries
        .iter()
        .filter(|e| !is_platform_entry(e.description.as_deref()) && e.phone_number.is_some())
}
