//! Ordered synchronization of one call handling profile.
//!
//! The remote treats custom hours, call handling and call forwarding as
//! independent sub-settings, so a sync is a fixed sequence of requests.
//! Nothing is rolled back when a later request fails.

use chrono::DateTime;
use tfplug::Context;

use super::model::{
    is_platform_entry, managed_entries, CallForwardingModel, CallHandlingModel,
    CallHandlingProfile, CustomHoursModel, HolidayModel,
};
use crate::api::call_handling::{
    find_sub_setting, CallDistributionPayload, CallForwardingCreateRequest,
    CallForwardingEntryPatch, CallForwardingPatch, CallHandlingApi, CallHandlingPatch,
    CustomHoursPatch, CustomHoursSettingPatch, HolidayRequest, SettingType, SubSetting,
    SUB_SETTING_CALL_FORWARDING, SUB_SETTING_CALL_HANDLING, SUB_SETTING_CUSTOM_HOURS,
    SUB_SETTING_HOLIDAY,
};
use crate::api::error::ignore_not_found;
use crate::api::{Client, Optional, Outcome};
use crate::reconcile::{checkpoint, ReconcileError};

const CUSTOM_RANGE: i32 = 2;

pub struct CallHandlingReconciler<'a> {
    client: &'a Client,
    period: SettingType,
}

impl<'a> CallHandlingReconciler<'a> {
    pub fn new(client: &'a Client, period: SettingType) -> Self {
        Self { client, period }
    }

    fn api(&self) -> CallHandlingApi<'a> {
        self.client.call_handling()
    }

    /// Sub-settings of `period`; a holiday without id has nothing to read
    async fn fetch_period(
        &self,
        period: SettingType,
        extension_id: &str,
        holiday_id: Option<&str>,
    ) -> Outcome<Vec<SubSetting>> {
        if period == SettingType::HolidayHours && holiday_id.map_or(true, str::is_empty) {
            return Outcome::Gone;
        }
        match Outcome::from_read(self.api().get(extension_id).await) {
            Outcome::Found(settings) => match settings.period(period, holiday_id) {
                Some(items) => Outcome::Found(items.to_vec()),
                None => Outcome::Gone,
            },
            Outcome::Gone => Outcome::Gone,
            Outcome::Error(e) => Outcome::Error(e),
        }
    }

    /// Current state of the profile described by `prior`
    pub async fn read(
        &self,
        ctx: &Context,
        prior: &CallHandlingProfile,
    ) -> Outcome<CallHandlingProfile, ReconcileError> {
        if let Err(e) = checkpoint(ctx) {
            return Outcome::Error(e);
        }
        self.fetch_period(
            self.period,
            &prior.extension_id,
            prior.holiday_id.as_deref(),
        )
        .await
        .map(|items| CallHandlingProfile::from_remote(self.period, &items, prior))
        .map_err(ReconcileError::remote(format!(
            "error reading {} of extension {}",
            self.period, prior.extension_id
        )))
    }

    /// Converge the remote profile to `plan`. Server assigned ids (holiday,
    /// new forwarding entries) are written back into `plan`.
    pub async fn sync(
        &self,
        ctx: &Context,
        plan: &mut CallHandlingProfile,
        prior: Option<&CallHandlingProfile>,
        on_delete: bool,
    ) -> Result<(), ReconcileError> {
        let extension_id = plan.extension_id.clone();

        match self.period {
            SettingType::BusinessHours => validate_custom_hours(plan.custom_hours.as_ref())?,
            SettingType::HolidayHours => validate_holiday(plan.holiday.as_ref())?,
            SettingType::ClosedHours => {}
        }
        if let Some(forwarding) = &plan.call_forwarding {
            validate_forwarding(forwarding)?;
        }

        checkpoint(ctx)?;
        let asis = match self
            .fetch_period(self.period, &extension_id, plan.holiday_id.as_deref())
            .await
        {
            Outcome::Found(items) => Some(items),
            Outcome::Gone if on_delete => {
                tracing::info!(
                    extension_id = %extension_id,
                    "{} already gone, nothing to reset", self.period
                );
                return Ok(());
            }
            Outcome::Gone if self.is_new_holiday(plan) => None,
            Outcome::Gone => {
                return Err(ReconcileError::NotFound(format!(
                    "{} not found for extension {}",
                    self.period, extension_id
                )))
            }
            Outcome::Error(e) => {
                return Err(ReconcileError::remote(format!(
                    "error reading {} of extension {}",
                    self.period, extension_id
                ))(e))
            }
        };

        if self.period == SettingType::ClosedHours
            && !self
                .business_hours_allow_closed(&extension_id, on_delete)
                .await?
        {
            return Ok(());
        }

        if self.period == SettingType::HolidayHours {
            checkpoint(ctx)?;
            self.apply_holiday(plan).await?;
        }
        let holiday_id = plan.holiday_id.clone();

        let custom_hours = plan
            .custom_hours
            .as_ref()
            .filter(|_| self.period == SettingType::BusinessHours);
        if let Some(custom_hours) = custom_hours {
            checkpoint(ctx)?;
            self.api()
                .patch(
                    &extension_id,
                    self.period,
                    SUB_SETTING_CUSTOM_HOURS,
                    custom_hours_patch(custom_hours),
                )
                .await
                .map_err(ReconcileError::remote(format!(
                    "error patching custom hours of extension {}",
                    extension_id
                )))?;
        }

        checkpoint(ctx)?;
        let patch = call_handling_patch(
            plan.call_handling.as_ref(),
            prior.and_then(|p| p.call_handling.as_ref()),
            holiday_id.as_deref(),
        );
        self.api()
            .patch(&extension_id, self.period, SUB_SETTING_CALL_HANDLING, patch)
            .await
            .map_err(ReconcileError::remote(format!(
                "error patching call handling of {} on extension {}",
                self.period, extension_id
            )))?;

        // forwarding left out of the plan is reset whenever the remote has it
        let remote_forwarding = asis
            .as_deref()
            .and_then(|items| find_sub_setting(items, SUB_SETTING_CALL_FORWARDING))
            .is_some();
        if plan.call_forwarding.is_some() || remote_forwarding {
            let declared = plan.call_forwarding.is_some();
            let mut forwarding = plan
                .call_forwarding
                .clone()
                .unwrap_or_else(CallForwardingModel::reset);

            self.sync_forwarding(
                ctx,
                &extension_id,
                holiday_id.as_deref(),
                asis.as_deref(),
                &mut forwarding,
                on_delete,
            )
            .await?;

            if declared {
                plan.call_forwarding = Some(forwarding);
            }
        }

        tracing::debug!(extension_id = %extension_id, "{} synchronized", self.period);
        Ok(())
    }

    fn is_new_holiday(&self, plan: &CallHandlingProfile) -> bool {
        self.period == SettingType::HolidayHours
            && plan.holiday_id.as_deref().map_or(true, str::is_empty)
    }

    /// Closed hours only exist once business hours use a custom schedule.
    /// Returns `false` when there is nothing to do.
    async fn business_hours_allow_closed(
        &self,
        extension_id: &str,
        on_delete: bool,
    ) -> Result<bool, ReconcileError> {
        let items = match self
            .fetch_period(SettingType::BusinessHours, extension_id, None)
            .await
        {
            Outcome::Found(items) => items,
            Outcome::Gone if on_delete => return Ok(false),
            Outcome::Gone => {
                return Err(ReconcileError::NotFound(format!(
                    "business_hours not found for extension {}",
                    extension_id
                )))
            }
            Outcome::Error(e) => {
                return Err(ReconcileError::remote(format!(
                    "error reading business_hours of extension {}",
                    extension_id
                ))(e))
            }
        };

        let custom = find_sub_setting(&items, SUB_SETTING_CUSTOM_HOURS)
            .and_then(|s| s.r#type)
            == Some(CUSTOM_RANGE);
        match (custom, on_delete) {
            (true, _) => Ok(true),
            (false, true) => {
                tracing::info!(
                    extension_id = %extension_id,
                    "business hours no longer custom, closed hours inactive"
                );
                Ok(false)
            }
            (false, false) => Err(ReconcileError::validation(
                "closed_hours can be set only after business_hours.custom_hours.type = 2; \
                 add depends_on on the business_hours resource",
            )),
        }
    }

    async fn apply_holiday(&self, plan: &mut CallHandlingProfile) -> Result<(), ReconcileError> {
        let holiday = plan.holiday.clone().unwrap_or_default();
        let name = holiday.name.unwrap_or_default();
        let from = holiday.from.unwrap_or_default();
        let to = holiday.to.unwrap_or_default();

        match plan.holiday_id.as_deref().filter(|id| !id.is_empty()) {
            None => {
                let created = self
                    .api()
                    .add_holiday(
                        &plan.extension_id,
                        HolidayRequest {
                            holiday_id: Optional::Absent,
                            name,
                            from,
                            to,
                        },
                    )
                    .await
                    .map_err(ReconcileError::remote(format!(
                        "error creating holiday on extension {}",
                        plan.extension_id
                    )))?;
                let holiday_id = created
                    .holiday_id
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| {
                        ReconcileError::Unexpected(format!(
                            "holiday created on extension {} without an id",
                            plan.extension_id
                        ))
                    })?;
                tracing::info!(
                    extension_id = %plan.extension_id,
                    holiday_id = %holiday_id,
                    "Created holiday"
                );
                plan.holiday_id = Some(holiday_id);
            }
            Some(holiday_id) => {
                self.api()
                    .patch(
                        &plan.extension_id,
                        SettingType::HolidayHours,
                        SUB_SETTING_HOLIDAY,
                        HolidayRequest {
                            holiday_id: Optional::Value(holiday_id.to_string()),
                            name,
                            from,
                            to,
                        },
                    )
                    .await
                    .map_err(ReconcileError::remote(format!(
                        "error patching holiday {} on extension {}",
                        holiday_id, plan.extension_id
                    )))?;
            }
        }
        Ok(())
    }

    async fn sync_forwarding(
        &self,
        ctx: &Context,
        extension_id: &str,
        holiday_id: Option<&str>,
        asis: Option<&[SubSetting]>,
        forwarding: &mut CallForwardingModel,
        on_delete: bool,
    ) -> Result<(), ReconcileError> {
        // platform entry ids come from a fresh read, never from state
        checkpoint(ctx)?;
        let current = match self.fetch_period(self.period, extension_id, holiday_id).await {
            Outcome::Found(items) => Some(items),
            Outcome::Gone if on_delete => None,
            Outcome::Gone => {
                return Err(ReconcileError::NotFound(format!(
                    "{} not found for extension {}",
                    self.period, extension_id
                )))
            }
            Outcome::Error(e) => {
                return Err(ReconcileError::remote(format!(
                    "error reading call forwarding of extension {}",
                    extension_id
                ))(e))
            }
        };
        let remote = current
            .as_deref()
            .and_then(|items| find_sub_setting(items, SUB_SETTING_CALL_FORWARDING));

        match remote {
            Some(remote) => {
                let mut entries: Vec<CallForwardingEntryPatch> = remote
                    .call_forwarding_settings
                    .iter()
                    .filter(|e| is_platform_entry(e.description.as_deref()))
                    .filter_map(|e| {
                        let id = e.id.clone()?;
                        let description = e.description.as_deref()?;
                        Some(CallForwardingEntryPatch {
                            id: Optional::Value(id),
                            enable: forwarding.platform_flag(description).into(),
                            ..Default::default()
                        })
                    })
                    .collect();
                entries.extend(forwarding.entries().iter().filter_map(|entry| {
                    let id = entry.existing_id()?;
                    Some(CallForwardingEntryPatch {
                        id: Optional::Value(id.to_string()),
                        description: entry.description.clone().into(),
                        enable: entry.enable.into(),
                        phone_number: entry.phone_number.clone().into(),
                        external_contact: Optional::Absent,
                    })
                }));

                checkpoint(ctx)?;
                self.api()
                    .patch(
                        extension_id,
                        self.period,
                        SUB_SETTING_CALL_FORWARDING,
                        CallForwardingPatch {
                            holiday_id: holiday_id.map(str::to_string).into(),
                            require_press_1_before_connecting: forwarding
                                .require_press_1_before_connecting
                                .into(),
                            call_forwarding_settings: entries,
                        },
                    )
                    .await
                    .map_err(ReconcileError::remote(format!(
                        "error patching call forwarding of {} on extension {}",
                        self.period, extension_id
                    )))?;
            }
            None if on_delete => {
                tracing::debug!(extension_id = %extension_id, "No call forwarding to reset");
            }
            None => {
                return Err(ReconcileError::NotFound(format!(
                    "call_forwarding not found on {} of extension {}",
                    self.period, extension_id
                )))
            }
        }

        if let Some(entries) = forwarding.settings.as_mut() {
            for entry in entries.iter_mut().filter(|e| e.existing_id().is_none()) {
                checkpoint(ctx)?;
                let created = self
                    .api()
                    .add_call_forwarding(
                        extension_id,
                        self.period,
                        CallForwardingCreateRequest {
                            holiday_id: holiday_id.map(str::to_string).into(),
                            description: entry.description.clone().into(),
                            phone_number: entry.phone_number.clone().unwrap_or_default(),
                        },
                    )
                    .await
                    .map_err(ReconcileError::remote(format!(
                        "error creating call forwarding on extension {}",
                        extension_id
                    )))?;
                entry.id = created.call_forwarding_id;
            }
        }

        let keep: Vec<&str> = forwarding
            .entries()
            .iter()
            .filter_map(|e| e.existing_id())
            .collect();
        let stale: Vec<String> = asis
            .and_then(|items| find_sub_setting(items, SUB_SETTING_CALL_FORWARDING))
            .map(|s| {
                managed_entries(&s.call_forwarding_settings)
                    .filter_map(|e| e.id.clone())
                    .filter(|id| !keep.contains(&id.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        for id in stale {
            checkpoint(ctx)?;
            ignore_not_found(
                self.api()
                    .delete_call_forwarding(extension_id, self.period, &id)
                    .await,
            )
            .map_err(ReconcileError::remote(format!(
                "error deleting call forwarding {} on extension {}",
                id, extension_id
            )))?;
            tracing::debug!(
                extension_id = %extension_id,
                call_forwarding_id = %id,
                "Deleted call forwarding"
            );
        }

        Ok(())
    }

    /// Remove a holiday and everything configured under it
    pub async fn delete_holiday(
        &self,
        ctx: &Context,
        extension_id: &str,
        holiday_id: &str,
    ) -> Result<(), ReconcileError> {
        if holiday_id.is_empty() {
            return Ok(());
        }
        checkpoint(ctx)?;
        ignore_not_found(self.api().delete_holiday(extension_id, holiday_id).await).map_err(
            ReconcileError::remote(format!(
                "error deleting holiday {} on extension {}",
                holiday_id, extension_id
            )),
        )
    }
}

/// State a profile returns to when its resource is destroyed
pub fn default_model(period: SettingType, extension_id: &str) -> CallHandlingProfile {
    CallHandlingProfile {
        extension_id: extension_id.to_string(),
        custom_hours: (period == SettingType::BusinessHours).then(|| CustomHoursModel {
            r#type: Some(1),
            allow_members_to_reset: Some(false),
            settings: None,
        }),
        call_handling: Some(CallHandlingModel::default()),
        call_forwarding: Some(CallForwardingModel::default()),
        ..Default::default()
    }
}

pub fn validate_custom_hours(custom_hours: Option<&CustomHoursModel>) -> Result<(), ReconcileError> {
    let Some(custom_hours) = custom_hours else {
        return Err(ReconcileError::validation("custom_hours must be specified"));
    };

    match custom_hours.r#type {
        Some(1) if custom_hours.settings.is_some() => {
            return Err(ReconcileError::validation(
                "custom_hours type 1 cannot have settings",
            ))
        }
        Some(CUSTOM_RANGE) if custom_hours.settings.as_ref().map_or(0, Vec::len) != 7 => {
            return Err(ReconcileError::validation(
                "custom_hours type 2 must have Sunday-Saturday settings",
            ))
        }
        _ => {}
    }

    for setting in custom_hours.settings.iter().flatten() {
        let weekday = setting.weekday.unwrap_or_default();
        let has_from = setting.from.as_deref().is_some_and(|v| !v.is_empty());
        let has_to = setting.to.as_deref().is_some_and(|v| !v.is_empty());
        if setting.r#type == Some(CUSTOM_RANGE) {
            if !has_from || !has_to {
                return Err(ReconcileError::validation(format!(
                    "custom_hours.setting from/to must contain a value when type is 2 on weekday={}",
                    weekday
                )));
            }
        } else if has_from || has_to {
            return Err(ReconcileError::validation(format!(
                "custom_hours.setting from/to must not contain a value when type is not 2 on weekday={}",
                weekday
            )));
        }
    }
    Ok(())
}

pub fn validate_holiday(holiday: Option<&HolidayModel>) -> Result<(), ReconcileError> {
    let Some(holiday) = holiday else {
        return Err(ReconcileError::validation("holiday must be specified"));
    };
    if holiday.name.as_deref().map_or(true, str::is_empty) {
        return Err(ReconcileError::validation("holiday.name must be specified"));
    }
    for (field, value) in [("from", &holiday.from), ("to", &holiday.to)] {
        let value = value.as_deref().unwrap_or_default();
        DateTime::parse_from_rfc3339(value).map_err(|e| {
            ReconcileError::validation(format!(
                "holiday.{} must be an RFC 3339 timestamp, got {:?}: {}",
                field, value, e
            ))
        })?;
    }
    Ok(())
}

pub fn validate_forwarding(forwarding: &CallForwardingModel) -> Result<(), ReconcileError> {
    let missing_number = forwarding.entries().iter().any(|e| {
        e.existing_id().is_none() && e.phone_number.as_deref().map_or(true, str::is_empty)
    });
    if missing_number {
        return Err(ReconcileError::validation(
            "call_forwarding.settings entries without id must specify phone_number",
        ));
    }
    Ok(())
}

fn custom_hours_patch(custom_hours: &CustomHoursModel) -> CustomHoursPatch {
    CustomHoursPatch {
        allow_members_to_reset: custom_hours.allow_members_to_reset.into(),
        custom_hours_settings: custom_hours
            .settings
            .iter()
            .flatten()
            .map(|s| CustomHoursSettingPatch {
                from: s.from.clone().into(),
                to: s.to.clone().into(),
                r#type: s.r#type.into(),
                weekday: s.weekday.into(),
            })
            .collect(),
        r#type: custom_hours.r#type.into(),
    }
}

/// String attributes dropped from the plan are cleared remotely
pub(crate) fn call_handling_patch(
    plan: Option<&CallHandlingModel>,
    prior: Option<&CallHandlingModel>,
    holiday_id: Option<&str>,
) -> CallHandlingPatch {
    let empty = CallHandlingModel::default();
    let plan = plan.unwrap_or(&empty);
    let prior = prior.unwrap_or(&empty);
    let text = |prior: &Option<String>, planned: &Option<String>| {
        Optional::clearing(prior.as_ref(), planned.clone())
    };

    CallHandlingPatch {
        holiday_id: holiday_id.map(str::to_string).into(),
        allow_callers_check_voicemail: plan.allow_callers_check_voicemail.into(),
        allow_members_to_reset: plan.allow_members_to_reset.into(),
        audio_while_connecting_id: text(
            &prior.audio_while_connecting_id,
            &plan.audio_while_connecting_id,
        ),
        call_distribution: Optional::from(
            plan.call_distribution
                .clone()
                .map(CallDistributionPayload::from),
        ),
        call_not_answer_action: plan.call_not_answer_action.into(),
        busy_on_another_call_action: plan.busy_on_another_call_action.into(),
        busy_require_press_1_before_connecting: plan.busy_require_press1_before_connecting.into(),
        un_answered_require_press_1_before_connecting: plan
            .unanswered_require_press1_before_connecting
            .into(),
        overflow_play_callee_voicemail_greeting: plan
            .overflow_play_callee_voicemail_greeting
            .into(),
        play_callee_voicemail_greeting: plan.play_callee_voicemail_greeting.into(),
        busy_play_callee_voicemail_greeting: plan.busy_play_callee_voicemail_greeting.into(),
        phone_number: text(&prior.phone_number, &plan.phone_number),
        description: text(&prior.phone_number_description, &plan.phone_number_description),
        busy_phone_number: text(&prior.busy_phone_number, &plan.busy_phone_number),
        busy_description: text(
            &prior.busy_phone_number_description,
            &plan.busy_phone_number_description,
        ),
        connect_to_operator: plan.connect_to_operator.into(),
        forward_to_extension_id: text(
            &prior.forward_to_extension_id,
            &plan.forward_to_extension_id,
        ),
        busy_forward_to_extension_id: text(
            &prior.busy_forward_to_extension_id,
            &plan.busy_forward_to_extension_id,
        ),
        greeting_prompt_id: text(&prior.greeting_prompt_id, &plan.greeting_prompt_id),
        max_call_in_queue: plan.max_call_in_queue.into(),
        max_wait_time: plan.max_wait_time.into(),
        music_on_hold_id: text(&prior.music_on_hold_id, &plan.music_on_hold_id),
        operator_extension_id: text(&prior.operator_extension_id, &plan.operator_extension_id),
        receive_call: plan.receive_call.into(),
        ring_mode: text(&prior.ring_mode, &plan.ring_mode),
        voicemail_greeting_id: text(&prior.voicemail_greeting_id, &plan.voicemail_greeting_id),
        wrap_up_time: plan.wrap_up_time.into(),
    }
}
