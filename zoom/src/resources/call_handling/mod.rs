//! Call handling resources: business, closed and holiday hours of an extension.
//!
//! The three resources share one typed model and one reconciler; they differ
//! in schema, in the validation that applies and in how they are destroyed.

pub mod model;
pub mod reconciler;

mod resource_business_hours;
mod resource_closed_hours;
mod resource_holiday_hours;

pub use resource_business_hours::BusinessHoursResource;
pub use resource_closed_hours::ClosedHoursResource;
pub use resource_holiday_hours::HolidayHoursResource;

use tfplug::resource::{
    CreateResourceResponse, DeleteResourceResponse, ReadResourceResponse, UpdateResourceResponse,
};
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, ObjectNestingMode};
use tfplug::{AttributePath, Context, Diagnostic, DynamicValue};

use self::model::{AttributeKind, CallHandlingProfile, CALL_HANDLING_ATTRIBUTES};
use self::reconciler::{
    default_model, validate_custom_hours, validate_forwarding, validate_holiday,
    CallHandlingReconciler,
};
use super::{decode_model, encode_state, not_configured, reconcile_diagnostic};
use crate::api::call_handling::SettingType;
use crate::api::Outcome;
use crate::ZoomProviderData;

pub(crate) fn extension_id_attribute() -> Attribute {
    AttributeBuilder::new("extension_id", AttributeType::String)
        .description("Extension ID of the user, call queue or auto receptionist")
        .required()
        .build()
}

/// `call_handling` block with the attributes of `period`
pub(crate) fn call_handling_attribute(period: SettingType) -> Attribute {
    let attributes = CALL_HANDLING_ATTRIBUTES
        .iter()
        .filter(|a| a.scope.includes(period))
        .map(|a| {
            let builder = match a.kind {
                AttributeKind::String => AttributeBuilder::new(a.name, AttributeType::String),
                AttributeKind::Number => AttributeBuilder::new(a.name, AttributeType::Number),
                AttributeKind::Bool => AttributeBuilder::new(a.name, AttributeType::Bool),
                AttributeKind::CallDistribution => AttributeBuilder::nested(
                    a.name,
                    ObjectNestingMode::Single,
                    vec![
                        optional("handle_multiple_calls", AttributeType::Bool, "Handle multiple calls at once"),
                        optional("ring_duration", AttributeType::Number, "Ring duration in seconds"),
                        optional("ring_mode", AttributeType::String, "Ring mode"),
                        optional(
                            "skip_offline_device_phone_number",
                            AttributeType::Bool,
                            "Skip offline devices",
                        ),
                    ],
                ),
            };
            builder.description(a.description).optional().build()
        })
        .collect();

    AttributeBuilder::nested("call_handling", ObjectNestingMode::Single, attributes)
        .description("Routing of incoming calls")
        .required()
        .build()
}

pub(crate) fn call_forwarding_attribute() -> Attribute {
    AttributeBuilder::nested(
        "call_forwarding",
        ObjectNestingMode::Single,
        vec![
            optional(
                "require_press_1_before_connecting",
                AttributeType::Bool,
                "Ask the recipient to press 1 before the call connects",
            ),
            optional("enable_zoom_mobile_apps", AttributeType::Bool, "Ring Zoom mobile apps"),
            optional("enable_zoom_desktop_apps", AttributeType::Bool, "Ring Zoom desktop apps"),
            optional(
                "enable_zoom_phone_appliance_apps",
                AttributeType::Bool,
                "Ring Zoom phone appliance apps",
            ),
            AttributeBuilder::nested(
                "settings",
                ObjectNestingMode::List,
                vec![
                    AttributeBuilder::new("id", AttributeType::String)
                        .description("Call forwarding ID")
                        .optional()
                        .computed()
                        .build(),
                    optional("description", AttributeType::String, "Description of the target"),
                    optional("enable", AttributeType::Bool, "Whether the target rings"),
                    optional("phone_number", AttributeType::String, "External number to forward to"),
                ],
            )
            .description("User created forwarding targets")
            .optional()
            .build(),
        ],
    )
    .description("Forwarding of incoming calls to other numbers and apps")
    .optional()
    .build()
}

fn optional(name: &str, r#type: AttributeType, description: &str) -> Attribute {
    AttributeBuilder::new(name, r#type)
        .description(description)
        .optional()
        .build()
}

/// Plan-time checks, no remote calls
pub(crate) fn validate_profile(period: SettingType, config: &DynamicValue) -> Vec<Diagnostic> {
    let profile: CallHandlingProfile = match config.decode() {
        Ok(profile) => profile,
        Err(e) => return vec![Diagnostic::error("Invalid configuration", e.to_string())],
    };

    let mut diagnostics = vec![];
    let checks = [
        (
            period == SettingType::BusinessHours,
            "custom_hours",
            validate_custom_hours(profile.custom_hours.as_ref()),
        ),
        (
            period == SettingType::HolidayHours,
            "holiday",
            validate_holiday(profile.holiday.as_ref()),
        ),
        (
            true,
            "call_forwarding",
            profile
                .call_forwarding
                .as_ref()
                .map_or(Ok(()), validate_forwarding),
        ),
    ];
    for (applies, attribute, result) in checks {
        if let (true, Err(e)) = (applies, result) {
            diagnostics.push(
                Diagnostic::error("Invalid call handling configuration", e.to_string())
                    .with_attribute(AttributePath::new(attribute)),
            );
        }
    }
    diagnostics
}

pub(crate) async fn create_profile(
    provider_data: Option<&ZoomProviderData>,
    ctx: &Context,
    period: SettingType,
    planned_state: DynamicValue,
) -> CreateResourceResponse {
    let fail = |planned_state, diagnostic| CreateResourceResponse {
        new_state: planned_state,
        diagnostics: vec![diagnostic],
    };

    let Some(provider_data) = provider_data else {
        return fail(planned_state, not_configured());
    };
    let mut plan: CallHandlingProfile = match decode_model(&planned_state, "planned state") {
        Ok(plan) => plan,
        Err(diag) => return fail(planned_state, diag),
    };

    let reconciler = CallHandlingReconciler::new(&provider_data.client, period);
    if let Err(e) = reconciler.sync(ctx, &mut plan, None, false).await {
        return fail(
            planned_state,
            reconcile_diagnostic("Error creating phone call handling", e),
        );
    }

    match encode_state(&plan) {
        Ok(new_state) => {
            tracing::info!(extension_id = %plan.extension_id, "Created {} call handling", period);
            CreateResourceResponse {
                new_state,
                diagnostics: vec![],
            }
        }
        Err(diag) => fail(planned_state, diag),
    }
}

pub(crate) async fn read_profile(
    provider_data: Option<&ZoomProviderData>,
    ctx: &Context,
    period: SettingType,
    current_state: DynamicValue,
) -> ReadResourceResponse {
    let fail = |current_state, diagnostic| ReadResourceResponse {
        new_state: Some(current_state),
        diagnostics: vec![diagnostic],
    };

    let Some(provider_data) = provider_data else {
        return fail(current_state, not_configured());
    };
    let prior: CallHandlingProfile = match decode_model(&current_state, "current state") {
        Ok(prior) => prior,
        Err(diag) => return fail(current_state, diag),
    };

    let reconciler = CallHandlingReconciler::new(&provider_data.client, period);
    match reconciler.read(ctx, &prior).await {
        Outcome::Found(profile) => match encode_state(&profile) {
            Ok(new_state) => ReadResourceResponse {
                new_state: Some(new_state),
                diagnostics: vec![],
            },
            Err(diag) => fail(current_state, diag),
        },
        Outcome::Gone => {
            tracing::warn!(
                extension_id = %prior.extension_id,
                "{} call handling no longer exists, removing from state", period
            );
            ReadResourceResponse {
                new_state: None,
                diagnostics: vec![],
            }
        }
        Outcome::Error(e) => fail(
            current_state,
            reconcile_diagnostic("Error reading phone call handling", e),
        ),
    }
}

pub(crate) async fn update_profile(
    provider_data: Option<&ZoomProviderData>,
    ctx: &Context,
    period: SettingType,
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
    let prior: CallHandlingProfile = match decode_model(&prior_state, "prior state") {
        Ok(prior) => prior,
        Err(diag) => return fail(prior_state, diag),
    };
    let mut plan: CallHandlingProfile = match decode_model(&planned_state, "planned state") {
        Ok(plan) => plan,
        Err(diag) => return fail(prior_state, diag),
    };
    // holiday_id is computed and survives updates
    if plan.holiday_id.is_none() {
        plan.holiday_id = prior.holiday_id.clone();
    }

    let reconciler = CallHandlingReconciler::new(&provider_data.client, period);
    if let Err(e) = reconciler.sync(ctx, &mut plan, Some(&prior), false).await {
        return fail(
            prior_state,
            Diagnostic::error(
                "Error updating phone call handling",
                format!(
                    "Could not update phone call handling {}, unexpected error: {}",
                    plan.extension_id, e
                ),
            ),
        );
    }

    match encode_state(&plan) {
        Ok(new_state) => {
            tracing::info!(extension_id = %plan.extension_id, "Updated {} call handling", period);
            UpdateResourceResponse {
                new_state,
                diagnostics: vec![],
            }
        }
        Err(diag) => fail(prior_state, diag),
    }
}

/// Business and closed hours cannot be removed remotely, only reset
pub(crate) async fn reset_profile(
    provider_data: Option<&ZoomProviderData>,
    ctx: &Context,
    period: SettingType,
    prior_state: DynamicValue,
) -> DeleteResourceResponse {
    let Some(provider_data) = provider_data else {
        return DeleteResourceResponse {
            diagnostics: vec![not_configured()],
        };
    };
    let prior: CallHandlingProfile = match decode_model(&prior_state, "prior state") {
        Ok(prior) => prior,
        Err(diag) => {
            return DeleteResourceResponse {
                diagnostics: vec![diag],
            }
        }
    };

    let mut defaults = default_model(period, &prior.extension_id);
    let reconciler = CallHandlingReconciler::new(&provider_data.client, period);
    if let Err(e) = reconciler.sync(ctx, &mut defaults, None, true).await {
        return DeleteResourceResponse {
            diagnostics: vec![Diagnostic::error(
                "Error deleting phone call handling",
                format!(
                    "Could not delete phone call handling {}, unexpected error: {}",
                    prior.extension_id, e
                ),
            )],
        };
    }

    tracing::info!(extension_id = %prior.extension_id, "deleted phone call handling");
    DeleteResourceResponse {
        diagnostics: vec![],
    }
}
