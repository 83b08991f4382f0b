pub mod call_handling;
pub mod membership;

pub use call_handling::{BusinessHoursResource, ClosedHoursResource, HolidayHoursResource};
pub use membership::{
    CallQueueMembersResource, CallQueuePhoneNumbersResource, SharedLineGroupMembersResource,
    SharedLineGroupPhoneNumbersResource, UserPhoneNumbersResource,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tfplug::resource::{ConfigureResourceRequest, ConfigureResourceResponse};
use tfplug::{Diagnostic, DynamicValue};

use crate::reconcile::ReconcileError;
use crate::ZoomProviderData;

/// Extract [`ZoomProviderData`] from the opaque provider data
pub(crate) fn configure_provider_data(
    request: ConfigureResourceRequest,
    slot: &mut Option<ZoomProviderData>,
) -> ConfigureResourceResponse {
    let mut diagnostics = vec![];

    if let Some(data) = request.provider_data {
        if let Some(provider_data) = data.downcast_ref::<ZoomProviderData>() {
            *slot = Some(provider_data.clone());
        } else {
            diagnostics.push(Diagnostic::error(
                "Invalid provider data",
                "Failed to extract ZoomProviderData from provider data",
            ));
        }
    } else {
        diagnostics.push(Diagnostic::error(
            "No provider data",
            "No provider data was provided to the resource",
        ));
    }

    ConfigureResourceResponse { diagnostics }
}

pub(crate) fn not_configured() -> Diagnostic {
    Diagnostic::error(
        "Provider not configured",
        "Provider data was not properly configured",
    )
}

pub(crate) fn decode_model<T: DeserializeOwned>(
    value: &DynamicValue,
    what: &str,
) -> Result<T, Diagnostic> {
    value
        .decode()
        .map_err(|e| Diagnostic::error(format!("Failed to read {}", what), e.to_string()))
}

pub(crate) fn encode_state<T: Serialize>(model: &T) -> Result<DynamicValue, Diagnostic> {
    DynamicValue::encode(model)
        .map_err(|e| Diagnostic::error("Failed to encode state", e.to_string()))
}

pub(crate) fn reconcile_diagnostic(summary: &str, err: ReconcileError) -> Diagnostic {
    Diagnostic::error(summary, err.to_string())
}
