//! Import helpers for simple resource import implementations

use crate::context::Context;
use crate::resource::{ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource};
use crate::types::{AttributePath, Diagnostic, DynamicValue};

/// Writes the import ID verbatim to a single state attribute.
///
/// Example: ID "ext-123" -> state.extension_id = "ext-123"
pub fn import_state_passthrough_id(
    _ctx: &Context,
    attr_path: AttributePath,
    request: &ImportResourceStateRequest,
    response: &mut ImportResourceStateResponse,
) {
    let mut state = DynamicValue::null();

    if let Err(e) = state.set_string(&attr_path, request.id.clone()) {
        response.diagnostics.push(
            Diagnostic::error(
                format!("Failed to set import ID: {}", e),
                format!("Could not set attribute '{}' to '{}'", attr_path, request.id),
            )
            .with_attribute(attr_path),
        );
        return;
    }

    response.imported_resources.push(ImportedResource {
        type_name: request.type_name.clone(),
        state,
    });
}

/// Splits a composite import ID on `/` and writes each part to the matching
/// attribute. The number of parts must equal the number of attributes.
///
/// Example: ID "ext-1/hol-9" with [extension_id, holiday_id]
pub fn import_state_split_id(
    _ctx: &Context,
    attr_paths: &[AttributePath],
    expected_format: &str,
    request: &ImportResourceStateRequest,
    response: &mut ImportResourceStateResponse,
) {
    let parts: Vec<&str> = request.id.split('/').collect();
    if parts.len() != attr_paths.len() || parts.iter().any(|p| p.is_empty()) {
        response.diagnostics.push(Diagnostic::error(
            "Invalid import ID",
            format!(
                "Import ID must be in the format `{}`, got: {}",
                expected_format, request.id
            ),
        ));
        return;
    }

    let mut state = DynamicValue::null();
    for (path, part) in attr_paths.iter().zip(parts) {
        if let Err(e) = state.set_string(path, part.to_string()) {
            response.diagnostics.push(
                Diagnostic::error(
                    format!("Failed to set import ID: {}", e),
                    format!("Could not set attribute '{}' to '{}'", path, part),
                )
                .with_attribute(path.clone()),
            );
            return;
        }
    }

    response.imported_resources.push(ImportedResource {
        type_name: request.type_name.clone(),
        state,
    });
}
