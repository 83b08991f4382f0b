//! tfplug - resource lifecycle framework for Terraform providers
//!
//! Providers implement [`Provider`] and one [`Resource`] per managed type.
//! Configuration, plan and state travel as [`DynamicValue`] documents that
//! resources decode into their own typed models.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod provider;
pub mod resource;

// Helper modules
pub mod import;

// Re-exports for convenience
pub use context::Context;
pub use error::{Result, TfplugError};
pub use import::{import_state_passthrough_id, import_state_split_id};
pub use provider::{Provider, ProviderResource, ResourceFactory};
pub use resource::{Resource, ResourceWithConfigure, ResourceWithImportState};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use types::{AttributePath, Diagnostic, DiagnosticSeverity, DynamicValue};
