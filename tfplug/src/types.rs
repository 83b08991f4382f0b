//! Core value and diagnostic types
//!
//! Configuration, plan and state are carried as [`DynamicValue`], a JSON
//! document keyed by attribute name. Resources either poke at individual
//! attributes through [`AttributePath`] or decode the whole document into a
//! typed model with [`DynamicValue::decode`].

use crate::error::{Result, TfplugError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// One step of an attribute path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributePathStep {
    AttributeName(String),
    ElementKeyInt(usize),
}

/// Path to a nested attribute, e.g. `custom_hours.settings[0].weekday`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributePath {
    pub steps: Vec<AttributePathStep>,
}

impl AttributePath {
    pub fn new(name: &str) -> Self {
        Self {
            steps: vec![AttributePathStep::AttributeName(name.to_string())],
        }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, name: &str) -> Self {
        self.steps
            .push(AttributePathStep::AttributeName(name.to_string()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.steps.push(AttributePathStep::ElementKeyInt(index));
        self
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                AttributePathStep::AttributeName(name) if i == 0 => write!(f, "{}", name)?,
                AttributePathStep::AttributeName(name) => write!(f, ".{}", name)?,
                AttributePathStep::ElementKeyInt(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

/// A configuration, plan or state document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicValue {
    pub value: Value,
}

impl DynamicValue {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn null() -> Self {
        Self { value: Value::Null }
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Serialize a typed model into a document
    pub fn encode<T: Serialize>(model: &T) -> Result<Self> {
        serde_json::to_value(model)
            .map(Self::new)
            .map_err(|e| TfplugError::EncodingError(e.to_string()))
    }

    /// Deserialize the document into a typed model
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.value.clone())
            .map_err(|e| TfplugError::DecodingError(e.to_string()))
    }

    fn lookup(&self, path: &AttributePath) -> Option<&Value> {
        let mut current = &self.value;
        for step in &path.steps {
            current = match step {
                AttributePathStep::AttributeName(name) => current.as_object()?.get(name)?,
                AttributePathStep::ElementKeyInt(idx) => current.as_array()?.get(*idx)?,
            };
        }
        Some(current)
    }

    fn lookup_mut(&mut self, path: &AttributePath) -> Result<&mut Value> {
        let mut current = &mut self.value;
        for step in &path.steps {
            current = match step {
                AttributePathStep::AttributeName(name) => {
                    if current.is_null() {
                        *current = Value::Object(Map::new());
                    }
                    current
                        .as_object_mut()
                        .ok_or_else(|| TfplugError::InvalidPath(path.to_string()))?
                        .entry(name.clone())
                        .or_insert(Value::Null)
                }
                AttributePathStep::ElementKeyInt(idx) => current
                    .as_array_mut()
                    .and_then(|list| list.get_mut(*idx))
                    .ok_or_else(|| TfplugError::InvalidPath(path.to_string()))?,
            };
        }
        Ok(current)
    }

    pub fn get_string(&self, path: &AttributePath) -> Result<String> {
        match self.lookup(path) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => Err(TfplugError::InvalidPath(path.to_string())),
            Some(_) => Err(TfplugError::TypeMismatch {
                path: path.to_string(),
                expected: "string".to_string(),
            }),
        }
    }

    pub fn get_bool(&self, path: &AttributePath) -> Result<bool> {
        match self.lookup(path) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::Null) | None => Err(TfplugError::InvalidPath(path.to_string())),
            Some(_) => Err(TfplugError::TypeMismatch {
                path: path.to_string(),
                expected: "bool".to_string(),
            }),
        }
    }

    pub fn get_number(&self, path: &AttributePath) -> Result<f64> {
        match self.lookup(path) {
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| TfplugError::TypeMismatch {
                path: path.to_string(),
                expected: "number".to_string(),
            }),
            Some(Value::Null) | None => Err(TfplugError::InvalidPath(path.to_string())),
            Some(_) => Err(TfplugError::TypeMismatch {
                path: path.to_string(),
                expected: "number".to_string(),
            }),
        }
    }

    pub fn get_list_len(&self, path: &AttributePath) -> Result<usize> {
        match self.lookup(path) {
            Some(Value::Array(list)) => Ok(list.len()),
            Some(Value::Null) | None => Err(TfplugError::InvalidPath(path.to_string())),
            Some(_) => Err(TfplugError::TypeMismatch {
                path: path.to_string(),
                expected: "list".to_string(),
            }),
        }
    }

    pub fn set_string(&mut self, path: &AttributePath, value: String) -> Result<()> {
        *self.lookup_mut(path)? = Value::String(value);
        Ok(())
    }

    pub fn set_bool(&mut self, path: &AttributePath, value: bool) -> Result<()> {
        *self.lookup_mut(path)? = Value::Bool(value);
        Ok(())
    }
}

/// Diagnostic surfaced to the Terraform user
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub summary: String,
    pub detail: String,
    pub attribute: Option<AttributePath>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, path: AttributePath) -> Self {
        self.attribute = Some(path);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// True when any diagnostic in the slice is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
