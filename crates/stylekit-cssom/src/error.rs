//! Errors surfaced by declaration blocks.

use thiserror::Error;

/// Errors that can occur in CSSOM operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CssomError {
    /// A mutation was attempted on a computed (read-only) declaration.
    #[error(
        "NoModificationAllowedError: cannot execute '{operation}' on a computed declaration{}",
        describe_property(.property)
    )]
    ReadOnly {
        operation: &'static str,
        property: Option<String>,
    },
}

impl CssomError {
    /// Create a read-only violation for `operation`.
    pub fn read_only(operation: &'static str, property: Option<&str>) -> Self {
        Self::ReadOnly {
            operation,
            property: property.map(str::to_string),
        }
    }
}

fn describe_property(property: &Option<String>) -> String {
    match property {
        Some(name) => format!(" (property '{name}')"),
        None => String::new(),
    }
}
