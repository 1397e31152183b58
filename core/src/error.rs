//! Error types for the Armature core library.
//!
//! Every failure is raised at the point of detection and carries the
//! structured data (offending name, value, owner) needed for programmatic
//! handling alongside a human-readable message.

use thiserror::Error;

use crate::component::prototype::Capability;
use crate::props::Value;

/// Errors raised by property declaration, assignment, and resolution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    /// A property name was declared twice within one manager
    #[error("property '{name}' is already declared")]
    AlreadyDeclared { name: String },

    /// A property name was used that neither side declared
    #[error("property '{name}' is not declared")]
    NotDeclared { name: String },

    /// Required properties were still unsatisfied at finalization
    #[error("missing required properties for {owner}: {}", .names.join(", "))]
    MissingRequired { owner: String, names: Vec<String> },

    /// A required property was read before receiving a value
    #[error("required property '{name}' read before initialization")]
    NotInitialized { name: String },

    /// An optional property without a default was read while unset
    #[error("property '{name}' has no value and no default")]
    NotSet { name: String },

    /// A value failed the property's validation chain
    #[error("value for property '{name}' rejected: {reason} (got: {value})")]
    CoercionFailed {
        name: String,
        value: Value,
        reason: String,
    },

    /// Attempted to unset a required property
    #[error("cannot unset required property '{name}'")]
    CannotUnsetRequired { name: String },

    /// A lazy getter re-entered the slot it is computing
    #[error("lazy resolution of property '{name}' re-entered its own slot")]
    ReentrantResolution { name: String },

    /// Attempted to write a non-mutable property after finalization
    #[error("{owner} is finalized; property '{name}' is not mutable")]
    Finalized { owner: String, name: String },

    /// The owner declared more properties than the configured cap allows
    #[error("{owner} cannot declare more than {limit} properties")]
    LimitExceeded { owner: String, limit: usize },
}

/// Errors raised by enumeration membership queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnumError {
    /// The requested name is not a member of the enumeration
    #[error("'{member}' is not a member of enumeration '{enumeration}'")]
    UnknownMember { enumeration: String, member: String },
}

/// Structured failure returned by component behavioral methods
///
/// Behavioral delegation adapts the prototype's boolean return convention
/// into this error object; it is returned to the caller, never panicked.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ProcessError {
    /// Name of the prototype that rejected the value
    pub prototype: String,

    /// Rendered human-readable message
    pub message: String,

    /// The offending value
    pub value: Value,
}

/// Top-level error type for framework operations
#[derive(Debug, Error)]
pub enum FrameworkError {
    #[error("property error: {0}")]
    Property(#[from] PropertyError),

    #[error("enumeration error: {0}")]
    Enum(#[from] EnumError),

    #[error("no prototype registered under identifier '{identifier}'")]
    UnknownPrototype { identifier: String },

    #[error("a builder is already registered under identifier '{identifier}'")]
    AlreadyRegistered { identifier: String },

    #[error("prototype '{prototype}' does not implement the {capability} capability")]
    CapabilityNotImplemented {
        prototype: String,
        capability: Capability,
    },

    #[error("processing failed: {0}")]
    Process(#[from] ProcessError),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl From<anyhow::Error> for FrameworkError {
    fn from(error: anyhow::Error) -> Self {
        FrameworkError::Internal {
            message: error.to_string(),
        }
    }
}

/// Result type alias for framework operations
pub type FrameworkResult<T> = Result<T, FrameworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_error_display() {
        let err = PropertyError::AlreadyDeclared {
            name: "format".to_string(),
        };
        assert_eq!(err.to_string(), "property 'format' is already declared");

        let err = PropertyError::MissingRequired {
            owner: "component 'hash'".to_string(),
            names: vec!["algorithm".to_string(), "encoding".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required properties for component 'hash': algorithm, encoding"
        );
    }

    #[test]
    fn test_coercion_failure_carries_value() {
        let err = PropertyError::CoercionFailed {
            name: "port".to_string(),
            value: Value::text("not-a-number"),
            reason: "expected integer, got text".to_string(),
        };
        match &err {
            PropertyError::CoercionFailed { value, .. } => {
                assert_eq!(value, &Value::text("not-a-number"));
            }
            _ => panic!("unexpected variant"),
        }
        assert!(err.to_string().contains("not-a-number"));
    }

    #[test]
    fn test_enum_error_display() {
        let err = EnumError::UnknownMember {
            enumeration: "hash_algorithm".to_string(),
            member: "md5".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'md5' is not a member of enumeration 'hash_algorithm'"
        );
    }

    #[test]
    fn test_error_conversion() {
        let property_err = PropertyError::NotDeclared {
            name: "missing".to_string(),
        };
        let framework_err: FrameworkError = property_err.into();
        match framework_err {
            FrameworkError::Property(PropertyError::NotDeclared { name }) => {
                assert_eq!(name, "missing");
            }
            _ => panic!("unexpected error conversion"),
        }
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: FrameworkError = anyhow::anyhow!("boom").into();
        match err {
            FrameworkError::Internal { message } => assert_eq!(message, "boom"),
            _ => panic!("unexpected error conversion"),
        }
    }
}
