//! Prototype contracts
//!
//! A prototype is a swappable strategy object wrapped by a
//! [`Component`](super::Component). Beyond the base contract, a prototype
//! implements zero or more capability traits; callers probe for support
//! through the optional-handle accessors instead of downcasting, so a
//! missing capability is observable rather than a silent no-op.

use std::any::Any;
use std::fmt;

use crate::error::PropertyError;
use crate::props::{PropertyManager, Value};

/// Capability flags a prototype can advertise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Can process (coerce) a value in place
    ProcessValue,
    /// Can check a value against a predicate
    CheckValue,
    /// Reports an evaluation priority
    Priority,
    /// Supplies a templated failure message
    FailureMessage,
    /// Supplies a human-readable representation of itself
    Stringify,
    /// Classifies itself under a subtype label
    Subtype,
    /// Declares an accepted property set
    Properties,
}

impl Capability {
    /// Get the display name for this capability
    pub fn display_name(&self) -> &'static str {
        match self {
            Capability::ProcessValue => "process-value",
            Capability::CheckValue => "check-value",
            Capability::Priority => "priority",
            Capability::FailureMessage => "failure-message",
            Capability::Stringify => "stringify",
            Capability::Subtype => "subtype",
            Capability::Properties => "properties",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Base contract every prototype implements
///
/// A prototype instance is held exclusively by one component and carries no
/// state shared across components.
pub trait Prototype: Send + Sync {
    /// Prototype name, used for identification and error reporting
    fn name(&self) -> &str;

    /// Capabilities this prototype advertises
    fn capabilities(&self) -> Vec<Capability>;

    /// Get the prototype as `Any` for application-level downcasting
    fn as_any(&self) -> &dyn Any;

    /// Probe for the value-processing capability
    fn as_processor(&self) -> Option<&dyn ProcessValue> {
        None
    }

    /// Probe for the value-checking capability
    fn as_checker(&self) -> Option<&dyn CheckValue> {
        None
    }

    /// Probe for the priority capability
    fn as_prioritized(&self) -> Option<&dyn Prioritized> {
        None
    }

    /// Probe for the failure-message capability
    fn as_failure_message(&self) -> Option<&dyn FailureMessage> {
        None
    }

    /// Probe for the stringification capability
    fn as_stringify(&self) -> Option<&dyn Stringify> {
        None
    }

    /// Probe for the subtype capability
    fn as_subtyped(&self) -> Option<&dyn Subtyped> {
        None
    }

    /// Probe for the property-declaration capability
    fn as_declaring(&self) -> Option<&dyn DeclareProperties> {
        None
    }

    /// Check whether a capability is advertised
    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

/// Value-processing capability: coerce a value in place
///
/// Returns `true` when the value was accepted (and possibly rewritten);
/// `false` signals rejection. The wrapping component adapts this boolean
/// convention into a structured error.
pub trait ProcessValue {
    fn process(&self, value: &mut Value, properties: &mut PropertyManager) -> bool;
}

/// Value-checking capability: test a value without modifying it
pub trait CheckValue {
    fn check(&self, value: &Value, properties: &mut PropertyManager) -> bool;
}

/// Priority capability: ordering hint when several prototypes apply
pub trait Prioritized {
    fn priority(&self) -> i32;
}

/// Failure-message capability
///
/// The returned template may reference `{{value}}` and `{{prototype}}`
/// placeholders; the component renders it when building a failure.
pub trait FailureMessage {
    fn failure_message(&self) -> String;
}

/// Stringification capability: human-readable self-description
pub trait Stringify {
    fn stringify(&self) -> String;
}

/// Subtype capability: classification label within a prototype family
pub trait Subtyped {
    fn subtype(&self) -> &str;
}

/// Property-declaration capability
///
/// Prototypes with this capability register their accepted properties into
/// the component's manager at construction time.
pub trait DeclareProperties {
    fn declare_properties(&self, properties: &mut PropertyManager) -> Result<(), PropertyError>;
}
