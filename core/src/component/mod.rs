//! Components and component families
//!
//! A [`Component`] is a stable-identity wrapper around a prototype instance
//! plus a validated property set. Behavioral methods live on the concrete
//! component families ([`Filter`], [`Constraint`]); each defines exactly one
//! behavioral method that delegates to its prototype and adapts the
//! prototype's boolean return convention into a structured error.

pub mod builtin;
pub mod factory;
pub mod prototype;

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{FrameworkError, ProcessError};
use crate::props::{PropertyManager, Value};
use crate::text::{self, Placeholders};

pub use builtin::{
    DateFormatFilter, HashFilter, NonEmptyConstraint, RangeConstraint, SlugFilter, UrlConstraint,
};
pub use factory::{Builder, Factory, FnBuilder};
pub use prototype::{
    Capability, CheckValue, DeclareProperties, FailureMessage, Prioritized, ProcessValue,
    Prototype, Stringify, Subtyped,
};

/// Stable facade over an exclusively-owned prototype and its property set
pub struct Component {
    /// Unique identifier for this component instance
    id: Uuid,

    /// The wrapped prototype
    prototype: Box<dyn Prototype>,

    /// Validated property set
    properties: PropertyManager,
}

impl Component {
    /// Construct a component around a prototype with a bag of property values
    ///
    /// The prototype declares its accepted properties (Properties
    /// capability), the bag is applied, and the property set is finalized,
    /// so missing required properties and unknown names are reported here
    /// rather than at first use. Supplying values to a prototype without
    /// the Properties capability fails with `CapabilityNotImplemented`.
    pub fn new(
        prototype: Box<dyn Prototype>,
        values: HashMap<String, Value>,
    ) -> Result<Self, FrameworkError> {
        let owner = format!("component '{}'", prototype.name());
        let mut properties = PropertyManager::new(owner);

        match prototype.as_declaring() {
            Some(declaring) => declaring.declare_properties(&mut properties)?,
            None => {
                if !values.is_empty() {
                    return Err(FrameworkError::CapabilityNotImplemented {
                        prototype: prototype.name().to_string(),
                        capability: Capability::Properties,
                    });
                }
            }
        }

        properties.apply(values)?;
        properties.finalize()?;

        let component = Self {
            id: Uuid::new_v4(),
            prototype,
            properties,
        };
        tracing::debug!(
            component = %component.id,
            prototype = %component.prototype.name(),
            "component constructed"
        );
        Ok(component)
    }

    /// Get the unique identifier of this component instance
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the wrapped prototype's name
    pub fn name(&self) -> &str {
        self.prototype.name()
    }

    /// Get the exclusively-owned prototype
    pub fn prototype(&self) -> &dyn Prototype {
        self.prototype.as_ref()
    }

    /// Get the property set
    pub fn properties(&self) -> &PropertyManager {
        &self.properties
    }

    /// Get the property set mutably
    pub fn properties_mut(&mut self) -> &mut PropertyManager {
        &mut self.properties
    }

    /// Check whether the wrapped prototype advertises a capability
    pub fn supports(&self, capability: Capability) -> bool {
        self.prototype.supports(capability)
    }

    /// Human-readable description of this component
    ///
    /// Uses the prototype's Stringify capability when present, otherwise
    /// falls back to a display-friendly rendering of its name.
    pub fn describe(&self) -> String {
        match self.prototype.as_stringify() {
            Some(stringify) => stringify.stringify(),
            None => text::display_name(self.prototype.name()),
        }
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("prototype", &self.prototype.name())
            .field("properties", &self.properties)
            .finish()
    }
}

/// Build the structured failure for a rejected value
///
/// Renders the prototype's failure-message template when the capability is
/// present; otherwise a generic template is used.
fn process_failure(prototype: &dyn Prototype, value: &Value) -> ProcessError {
    let template = match prototype.as_failure_message() {
        Some(messages) => messages.failure_message(),
        None => "value {{value}} rejected by prototype {{prototype}}".to_string(),
    };
    let placeholders = Placeholders::new()
        .set("value", value.to_string())
        .set("prototype", prototype.name());

    ProcessError {
        prototype: prototype.name().to_string(),
        message: text::render(&template, &placeholders),
        value: value.clone(),
    }
}

/// Component family wrapping value-processing prototypes
///
/// The single behavioral method is [`filter`](Filter::filter).
pub struct Filter {
    inner: Component,
}

impl Filter {
    /// Wrap a component whose prototype can process values
    ///
    /// Fails fast with `CapabilityNotImplemented` when the prototype lacks
    /// the ProcessValue capability.
    pub fn new(component: Component) -> Result<Self, FrameworkError> {
        if component.prototype.as_processor().is_none() {
            return Err(FrameworkError::CapabilityNotImplemented {
                prototype: component.name().to_string(),
                capability: Capability::ProcessValue,
            });
        }
        Ok(Self { inner: component })
    }

    /// Process a value through the wrapped prototype
    ///
    /// Returns the processed value, or a structured [`ProcessError`] when
    /// the prototype rejects it. Rejection is a returned value, never a
    /// panic.
    pub fn filter(&mut self, value: Value) -> Result<Value, ProcessError> {
        let Component {
            prototype,
            properties,
            ..
        } = &mut self.inner;

        let processor = match prototype.as_processor() {
            Some(processor) => processor,
            None => return Err(process_failure(prototype.as_ref(), &value)),
        };

        let mut current = value.clone();
        if processor.process(&mut current, properties) {
            Ok(current)
        } else {
            Err(process_failure(prototype.as_ref(), &value))
        }
    }

    /// Access the underlying component
    pub fn component(&self) -> &Component {
        &self.inner
    }

    /// Access the underlying component mutably
    pub fn component_mut(&mut self) -> &mut Component {
        &mut self.inner
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Filter").field(&self.inner).finish()
    }
}

/// Component family wrapping value-checking prototypes
///
/// The single behavioral method is [`evaluate`](Constraint::evaluate).
pub struct Constraint {
    inner: Component,
}

impl Constraint {
    /// Wrap a component whose prototype can check values
    pub fn new(component: Component) -> Result<Self, FrameworkError> {
        if component.prototype.as_checker().is_none() {
            return Err(FrameworkError::CapabilityNotImplemented {
                prototype: component.name().to_string(),
                capability: Capability::CheckValue,
            });
        }
        Ok(Self { inner: component })
    }

    /// Evaluate a value against the wrapped prototype
    pub fn evaluate(&mut self, value: &Value) -> Result<(), ProcessError> {
        let Component {
            prototype,
            properties,
            ..
        } = &mut self.inner;

        let checker = match prototype.as_checker() {
            Some(checker) => checker,
            None => return Err(process_failure(prototype.as_ref(), value)),
        };

        if checker.check(value, properties) {
            Ok(())
        } else {
            Err(process_failure(prototype.as_ref(), value))
        }
    }

    /// Evaluation priority of the wrapped prototype, when advertised
    pub fn priority(&self) -> Option<i32> {
        self.inner
            .prototype
            .as_prioritized()
            .map(|prioritized| prioritized.priority())
    }

    /// Access the underlying component
    pub fn component(&self) -> &Component {
        &self.inner
    }

    /// Access the underlying component mutably
    pub fn component_mut(&mut self) -> &mut Component {
        &mut self.inner
    }
}

impl std::fmt::Debug for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Constraint").field(&self.inner).finish()
    }
}
