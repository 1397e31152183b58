//! Component factory and builder registry
//!
//! A [`Factory`] maps prototype identifiers to [`Builder`] strategies and
//! assembles components without call sites knowing concrete prototype
//! types. Factories are explicit registry objects passed by reference;
//! there is no global registry, so construction order stays reproducible.

use std::collections::HashMap;

use crate::component::builtin;
use crate::component::{Component, Constraint, Filter};
use crate::error::{FrameworkError, FrameworkResult};
use crate::props::Value;

/// Construction strategy producing a fresh prototype per component
///
/// `prototype_properties` configures the prototype itself; builders reject
/// unknown names rather than ignoring them.
pub trait Builder: Send + Sync {
    fn build(
        &self,
        prototype_properties: HashMap<String, Value>,
    ) -> FrameworkResult<Box<dyn crate::component::Prototype>>;
}

/// Builder backed by a plain function
pub struct FnBuilder(
    pub fn(HashMap<String, Value>) -> FrameworkResult<Box<dyn crate::component::Prototype>>,
);

impl Builder for FnBuilder {
    fn build(
        &self,
        prototype_properties: HashMap<String, Value>,
    ) -> FrameworkResult<Box<dyn crate::component::Prototype>> {
        (self.0)(prototype_properties)
    }
}

/// Registry of builders keyed by prototype identifier
pub struct Factory {
    builders: HashMap<String, Box<dyn Builder>>,
}

impl Factory {
    /// Create an empty factory
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Create a factory with every built-in prototype registered
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        for (identifier, builder) in builtin::builders() {
            // Identifiers are distinct by construction
            if factory.register(identifier, builder).is_err() {
                tracing::warn!("duplicate built-in prototype identifier skipped");
            }
        }
        factory
    }

    /// Register a builder under an identifier
    ///
    /// Fails with [`FrameworkError::AlreadyRegistered`] on duplicates; the
    /// existing builder is never silently replaced.
    pub fn register<S: Into<String>>(
        &mut self,
        identifier: S,
        builder: Box<dyn Builder>,
    ) -> FrameworkResult<()> {
        let identifier = identifier.into();
        if self.builders.contains_key(&identifier) {
            return Err(FrameworkError::AlreadyRegistered { identifier });
        }
        tracing::debug!(%identifier, "prototype builder registered");
        self.builders.insert(identifier, builder);
        Ok(())
    }

    /// Check whether an identifier is registered
    pub fn contains(&self, identifier: &str) -> bool {
        self.builders.contains_key(identifier)
    }

    /// Registered identifiers, sorted
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self.builders.keys().cloned().collect();
        identifiers.sort();
        identifiers
    }

    /// Build a component for the identified prototype
    ///
    /// `properties` populates the component's declared property set;
    /// `prototype_properties` configures the prototype construction. Fails
    /// with [`FrameworkError::UnknownPrototype`] for unregistered
    /// identifiers; on any failure nothing is constructed.
    pub fn build(
        &self,
        identifier: &str,
        properties: HashMap<String, Value>,
        prototype_properties: HashMap<String, Value>,
    ) -> FrameworkResult<Component> {
        let builder = self
            .builders
            .get(identifier)
            .ok_or_else(|| FrameworkError::UnknownPrototype {
                identifier: identifier.to_string(),
            })?;

        let prototype = builder.build(prototype_properties)?;
        Component::new(prototype, properties)
    }

    /// Build a [`Filter`] component for the identified prototype
    pub fn filter(
        &self,
        identifier: &str,
        properties: HashMap<String, Value>,
        prototype_properties: HashMap<String, Value>,
    ) -> FrameworkResult<Filter> {
        Filter::new(self.build(identifier, properties, prototype_properties)?)
    }

    /// Build a [`Constraint`] component for the identified prototype
    pub fn constraint(
        &self,
        identifier: &str,
        properties: HashMap<String, Value>,
        prototype_properties: HashMap<String, Value>,
    ) -> FrameworkResult<Constraint> {
        Constraint::new(self.build(identifier, properties, prototype_properties)?)
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}
