//! Options objects
//!
//! An [`Options`] value is a degenerate component: a named, validated
//! property bag with no prototype, used for call-site configuration. It
//! reuses the [`PropertyManager`] verbatim, so declaration, validation,
//! lazy resolution, and finalization behave exactly as they do for
//! components.

use std::collections::BTreeMap;

use crate::error::PropertyError;
use crate::props::{Property, PropertyManager, Value};

/// A named, validated property bag for call-site configuration
#[derive(Debug)]
pub struct Options {
    name: String,
    properties: PropertyManager,
}

impl Options {
    /// Start building a new options object
    pub fn builder<S: Into<String>>(name: S) -> OptionsBuilder {
        OptionsBuilder::new(name)
    }

    /// Get the options name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read an option value
    pub fn get(&mut self, name: &str) -> Result<Value, PropertyError> {
        self.properties.get(name)
    }

    /// Write an option value; only mutable options accept writes after build
    pub fn set<V: Into<Value>>(&mut self, name: &str, value: V) -> Result<(), PropertyError> {
        self.properties.set(name, value)
    }

    /// Clear an option value
    pub fn unset(&mut self, name: &str) -> Result<(), PropertyError> {
        self.properties.unset(name)
    }

    /// Access the underlying property manager
    pub fn properties(&self) -> &PropertyManager {
        &self.properties
    }

    /// Access the underlying property manager mutably
    pub fn properties_mut(&mut self) -> &mut PropertyManager {
        &mut self.properties
    }

    /// Snapshot every readable option value, in declaration order
    ///
    /// Lazy options are resolved; options that are unset without a default
    /// are skipped.
    pub fn snapshot(&mut self) -> BTreeMap<String, Value> {
        let mut values = BTreeMap::new();
        for name in self.properties.names() {
            if let Ok(value) = self.properties.get(&name) {
                values.insert(name, value);
            }
        }
        values
    }
}

/// Builder assembling an [`Options`] object
///
/// Declarations and values can arrive in any order; required completeness
/// is checked once by [`build`](OptionsBuilder::build).
#[derive(Debug)]
pub struct OptionsBuilder {
    name: String,
    properties: PropertyManager,
}

impl OptionsBuilder {
    fn new<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        let properties = PropertyManager::new(format!("options '{name}'"));
        Self { name, properties }
    }

    /// Declare an option
    pub fn declare(mut self, property: Property) -> Result<Self, PropertyError> {
        self.properties.declare(property)?;
        Ok(self)
    }

    /// Attach a fallback builder for undeclared option names
    pub fn fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&str) -> Option<Property> + Send + Sync + 'static,
    {
        self.properties = self.properties.with_fallback(fallback);
        self
    }

    /// Set an option value
    pub fn set<V: Into<Value>>(mut self, name: &str, value: V) -> Result<Self, PropertyError> {
        self.properties.set(name, value)?;
        Ok(self)
    }

    /// Finalize and produce the options object
    pub fn build(mut self) -> Result<Options, PropertyError> {
        self.properties.finalize()?;
        Ok(Options {
            name: self.name,
            properties: self.properties,
        })
    }
}
