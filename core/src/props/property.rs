//! Property descriptors and value slots
//!
//! A [`Property`] is one named, validated value slot owned by a
//! [`PropertyManager`](super::PropertyManager). The slot is an explicit
//! state machine so lazy resolution is observable: a getter that re-enters
//! its own slot is detected as an error instead of recursing.

use std::fmt;

use crate::error::PropertyError;
use crate::props::validation::Validation;
use crate::props::value::{Value, ValueKind};
use crate::props::PropertyManager;

/// Getter invoked at most once to compute a lazy property value
pub type LazyGetter =
    Box<dyn Fn(&mut PropertyManager) -> Result<Value, PropertyError> + Send + Sync>;

/// Observable state of a property's value slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyState {
    /// No value stored; reads fall back to the lazy getter or default
    Unset,

    /// A lazy getter is currently computing the value
    Computing,

    /// A value is stored (set directly or memoized from a getter)
    Ready,
}

/// Internal slot storage
pub(crate) enum ValueSlot {
    Unset,
    Computing,
    Ready(Value),
}

/// A named, typed, optionally-required, optionally-lazy value slot
pub struct Property {
    /// Property name, unique within the owning manager
    name: String,

    /// Validation chain run on every stored value
    validation: Validation,

    /// Whether the owner cannot finalize without this property
    required: bool,

    /// Default consulted when reading an unset slot
    default: Option<Value>,

    /// Whether the value is masked in display and log output
    sensitive: bool,

    /// Whether the property stays writable after the owner is finalized
    mutable: bool,

    /// Lazy getter, consumed on first resolution
    pub(crate) getter: Option<LazyGetter>,

    /// The value slot
    pub(crate) slot: ValueSlot,
}

impl Property {
    /// Create a new optional property accepting any value
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            validation: Validation::new(),
            required: false,
            default: None,
            sensitive: false,
            mutable: false,
            getter: None,
            slot: ValueSlot::Unset,
        }
    }

    /// Create a text-typed property
    pub fn text<S: Into<String>>(name: S) -> Self {
        Self::new(name).validation(Validation::new().kind(ValueKind::Text))
    }

    /// Create an integer-typed property
    pub fn integer<S: Into<String>>(name: S) -> Self {
        Self::new(name).validation(Validation::new().kind(ValueKind::Int))
    }

    /// Create a boolean-typed property
    pub fn boolean<S: Into<String>>(name: S) -> Self {
        Self::new(name).validation(Validation::new().kind(ValueKind::Bool))
    }

    /// Set the validation chain
    pub fn validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Mark this property as required
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set a default value for this property
    pub fn default_value<V: Into<Value>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark this property as sensitive
    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    /// Keep this property writable after the owner is finalized
    pub fn mutable(mut self, mutable: bool) -> Self {
        self.mutable = mutable;
        self
    }

    /// Bind a lazy getter, invoked once on first read and memoized
    pub fn lazy<F>(mut self, getter: F) -> Self
    where
        F: Fn(&mut PropertyManager) -> Result<Value, PropertyError> + Send + Sync + 'static,
    {
        self.getter = Some(Box::new(getter));
        self
    }

    /// Get the property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this property is required
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether this property is sensitive
    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Whether this property stays writable after finalization
    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Whether this property has a lazy getter still pending
    pub fn is_lazy(&self) -> bool {
        self.getter.is_some()
    }

    /// The declared default, if any
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The validation chain
    pub fn rules(&self) -> &Validation {
        &self.validation
    }

    /// Observable slot state
    pub fn state(&self) -> PropertyState {
        match self.slot {
            ValueSlot::Unset => PropertyState::Unset,
            ValueSlot::Computing => PropertyState::Computing,
            ValueSlot::Ready(_) => PropertyState::Ready,
        }
    }

    /// Get a display-safe rendering of the stored value
    pub fn display_value(&self) -> String {
        match &self.slot {
            ValueSlot::Ready(_) if self.sensitive => "***".to_string(),
            ValueSlot::Ready(value) => value.to_string(),
            ValueSlot::Computing => "<computing>".to_string(),
            ValueSlot::Unset => "<unset>".to_string(),
        }
    }

    /// Whether this property can satisfy a required check
    ///
    /// A required property is satisfiable when it holds a value, declares a
    /// default, or still has a pending lazy getter.
    pub(crate) fn is_satisfiable(&self) -> bool {
        matches!(self.slot, ValueSlot::Ready(_)) || self.default.is_some() || self.getter.is_some()
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("sensitive", &self.sensitive)
            .field("mutable", &self.mutable)
            .field("lazy", &self.getter.is_some())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_defaults() {
        let property = Property::new("label");
        assert_eq!(property.name(), "label");
        assert!(!property.is_required());
        assert!(!property.is_sensitive());
        assert!(!property.is_mutable());
        assert!(!property.is_lazy());
        assert_eq!(property.state(), PropertyState::Unset);
    }

    #[test]
    fn test_builder_chain() {
        let property = Property::text("token")
            .required(true)
            .sensitive(true)
            .mutable(true);

        assert!(property.is_required());
        assert!(property.is_sensitive());
        assert!(property.is_mutable());
    }

    #[test]
    fn test_satisfiability() {
        assert!(!Property::new("bare").required(true).is_satisfiable());
        assert!(Property::new("with_default")
            .required(true)
            .default_value("x")
            .is_satisfiable());
        assert!(Property::new("lazy")
            .required(true)
            .lazy(|_| Ok(Value::Int(1)))
            .is_satisfiable());
    }

    #[test]
    fn test_sensitive_display() {
        let mut property = Property::text("secret").sensitive(true);
        property.slot = ValueSlot::Ready(Value::text("hunter2"));
        assert_eq!(property.display_value(), "***");

        let mut plain = Property::text("user");
        plain.slot = ValueSlot::Ready(Value::text("alice"));
        assert_eq!(plain.display_value(), "alice");
    }

    #[test]
    fn test_unset_display() {
        let property = Property::new("pending");
        assert_eq!(property.display_value(), "<unset>");
    }
}
