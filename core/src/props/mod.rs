//! Property management
//!
//! This module contains the property system used by components, options,
//! and prototypes: dynamically typed values, validation chains, property
//! descriptors, and the per-owner [`PropertyManager`] registry.
//!
//! Required-property completeness is checked only by [`PropertyManager::
//! finalize`], so values can be populated in any order during a builder
//! phase. Lazy properties resolve through an explicit slot state machine
//! and memoize their first result.

pub mod property;
pub mod validation;
pub mod value;

use std::collections::HashMap;
use std::fmt;

use crate::constants::MAX_PROPERTIES_PER_OWNER;
use crate::error::PropertyError;

pub use property::{LazyGetter, Property, PropertyState};
pub use validation::{Evaluator, Validation};
pub use value::{Value, ValueKind};

use property::ValueSlot;

/// Fallback invoked to materialize an undeclared-but-requested property
pub type FallbackBuilder = Box<dyn Fn(&str) -> Option<Property> + Send + Sync>;

/// Per-owner registry mapping property names to their descriptors
///
/// The manager holds a label identifying its owner for error reporting;
/// the owner holds the manager exclusively, so there is no shared state.
pub struct PropertyManager {
    /// Owner label used in error and log messages
    owner: String,

    /// Declared properties by name
    properties: HashMap<String, Property>,

    /// Declaration order, used for iteration and error reporting
    order: Vec<String>,

    /// Optional builder for undeclared-but-requested properties
    fallback: Option<FallbackBuilder>,

    /// Whether the owner's construction has been finalized
    finalized: bool,
}

impl PropertyManager {
    /// Create a new manager for the named owner
    pub fn new<S: Into<String>>(owner: S) -> Self {
        Self {
            owner: owner.into(),
            properties: HashMap::new(),
            order: Vec::new(),
            fallback: None,
            finalized: false,
        }
    }

    /// Attach a fallback builder for undeclared property names
    pub fn with_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&str) -> Option<Property> + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Get the owner label
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Register a new property
    ///
    /// Fails with [`PropertyError::AlreadyDeclared`] if the name is taken
    /// and with [`PropertyError::Finalized`] once the owner is finalized.
    pub fn declare(&mut self, property: Property) -> Result<(), PropertyError> {
        let name = property.name().to_string();

        if self.finalized {
            return Err(PropertyError::Finalized {
                owner: self.owner.clone(),
                name,
            });
        }
        if self.properties.contains_key(&name) {
            return Err(PropertyError::AlreadyDeclared { name });
        }
        if self.properties.len() >= MAX_PROPERTIES_PER_OWNER {
            return Err(PropertyError::LimitExceeded {
                owner: self.owner.clone(),
                limit: MAX_PROPERTIES_PER_OWNER,
            });
        }

        self.order.push(name.clone());
        self.properties.insert(name, property);
        Ok(())
    }

    /// Check whether a property name is declared
    pub fn is_declared(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Set a property value after running its validation chain
    ///
    /// On rejection the property's prior value (or unset state) is left
    /// unchanged and the error carries the attempted value.
    pub fn set<V: Into<Value>>(&mut self, name: &str, value: V) -> Result<(), PropertyError> {
        let value = value.into();
        self.ensure_declared(name)?;

        let finalized = self.finalized;
        let owner = &self.owner;
        let property = match self.properties.get_mut(name) {
            Some(property) => property,
            None => {
                return Err(PropertyError::NotDeclared {
                    name: name.to_string(),
                })
            }
        };

        if matches!(property.slot, ValueSlot::Computing) {
            return Err(PropertyError::ReentrantResolution {
                name: name.to_string(),
            });
        }
        if finalized && !property.is_mutable() {
            return Err(PropertyError::Finalized {
                owner: owner.clone(),
                name: name.to_string(),
            });
        }

        match property.rules().check(&value) {
            Ok(checked) => {
                property.slot = ValueSlot::Ready(checked);
                Ok(())
            }
            Err(reason) => {
                tracing::warn!(
                    owner = %owner,
                    property = %name,
                    %reason,
                    "property value rejected"
                );
                Err(PropertyError::CoercionFailed {
                    name: name.to_string(),
                    value,
                    reason,
                })
            }
        }
    }

    /// Read a property value
    ///
    /// Ready values are returned directly. An unset lazy property invokes
    /// its getter exactly once, validates and memoizes the result. An unset
    /// property with a default returns the default without storing it.
    /// Otherwise the read fails: [`PropertyError::NotInitialized`] when the
    /// property is required, [`PropertyError::NotSet`] when optional.
    pub fn get(&mut self, name: &str) -> Result<Value, PropertyError> {
        self.ensure_declared(name)?;

        enum Resolution {
            Ready(Value),
            Reentrant,
            Lazy(LazyGetter),
            Default(Value),
            Missing { required: bool },
        }

        let resolution = {
            let property = match self.properties.get_mut(name) {
                Some(property) => property,
                None => {
                    return Err(PropertyError::NotDeclared {
                        name: name.to_string(),
                    })
                }
            };
            match &property.slot {
                ValueSlot::Ready(value) => Resolution::Ready(value.clone()),
                ValueSlot::Computing => Resolution::Reentrant,
                ValueSlot::Unset => {
                    if let Some(getter) = property.getter.take() {
                        property.slot = ValueSlot::Computing;
                        Resolution::Lazy(getter)
                    } else if let Some(default) = property.default().cloned() {
                        Resolution::Default(default)
                    } else {
                        Resolution::Missing {
                            required: property.is_required(),
                        }
                    }
                }
            }
        };

        match resolution {
            Resolution::Ready(value) => Ok(value),
            Resolution::Default(value) => Ok(value),
            Resolution::Reentrant => Err(PropertyError::ReentrantResolution {
                name: name.to_string(),
            }),
            Resolution::Missing { required } => {
                if required {
                    Err(PropertyError::NotInitialized {
                        name: name.to_string(),
                    })
                } else {
                    Err(PropertyError::NotSet {
                        name: name.to_string(),
                    })
                }
            }
            Resolution::Lazy(getter) => self.resolve_lazy(name, getter),
        }
    }

    /// Clear a property value
    ///
    /// Required properties cannot be unset. Subsequent reads of an optional
    /// unset property see its declared default again.
    pub fn unset(&mut self, name: &str) -> Result<(), PropertyError> {
        let finalized = self.finalized;
        let owner = &self.owner;
        let property = match self.properties.get_mut(name) {
            Some(property) => property,
            None => {
                return Err(PropertyError::NotDeclared {
                    name: name.to_string(),
                })
            }
        };

        if property.is_required() {
            return Err(PropertyError::CannotUnsetRequired {
                name: name.to_string(),
            });
        }
        if finalized && !property.is_mutable() {
            return Err(PropertyError::Finalized {
                owner: owner.clone(),
                name: name.to_string(),
            });
        }

        property.slot = ValueSlot::Unset;
        Ok(())
    }

    /// Apply a bag of values, visiting names in sorted order
    pub fn apply(&mut self, values: HashMap<String, Value>) -> Result<(), PropertyError> {
        let mut names: Vec<&String> = values.keys().collect();
        names.sort();
        let names: Vec<String> = names.into_iter().cloned().collect();
        for name in names {
            let value = match values.get(&name) {
                Some(value) => value.clone(),
                None => continue,
            };
            self.set(&name, value)?;
        }
        Ok(())
    }

    /// Finalize the owner's construction
    ///
    /// Every required property must be satisfiable: holding a value,
    /// declaring a default, or carrying a pending lazy getter. Missing
    /// properties are reported together, in declaration order. Idempotent.
    pub fn finalize(&mut self) -> Result<(), PropertyError> {
        if self.finalized {
            return Ok(());
        }

        let missing: Vec<String> = self
            .order
            .iter()
            .filter(|name| {
                self.properties
                    .get(name.as_str())
                    .map(|p| p.is_required() && !p.is_satisfiable())
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(PropertyError::MissingRequired {
                owner: self.owner.clone(),
                names: missing,
            });
        }

        self.finalized = true;
        Ok(())
    }

    /// Whether [`finalize`](Self::finalize) has completed
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Declared property names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Look up a property descriptor
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Number of declared properties
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no properties are declared
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn ensure_declared(&mut self, name: &str) -> Result<(), PropertyError> {
        if self.properties.contains_key(name) {
            return Ok(());
        }

        let materialized = match &self.fallback {
            Some(fallback) => fallback(name),
            None => None,
        };
        if let Some(property) = materialized {
            if property.name() == name {
                tracing::debug!(
                    owner = %self.owner,
                    property = %name,
                    "property materialized by fallback builder"
                );
                return self.declare(property);
            }
        }

        Err(PropertyError::NotDeclared {
            name: name.to_string(),
        })
    }

    fn resolve_lazy(&mut self, name: &str, getter: LazyGetter) -> Result<Value, PropertyError> {
        let computed = getter(self);

        let outcome = computed.and_then(|raw| {
            let rules = match self.properties.get(name) {
                Some(property) => property.rules(),
                None => {
                    return Err(PropertyError::NotDeclared {
                        name: name.to_string(),
                    })
                }
            };
            rules
                .check(&raw)
                .map_err(|reason| PropertyError::CoercionFailed {
                    name: name.to_string(),
                    value: raw.clone(),
                    reason,
                })
        });

        match outcome {
            Ok(value) => {
                if let Some(property) = self.properties.get_mut(name) {
                    property.slot = ValueSlot::Ready(value.clone());
                }
                Ok(value)
            }
            Err(error) => {
                // Leave the slot unset and restore the getter so the
                // failure is observable without wedging the property.
                if let Some(property) = self.properties.get_mut(name) {
                    property.slot = ValueSlot::Unset;
                    property.getter = Some(getter);
                }
                Err(error)
            }
        }
    }
}

impl fmt::Debug for PropertyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyManager")
            .field("owner", &self.owner)
            .field("properties", &self.order)
            .field("finalized", &self.finalized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn manager() -> PropertyManager {
        PropertyManager::new("test owner")
    }

    #[test]
    fn test_declare_and_set() {
        let mut props = manager();
        props.declare(Property::text("title")).unwrap();
        props.set("title", "Hello").unwrap();
        assert_eq!(props.get("title").unwrap(), Value::text("Hello"));
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let mut props = manager();
        props.declare(Property::new("name")).unwrap();
        let err = props.declare(Property::new("name")).unwrap_err();
        assert_matches!(err, PropertyError::AlreadyDeclared { name } if name == "name");
    }

    #[test]
    fn test_set_undeclared_rejected() {
        let mut props = manager();
        assert_matches!(
            props.set("ghost", 1i64),
            Err(PropertyError::NotDeclared { name }) if name == "ghost"
        );
    }

    #[test]
    fn test_coercion_failure_leaves_prior_value() {
        let mut props = manager();
        props.declare(Property::text("label")).unwrap();
        props.set("label", "first").unwrap();

        let err = props.set("label", 42i64).unwrap_err();
        assert_matches!(err, PropertyError::CoercionFailed { .. });
        assert_eq!(props.get("label").unwrap(), Value::text("first"));
    }

    #[test]
    fn test_coercion_failure_leaves_unset_state() {
        let mut props = manager();
        props.declare(Property::integer("count")).unwrap();

        assert!(props.set("count", "nope").is_err());
        assert_eq!(
            props.property("count").unwrap().state(),
            PropertyState::Unset
        );
    }

    #[test]
    fn test_default_returned_for_unset_optional() {
        let mut props = manager();
        props
            .declare(Property::text("encoding").default_value("hex"))
            .unwrap();
        assert_eq!(props.get("encoding").unwrap(), Value::text("hex"));
    }

    #[test]
    fn test_required_read_before_initialization() {
        let mut props = manager();
        props.declare(Property::text("format").required(true)).unwrap();
        assert_matches!(
            props.get("format"),
            Err(PropertyError::NotInitialized { name }) if name == "format"
        );
    }

    #[test]
    fn test_optional_without_default_read() {
        let mut props = manager();
        props.declare(Property::text("note")).unwrap();
        assert_matches!(props.get("note"), Err(PropertyError::NotSet { .. }));
    }

    #[test]
    fn test_lazy_getter_runs_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&calls);

        let mut props = manager();
        props
            .declare(Property::new("expensive").lazy(move |_| {
                observed.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Int(99))
            }))
            .unwrap();

        for _ in 0..5 {
            assert_eq!(props.get("expensive").unwrap(), Value::Int(99));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            props.property("expensive").unwrap().state(),
            PropertyState::Ready
        );
    }

    #[test]
    fn test_lazy_getter_may_read_siblings() {
        let mut props = manager();
        props.declare(Property::integer("base")).unwrap();
        props
            .declare(Property::new("derived").lazy(|owner| {
                let base = owner.get("base")?;
                Ok(Value::Int(base.as_int().unwrap_or(0) * 2))
            }))
            .unwrap();

        props.set("base", 21i64).unwrap();
        assert_eq!(props.get("derived").unwrap(), Value::Int(42));
    }

    #[test]
    fn test_reentrant_lazy_resolution_detected() {
        let mut props = manager();
        props
            .declare(Property::new("loop").lazy(|owner| owner.get("loop")))
            .unwrap();

        assert_matches!(
            props.get("loop"),
            Err(PropertyError::ReentrantResolution { name }) if name == "loop"
        );
    }

    #[test]
    fn test_lazy_failure_leaves_property_usable() {
        let mut props = manager();
        props
            .declare(
                Property::integer("checked").lazy(|_| Ok(Value::text("wrong kind"))),
            )
            .unwrap();

        assert_matches!(
            props.get("checked"),
            Err(PropertyError::CoercionFailed { .. })
        );
        assert_eq!(
            props.property("checked").unwrap().state(),
            PropertyState::Unset
        );
        assert!(props.property("checked").unwrap().is_lazy());
    }

    #[test]
    fn test_unset_required_rejected() {
        let mut props = manager();
        props
            .declare(Property::text("format").required(true))
            .unwrap();
        props.set("format", "%Y").unwrap();

        assert_matches!(
            props.unset("format"),
            Err(PropertyError::CannotUnsetRequired { name }) if name == "format"
        );
        assert_eq!(props.get("format").unwrap(), Value::text("%Y"));
    }

    #[test]
    fn test_unset_optional_restores_default() {
        let mut props = manager();
        props
            .declare(Property::text("encoding").default_value("hex"))
            .unwrap();
        props.set("encoding", "base64").unwrap();
        assert_eq!(props.get("encoding").unwrap(), Value::text("base64"));

        props.unset("encoding").unwrap();
        assert_eq!(props.get("encoding").unwrap(), Value::text("hex"));
    }

    #[test]
    fn test_finalize_reports_missing_required_in_order() {
        let mut props = manager();
        props.declare(Property::text("first").required(true)).unwrap();
        props.declare(Property::text("middle")).unwrap();
        props.declare(Property::text("last").required(true)).unwrap();

        let err = props.finalize().unwrap_err();
        assert_matches!(
            err,
            PropertyError::MissingRequired { names, .. }
                if names == vec!["first".to_string(), "last".to_string()]
        );
        assert!(!props.is_finalized());
    }

    #[test]
    fn test_finalize_accepts_defaults_and_lazy() {
        let mut props = manager();
        props
            .declare(Property::text("with_default").required(true).default_value("d"))
            .unwrap();
        props
            .declare(Property::new("lazy").required(true).lazy(|_| Ok(Value::Int(1))))
            .unwrap();

        props.finalize().unwrap();
        assert!(props.is_finalized());
        // Finalize is idempotent
        props.finalize().unwrap();
    }

    #[test]
    fn test_finalized_rejects_writes() {
        let mut props = manager();
        props.declare(Property::text("fixed")).unwrap();
        props.declare(Property::text("tweakable").mutable(true)).unwrap();
        props.set("fixed", "before").unwrap();
        props.finalize().unwrap();

        assert_matches!(
            props.set("fixed", "after"),
            Err(PropertyError::Finalized { .. })
        );
        props.set("tweakable", "still fine").unwrap();

        assert_matches!(
            props.declare(Property::new("late")),
            Err(PropertyError::Finalized { .. })
        );
    }

    #[test]
    fn test_fallback_builder_materializes_properties() {
        let mut props = PropertyManager::new("options").with_fallback(|name| {
            name.starts_with("x_").then(|| Property::text(name))
        });

        props.set("x_custom", "value").unwrap();
        assert_eq!(props.get("x_custom").unwrap(), Value::text("value"));

        assert_matches!(
            props.set("unknown", "value"),
            Err(PropertyError::NotDeclared { .. })
        );
    }

    #[test]
    fn test_apply_visits_sorted_names() {
        let mut props = manager();
        props.declare(Property::text("a")).unwrap();
        props.declare(Property::text("b")).unwrap();

        let mut bag = HashMap::new();
        bag.insert("b".to_string(), Value::text("2"));
        bag.insert("a".to_string(), Value::text("1"));
        props.apply(bag).unwrap();

        assert_eq!(props.get("a").unwrap(), Value::text("1"));
        assert_eq!(props.get("b").unwrap(), Value::text("2"));
    }

    #[test]
    fn test_declaration_limit() {
        let mut props = manager();
        for i in 0..MAX_PROPERTIES_PER_OWNER {
            props.declare(Property::new(format!("p{i}"))).unwrap();
        }
        assert_matches!(
            props.declare(Property::new("overflow")),
            Err(PropertyError::LimitExceeded { .. })
        );
    }

    #[test]
    fn test_names_in_declaration_order() {
        let mut props = manager();
        props.declare(Property::new("z")).unwrap();
        props.declare(Property::new("a")).unwrap();
        props.declare(Property::new("m")).unwrap();
        assert_eq!(props.names(), vec!["z", "a", "m"]);
    }
}
