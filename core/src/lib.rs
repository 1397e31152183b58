//! Armature Core Library
//!
//! This crate contains the component, prototype, and property scaffolding
//! used to build extensible applications: swappable strategy objects
//! (prototypes) wrapped by stable components, validated property sets with
//! eager and lazy resolution, enumerations, options objects, and the
//! factory indirection that assembles it all.
//!
//! # Features
//!
//! - **Property system**: named, typed, optionally-required value slots
//!   with validation chains and memoized lazy resolution
//! - **Components**: stable facades delegating behavior to prototypes
//!   probed for optional capabilities at runtime
//! - **Factory**: an explicit builder registry mapping identifiers to
//!   construction strategies
//! - **Options**: degenerate components for call-site configuration
//! - **Utilities**: enumerations, message templating, timestamp and URL
//!   helpers
//!
//! # Usage
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use armature_core::component::Factory;
//! use armature_core::props::Value;
//!
//! let factory = Factory::with_builtins();
//!
//! let mut properties = HashMap::new();
//! properties.insert("format".to_string(), Value::text("%Y-%m-%d"));
//!
//! let mut filter = factory
//!     .filter("date_format", properties, HashMap::new())
//!     .expect("date_format is a built-in prototype");
//!
//! let formatted = filter.filter(Value::Int(0)).expect("integer timestamps format");
//! assert_eq!(formatted, Value::text("1970-01-01"));
//! ```

pub mod component;
pub mod config;
pub mod enums;
pub mod error;
pub mod logging;
pub mod options;
pub mod props;
pub mod text;
pub mod utils;

// Re-export commonly used types for convenience
pub use component::{
    Builder, Capability, Component, Constraint, Factory, Filter, FnBuilder, Prototype,
};
pub use enums::Enumeration;
pub use error::{
    EnumError, FrameworkError, FrameworkResult, ProcessError, PropertyError,
};
pub use options::{Options, OptionsBuilder};
pub use props::{
    Property, PropertyManager, PropertyState, Validation, Value, ValueKind,
};
pub use text::Placeholders;

// Re-export config functionality
pub use config::{FrameworkConfig, LimitSettings, LoggingSettings};

// Re-export logging functionality
pub use logging::{init_default_logging, init_logging, LogFormat, LogLevel, LoggingConfig};

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library constants
pub mod constants {
    /// Maximum number of properties one owner may declare
    pub const MAX_PROPERTIES_PER_OWNER: usize = 100;

    /// Maximum text value length accepted by validation (1MB)
    pub const MAX_TEXT_LENGTH: usize = 1024 * 1024;

    /// Identifiers of the prototypes registered by
    /// [`Factory::with_builtins`](crate::component::Factory::with_builtins)
    pub const BUILTIN_PROTOTYPES: &[&str] =
        &["date_format", "hash", "non_empty", "range", "slug", "url"];
}
