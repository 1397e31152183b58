//! Built-in prototypes
//!
//! Ready-made filter and constraint prototypes registered by
//! [`Factory::with_builtins`](super::Factory::with_builtins). Each one is a
//! small strategy object; applications register their own prototypes the
//! same way.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use url::Url;

use crate::component::factory::{Builder, FnBuilder};
use crate::component::prototype::{
    Capability, CheckValue, DeclareProperties, FailureMessage, Prioritized, ProcessValue,
    Prototype, Stringify, Subtyped,
};
use crate::enums::Enumeration;
use crate::error::{FrameworkResult, PropertyError};
use crate::props::{Property, PropertyManager, Validation, Value, ValueKind};
use crate::utils::time;

/// Builders for every built-in prototype, keyed by identifier
pub(crate) fn builders() -> Vec<(&'static str, Box<dyn Builder>)> {
    vec![
        ("hash", Box::new(FnBuilder(build_hash)) as Box<dyn Builder>),
        ("date_format", Box::new(FnBuilder(build_date_format))),
        ("slug", Box::new(FnBuilder(build_slug))),
        ("non_empty", Box::new(FnBuilder(build_non_empty))),
        ("url", Box::new(FnBuilder(build_url))),
        ("range", Box::new(FnBuilder(build_range))),
    ]
}

fn reject_unknown(prototype_properties: &HashMap<String, Value>) -> FrameworkResult<()> {
    let mut names: Vec<&String> = prototype_properties.keys().collect();
    names.sort();
    if let Some(name) = names.first() {
        return Err(PropertyError::NotDeclared {
            name: (*name).clone(),
        }
        .into());
    }
    Ok(())
}

fn build_hash(prototype_properties: HashMap<String, Value>) -> FrameworkResult<Box<dyn Prototype>> {
    reject_unknown(&prototype_properties)?;
    Ok(Box::new(HashFilter))
}

fn build_date_format(
    prototype_properties: HashMap<String, Value>,
) -> FrameworkResult<Box<dyn Prototype>> {
    reject_unknown(&prototype_properties)?;
    Ok(Box::new(DateFormatFilter))
}

fn build_slug(
    mut prototype_properties: HashMap<String, Value>,
) -> FrameworkResult<Box<dyn Prototype>> {
    let separator = match prototype_properties.remove("separator") {
        Some(Value::Text(separator)) => separator,
        Some(other) => {
            return Err(PropertyError::CoercionFailed {
                name: "separator".to_string(),
                value: other,
                reason: "expected text".to_string(),
            }
            .into())
        }
        None => "_".to_string(),
    };
    reject_unknown(&prototype_properties)?;
    Ok(Box::new(SlugFilter { separator }))
}

fn build_non_empty(
    prototype_properties: HashMap<String, Value>,
) -> FrameworkResult<Box<dyn Prototype>> {
    reject_unknown(&prototype_properties)?;
    Ok(Box::new(NonEmptyConstraint))
}

fn build_url(prototype_properties: HashMap<String, Value>) -> FrameworkResult<Box<dyn Prototype>> {
    reject_unknown(&prototype_properties)?;
    Ok(Box::new(UrlConstraint))
}

fn build_range(
    prototype_properties: HashMap<String, Value>,
) -> FrameworkResult<Box<dyn Prototype>> {
    reject_unknown(&prototype_properties)?;
    Ok(Box::new(RangeConstraint))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Digests text values with a configurable algorithm and output encoding
pub struct HashFilter;

impl Prototype for HashFilter {
    fn name(&self) -> &str {
        "hash"
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![
            Capability::ProcessValue,
            Capability::Properties,
            Capability::FailureMessage,
            Capability::Stringify,
        ]
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_processor(&self) -> Option<&dyn ProcessValue> {
        Some(self)
    }

    fn as_declaring(&self) -> Option<&dyn DeclareProperties> {
        Some(self)
    }

    fn as_failure_message(&self) -> Option<&dyn FailureMessage> {
        Some(self)
    }

    fn as_stringify(&self) -> Option<&dyn Stringify> {
        Some(self)
    }
}

impl DeclareProperties for HashFilter {
    fn declare_properties(&self, properties: &mut PropertyManager) -> Result<(), PropertyError> {
        properties.declare(
            Property::new("algorithm")
                .validation(
                    Validation::new()
                        .kind(ValueKind::Text)
                        .one_of(Enumeration::with_members("hash_algorithm", ["sha1", "sha256"])),
                )
                .default_value("sha256"),
        )?;
        properties.declare(
            Property::new("encoding")
                .validation(
                    Validation::new()
                        .kind(ValueKind::Text)
                        .one_of(Enumeration::with_members("hash_encoding", ["hex", "base64"])),
                )
                .default_value("hex"),
        )
    }
}

impl ProcessValue for HashFilter {
    fn process(&self, value: &mut Value, properties: &mut PropertyManager) -> bool {
        let text = match value.as_text() {
            Some(text) => text.to_string(),
            None => return false,
        };

        let algorithm = match properties.get("algorithm").ok().and_then(|v| match v {
            Value::Text(a) => Some(a),
            _ => None,
        }) {
            Some(algorithm) => algorithm,
            None => return false,
        };
        let encoding = match properties.get("encoding").ok().and_then(|v| match v {
            Value::Text(e) => Some(e),
            _ => None,
        }) {
            Some(encoding) => encoding,
            None => return false,
        };

        let digest: Vec<u8> = match algorithm.as_str() {
            "sha1" => {
                let mut hasher = Sha1::new();
                hasher.update(text.as_bytes());
                hasher.finalize().to_vec()
            }
            "sha256" => {
                let mut hasher = Sha256::new();
                hasher.update(text.as_bytes());
                hasher.finalize().to_vec()
            }
            _ => return false,
        };

        let encoded = match encoding.as_str() {
            "hex" => hex_encode(&digest),
            "base64" => BASE64.encode(&digest),
            _ => return false,
        };

        *value = Value::Text(encoded);
        true
    }
}

impl FailureMessage for HashFilter {
    fn failure_message(&self) -> String {
        "prototype {{prototype}} can only digest text values (got {{value}})".to_string()
    }
}

impl Stringify for HashFilter {
    fn stringify(&self) -> String {
        "hash digest (sha-1 or sha-256, hex or base64 output)".to_string()
    }
}

/// Formats integer Unix timestamps with a required format string
pub struct DateFormatFilter;

impl Prototype for DateFormatFilter {
    fn name(&self) -> &str {
        "date_format"
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![
            Capability::ProcessValue,
            Capability::Properties,
            Capability::FailureMessage,
            Capability::Subtype,
        ]
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_processor(&self) -> Option<&dyn ProcessValue> {
        Some(self)
    }

    fn as_declaring(&self) -> Option<&dyn DeclareProperties> {
        Some(self)
    }

    fn as_failure_message(&self) -> Option<&dyn FailureMessage> {
        Some(self)
    }

    fn as_subtyped(&self) -> Option<&dyn Subtyped> {
        Some(self)
    }
}

impl DeclareProperties for DateFormatFilter {
    fn declare_properties(&self, properties: &mut PropertyManager) -> Result<(), PropertyError> {
        properties.declare(
            Property::new("format")
                .required(true)
                .validation(Validation::new().kind(ValueKind::Text).non_empty()),
        )
    }
}

impl ProcessValue for DateFormatFilter {
    fn process(&self, value: &mut Value, properties: &mut PropertyManager) -> bool {
        let timestamp = match value.as_int() {
            Some(timestamp) => timestamp,
            None => return false,
        };
        let format = match properties.get("format").ok().and_then(|v| match v {
            Value::Text(f) => Some(f),
            _ => None,
        }) {
            Some(format) => format,
            None => return false,
        };

        match time::format_timestamp(timestamp, &format) {
            Ok(rendered) => {
                *value = Value::Text(rendered);
                true
            }
            Err(_) => false,
        }
    }
}

impl FailureMessage for DateFormatFilter {
    fn failure_message(&self) -> String {
        "prototype {{prototype}} expects an integer Unix timestamp (got {{value}})".to_string()
    }
}

impl Subtyped for DateFormatFilter {
    fn subtype(&self) -> &str {
        "timestamp"
    }
}

/// Sanitizes text into identifier-safe form
///
/// Characters outside `[A-Za-z0-9_-]` are replaced with the configured
/// separator.
pub struct SlugFilter {
    separator: String,
}

impl SlugFilter {
    pub fn new() -> Self {
        Self {
            separator: "_".to_string(),
        }
    }

    pub fn with_separator<S: Into<String>>(separator: S) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for SlugFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prototype for SlugFilter {
    fn name(&self) -> &str {
        "slug"
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![Capability::ProcessValue, Capability::Stringify]
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_processor(&self) -> Option<&dyn ProcessValue> {
        Some(self)
    }

    fn as_stringify(&self) -> Option<&dyn Stringify> {
        Some(self)
    }
}

impl ProcessValue for SlugFilter {
    fn process(&self, value: &mut Value, _properties: &mut PropertyManager) -> bool {
        let text = match value.as_text() {
            Some(text) => text,
            None => return false,
        };

        let mut sanitized = String::with_capacity(text.len());
        for c in text.chars() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                sanitized.push(c);
            } else {
                sanitized.push_str(&self.separator);
            }
        }

        *value = Value::Text(sanitized);
        true
    }
}

impl Stringify for SlugFilter {
    fn stringify(&self) -> String {
        format!("slug filter (separator {:?})", self.separator)
    }
}

/// Rejects empty text, lists, and maps
pub struct NonEmptyConstraint;

impl Prototype for NonEmptyConstraint {
    fn name(&self) -> &str {
        "non_empty"
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![
            Capability::CheckValue,
            Capability::FailureMessage,
            Capability::Priority,
        ]
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_checker(&self) -> Option<&dyn CheckValue> {
        Some(self)
    }

    fn as_failure_message(&self) -> Option<&dyn FailureMessage> {
        Some(self)
    }

    fn as_prioritized(&self) -> Option<&dyn Prioritized> {
        Some(self)
    }
}

impl CheckValue for NonEmptyConstraint {
    fn check(&self, value: &Value, _properties: &mut PropertyManager) -> bool {
        !value.is_empty()
    }
}

impl FailureMessage for NonEmptyConstraint {
    fn failure_message(&self) -> String {
        "value must not be empty".to_string()
    }
}

impl Prioritized for NonEmptyConstraint {
    fn priority(&self) -> i32 {
        // Cheap check, runs before more expensive constraints
        100
    }
}

/// Validates URLs, optionally restricted to a scheme list
pub struct UrlConstraint;

impl Prototype for UrlConstraint {
    fn name(&self) -> &str {
        "url"
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![
            Capability::CheckValue,
            Capability::Properties,
            Capability::FailureMessage,
            Capability::Subtype,
        ]
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_checker(&self) -> Option<&dyn CheckValue> {
        Some(self)
    }

    fn as_declaring(&self) -> Option<&dyn DeclareProperties> {
        Some(self)
    }

    fn as_failure_message(&self) -> Option<&dyn FailureMessage> {
        Some(self)
    }

    fn as_subtyped(&self) -> Option<&dyn Subtyped> {
        Some(self)
    }
}

impl DeclareProperties for UrlConstraint {
    fn declare_properties(&self, properties: &mut PropertyManager) -> Result<(), PropertyError> {
        properties.declare(
            Property::new("schemes").validation(Validation::new().kind(ValueKind::List)),
        )
    }
}

impl CheckValue for UrlConstraint {
    fn check(&self, value: &Value, properties: &mut PropertyManager) -> bool {
        let text = match value.as_text() {
            Some(text) => text,
            None => return false,
        };
        let parsed = match Url::parse(text) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        match properties.get("schemes") {
            Ok(Value::List(schemes)) => schemes
                .iter()
                .any(|scheme| scheme.as_text() == Some(parsed.scheme())),
            Ok(_) => false,
            Err(PropertyError::NotSet { .. }) => true,
            Err(_) => false,
        }
    }
}

impl FailureMessage for UrlConstraint {
    fn failure_message(&self) -> String {
        "{{value}} is not an acceptable URL".to_string()
    }
}

impl Subtyped for UrlConstraint {
    fn subtype(&self) -> &str {
        "text"
    }
}

fn numeric_only(value: &Value) -> Result<Value, String> {
    match value {
        Value::Int(_) | Value::Float(_) => Ok(value.clone()),
        other => Err(format!(
            "expected a numeric value, got {}",
            other.kind().display_name()
        )),
    }
}

/// Checks numeric values against optional `min` / `max` bounds
pub struct RangeConstraint;

impl Prototype for RangeConstraint {
    fn name(&self) -> &str {
        "range"
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![
            Capability::CheckValue,
            Capability::Properties,
            Capability::FailureMessage,
        ]
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_checker(&self) -> Option<&dyn CheckValue> {
        Some(self)
    }

    fn as_declaring(&self) -> Option<&dyn DeclareProperties> {
        Some(self)
    }

    fn as_failure_message(&self) -> Option<&dyn FailureMessage> {
        Some(self)
    }
}

impl DeclareProperties for RangeConstraint {
    fn declare_properties(&self, properties: &mut PropertyManager) -> Result<(), PropertyError> {
        properties
            .declare(Property::new("min").validation(Validation::new().evaluator(numeric_only)))?;
        properties
            .declare(Property::new("max").validation(Validation::new().evaluator(numeric_only)))
    }
}

impl CheckValue for RangeConstraint {
    fn check(&self, value: &Value, properties: &mut PropertyManager) -> bool {
        let number = match value.as_float() {
            Some(number) => number,
            None => return false,
        };

        for (bound, below) in [("min", true), ("max", false)] {
            match properties.get(bound) {
                Ok(limit) => match limit.as_float() {
                    Some(limit) if below && number < limit => return false,
                    Some(limit) if !below && number > limit => return false,
                    Some(_) => {}
                    None => return false,
                },
                Err(PropertyError::NotSet { .. }) => {}
                Err(_) => return false,
            }
        }

        true
    }
}

impl FailureMessage for RangeConstraint {
    fn failure_message(&self) -> String {
        "value {{value}} is outside the configured range".to_string()
    }
}
