//! Validation rules for property values
//!
//! A [`Validation`] describes the constraint chain a value must pass before
//! it is stored in a property slot: kind bound, enumeration membership,
//! length bounds, regex pattern, and custom evaluator functions. Evaluators
//! may coerce the value; the chained result is what gets stored.

use crate::constants::MAX_TEXT_LENGTH;
use crate::enums::Enumeration;
use crate::props::value::{Value, ValueKind};

/// A custom evaluation step; may coerce the value or reject it with a reason
pub type Evaluator = fn(&Value) -> Result<Value, String>;

/// Validation rules applied when a property value is set or computed
#[derive(Debug, Clone, Default)]
pub struct Validation {
    /// Required value kind
    kind: Option<ValueKind>,

    /// Enumeration the text value must be a member of
    one_of: Option<Enumeration>,

    /// Minimum length requirement (text characters or list items)
    min_length: Option<usize>,

    /// Maximum length requirement (text characters or list items)
    max_length: Option<usize>,

    /// Regex pattern for text values
    pattern: Option<String>,

    /// Whether empty values are rejected
    non_empty: bool,

    /// Custom evaluator chain, run in declaration order
    evaluators: Vec<Evaluator>,

    /// Custom rejection message overriding the generated one
    message: Option<String>,
}

impl Validation {
    /// Create an empty validation accepting any value
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a specific value kind
    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Require text values to be members of an enumeration
    pub fn one_of(mut self, enumeration: Enumeration) -> Self {
        self.one_of = Some(enumeration);
        self
    }

    /// Set minimum length requirement
    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    /// Set maximum length requirement
    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Set regex pattern requirement for text values
    pub fn pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Reject empty text, lists, and maps
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    /// Append a custom evaluator to the chain
    pub fn evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluators.push(evaluator);
        self
    }

    /// Set a custom rejection message
    pub fn message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Run the full chain against a value
    ///
    /// Returns the (possibly coerced) value to store, or the rejection
    /// reason. The input is never mutated.
    pub fn check(&self, value: &Value) -> Result<Value, String> {
        self.check_inner(value).map_err(|reason| {
            self.message.clone().unwrap_or(reason)
        })
    }

    fn check_inner(&self, value: &Value) -> Result<Value, String> {
        if let Some(expected) = self.kind {
            if value.kind() != expected {
                return Err(format!(
                    "expected {}, got {}",
                    expected.display_name(),
                    value.kind().display_name()
                ));
            }
        }

        if self.non_empty && value.is_empty() {
            return Err("must not be empty".to_string());
        }

        if let Value::Text(text) = value {
            if text.len() > MAX_TEXT_LENGTH {
                return Err(format!(
                    "must be no more than {MAX_TEXT_LENGTH} bytes long"
                ));
            }
        }

        if let Some(length) = self.measure(value) {
            if let Some(min) = self.min_length {
                if length < min {
                    return Err(format!("must be at least {min} long"));
                }
            }
            if let Some(max) = self.max_length {
                if length > max {
                    return Err(format!("must be no more than {max} long"));
                }
            }
        }

        if let Some(pattern) = &self.pattern {
            let text = value
                .as_text()
                .ok_or_else(|| "pattern applies to text values only".to_string())?;
            let regex = regex::Regex::new(pattern)
                .map_err(|e| format!("invalid pattern '{pattern}': {e}"))?;
            if !regex.is_match(text) {
                return Err("invalid format".to_string());
            }
        }

        if let Some(enumeration) = &self.one_of {
            let text = value
                .as_text()
                .ok_or_else(|| "enumeration membership applies to text values only".to_string())?;
            enumeration.require(text).map_err(|e| e.to_string())?;
        }

        let mut current = value.clone();
        for evaluator in &self.evaluators {
            current = evaluator(&current)?;
        }

        Ok(current)
    }

    fn measure(&self, value: &Value) -> Option<usize> {
        match value {
            Value::Text(text) => Some(text.chars().count()),
            Value::List(items) => Some(items.len()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_bound() {
        let validation = Validation::new().kind(ValueKind::Text);
        assert!(validation.check(&Value::text("ok")).is_ok());

        let err = validation.check(&Value::Int(3)).unwrap_err();
        assert_eq!(err, "expected text, got integer");
    }

    #[test]
    fn test_length_and_pattern() {
        let validation = Validation::new()
            .min_length(3)
            .max_length(10)
            .pattern(r"^[a-zA-Z]+$")
            .message("Custom error");

        assert!(validation.check(&Value::text("hello")).is_ok());
        assert_eq!(
            validation.check(&Value::text("hi")).unwrap_err(),
            "Custom error"
        );
        assert!(validation.check(&Value::text("verylongtext")).is_err());
        assert!(validation.check(&Value::text("hello123")).is_err());
    }

    #[test]
    fn test_non_empty() {
        let validation = Validation::new().non_empty();
        assert!(validation.check(&Value::text("")).is_err());
        assert!(validation.check(&Value::text("  ")).is_err());
        assert!(validation.check(&Value::text("x")).is_ok());
        assert!(validation.check(&Value::Int(0)).is_ok());
    }

    #[test]
    fn test_enumeration_membership() {
        let validation = Validation::new()
            .one_of(Enumeration::with_members("encoding", ["hex", "base64"]));

        assert!(validation.check(&Value::text("hex")).is_ok());
        let err = validation.check(&Value::text("binary")).unwrap_err();
        assert!(err.contains("encoding"));
    }

    #[test]
    fn test_evaluator_coercion() {
        fn lowercase(value: &Value) -> Result<Value, String> {
            match value {
                Value::Text(t) => Ok(Value::text(t.to_lowercase())),
                _ => Err("expected text".to_string()),
            }
        }

        let validation = Validation::new().evaluator(lowercase);
        assert_eq!(
            validation.check(&Value::text("MiXeD")).unwrap(),
            Value::text("mixed")
        );
    }

    #[test]
    fn test_evaluator_chain_order() {
        fn double(value: &Value) -> Result<Value, String> {
            match value {
                Value::Int(i) => Ok(Value::Int(i * 2)),
                _ => Err("expected integer".to_string()),
            }
        }
        fn add_one(value: &Value) -> Result<Value, String> {
            match value {
                Value::Int(i) => Ok(Value::Int(i + 1)),
                _ => Err("expected integer".to_string()),
            }
        }

        let validation = Validation::new().evaluator(double).evaluator(add_one);
        assert_eq!(validation.check(&Value::Int(5)).unwrap(), Value::Int(11));
    }

    #[test]
    fn test_list_length() {
        let validation = Validation::new().kind(ValueKind::List).max_length(2);
        assert!(validation.check(&Value::from(vec![1i64, 2])).is_ok());
        assert!(validation.check(&Value::from(vec![1i64, 2, 3])).is_err());
    }

    #[test]
    fn test_oversized_text_rejected() {
        let validation = Validation::new();
        let oversized = Value::text("a".repeat(MAX_TEXT_LENGTH + 1));
        assert!(validation.check(&oversized).is_err());
    }
}
