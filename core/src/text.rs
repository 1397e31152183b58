//! Text utilities
//!
//! Message templating with `{{placeholder}}` substitution, plus helpers for
//! turning identifiers into display-friendly names. Error messages across the
//! framework expose named placeholders and are rendered here.

use std::collections::HashMap;

/// Named placeholder values for template rendering
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    values: HashMap<String, String>,
}

impl Placeholders {
    /// Create an empty placeholder set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a placeholder value
    pub fn set<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Look up a placeholder value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }
}

/// Render a template, substituting `{{name}}` placeholders
///
/// Placeholders without a bound value are left intact so the gap is visible
/// in the rendered output rather than silently erased.
pub fn render(template: &str, placeholders: &Placeholders) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let key = after_open[..end].trim();
                match placeholders.get(key) {
                    Some(value) => output.push_str(value),
                    None => {
                        output.push_str("{{");
                        output.push_str(&after_open[..end]);
                        output.push_str("}}");
                    }
                }
                rest = &after_open[end + 2..];
            }
            None => {
                // Unterminated opener, emit verbatim
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    output.push_str(rest);
    output
}

/// Convert an identifier to a display-friendly name
///
/// Converts snake_case and kebab-case identifiers to Title Case.
/// Examples: "date_format" -> "Date Format", "URL-check" -> "URL Check"
pub fn display_name(identifier: &str) -> String {
    identifier
        .replace('_', " ")
        .replace('-', " ")
        .split_whitespace()
        .map(|word| {
            if word.to_uppercase() == word && word.len() <= 4 {
                // Keep acronyms like "URL", "API" uppercase
                word.to_uppercase()
            } else {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.as_str().to_lowercase().chars())
                        .collect(),
                }
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Truncate a string for display, appending an ellipsis when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
