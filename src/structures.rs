//! Structure descriptors for constructs to be created
//!
//! A structure is a plain data value describing one construct the caller
//! wants inserted into a document. Structures carry no identity and no
//! position: they exist only as input to the structured text writer, and are
//! discarded after an insertion call.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ATTRIBUTE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.:-]*$").expect("attribute name pattern is valid")
});

/// Check whether a string is a lexically valid attribute name.
///
/// Advisory only: the engine does not validate descriptors up front (a bad
/// name surfaces as a failed re-parse after the splice), but callers can use
/// this to reject input before mutating a document.
pub fn is_valid_attribute_name(name: &str) -> bool {
    ATTRIBUTE_NAME.is_match(name)
}

/// Describes one attribute to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeStructure {
    /// Attribute name
    pub name: String,
    /// Optional initializer text, delimiters included (`"red"` or `{count}`)
    pub initializer: Option<String>,
}

impl AttributeStructure {
    /// Create a descriptor for a bare attribute (no initializer)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initializer: None,
        }
    }

    /// Attach a double-quoted string initializer
    pub fn with_string_value(mut self, value: impl AsRef<str>) -> Self {
        self.initializer = Some(format!("\"{}\"", value.as_ref()));
        self
    }

    /// Attach a braced expression initializer
    pub fn with_expression(mut self, expression: impl AsRef<str>) -> Self {
        self.initializer = Some(format!("{{{}}}", expression.as_ref()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_structure() {
        let structure = AttributeStructure::new("bar");
        assert_eq!(structure.name, "bar");
        assert_eq!(structure.initializer, None);
    }

    #[test]
    fn test_string_value_is_quoted() {
        let structure = AttributeStructure::new("color").with_string_value("red");
        assert_eq!(structure.initializer.as_deref(), Some("\"red\""));
    }

    #[test]
    fn test_expression_is_braced() {
        let structure = AttributeStructure::new("count").with_expression("n + 1");
        assert_eq!(structure.initializer.as_deref(), Some("{n + 1}"));
    }

    #[test]
    fn test_name_validation() {
        assert!(is_valid_attribute_name("bar"));
        assert!(is_valid_attribute_name("data-x"));
        assert!(is_valid_attribute_name("ns:name"));
        assert!(!is_valid_attribute_name(""));
        assert!(!is_valid_attribute_name("1abc"));
        assert!(!is_valid_attribute_name("has space"));
        assert!(!is_valid_attribute_name("gt>"));
    }

    #[test]
    fn test_serde_round_trip() {
        let structure = AttributeStructure::new("color").with_string_value("red");
        let json = serde_json::to_string(&structure).unwrap();
        let back: AttributeStructure = serde_json::from_str(&json).unwrap();
        assert_eq!(back, structure);
    }
}
