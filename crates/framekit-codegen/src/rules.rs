//! Emission settings.

use serde::{Deserialize, Serialize};

/// Formatting and naming rules applied by the assembler.
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes:
///
/// ```
/// use framekit_codegen::GenerationRules;
///
/// let rules = GenerationRules::from_json(r#"{ "indent_width": 2 }"#).unwrap();
/// assert_eq!(rules.indent_width, 2);
/// assert_eq!(rules.access_modifier, "public");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRules {
    /// Spaces per block level.
    pub indent_width: usize,
    /// Leading modifier of the method signature.
    pub access_modifier: String,
    /// First numeric suffix used to disambiguate colliding names.
    pub name_suffix_start: u32,
}

impl Default for GenerationRules {
    fn default() -> Self {
        Self {
            indent_width: 4,
            access_modifier: "public".to_string(),
            name_suffix_start: 2,
        }
    }
}

impl GenerationRules {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(
            GenerationRules::from_json("{}").unwrap(),
            GenerationRules::default()
        );
    }

    #[test]
    fn unknown_values_are_type_checked() {
        assert!(GenerationRules::from_json(r#"{ "indent_width": "four" }"#).is_err());
    }
}
