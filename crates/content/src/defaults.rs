use crate::error::ContentError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// CSS property name to value.
pub type StyleMap = BTreeMap<String, String>;

/// Default style values supplied when the editor is created.
///
/// Keys use the model's kebab-case names; anything left out falls back to
/// the built-in value in [`EditorDefaults::resolve`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EditorDefaults {
    pub font_family: Option<String>,
    pub font_variant_id: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub text_transform: Option<String>,
    pub text_align: Option<String>,
    pub text_decoration: Option<String>,
    pub line_height: Option<String>,
    pub letter_spacing: Option<String>,
}

impl EditorDefaults {
    /// Reads defaults from a JSON object; any other JSON value is malformed.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let value: Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(ContentError::Malformed("defaults are not a map".into()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Resolved defaults keyed by CSS property.
    pub fn resolve(&self) -> StyleMap {
        let pick = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_string())
        };
        StyleMap::from([
            ("font-family".into(), pick(&self.font_family, "sourcesanspro")),
            ("font-variant".into(), pick(&self.font_variant_id, "regular")),
            ("font-size".into(), pick(&self.font_size, "14")),
            ("font-weight".into(), pick(&self.font_weight, "400")),
            ("font-style".into(), pick(&self.font_style, "normal")),
            ("text-transform".into(), pick(&self.text_transform, "none")),
            ("text-align".into(), pick(&self.text_align, "left")),
            ("text-decoration".into(), pick(&self.text_decoration, "none")),
            ("line-height".into(), pick(&self.line_height, "1.2")),
            ("letter-spacing".into(), pick(&self.letter_spacing, "0")),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_use_builtins() {
        let resolved = EditorDefaults::default().resolve();
        assert_eq!(resolved["font-family"], "sourcesanspro");
        assert_eq!(resolved["font-variant"], "regular");
        assert_eq!(resolved["line-height"], "1.2");
        assert_eq!(resolved.len(), 10);
    }

    #[test]
    fn json_keys_are_kebab_case() {
        let defaults =
            EditorDefaults::from_json(r#"{"font-size": "20", "font-variant-id": "bold"}"#).unwrap();
        let resolved = defaults.resolve();
        assert_eq!(resolved["font-size"], "20");
        assert_eq!(resolved["font-variant"], "bold");
        assert!(EditorDefaults::from_json("[]").is_err());
    }

    #[test]
    fn only_objects_are_accepted() {
        for json in [r#"["20"]"#, "null", "14", r#""bold""#] {
            assert!(
                matches!(EditorDefaults::from_json(json), Err(ContentError::Malformed(_))),
                "{json}"
            );
        }
        assert_eq!(EditorDefaults::from_json("{}").unwrap(), EditorDefaults::default());
    }
}
