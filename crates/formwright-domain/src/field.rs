//! Domain types representing a single form control.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::*;

/// Closed set of controls offered by the builder palette.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Dropdown,
    Checkbox,
    Radio,
    Date,
    File,
}

impl FieldType {
    /// Palette order.
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Email,
        FieldType::Dropdown,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Date,
        FieldType::File,
    ];

    /// Stable lowercase identifier, matching the persisted representation.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Dropdown => "dropdown",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Date => "date",
            FieldType::File => "file",
        }
    }

    /// Human readable palette label.
    pub fn label(self) -> &'static str {
        match self {
            FieldType::Text => "Text Field",
            FieldType::Textarea => "Text Area",
            FieldType::Email => "Email",
            FieldType::Dropdown => "Dropdown",
            FieldType::Checkbox => "Checkbox",
            FieldType::Radio => "Radio Button",
            FieldType::Date => "Date Picker",
            FieldType::File => "File Upload",
        }
    }

    /// `min_length` / `max_length` only apply to free text controls.
    pub fn supports_length_rules(self) -> bool {
        matches!(self, FieldType::Text | FieldType::Textarea)
    }

    /// Regular-expression rules apply to text-like controls.
    pub fn supports_pattern(self) -> bool {
        matches!(self, FieldType::Text | FieldType::Textarea | FieldType::Email)
    }

    /// Dropdowns and radio groups choose from a list of options.
    pub fn has_options(self) -> bool {
        matches!(self, FieldType::Dropdown | FieldType::Radio)
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, FieldType::Checkbox)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldType(pub String);

impl fmt::Display for UnknownFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field type `{}`", self.0)
    }
}

impl std::error::Error for UnknownFieldType {}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        FieldType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or(UnknownFieldType(value.to_string()))
    }
}

/// One configurable input unit within a form.
///
/// Attributes that only make sense for some field types are optional:
/// * `min_length` / `max_length` apply to `text` and `textarea`;
/// * `pattern` / `pattern_description` apply to `text`, `textarea` and `email`;
/// * `options` apply to `dropdown` and `radio` and must hold at least one entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help_text: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default = "default_step")]
    pub step: u32,
}

fn default_step() -> u32 {
    FIRST_STEP
}

impl Field {
    /// Builds a field with the defaults a fresh palette drop receives.
    pub fn with_defaults(id: impl Into<String>, kind: FieldType, step: u32) -> Self {
        let options = if kind.has_options() {
            default_options()
        } else {
            Vec::new()
        };
        Self {
            id: id.into(),
            kind,
            label: format!("New {} field", kind),
            placeholder: format!("Enter {}...", kind),
            help_text: String::new(),
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            pattern_description: None,
            options,
            step: step.max(FIRST_STEP),
        }
    }
}

/// Placeholder options seeded into new dropdown and radio fields.
pub fn default_options() -> Vec<String> {
    (1..=3).map(|idx| format!("Option {idx}")).collect()
}

impl Stepped for Field {
    fn step(&self) -> u32 {
        self.step
    }
}

impl Displayable for Field {
    fn display_label(&self) -> String {
        let marker = if self.required { " *" } else { "" };
        format!("{}{} ({})", self.label, marker, self.kind)
    }
}

/// Preset validation patterns offered by the field editor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PatternPreset {
    #[default]
    None,
    Email,
    Phone,
    Custom,
}

pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
pub const PHONE_PATTERN: &str = r"^(\+91[\-\s]?)?[0]?(91)?[6789]\d{9}$";

impl PatternPreset {
    /// Regex string and description for the built-in presets.
    pub fn definition(self) -> Option<(&'static str, &'static str)> {
        match self {
            PatternPreset::Email => Some((
                EMAIL_PATTERN,
                "Standard email format (example@domain.com)",
            )),
            PatternPreset::Phone => Some((
                PHONE_PATTERN,
                "Indian phone format (e.g., +91 9876543210, 9876543210)",
            )),
            PatternPreset::None | PatternPreset::Custom => None,
        }
    }

    /// Placeholder suggested when a preset is chosen and none is set.
    pub fn suggested_placeholder(self) -> Option<&'static str> {
        match self {
            PatternPreset::Email => Some("example@domain.com"),
            PatternPreset::Phone => Some("+91 9876543210"),
            PatternPreset::None | PatternPreset::Custom => None,
        }
    }

    /// Recovers the preset a stored pattern came from.
    pub fn detect(pattern: Option<&str>) -> Self {
        match pattern {
            None => PatternPreset::None,
            Some(p) if p.is_empty() => PatternPreset::None,
            Some(EMAIL_PATTERN) => PatternPreset::Email,
            Some(PHONE_PATTERN) => PatternPreset::Phone,
            Some(_) => PatternPreset::Custom,
        }
    }
}

impl fmt::Display for PatternPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PatternPreset::None => "none",
            PatternPreset::Email => "email",
            PatternPreset::Phone => "phone",
            PatternPreset::Custom => "custom",
        };
        f.write_str(label)
    }
}

impl FromStr for PatternPreset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(PatternPreset::None),
            "email" => Ok(PatternPreset::Email),
            "phone" => Ok(PatternPreset::Phone),
            "custom" => Ok(PatternPreset::Custom),
            other => Err(format!("unknown pattern preset `{other}`")),
        }
    }
}

/// A submitted value. Checkboxes carry booleans, every other control text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Whitespace-only text and unchecked boxes count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Bool(checked) => !checked,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Bool(checked) => write!(f, "{checked}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropdown_defaults_seed_three_options() {
        let field = Field::with_defaults("field-1", FieldType::Dropdown, 2);
        assert_eq!(field.options, vec!["Option 1", "Option 2", "Option 3"]);
        assert_eq!(field.step, 2);
        assert!(!field.required);
        assert_eq!(field.label, "New dropdown field");
    }

    #[test]
    fn field_serializes_with_browser_keys() {
        let mut field = Field::with_defaults("field-9", FieldType::Text, 1);
        field.min_length = Some(3);
        field.help_text = "Your legal name".into();
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["minLength"], 3);
        assert_eq!(json["helpText"], "Your legal name");
        assert!(json.get("options").is_none());
    }

    #[test]
    fn field_without_step_defaults_to_first_step() {
        let json = r#"{"id":"field-1","type":"email","label":"Email","required":true}"#;
        let field: Field = serde_json::from_str(json).unwrap();
        assert_eq!(field.step, FIRST_STEP);
        assert_eq!(field.kind, FieldType::Email);
    }

    #[test]
    fn preset_detection_recognises_builtins() {
        assert_eq!(PatternPreset::detect(Some(EMAIL_PATTERN)), PatternPreset::Email);
        assert_eq!(PatternPreset::detect(Some(PHONE_PATTERN)), PatternPreset::Phone);
        assert_eq!(PatternPreset::detect(Some("^a+$")), PatternPreset::Custom);
        assert_eq!(PatternPreset::detect(None), PatternPreset::None);
    }

    #[test]
    fn field_values_parse_untagged() {
        let values: Vec<FieldValue> = serde_json::from_str(r#"["abc", true]"#).unwrap();
        assert_eq!(values[0], FieldValue::text("abc"));
        assert_eq!(values[1], FieldValue::Bool(true));
        assert!(FieldValue::Bool(false).is_empty());
        assert!(FieldValue::text("   ").is_empty());
    }

    #[test]
    fn field_type_parses_case_insensitively() {
        assert_eq!("Radio".parse::<FieldType>(), Ok(FieldType::Radio));
        assert!("slider".parse::<FieldType>().is_err());
    }
}
