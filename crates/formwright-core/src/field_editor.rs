//! Editable configuration of a single field.

use formwright_domain::{Field, PatternPreset};
use regex::Regex;

use crate::CoreError;

/// Snapshot of the attributes a user can edit on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConfig {
    pub label: String,
    pub placeholder: String,
    pub help_text: String,
    pub required: bool,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub preset: PatternPreset,
    /// Only read when `preset` is [`PatternPreset::Custom`].
    pub pattern: String,
    pub pattern_description: String,
    pub options: Vec<String>,
}

impl FieldConfig {
    pub fn from_field(field: &Field) -> Self {
        Self {
            label: field.label.clone(),
            placeholder: field.placeholder.clone(),
            help_text: field.help_text.clone(),
            required: field.required,
            min_length: field.min_length,
            max_length: field.max_length,
            preset: PatternPreset::detect(field.pattern.as_deref()),
            pattern: field.pattern.clone().unwrap_or_default(),
            pattern_description: field.pattern_description.clone().unwrap_or_default(),
            options: field.options.clone(),
        }
    }

    /// Appends `Option <n>` where `n` is the new option count.
    pub fn add_option(&mut self) {
        let next = self.options.len() + 1;
        self.options.push(format!("Option {next}"));
    }

    /// Removes the option at `index`; the last remaining option cannot be removed.
    pub fn remove_option(&mut self, index: usize) -> Result<String, CoreError> {
        if self.options.len() <= 1 {
            return Err(CoreError::InvalidField(
                "a choice field needs at least one option".into(),
            ));
        }
        if index >= self.options.len() {
            return Err(CoreError::InvalidField(format!(
                "option {} does not exist",
                index + 1
            )));
        }
        Ok(self.options.remove(index))
    }

    /// Validates the configuration against `field`'s type and writes it.
    /// On error `field` is left unchanged.
    pub fn apply_to(&self, field: &mut Field) -> Result<(), CoreError> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err(CoreError::InvalidField("label cannot be empty".into()));
        }

        let mut updated = field.clone();
        updated.label = label.to_string();
        updated.placeholder = self.placeholder.clone();
        updated.help_text = self.help_text.trim().to_string();
        updated.required = self.required;

        if field.kind.supports_length_rules() {
            if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
                if min > max {
                    return Err(CoreError::InvalidField(format!(
                        "minimum length {min} exceeds maximum length {max}"
                    )));
                }
            }
            updated.min_length = self.min_length;
            updated.max_length = self.max_length;
        } else {
            updated.min_length = None;
            updated.max_length = None;
        }

        if field.kind.supports_pattern() {
            self.apply_pattern(&mut updated)?;
        } else {
            updated.pattern = None;
            updated.pattern_description = None;
        }

        if field.kind.has_options() {
            let options: Vec<String> = self
                .options
                .iter()
                .map(|option| option.trim().to_string())
                .collect();
            if options.is_empty() || options.iter().any(String::is_empty) {
                return Err(CoreError::InvalidField(
                    "choice fields need at least one option and no blank options".into(),
                ));
            }
            updated.options = options;
        } else {
            updated.options.clear();
        }

        *field = updated;
        Ok(())
    }

    fn apply_pattern(&self, field: &mut Field) -> Result<(), CoreError> {
        match self.preset {
            PatternPreset::None => {
                field.pattern = None;
                field.pattern_description = None;
            }
            PatternPreset::Email | PatternPreset::Phone => {
                if let Some((pattern, description)) = self.preset.definition() {
                    field.pattern = Some(pattern.to_string());
                    field.pattern_description = Some(description.to_string());
                }
                if field.placeholder.trim().is_empty() {
                    if let Some(placeholder) = self.preset.suggested_placeholder() {
                        field.placeholder = placeholder.to_string();
                    }
                }
            }
            PatternPreset::Custom => {
                let pattern = self.pattern.trim();
                if pattern.is_empty() {
                    return Err(CoreError::InvalidField(
                        "a custom pattern cannot be empty".into(),
                    ));
                }
                Regex::new(pattern).map_err(|err| {
                    CoreError::InvalidField(format!("pattern `{pattern}` is invalid: {err}"))
                })?;
                field.pattern = Some(pattern.to_string());
                let description = self.pattern_description.trim();
                field.pattern_description =
                    (!description.is_empty()).then(|| description.to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_domain::{FieldType, EMAIL_PATTERN};

    #[test]
    fn email_preset_fills_pattern_and_placeholder() {
        let mut field = Field::with_defaults("f", FieldType::Text, 1);
        let mut config = FieldConfig::from_field(&field);
        config.placeholder.clear();
        config.preset = PatternPreset::Email;
        config.apply_to(&mut field).unwrap();
        assert_eq!(field.pattern.as_deref(), Some(EMAIL_PATTERN));
        assert_eq!(field.placeholder, "example@domain.com");
        assert_eq!(FieldConfig::from_field(&field).preset, PatternPreset::Email);
    }

    #[test]
    fn none_preset_clears_pattern() {
        let mut field = Field::with_defaults("f", FieldType::Text, 1);
        field.pattern = Some("^x$".into());
        field.pattern_description = Some("only x".into());
        let mut config = FieldConfig::from_field(&field);
        assert_eq!(config.preset, PatternPreset::Custom);
        config.preset = PatternPreset::None;
        config.apply_to(&mut field).unwrap();
        assert!(field.pattern.is_none());
        assert!(field.pattern_description.is_none());
    }

    #[test]
    fn invalid_custom_pattern_is_rejected_without_change() {
        let mut field = Field::with_defaults("f", FieldType::Text, 1);
        let snapshot = field.clone();
        let mut config = FieldConfig::from_field(&field);
        config.preset = PatternPreset::Custom;
        config.pattern = "([".into();
        assert!(config.apply_to(&mut field).is_err());
        assert_eq!(field, snapshot);
    }

    #[test]
    fn length_limits_only_stick_to_text_fields() {
        let mut date = Field::with_defaults("d", FieldType::Date, 1);
        let mut config = FieldConfig::from_field(&date);
        config.min_length = Some(2);
        config.apply_to(&mut date).unwrap();
        assert!(date.min_length.is_none());

        let mut text = Field::with_defaults("t", FieldType::Textarea, 1);
        let mut config = FieldConfig::from_field(&text);
        config.min_length = Some(9);
        config.max_length = Some(3);
        assert!(config.apply_to(&mut text).is_err());
    }

    #[test]
    fn last_option_cannot_be_removed() {
        let field = Field::with_defaults("r", FieldType::Radio, 1);
        let mut config = FieldConfig::from_field(&field);
        config.add_option();
        assert_eq!(config.options.last().map(String::as_str), Some("Option 4"));
        for _ in 0..3 {
            config.remove_option(0).unwrap();
        }
        assert!(config.remove_option(0).is_err());
        assert_eq!(config.options.len(), 1);
    }

    #[test]
    fn blank_label_is_rejected() {
        let mut field = Field::with_defaults("f", FieldType::Text, 1);
        let mut config = FieldConfig::from_field(&field);
        config.label = "   ".into();
        assert!(matches!(
            config.apply_to(&mut field),
            Err(CoreError::InvalidField(_))
        ));
    }
}
