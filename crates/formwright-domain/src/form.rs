//! Saved form definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{common::*, field::Field};

/// A form explicitly committed to the saved-forms catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    /// Public identifier used by share links. Records written before share
    /// links existed may lack it until their next save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shareable_id: Option<String>,
    #[serde(default = "default_form_name")]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub responses: u64,
}

fn default_form_name() -> String {
    DEFAULT_FORM_NAME.to_string()
}

fn default_max_steps() -> u32 {
    FIRST_STEP
}

impl Form {
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            shareable_id: None,
            name: name.into(),
            fields: Vec::new(),
            max_steps: FIRST_STEP,
            created_at: now,
            updated_at: now,
            responses: 0,
        }
    }

    /// Number of pages an end user walks through: the highest step any field uses.
    pub fn total_steps(&self) -> u32 {
        highest_step(&self.fields)
    }

    /// Fields rendered on `step`, in form order.
    pub fn fields_in_step(&self, step: u32) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(move |field| field.step == step)
    }

    /// Returns `true` when `key` names this form by internal or public id.
    pub fn matches_public_id(&self, key: &str) -> bool {
        self.id == key || self.shareable_id.as_deref() == Some(key)
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    /// Bumps the modification timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Displayable for Form {
    fn display_label(&self) -> String {
        let plural = if self.responses == 1 { "" } else { "s" };
        format!("{} ({} response{})", self.name, self.responses, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_only_created_at_is_accepted() {
        let json = r#"{
            "id": "form-1700000000000",
            "name": "Legacy",
            "createdAt": "2025-01-02",
            "fields": [],
            "responses": 2,
            "updatedAt": "2025-01-02T10:30:00.000Z"
        }"#;
        let form: Form = serde_json::from_str(json).unwrap();
        assert_eq!(
            form.created_at,
            Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap()
        );
        assert_eq!(
            form.updated_at,
            Utc.with_ymd_and_hms(2025, 1, 2, 10, 30, 0).unwrap()
        );
        assert_eq!(form.responses, 2);
        assert!(form.shareable_id.is_none());
    }
}
