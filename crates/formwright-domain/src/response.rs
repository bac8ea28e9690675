//! Captured end-user submissions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field::FieldValue;

/// Submitted values keyed by field id.
pub type ResponseData = BTreeMap<String, FieldValue>;

/// One end-user submission against a saved form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub form_id: String,
    pub form_name: String,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub data: ResponseData,
}

impl Response {
    pub fn new(
        form_id: impl Into<String>,
        form_name: impl Into<String>,
        submitted_at: DateTime<Utc>,
        data: ResponseData,
    ) -> Self {
        Self {
            form_id: form_id.into(),
            form_name: form_name.into(),
            submitted_at,
            data,
        }
    }

    pub fn value(&self, field_id: &str) -> Option<&FieldValue> {
        self.data.get(field_id)
    }
}
