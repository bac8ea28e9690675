//! Identifier generation for fields, forms and share links.

use chrono::{DateTime, Utc};
use uuid::Uuid;

const SHAREABLE_ID_LEN: usize = 10;
const SUFFIX_LEN: usize = 6;

/// Field ids are derived from the creation timestamp; the random suffix keeps
/// fields created within the same millisecond distinct.
pub fn field_id(now: DateTime<Utc>) -> String {
    format!("field-{}-{}", now.timestamp_millis(), random_suffix(SUFFIX_LEN))
}

pub fn form_id(now: DateTime<Utc>) -> String {
    format!("form-{}", now.timestamp_millis())
}

/// Short public identifier used in share links.
pub fn shareable_id() -> String {
    random_suffix(SHAREABLE_ID_LEN)
}

fn random_suffix(len: usize) -> String {
    Uuid::new_v4().simple().to_string()[..len].to_string()
}
