//! formwright-core
//!
//! Form-building logic for Formwright: layout and step arithmetic, drag
//! transactions, validation, drafts, the saved-forms catalog and submissions.
//! Depends on formwright-domain. No CLI, no terminal I/O; persistence goes
//! through the [`storage::KeyValueStore`] port.

pub mod arrangement;
pub mod catalog;
pub mod draft;
pub mod drag;
pub mod error;
pub mod field_editor;
pub mod ids;
pub mod storage;
pub mod submission;
pub mod templates;
pub mod time;
pub mod validation;

pub use arrangement::*;
pub use catalog::*;
pub use draft::*;
pub use drag::*;
pub use error::CoreError;
pub use field_editor::FieldConfig;
pub use storage::{KeyValueStore, MemoryStore};
pub use submission::*;
pub use templates::Template;
pub use time::{relative_time, Clock, FixedClock, SystemClock};
pub use validation::*;
