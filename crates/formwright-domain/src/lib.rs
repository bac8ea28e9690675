//! formwright-domain
//!
//! Pure domain models (Field, Form, Response, validation presets).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod field;
pub mod form;
pub mod response;
pub mod timestamp;

pub use common::*;
pub use field::*;
pub use form::*;
pub use response::*;
