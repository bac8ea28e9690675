#![doc(test(attr(deny(warnings))))]

//! Formwright builds multi-step forms: arrange fields across steps, configure
//! validation, autosave drafts, publish to a local catalog and collect responses.

pub mod builder;
pub mod cli;
pub mod errors;
pub mod utils;

pub use builder::{BuilderSettings, FormBuilder, SavedNotice};
pub use errors::FormError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Formwright tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
