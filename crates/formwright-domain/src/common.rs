//! Shared traits and constants for form primitives.

/// Name given to forms that have not been named yet.
pub const DEFAULT_FORM_NAME: &str = "Untitled Form";

/// First step of every form. Steps are 1-based.
pub const FIRST_STEP: u32 = 1;

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Entities that live on one page of a multi-step form.
pub trait Stepped {
    fn step(&self) -> u32;
}

/// Returns the highest step used by `items`, or [`FIRST_STEP`] when empty.
pub fn highest_step<'a, T, I>(items: I) -> u32
where
    T: Stepped + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(Stepped::step)
        .max()
        .unwrap_or(FIRST_STEP)
        .max(FIRST_STEP)
}
