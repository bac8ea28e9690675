pub mod catalog;
pub mod config;
pub mod field;
pub mod form;
pub mod step;
pub mod system;

use formwright_domain::FieldType;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}

fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(form::definitions());
    commands.extend(field::definitions());
    commands.extend(step::definitions());
    commands.extend(catalog::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

/// The argument at `index`, or a usage error.
pub(crate) fn required<'a>(
    args: &[&'a str],
    index: usize,
    usage: &str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("Usage: {usage}")))
}

pub(crate) fn parse_step(raw: &str) -> Result<u32, CommandError> {
    raw.parse::<u32>()
        .ok()
        .filter(|step| *step >= 1)
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{raw}` is not a step number")))
}

pub(crate) fn parse_field_type(raw: &str) -> Result<FieldType, CommandError> {
    raw.parse::<FieldType>().map_err(|_| {
        let known: Vec<&str> = FieldType::ALL.iter().map(|kind| kind.as_str()).collect();
        CommandError::InvalidArguments(format!(
            "Unknown field type `{raw}`. Expected one of: {}",
            known.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_numbers_start_at_one() {
        assert_eq!(parse_step("2").unwrap(), 2);
        assert!(parse_step("0").is_err());
        assert!(parse_step("two").is_err());
    }

    #[test]
    fn unknown_field_type_lists_known_ones() {
        let err = parse_field_type("slider").unwrap_err();
        assert!(err.to_string().contains("dropdown"));
        assert_eq!(parse_field_type("email").unwrap(), FieldType::Email);
    }

    #[test]
    fn every_command_has_usage() {
        for entry in all_definitions() {
            assert!(entry.usage.starts_with(entry.name), "{}", entry.name);
            assert!(!entry.description.is_empty());
        }
    }
}
