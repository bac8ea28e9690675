use formwright_core::{DragEntity, DropOutcome, DropTarget, FieldConfig};
use formwright_domain::PatternPreset;

use crate::cli::commands::{parse_field_type, parse_step, required};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const SET_USAGE: &str = "set <field-id> <attribute> <value...>";
const DRAG_USAGE: &str = "drag <palette:TYPE|field:ID|step:N> <field:ID|step:N>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Add a field from the palette (defaults to step 1)",
            "add <type> [step]",
            cmd_add,
        ),
        CommandEntry::new(
            "remove",
            "Remove a field",
            "remove <field-id>",
            cmd_remove,
        ),
        CommandEntry::new(
            "set",
            "Edit a field attribute: label, placeholder, help, required, min, max, \
             preset, pattern, pattern-desc, options, option-add, option-remove",
            SET_USAGE,
            cmd_set,
        ),
        CommandEntry::new(
            "move",
            "Move a field to a step, optionally before another field",
            "move <field-id> <step> [before-id]",
            cmd_move,
        ),
        CommandEntry::new(
            "reorder",
            "Move a field into another field's position (and step)",
            "reorder <field-id> <target-id>",
            cmd_reorder,
        ),
        CommandEntry::new(
            "drag",
            "Drag a palette control, field or step onto a target",
            DRAG_USAGE,
            cmd_drag,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = parse_field_type(required(args, 0, "add <type> [step]")?)?;
    let step = match args.get(1) {
        Some(raw) => parse_step(raw)?,
        None => 1,
    };
    let id = context.builder.add_field(kind, step)?;
    output::success(format!("Added {} field `{id}` to step {step}.", kind.label()));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = required(args, 0, "remove <field-id>")?;
    let label = context.builder.field_config(id)?.label;
    if !context.confirm(&format!("Remove field `{label}`?"))? {
        output::info("Field kept.");
        return Ok(());
    }
    context.builder.remove_field(id)?;
    output::success(format!("Removed `{label}`."));
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = required(args, 0, SET_USAGE)?;
    let attribute = required(args, 1, SET_USAGE)?.to_ascii_lowercase();
    let value = args.get(2..).unwrap_or_default().join(" ");

    let mut config = context.builder.field_config(id)?;
    apply_attribute(&mut config, &attribute, &value)?;
    context.builder.configure_field(id, &config)?;
    output::success(format!("Updated {attribute} on `{id}`."));
    Ok(())
}

/// Writes one attribute into `config`. Empty numeric values clear the rule.
fn apply_attribute(
    config: &mut FieldConfig,
    attribute: &str,
    value: &str,
) -> Result<(), CommandError> {
    match attribute {
        "label" => config.label = value.to_string(),
        "placeholder" => config.placeholder = value.to_string(),
        "help" => config.help_text = value.to_string(),
        "required" => config.required = parse_flag(value)?,
        "min" => config.min_length = parse_length(value)?,
        "max" => config.max_length = parse_length(value)?,
        "preset" => {
            config.preset = value
                .parse::<PatternPreset>()
                .map_err(CommandError::InvalidArguments)?;
        }
        "pattern" => {
            config.preset = if value.is_empty() {
                PatternPreset::None
            } else {
                PatternPreset::Custom
            };
            config.pattern = value.to_string();
        }
        "pattern-desc" => config.pattern_description = value.to_string(),
        "options" => {
            config.options = value
                .split(',')
                .map(str::trim)
                .filter(|option| !option.is_empty())
                .map(str::to_string)
                .collect();
        }
        "option-add" => {
            config.add_option();
            if !value.is_empty() {
                if let Some(last) = config.options.last_mut() {
                    *last = value.to_string();
                }
            }
        }
        "option-remove" => {
            let position = value
                .parse::<usize>()
                .ok()
                .filter(|position| *position >= 1)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`{value}` is not an option number"))
                })?;
            config.remove_option(position - 1)?;
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "Unknown attribute `{other}`. Usage: {SET_USAGE}"
            )))
        }
    }
    Ok(())
}

fn parse_flag(value: &str) -> Result<bool, CommandError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "Expected yes or no, got `{other}`"
        ))),
    }
}

fn parse_length(value: &str) -> Result<Option<u32>, CommandError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "none" {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| CommandError::InvalidArguments(format!("`{trimmed}` is not a length")))
}

fn cmd_move(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "move <field-id> <step> [before-id]";
    let id = required(args, 0, usage)?;
    let step = parse_step(required(args, 1, usage)?)?;
    context.builder.move_field(id, step, args.get(2).copied())?;
    output::success(format!("Moved `{id}` to step {step}."));
    Ok(())
}

fn cmd_reorder(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "reorder <field-id> <target-id>";
    let id = required(args, 0, usage)?;
    let target = required(args, 1, usage)?;
    context.builder.reorder_field(id, target)?;
    output::success(format!("Moved `{id}` into the position of `{target}`."));
    Ok(())
}

fn cmd_drag(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let entity = parse_entity(required(args, 0, DRAG_USAGE)?)?;
    let target = parse_target(required(args, 1, DRAG_USAGE)?)?;

    context.builder.drag_start(entity);
    context.builder.drag_hover(target.clone());
    match context.builder.drag_drop(target)? {
        DropOutcome::Ignored => output::info("Nothing changed."),
        DropOutcome::FieldAdded { id, step } => {
            output::success(format!("Added `{id}` to step {step}."))
        }
        DropOutcome::FieldMoved { id, step } => {
            output::success(format!("Moved `{id}` to step {step}."))
        }
        DropOutcome::StepsReordered { from, to } => {
            output::success(format!("Step {from} is now step {to}."))
        }
    }
    Ok(())
}

fn split_token(raw: &str) -> Result<(String, &str), CommandError> {
    raw.split_once(':')
        .map(|(kind, value)| (kind.to_ascii_lowercase(), value))
        .ok_or_else(|| CommandError::InvalidArguments(format!("Usage: {DRAG_USAGE}")))
}

fn parse_entity(raw: &str) -> Result<DragEntity, CommandError> {
    let (kind, value) = split_token(raw)?;
    match kind.as_str() {
        "palette" => Ok(DragEntity::Palette(parse_field_type(value)?)),
        "field" => Ok(DragEntity::Field(value.to_string())),
        "step" => Ok(DragEntity::Step(parse_step(value)?)),
        _ => Err(CommandError::InvalidArguments(format!("Usage: {DRAG_USAGE}"))),
    }
}

fn parse_target(raw: &str) -> Result<DropTarget, CommandError> {
    let (kind, value) = split_token(raw)?;
    match kind.as_str() {
        "field" => Ok(DropTarget::Field(value.to_string())),
        "step" => Ok(DropTarget::Step(parse_step(value)?)),
        _ => Err(CommandError::InvalidArguments(format!("Usage: {DRAG_USAGE}"))),
    }
}
