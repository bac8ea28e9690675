use crate::cli::commands::{parse_step, required};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "step <add|remove <n>|confirm|cancel|move <from> <to>>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "step",
        "Add, remove or reorder steps",
        USAGE,
        cmd_step,
    )]
}

fn cmd_step(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let action = required(args, 0, USAGE)?.to_ascii_lowercase();
    match action.as_str() {
        "add" => {
            let step = context.builder.add_step();
            output::success(format!("Added step {step}."));
            Ok(())
        }
        "remove" => {
            let step = parse_step(required(args, 1, "step remove <n>")?)?;
            let description = context.builder.request_remove_step(step)?.describe();
            output::warning(description);
            if context.confirm(&format!("Remove step {step}?"))? {
                confirm_removal(context)
            } else {
                context.builder.cancel_remove_step();
                output::info("Step kept.");
                Ok(())
            }
        }
        "confirm" => confirm_removal(context),
        "cancel" => {
            context.builder.cancel_remove_step();
            output::info("Step removal cancelled.");
            Ok(())
        }
        "move" => {
            let usage = "step move <from> <to>";
            let from = parse_step(required(args, 1, usage)?)?;
            let to = parse_step(required(args, 2, usage)?)?;
            context.builder.reorder_steps(from, to)?;
            output::success(format!("Step {from} is now step {to}."));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "Unknown step action `{other}`. Usage: {USAGE}"
        ))),
    }
}

fn confirm_removal(context: &mut ShellContext) -> CommandResult {
    let plan = context.builder.confirm_remove_step()?;
    output::success(format!(
        "Removed step {} ({} field(s) deleted).",
        plan.step,
        plan.doomed_fields.len()
    ));
    Ok(())
}
