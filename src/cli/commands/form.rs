use formwright_core::share_link;

use crate::cli::commands::catalog::fill_session;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "new",
            "Discard the current draft and start an empty form",
            "new [name]",
            cmd_new,
        ),
        CommandEntry::new("name", "Rename the form", "name <text>", cmd_name),
        CommandEntry::new("show", "Show steps and fields", "show", cmd_show),
        CommandEntry::new(
            "save",
            "Save the form to the catalog and print its share link",
            "save",
            cmd_save,
        ),
        CommandEntry::new(
            "preview",
            "Fill in the current form without recording a response",
            "preview [field-id=value ...]",
            cmd_preview,
        ),
        CommandEntry::new(
            "draft",
            "Show whether the session came from a restored draft",
            "draft",
            cmd_draft,
        ),
        CommandEntry::new(
            "dismiss",
            "Hide the draft-restored notice",
            "dismiss",
            cmd_dismiss,
        ),
    ]
}

fn cmd_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !context.builder.layout().is_empty()
        && !context.confirm("Discard the current form and its draft?")?
    {
        output::info("Kept the current form.");
        return Ok(());
    }
    context.builder.reset()?;
    if !args.is_empty() {
        context.builder.set_name(&args.join(" "))?;
    }
    output::success(format!("Started new form `{}`.", context.builder.name()));
    Ok(())
}

fn cmd_name(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments("Usage: name <text>".into()));
    }
    context.builder.set_name(&args.join(" "))?;
    output::success(format!("Form renamed to `{}`.", context.builder.name()));
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let builder = &context.builder;
    if let Some(notice) = builder.draft_notice() {
        output::hint(notice);
    }
    render::print_lines(render::layout(builder.name(), builder.layout()));
    if let Some(plan) = builder.pending_removal() {
        output::warning(format!(
            "Pending: {} Run `step confirm` or `step cancel`.",
            plan.describe()
        ));
    }
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let form = context.builder.save()?;
    let link = share_link(&form, &context.config.share_base_url);
    output::success(format!("Form saved: {} ({})", form.name, form.id));
    output::info(format!("Share link: {link}"));
    Ok(())
}

fn cmd_preview(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if context.builder.layout().is_empty() {
        output::warning("Nothing to preview yet. Add a field first.");
        return Ok(());
    }
    let mut session = context.builder.preview();
    if fill_session(context, &mut session, args, None)? {
        output::success("Preview complete. No response was recorded.");
    }
    Ok(())
}

fn cmd_draft(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.builder.draft_notice() {
        Some(message) => output::info(message),
        None => output::info(format!(
            "Editing `{}` ({:?}); changes autosave to the draft.",
            context.builder.name(),
            context.builder.source()
        )),
    }
    Ok(())
}

fn cmd_dismiss(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.builder.dismiss_draft_notice();
    output::info("Notice dismissed.");
    Ok(())
}
