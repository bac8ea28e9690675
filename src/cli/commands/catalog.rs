use std::collections::HashMap;

use formwright_core::{
    share_link, templates, FormCatalog, NavigationContext, StepAdvance, SubmissionSession,
    SubmitOutcome,
};
use formwright_domain::{Field, FieldValue};

use crate::cli::commands::required;
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::cli::{io as cli_io, output, render};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("forms", "List saved forms", "forms", cmd_forms),
        CommandEntry::new(
            "edit",
            "Load a saved form into the builder",
            "edit <form-id>",
            cmd_edit,
        ),
        CommandEntry::new(
            "delete",
            "Delete a saved form",
            "delete <form-id>",
            cmd_delete,
        ),
        CommandEntry::new(
            "templates",
            "List built-in templates",
            "templates",
            cmd_templates,
        ),
        CommandEntry::new(
            "template",
            "Start a new form from a template",
            "template <key>",
            cmd_template,
        ),
        CommandEntry::new(
            "submit",
            "Fill in a saved form and record the response",
            "submit <form-id|share-id> [field=value ...]",
            cmd_submit,
        ),
        CommandEntry::new(
            "responses",
            "List responses recorded for a form",
            "responses <form-id>",
            cmd_responses,
        ),
    ]
}

fn cmd_forms(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let forms = context.builder.catalog().list();
    if forms.is_empty() {
        output::info("No saved forms yet. Build one and run `save`.");
        return Ok(());
    }
    output::section(format!("Saved forms ({})", forms.len()));
    for form in &forms {
        let link = share_link(form, &context.config.share_base_url);
        output::info(render::form_row(form, &link));
    }
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = required(args, 0, "edit <form-id>")?;
    if context.builder.catalog().get(id).is_none() {
        return Err(CommandError::Message(format!("Form not found: {id}")));
    }
    context.reopen(NavigationContext::edit(id))?;
    output::success(format!(
        "Editing `{}` ({} fields).",
        context.builder.name(),
        context.builder.fields().len()
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = required(args, 0, "delete <form-id>")?;
    let Some(form) = context.builder.catalog().get(id) else {
        return Err(CommandError::Message(format!("Form not found: {id}")));
    };
    if !context.confirm(&format!("Delete `{}` permanently?", form.name))? {
        output::info("Nothing deleted.");
        return Ok(());
    }
    context.builder.catalog().delete(id)?;
    output::success(format!("Deleted `{}`.", form.name));
    Ok(())
}

fn cmd_templates(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Templates");
    for template in templates::all() {
        output::info(format!(
            "  {:<20} {} - {} ({} fields, {} steps)",
            template.key,
            template.name,
            template.description,
            template.field_count(),
            template.step_count()
        ));
    }
    output::hint("Use `template <key>` to start from one.");
    Ok(())
}

fn cmd_template(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = required(args, 0, "template <key>")?;
    let template = templates::find(key)?;
    if !context.builder.layout().is_empty()
        && !context.confirm("Replace the current draft with this template?")?
    {
        output::info("Kept the current form.");
        return Ok(());
    }
    context.reopen(NavigationContext::template(key))?;
    output::success(format!(
        "Started `{}` from template ({} fields).",
        template.name,
        context.builder.fields().len()
    ));
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = required(args, 0, "submit <form-id|share-id> [field=value ...]")?;
    let mut session = context.open_submission(key)?;
    let catalog = context.builder.catalog().clone();
    if fill_session(context, &mut session, &args[1..], Some(&catalog))? {
        output::success("Thank you! Your response has been recorded.");
    }
    Ok(())
}

fn cmd_responses(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = required(args, 0, "responses <form-id>")?;
    let catalog = context.builder.catalog();
    let form = catalog.find_public(id);
    let form_id = form.as_ref().map(|form| form.id.as_str()).unwrap_or(id);
    let responses = catalog.responses_for(form_id);
    if responses.is_empty() {
        output::info(format!("No responses for `{id}`."));
        return Ok(());
    }
    output::section(format!("Responses ({})", responses.len()));
    for (index, response) in responses.iter().enumerate() {
        render::print_lines(render::response(index, response, form.as_ref()));
    }
    Ok(())
}

/// Walks `session` page by page. Values come from `field=value` arguments
/// (matched by field id or label) or, interactively, from prompts. With a
/// catalog the final page records a response; without one nothing persists.
/// Returns `true` once the last page validated.
pub(crate) fn fill_session(
    context: &ShellContext,
    session: &mut SubmissionSession,
    args: &[&str],
    catalog: Option<&FormCatalog>,
) -> Result<bool, CommandError> {
    let provided = parse_assignments(args)?;
    let interactive = context.mode == CliMode::Interactive && provided.is_empty();

    loop {
        output::section(render::step_header(session));
        let fields: Vec<Field> = session.step_fields().cloned().collect();
        for field in &fields {
            let raw = match lookup(&provided, field) {
                Some(value) => Some(value.to_string()),
                None if interactive => Some(prompt_value(context, field)?),
                None => None,
            };
            let Some(raw) = raw else { continue };
            session.change(&field.id, to_value(field, &raw))?;
            if let Some(err) = session.blur(&field.id)? {
                output::warning(format!("{}: {}", field.label, err));
            }
        }

        let outcome = match catalog {
            Some(catalog) => session.submit(catalog)?,
            None => match session.advance() {
                StepAdvance::Blocked(errors) => SubmitOutcome::Blocked(errors),
                StepAdvance::NextStep(step) => SubmitOutcome::NextStep(step),
                StepAdvance::Complete => return Ok(true),
            },
        };
        match outcome {
            SubmitOutcome::Blocked(errors) => {
                for (field_id, err) in &errors {
                    let label = session
                        .form()
                        .field(field_id)
                        .map(|field| field.label.as_str())
                        .unwrap_or(field_id.as_str());
                    output::error(format!("{label}: {err}"));
                }
                if !interactive || !cli_io::confirm_action(&context.theme, "Try again?", true)? {
                    return Ok(false);
                }
            }
            SubmitOutcome::NextStep(_) => {}
            SubmitOutcome::Submitted(_) => return Ok(true),
        }
    }
}

fn parse_assignments<'a>(args: &[&'a str]) -> Result<HashMap<String, &'a str>, CommandError> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(key, value)| (key.trim().to_lowercase(), value))
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "Expected field=value, got `{arg}`"
                    ))
                })
        })
        .collect()
}

fn lookup<'a>(provided: &HashMap<String, &'a str>, field: &Field) -> Option<&'a str> {
    provided
        .get(&field.id.to_lowercase())
        .or_else(|| provided.get(&field.label.to_lowercase()))
        .copied()
}

fn prompt_value(context: &ShellContext, field: &Field) -> Result<String, CommandError> {
    let marker = if field.required { " *" } else { "" };
    if field.kind.is_boolean() {
        let checked =
            cli_io::confirm_action(&context.theme, &format!("{}{marker}", field.label), false)?;
        return Ok(checked.to_string());
    }
    if !field.help_text.is_empty() {
        output::hint(&field.help_text);
    }
    if field.kind.has_options() {
        output::hint(format!("Options: {}", field.options.join(", ")));
    }
    cli_io::prompt_text(&context.theme, &format!("{}{marker}", field.label))
}

fn to_value(field: &Field, raw: &str) -> FieldValue {
    if field.kind.is_boolean() {
        let checked = matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "on" | "1" | "x"
        );
        FieldValue::Bool(checked)
    } else {
        FieldValue::text(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_domain::FieldType;

    #[test]
    fn assignments_match_by_id_or_label() {
        let provided = parse_assignments(&["Email=ada@example.com", "field-1=Ada"]).unwrap();
        let mut email = Field::with_defaults("field-2", FieldType::Email, 1);
        email.label = "Email".into();
        let name = Field::with_defaults("field-1", FieldType::Text, 1);
        assert_eq!(lookup(&provided, &email), Some("ada@example.com"));
        assert_eq!(lookup(&provided, &name), Some("Ada"));
        assert!(parse_assignments(&["novalue"]).is_err());
    }

    #[test]
    fn checkbox_values_become_booleans() {
        let field = Field::with_defaults("c", FieldType::Checkbox, 1);
        assert_eq!(to_value(&field, "yes"), FieldValue::Bool(true));
        assert_eq!(to_value(&field, "no"), FieldValue::Bool(false));
        let text = Field::with_defaults("t", FieldType::Text, 1);
        assert_eq!(to_value(&text, "yes"), FieldValue::text("yes"));
    }
}
