//! Plain-text views of forms, layouts and responses.

use colored::Colorize;
use formwright_core::{FormLayout, SubmissionSession};
use formwright_domain::{Displayable, Field, Form, Response};

use crate::cli::output;

pub fn layout(name: &str, layout: &FormLayout) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({} field{}, {} step{})",
        name.bold(),
        layout.len(),
        plural(layout.len()),
        layout.max_steps(),
        plural(layout.max_steps() as usize),
    )];
    for (step, count) in layout.step_field_counts() {
        lines.push(format!("Step {step} ({count})"));
        if count == 0 {
            lines.push("  (drop fields here)".dimmed().to_string());
        }
        for field in layout.fields_in_step(step) {
            lines.push(field_line(field));
        }
    }
    lines
}

fn field_line(field: &Field) -> String {
    let mut line = format!("  {}  {}", field.id.dimmed(), field.display_label());
    if let Some(pattern) = &field.pattern {
        line.push_str(&format!(" pattern={pattern}"));
    }
    match (field.min_length, field.max_length) {
        (Some(min), Some(max)) => line.push_str(&format!(" length={min}..={max}")),
        (Some(min), None) => line.push_str(&format!(" length>={min}")),
        (None, Some(max)) => line.push_str(&format!(" length<={max}")),
        (None, None) => {}
    }
    if !field.options.is_empty() {
        line.push_str(&format!(" options=[{}]", field.options.join(", ")));
    }
    line
}

pub fn form_row(form: &Form, share_link: &str) -> String {
    format!(
        "{}  {}  updated {}  {}",
        form.id,
        form.display_label(),
        form.updated_at.format("%Y-%m-%d %H:%M"),
        share_link
    )
}

pub fn response(index: usize, response: &Response, form: Option<&Form>) -> Vec<String> {
    let mut lines = vec![format!(
        "#{} submitted {}",
        index + 1,
        response.submitted_at.format("%Y-%m-%d %H:%M:%S")
    )];
    for (field_id, value) in &response.data {
        let label = form
            .and_then(|form| form.field(field_id))
            .map(|field| field.label.as_str())
            .unwrap_or(field_id.as_str());
        lines.push(format!("  {label}: {value}"));
    }
    lines
}

/// Header for the page a submission session is on.
pub fn step_header(session: &SubmissionSession) -> String {
    format!(
        "{} - step {} of {}",
        session.form().name,
        session.current_step(),
        session.total_steps()
    )
}

pub fn print_lines(lines: impl IntoIterator<Item = String>) {
    for line in lines {
        output::info(line);
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
