//! Built-in starting points for new forms.

use formwright_domain::{highest_step, Field, FieldType};

use crate::{arrangement::FormLayout, CoreError};

struct FieldSpec {
    kind: FieldType,
    label: &'static str,
    placeholder: &'static str,
    required: bool,
    step: u32,
    options: &'static [&'static str],
}

const fn spec(
    kind: FieldType,
    label: &'static str,
    placeholder: &'static str,
    required: bool,
    step: u32,
) -> FieldSpec {
    FieldSpec {
        kind,
        label,
        placeholder,
        required,
        step,
        options: &[],
    }
}

const fn choice(
    kind: FieldType,
    label: &'static str,
    options: &'static [&'static str],
    step: u32,
) -> FieldSpec {
    FieldSpec {
        kind,
        label,
        placeholder: "",
        required: true,
        step,
        options,
    }
}

/// A named, ready-made set of fields.
pub struct Template {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    fields: &'static [FieldSpec],
}

impl Template {
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn step_count(&self) -> u32 {
        self.fields.iter().map(|f| f.step).max().unwrap_or(1)
    }
}

static TEMPLATES: &[Template] = &[
    Template {
        key: "contact-form",
        name: "Contact Form",
        description: "Name, email, subject and message on a single page",
        fields: &[
            spec(FieldType::Text, "Name", "Enter your full name", true, 1),
            spec(FieldType::Email, "Email Address", "your@email.com", true, 1),
            spec(FieldType::Text, "Subject", "What is this regarding?", true, 1),
            spec(FieldType::Textarea, "Message", "Your message here...", true, 1),
        ],
    },
    Template {
        key: "customer-survey",
        name: "Customer Survey",
        description: "Three-step satisfaction survey",
        fields: &[
            spec(FieldType::Text, "Name", "Your name", true, 1),
            spec(FieldType::Email, "Email", "your@email.com", true, 1),
            choice(
                FieldType::Radio,
                "How did you hear about us?",
                &["Social Media", "Friend", "Advertisement", "Search Engine", "Other"],
                2,
            ),
            choice(
                FieldType::Dropdown,
                "How satisfied are you with our service?",
                &[
                    "Very Satisfied",
                    "Satisfied",
                    "Neutral",
                    "Dissatisfied",
                    "Very Dissatisfied",
                ],
                2,
            ),
            spec(FieldType::Textarea, "What can we improve?", "Your suggestions...", false, 3),
        ],
    },
    Template {
        key: "event-registration",
        name: "Event Registration",
        description: "Attendee details, guests and meal preference",
        fields: &[
            spec(FieldType::Text, "Full Name", "Your full name", true, 1),
            spec(FieldType::Email, "Email", "your@email.com", true, 1),
            spec(FieldType::Text, "Phone", "Your phone number", true, 1),
            choice(FieldType::Dropdown, "Number of Guests", &["1", "2", "3", "4", "5+"], 2),
            choice(
                FieldType::Radio,
                "Meal Preference",
                &["Vegetarian", "Vegan", "Gluten-Free", "No Restrictions"],
                2,
            ),
            spec(
                FieldType::Textarea,
                "Special Requirements",
                "Any special requirements or comments",
                false,
                3,
            ),
        ],
    },
    Template {
        key: "newsletter-signup",
        name: "Newsletter Signup",
        description: "First name, email and delivery frequency",
        fields: &[
            spec(FieldType::Text, "First Name", "Your first name", true, 1),
            spec(FieldType::Email, "Email Address", "your@email.com", true, 1),
            choice(FieldType::Radio, "Email Frequency", &["Daily", "Weekly", "Monthly"], 1),
        ],
    },
];

pub fn all() -> &'static [Template] {
    TEMPLATES
}

pub fn find(key: &str) -> Result<&'static Template, CoreError> {
    TEMPLATES
        .iter()
        .find(|template| template.key == key)
        .ok_or_else(|| CoreError::TemplateNotFound(key.to_string()))
}

/// Instantiates `template` with fresh field ids from `next_id`.
pub fn seed<F>(template: &Template, mut next_id: F) -> FormLayout
where
    F: FnMut() -> String,
{
    let fields: Vec<Field> = template
        .fields
        .iter()
        .map(|spec| {
            let mut field = Field::with_defaults(next_id(), spec.kind, spec.step);
            field.label = spec.label.to_string();
            field.placeholder = spec.placeholder.to_string();
            field.required = spec.required;
            if spec.kind.has_options() {
                field.options = spec.options.iter().map(|o| o.to_string()).collect();
            }
            field
        })
        .collect();
    let max_steps = highest_step(&fields);
    FormLayout::from_fields(fields, max_steps)
}
