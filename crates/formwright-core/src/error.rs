use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Field not found: {0}")]
    FieldNotFound(String),
    #[error("Step {step} is outside 1..={max_steps}")]
    StepOutOfRange { step: u32, max_steps: u32 },
    #[error("Cannot remove the last remaining step")]
    CannotRemoveLastStep,
    #[error("Add at least one field before saving the form")]
    EmptyForm,
    #[error("Form not found: {0}")]
    FormNotFound(String),
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
    #[error("Invalid field configuration: {0}")]
    InvalidField(String),
    #[error("This response was already submitted")]
    AlreadySubmitted,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}
