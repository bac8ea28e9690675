//! Filling in a saved (or previewed) form page by page.

use formwright_domain::{Field, FieldValue, Form, Response, ResponseData, FIRST_STEP};

use crate::{
    catalog::FormCatalog,
    validation::{ValidationError, ValidationState},
    CoreError,
};

/// Result of trying to leave the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAdvance {
    /// The current page has errors, keyed by field id in form order.
    Blocked(Vec<(String, ValidationError)>),
    NextStep(u32),
    /// The last page validated; the submission can be recorded.
    Complete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Blocked(Vec<(String, ValidationError)>),
    NextStep(u32),
    Submitted(Response),
}

/// One end user's pass through a form.
#[derive(Debug, Clone)]
pub struct SubmissionSession {
    form: Form,
    current_step: u32,
    total_steps: u32,
    data: ResponseData,
    validation: ValidationState,
    submitted: bool,
}

impl SubmissionSession {
    /// Opens a saved form by internal or shareable id.
    pub fn open(catalog: &FormCatalog, key: &str) -> Result<Self, CoreError> {
        let form = catalog
            .find_public(key)
            .ok_or_else(|| CoreError::FormNotFound(key.to_string()))?;
        Ok(Self::for_preview(form))
    }

    /// Session over a form that need not be saved.
    pub fn for_preview(form: Form) -> Self {
        let total_steps = form.total_steps();
        Self {
            form,
            current_step: FIRST_STEP,
            total_steps,
            data: ResponseData::new(),
            validation: ValidationState::new(),
            submitted: false,
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step >= self.total_steps
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn step_fields(&self) -> impl Iterator<Item = &Field> {
        self.form.fields_in_step(self.current_step)
    }

    pub fn value(&self, field_id: &str) -> Option<&FieldValue> {
        self.data.get(field_id)
    }

    pub fn data(&self) -> &ResponseData {
        &self.data
    }

    pub fn error(&self, field_id: &str) -> Option<&ValidationError> {
        self.validation.error(field_id)
    }

    /// Stores a value; validates it only if the field was touched before.
    pub fn change(
        &mut self,
        field_id: &str,
        value: FieldValue,
    ) -> Result<Option<ValidationError>, CoreError> {
        let field = self
            .form
            .field(field_id)
            .ok_or_else(|| CoreError::FieldNotFound(field_id.to_string()))?;
        self.data.insert(field_id.to_string(), value);
        Ok(self
            .validation
            .change(field, self.data.get(field_id))
            .cloned())
    }

    /// Marks a field touched and validates its current value.
    pub fn blur(&mut self, field_id: &str) -> Result<Option<ValidationError>, CoreError> {
        let field = self
            .form
            .field(field_id)
            .ok_or_else(|| CoreError::FieldNotFound(field_id.to_string()))?;
        Ok(self.validation.blur(field, self.data.get(field_id)).cloned())
    }

    /// Validates the current page and moves forward when it is clean.
    pub fn advance(&mut self) -> StepAdvance {
        let data = &self.data;
        let failures = self.validation.validate_all(
            self.form.fields_in_step(self.current_step),
            |id| data.get(id),
        );
        if !failures.is_empty() {
            tracing::debug!(
                step = self.current_step,
                errors = failures.len(),
                "step blocked by validation"
            );
            return StepAdvance::Blocked(failures);
        }
        if self.is_last_step() {
            return StepAdvance::Complete;
        }
        self.current_step += 1;
        StepAdvance::NextStep(self.current_step)
    }

    /// Advances, and on the last page records exactly one response.
    pub fn submit(&mut self, catalog: &FormCatalog) -> Result<SubmitOutcome, CoreError> {
        if self.submitted {
            return Err(CoreError::AlreadySubmitted);
        }
        match self.advance() {
            StepAdvance::Blocked(errors) => Ok(SubmitOutcome::Blocked(errors)),
            StepAdvance::NextStep(step) => Ok(SubmitOutcome::NextStep(step)),
            StepAdvance::Complete => {
                let response = catalog.record_response(&self.form, self.data.clone())?;
                self.submitted = true;
                Ok(SubmitOutcome::Submitted(response))
            }
        }
    }

    /// Goes back one page; returns `false` on the first page.
    pub fn previous(&mut self) -> bool {
        if self.current_step <= FIRST_STEP {
            return false;
        }
        self.current_step -= 1;
        true
    }
}
