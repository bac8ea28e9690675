//! In-memory edit session for one form.
//!
//! [`FormBuilder`] owns the layout being edited together with the transient
//! UI state around it (drag in progress, pending step removal, notices).
//! Every mutation writes the draft back to the store; a failed autosave is
//! logged and never fails the edit itself.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use formwright_core::{
    ids, templates, Clock, CoreError, DragEntity, DragSession, DraftNotice, DraftRecord,
    DraftStore, DropOutcome, DropTarget, FieldConfig, FormCatalog, FormLayout, KeyValueStore,
    NavigationContext, RestoreSource, RestoredSession, SaveRequest, StepRemovalPlan,
    SubmissionSession,
};
use formwright_domain::{Field, FieldType, Form, DEFAULT_FORM_NAME};

use crate::errors::{FormError, Result};

/// Knobs taken from the user configuration.
#[derive(Debug, Clone)]
pub struct BuilderSettings {
    pub default_form_name: String,
    pub notice_timeout: Duration,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            default_form_name: DEFAULT_FORM_NAME.to_string(),
            notice_timeout: Duration::seconds(3),
        }
    }
}

impl BuilderSettings {
    pub fn from_config(config: &formwright_config::Config) -> Self {
        let secs = i64::try_from(config.notice_timeout_secs).unwrap_or(i64::MAX / 1_000);
        Self {
            default_form_name: config.default_form_name.clone(),
            notice_timeout: Duration::seconds(secs),
        }
    }
}

/// Confirmation shown after a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedNotice {
    pub form_id: String,
    pub shareable_id: Option<String>,
    pub raised_at: DateTime<Utc>,
}

pub struct FormBuilder {
    clock: Arc<dyn Clock>,
    drafts: DraftStore,
    catalog: FormCatalog,
    settings: BuilderSettings,
    name: String,
    layout: FormLayout,
    nav: NavigationContext,
    drag: DragSession,
    draft_notice: Option<DraftNotice>,
    saved_notice: Option<SavedNotice>,
    pending_removal: Option<StepRemovalPlan>,
    source: RestoreSource,
}

impl FormBuilder {
    /// Opens an edit session, restoring whatever `nav` and the store point at.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        settings: BuilderSettings,
        nav: NavigationContext,
    ) -> Result<Self> {
        let drafts = DraftStore::new(store.clone());
        let catalog = FormCatalog::new(store, clock.clone());

        let seeded = match (&nav.form_id, &nav.template_id) {
            (None, Some(key)) => {
                let template = templates::find(key)?;
                let now = clock.now();
                let layout = templates::seed(template, || ids::field_id(now));
                drafts.write(&DraftRecord {
                    name: template.name.to_string(),
                    fields: layout.fields().to_vec(),
                    form_id: None,
                    max_steps: layout.max_steps(),
                    last_edited: now,
                })?;
                tracing::info!(template = key.as_str(), "template seeded into draft");
                true
            }
            _ => false,
        };

        let restored = drafts.restore(nav, &catalog, clock.as_ref())?;
        let mut builder = Self::from_restored(drafts, catalog, clock, settings, restored);
        if seeded {
            builder.draft_notice = None;
        }
        Ok(builder)
    }

    fn from_restored(
        drafts: DraftStore,
        catalog: FormCatalog,
        clock: Arc<dyn Clock>,
        settings: BuilderSettings,
        restored: RestoredSession,
    ) -> Self {
        let name = match restored.source {
            RestoreSource::Fresh => settings.default_form_name.clone(),
            _ => restored.name,
        };
        Self {
            clock,
            drafts,
            catalog,
            settings,
            name,
            layout: restored.layout,
            nav: restored.nav,
            drag: DragSession::new(),
            draft_notice: restored.notice,
            saved_notice: None,
            pending_removal: None,
            source: restored.source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> &FormLayout {
        &self.layout
    }

    pub fn fields(&self) -> &[Field] {
        self.layout.fields()
    }

    pub fn max_steps(&self) -> u32 {
        self.layout.max_steps()
    }

    /// Id of the saved form being edited, if any.
    pub fn form_id(&self) -> Option<&str> {
        self.nav.form_id.as_deref()
    }

    pub fn source(&self) -> RestoreSource {
        self.source
    }

    pub fn catalog(&self) -> &FormCatalog {
        &self.catalog
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FormError::InvalidInput("form name cannot be empty".into()));
        }
        self.name = name.to_string();
        self.autosave();
        Ok(())
    }

    /// Appends a field of `kind` to `step` and returns its id.
    pub fn add_field(&mut self, kind: FieldType, step: u32) -> Result<String> {
        let id = ids::field_id(self.clock.now());
        let id = self.layout.add_field(kind, step, id)?.id.clone();
        self.layout_changed();
        Ok(id)
    }

    pub fn remove_field(&mut self, id: &str) -> Result<Field> {
        let removed = self.layout.remove_field(id)?;
        self.layout_changed();
        Ok(removed)
    }

    pub fn field_config(&self, id: &str) -> Result<FieldConfig> {
        self.layout
            .field(id)
            .map(FieldConfig::from_field)
            .ok_or_else(|| CoreError::FieldNotFound(id.to_string()).into())
    }

    /// Validates `config` against the field's type and applies it.
    pub fn configure_field(&mut self, id: &str, config: &FieldConfig) -> Result<()> {
        let mut updated = self
            .layout
            .field(id)
            .cloned()
            .ok_or_else(|| CoreError::FieldNotFound(id.to_string()))?;
        config.apply_to(&mut updated)?;
        self.layout.update_field(id, |field| *field = updated)?;
        self.layout_changed();
        Ok(())
    }

    pub fn move_field(&mut self, id: &str, step: u32, before: Option<&str>) -> Result<()> {
        self.layout.move_field_to_step(id, step, before)?;
        self.layout_changed();
        Ok(())
    }

    pub fn reorder_field(&mut self, id: &str, target_id: &str) -> Result<()> {
        self.layout.reorder_within_step(id, target_id)?;
        self.layout_changed();
        Ok(())
    }

    pub fn add_step(&mut self) -> u32 {
        let step = self.layout.add_step();
        self.layout_changed();
        step
    }

    /// First half of step removal: records what would be lost.
    pub fn request_remove_step(&mut self, step: u32) -> Result<&StepRemovalPlan> {
        let plan = self.layout.request_remove_step(step)?;
        Ok(self.pending_removal.insert(plan))
    }

    pub fn pending_removal(&self) -> Option<&StepRemovalPlan> {
        self.pending_removal.as_ref()
    }

    pub fn cancel_remove_step(&mut self) {
        self.pending_removal = None;
    }

    /// Second half of step removal. Fields on the step are deleted.
    pub fn confirm_remove_step(&mut self) -> Result<StepRemovalPlan> {
        let pending = self
            .pending_removal
            .take()
            .ok_or(FormError::NoPendingRemoval)?;
        let plan = self.layout.confirm_remove_step(pending.step)?;
        self.layout_changed();
        Ok(plan)
    }

    pub fn reorder_steps(&mut self, dragged: u32, target: u32) -> Result<()> {
        self.layout.reorder_steps(dragged, target)?;
        self.layout_changed();
        Ok(())
    }

    pub fn drag_start(&mut self, entity: DragEntity) {
        self.drag.start(entity);
    }

    pub fn drag_hover(&mut self, target: DropTarget) {
        self.drag.hover(target);
    }

    pub fn drag_leave(&mut self) {
        self.drag.leave();
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }

    pub fn drag_drop(&mut self, target: DropTarget) -> Result<DropOutcome> {
        let now = self.clock.now();
        let outcome = self
            .drag
            .drop(target, &mut self.layout, || ids::field_id(now))?;
        if outcome.changed_layout() {
            self.layout_changed();
        }
        Ok(outcome)
    }

    pub fn draft_notice(&self) -> Option<String> {
        self.draft_notice
            .map(|notice| notice.message(self.clock.now()))
    }

    /// Hides the restore banner; the stored draft is untouched.
    pub fn dismiss_draft_notice(&mut self) {
        self.draft_notice = None;
    }

    /// Commits the form to the catalog and clears the draft.
    pub fn save(&mut self) -> Result<Form> {
        if self.layout.is_empty() {
            return Err(CoreError::EmptyForm.into());
        }
        let now = self.clock.now();
        let id = self
            .nav
            .form_id
            .clone()
            .unwrap_or_else(|| ids::form_id(now));
        let form = self.catalog.save(SaveRequest {
            id: id.clone(),
            name: self.name.clone(),
            fields: self.layout.fields().to_vec(),
            max_steps: self.layout.max_steps(),
        })?;
        self.nav.form_id = Some(id);
        self.source = RestoreSource::SavedForm;
        if let Err(err) = self.drafts.clear() {
            tracing::warn!(error = %err, "failed to clear draft after save");
        }
        self.saved_notice = Some(SavedNotice {
            form_id: form.id.clone(),
            shareable_id: form.shareable_id.clone(),
            raised_at: now,
        });
        Ok(form)
    }

    /// The saved notice while it is still fresh.
    pub fn saved_notice(&self) -> Option<&SavedNotice> {
        let now = self.clock.now();
        self.saved_notice
            .as_ref()
            .filter(|notice| now - notice.raised_at < self.settings.notice_timeout)
    }

    /// Starts over with an empty form and drops the stored draft.
    pub fn reset(&mut self) -> Result<()> {
        self.name = self.settings.default_form_name.clone();
        self.layout = FormLayout::new();
        self.nav = NavigationContext::default();
        self.drag.cancel();
        self.draft_notice = None;
        self.saved_notice = None;
        self.pending_removal = None;
        self.source = RestoreSource::Fresh;
        self.drafts.clear()?;
        tracing::info!("builder reset");
        Ok(())
    }

    /// Fill-in session over the current, possibly unsaved, form.
    pub fn preview(&self) -> SubmissionSession {
        let now = self.clock.now();
        let mut form = Form::new(
            self.nav
                .form_id
                .clone()
                .unwrap_or_else(|| "preview".to_string()),
            self.name.clone(),
            now,
        );
        form.fields = self.layout.fields().to_vec();
        form.max_steps = self.layout.max_steps();
        SubmissionSession::for_preview(form)
    }

    /// Any layout change invalidates a step removal the user has not confirmed yet.
    fn layout_changed(&mut self) {
        if self.pending_removal.take().is_some() {
            tracing::debug!("pending step removal discarded after layout change");
        }
        self.autosave();
    }

    fn autosave(&self) {
        let record = DraftRecord {
            name: self.name.clone(),
            fields: self.layout.fields().to_vec(),
            form_id: self.nav.form_id.clone(),
            max_steps: self.layout.max_steps(),
            last_edited: self.clock.now(),
        };
        if let Err(err) = self.drafts.write(&record) {
            tracing::warn!(error = %err, "autosave failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_core::{storage::DRAFT_FORM_KEY, FixedClock, MemoryStore};
    use chrono::TimeZone;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> std::result::Result<Option<String>, CoreError> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> std::result::Result<(), CoreError> {
            Err(CoreError::Storage("disk full".into()))
        }
        fn remove(&self, _key: &str) -> std::result::Result<(), CoreError> {
            Ok(())
        }
    }

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 4, 5, 6, 7, 8).unwrap()))
    }

    #[test]
    fn failed_autosave_does_not_fail_the_edit() {
        let mut builder = FormBuilder::open(
            Arc::new(FailingStore),
            clock(),
            BuilderSettings::default(),
            NavigationContext::default(),
        )
        .unwrap();
        let id = builder.add_field(FieldType::Text, 1).unwrap();
        assert!(builder.layout().field(&id).is_some());
    }

    #[test]
    fn edits_are_written_to_the_draft() {
        let store = Arc::new(MemoryStore::new());
        let mut builder = FormBuilder::open(
            store.clone(),
            clock(),
            BuilderSettings::default(),
            NavigationContext::default(),
        )
        .unwrap();
        builder.set_name("Intake").unwrap();
        let raw = store.get(DRAFT_FORM_KEY).unwrap().unwrap();
        assert!(raw.contains("Intake"));
    }

    #[test]
    fn confirm_without_request_is_an_error() {
        let mut builder = FormBuilder::open(
            Arc::new(MemoryStore::new()),
            clock(),
            BuilderSettings::default(),
            NavigationContext::default(),
        )
        .unwrap();
        assert!(matches!(
            builder.confirm_remove_step(),
            Err(FormError::NoPendingRemoval)
        ));
    }
}
