//! Autosaved in-progress form and the restore decision made on startup.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use formwright_domain::{Field, DEFAULT_FORM_NAME};
use serde::{Deserialize, Serialize};

use crate::{
    arrangement::FormLayout,
    catalog::FormCatalog,
    storage::{read_json, write_json, KeyValueStore, DRAFT_FORM_KEY},
    time::{relative_time, Clock},
    CoreError,
};

/// Snapshot of the builder state written on every edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    /// Zero for drafts written before steps were tracked; the layout
    /// recomputes it from the fields.
    #[serde(default)]
    pub max_steps: u32,
    pub last_edited: DateTime<Utc>,
}

impl DraftRecord {
    pub fn layout(&self) -> FormLayout {
        FormLayout::from_fields(self.fields.clone(), self.max_steps)
    }
}

/// Which ids the session was opened with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationContext {
    pub form_id: Option<String>,
    pub template_id: Option<String>,
}

impl NavigationContext {
    pub fn edit(form_id: impl Into<String>) -> Self {
        Self {
            form_id: Some(form_id.into()),
            template_id: None,
        }
    }

    pub fn template(template_id: impl Into<String>) -> Self {
        Self {
            form_id: None,
            template_id: Some(template_id.into()),
        }
    }
}

/// Banner shown after a draft was picked up again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftNotice {
    pub last_edited: DateTime<Utc>,
}

impl DraftNotice {
    pub fn message(&self, now: DateTime<Utc>) -> String {
        format!(
            "Draft restored - last edited {}",
            relative_time(self.last_edited, now)
        )
    }
}

/// Where the restored state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreSource {
    SavedForm,
    Draft,
    Fresh,
}

/// Edit state produced by [`DraftStore::restore`].
#[derive(Debug, Clone)]
pub struct RestoredSession {
    pub name: String,
    pub layout: FormLayout,
    pub nav: NavigationContext,
    pub notice: Option<DraftNotice>,
    pub source: RestoreSource,
}

impl RestoredSession {
    pub fn fresh(nav: NavigationContext) -> Self {
        Self {
            name: DEFAULT_FORM_NAME.to_string(),
            layout: FormLayout::new(),
            nav,
            notice: None,
            source: RestoreSource::Fresh,
        }
    }
}

/// Single-slot draft persistence.
#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Overwrites the stored draft.
    pub fn write(&self, record: &DraftRecord) -> Result<(), CoreError> {
        write_json(self.store.as_ref(), DRAFT_FORM_KEY, record)?;
        tracing::debug!(fields = record.fields.len(), "draft written");
        Ok(())
    }

    /// The stored draft; a corrupt draft reads as absent.
    pub fn load(&self) -> Option<DraftRecord> {
        read_json(self.store.as_ref(), DRAFT_FORM_KEY)
    }

    pub fn clear(&self) -> Result<(), CoreError> {
        self.store.remove(DRAFT_FORM_KEY)
    }

    /// Decides the initial edit state.
    ///
    /// An explicit form id that exists in the catalog wins and is written as
    /// the draft right away. Otherwise an existing draft is restored, and its
    /// form id is adopted when none was given. Without either the session
    /// starts fresh.
    pub fn restore(
        &self,
        nav: NavigationContext,
        catalog: &FormCatalog,
        clock: &dyn Clock,
    ) -> Result<RestoredSession, CoreError> {
        if let Some(form) = nav.form_id.as_deref().and_then(|id| catalog.get(id)) {
            let layout = FormLayout::from_fields(form.fields.clone(), form.max_steps);
            self.write(&DraftRecord {
                name: form.name.clone(),
                fields: layout.fields().to_vec(),
                form_id: Some(form.id.clone()),
                max_steps: layout.max_steps(),
                last_edited: clock.now(),
            })?;
            tracing::info!(form = %form.id, "editing saved form");
            return Ok(RestoredSession {
                name: form.name,
                layout,
                nav,
                notice: None,
                source: RestoreSource::SavedForm,
            });
        }
        if let Some(id) = nav.form_id.as_deref() {
            tracing::warn!(form = id, "requested form is not in the catalog");
        }

        match self.load() {
            Some(draft) => {
                let mut nav = nav;
                if nav.form_id.is_none() {
                    nav.form_id = draft.form_id.clone();
                }
                let name = if draft.name.trim().is_empty() {
                    DEFAULT_FORM_NAME.to_string()
                } else {
                    draft.name.clone()
                };
                tracing::info!(fields = draft.fields.len(), "draft restored");
                Ok(RestoredSession {
                    name,
                    layout: draft.layout(),
                    nav,
                    notice: Some(DraftNotice {
                        last_edited: draft.last_edited,
                    }),
                    source: RestoreSource::Draft,
                })
            }
            None => Ok(RestoredSession::fresh(nav)),
        }
    }
}
