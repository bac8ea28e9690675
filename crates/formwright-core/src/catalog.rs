//! Saved forms and their submitted responses.

use std::sync::Arc;

use formwright_domain::{Field, Form, Response, ResponseData};

use crate::{
    ids,
    storage::{
        load_json, read_json, write_json, KeyValueStore, FORM_RESPONSES_KEY, SAVED_FORMS_KEY,
    },
    time::Clock,
    CoreError,
};

/// Input for [`FormCatalog::save`].
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub id: String,
    pub name: String,
    pub fields: Vec<Field>,
    pub max_steps: u32,
}

/// Durable list of finished forms, independent of any edit session.
#[derive(Clone)]
pub struct FormCatalog {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl FormCatalog {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Saved forms, newest first. An unreadable catalog reads as empty.
    pub fn list(&self) -> Vec<Form> {
        read_json(self.store.as_ref(), SAVED_FORMS_KEY).unwrap_or_default()
    }

    pub fn get(&self, id: &str) -> Option<Form> {
        self.list().into_iter().find(|form| form.id == id)
    }

    /// Looks a form up by internal id or shareable id.
    pub fn find_public(&self, key: &str) -> Option<Form> {
        self.list()
            .into_iter()
            .find(|form| form.matches_public_id(key))
    }

    /// Upserts a form. Existing records keep their shareable id, creation time
    /// and response counter; new records are prepended.
    pub fn save(&self, request: SaveRequest) -> Result<Form, CoreError> {
        if request.fields.is_empty() {
            return Err(CoreError::EmptyForm);
        }
        let now = self.clock.now();
        let mut forms = self.stored_forms()?;
        let existing = forms.iter().position(|form| form.id == request.id);

        let mut form = match existing {
            Some(index) => forms[index].clone(),
            None => Form::new(request.id.clone(), request.name.clone(), now),
        };
        form.name = request.name;
        form.fields = request.fields;
        form.max_steps = request.max_steps.max(form.total_steps());
        form.touch(now);
        if form.shareable_id.is_none() {
            form.shareable_id = Some(ids::shareable_id());
        }

        match existing {
            Some(index) => forms[index] = form.clone(),
            None => forms.insert(0, form.clone()),
        }
        write_json(self.store.as_ref(), SAVED_FORMS_KEY, &forms)?;
        tracing::info!(
            form = %form.id,
            shareable = form.shareable_id.as_deref().unwrap_or_default(),
            updated = existing.is_some(),
            "form saved"
        );
        Ok(form)
    }

    pub fn delete(&self, id: &str) -> Result<Form, CoreError> {
        let mut forms = self.stored_forms()?;
        let index = forms
            .iter()
            .position(|form| form.id == id)
            .ok_or_else(|| CoreError::FormNotFound(id.to_string()))?;
        let removed = forms.remove(index);
        write_json(self.store.as_ref(), SAVED_FORMS_KEY, &forms)?;
        tracing::info!(form = id, "form deleted");
        Ok(removed)
    }

    /// Appends a response to the log and bumps the form's counter. When the
    /// counter cannot be written the log is restored to its previous state.
    pub fn record_response(&self, form: &Form, data: ResponseData) -> Result<Response, CoreError> {
        let response = Response::new(form.id.clone(), form.name.clone(), self.clock.now(), data);
        let mut forms = self.stored_forms()?;
        let previous = self.store.get(FORM_RESPONSES_KEY)?;

        let mut responses: Vec<Response> =
            load_json(self.store.as_ref(), FORM_RESPONSES_KEY)?.unwrap_or_default();
        responses.push(response.clone());
        write_json(self.store.as_ref(), FORM_RESPONSES_KEY, &responses)?;

        if let Some(saved) = forms.iter_mut().find(|saved| saved.id == form.id) {
            saved.responses += 1;
            if let Err(err) = write_json(self.store.as_ref(), SAVED_FORMS_KEY, &forms) {
                self.restore_responses(previous.as_deref());
                return Err(err);
            }
        } else {
            tracing::warn!(form = %form.id, "response recorded for a form missing from the catalog");
        }
        tracing::info!(form = %form.id, "response recorded");
        Ok(response)
    }

    pub fn responses_for(&self, form_id: &str) -> Vec<Response> {
        self.all_responses()
            .into_iter()
            .filter(|response| response.form_id == form_id)
            .collect()
    }

    fn all_responses(&self) -> Vec<Response> {
        read_json(self.store.as_ref(), FORM_RESPONSES_KEY).unwrap_or_default()
    }

    /// Catalog contents for a write. Unlike [`Self::list`], an unparseable
    /// entry is an error so the write never replaces it with a shorter list.
    fn stored_forms(&self) -> Result<Vec<Form>, CoreError> {
        Ok(load_json(self.store.as_ref(), SAVED_FORMS_KEY)?.unwrap_or_default())
    }

    fn restore_responses(&self, previous: Option<&str>) {
        let restored = match previous {
            Some(raw) => self.store.set(FORM_RESPONSES_KEY, raw),
            None => self.store.remove(FORM_RESPONSES_KEY),
        };
        if let Err(err) = restored {
            tracing::warn!(error = %err, "failed to roll back the response log");
        }
    }
}

/// Public link for a saved form, falling back to the internal id.
pub fn share_link(form: &Form, base_url: &str) -> String {
    let key = form.shareable_id.as_deref().unwrap_or(&form.id);
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{storage::MemoryStore, time::FixedClock};
    use chrono::{TimeZone, Utc};
    use formwright_domain::{FieldType, FieldValue};

    fn catalog() -> (FormCatalog, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
        (FormCatalog::new(store.clone(), Arc::new(clock)), store)
    }

    fn request(id: &str) -> SaveRequest {
        SaveRequest {
            id: id.into(),
            name: "Contact".into(),
            fields: vec![Field::with_defaults("field-1", FieldType::Text, 1)],
            max_steps: 1,
        }
    }

    #[test]
    fn save_refuses_empty_forms() {
        let (catalog, store) = catalog();
        let mut empty = request("form-1");
        empty.fields.clear();
        assert!(matches!(catalog.save(empty), Err(CoreError::EmptyForm)));
        assert!(store.is_empty());
    }

    #[test]
    fn saving_twice_keeps_shareable_id() {
        let (catalog, _) = catalog();
        let first = catalog.save(request("form-1")).unwrap();
        let second = catalog.save(request("form-1")).unwrap();
        assert!(first.shareable_id.is_some());
        assert_eq!(first.shareable_id, second.shareable_id);
        assert_eq!(first.fields, second.fields);
        assert_eq!(catalog.list().len(), 1);
    }

    #[test]
    fn new_forms_are_prepended() {
        let (catalog, _) = catalog();
        catalog.save(request("form-1")).unwrap();
        catalog.save(request("form-2")).unwrap();
        let ids: Vec<_> = catalog.list().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["form-2", "form-1"]);
    }

    #[test]
    fn responses_increment_counter_and_survive_resave() {
        let (catalog, _) = catalog();
        let form = catalog.save(request("form-1")).unwrap();
        let mut data = ResponseData::new();
        data.insert("field-1".into(), FieldValue::text("hello"));
        catalog.record_response(&form, data).unwrap();

        assert_eq!(catalog.get("form-1").unwrap().responses, 1);
        assert_eq!(catalog.responses_for("form-1").len(), 1);

        catalog.save(request("form-1")).unwrap();
        assert_eq!(catalog.get("form-1").unwrap().responses, 1);
    }

    #[test]
    fn lookup_by_shareable_id_and_share_link() {
        let (catalog, _) = catalog();
        let form = catalog.save(request("form-1")).unwrap();
        let share = form.shareable_id.clone().unwrap();
        assert_eq!(catalog.find_public(&share).unwrap().id, "form-1");
        assert_eq!(
            share_link(&form, "https://forms.example/"),
            format!("https://forms.example/{share}")
        );
    }

    /// Store that refuses writes to one key.
    struct FailingKey {
        inner: MemoryStore,
        key: &'static str,
    }

    impl KeyValueStore for FailingKey {
        fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
            if key == self.key {
                return Err(CoreError::Storage(format!("{key} is read-only")));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), CoreError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn corrupted_catalog_is_never_overwritten() {
        let (catalog, store) = catalog();
        store.set(SAVED_FORMS_KEY, "[{\"id\": broken").unwrap();

        assert!(catalog.list().is_empty());
        assert!(matches!(
            catalog.save(request("form-1")),
            Err(CoreError::Storage(_))
        ));
        assert!(matches!(
            catalog.delete("form-1"),
            Err(CoreError::Storage(_))
        ));
        assert_eq!(
            store.get(SAVED_FORMS_KEY).unwrap().as_deref(),
            Some("[{\"id\": broken")
        );
    }

    #[test]
    fn date_only_records_survive_saving_another_form() {
        let (catalog, store) = catalog();
        let legacy = r#"[{
            "id": "form-1700000000000",
            "name": "Legacy survey",
            "createdAt": "2024-11-14",
            "updatedAt": "2024-11-14T09:00:00.000Z",
            "responses": 3,
            "fields": [{"id": "field-1", "type": "text", "label": "Name", "step": 1}]
        }]"#;
        store.set(SAVED_FORMS_KEY, legacy).unwrap();

        catalog.save(request("form-2")).unwrap();

        let forms = catalog.list();
        let ids: Vec<_> = forms.iter().map(|form| form.id.as_str()).collect();
        assert_eq!(ids, vec!["form-2", "form-1700000000000"]);
        assert_eq!(forms[1].responses, 3);
        assert_eq!(
            forms[1].created_at,
            Utc.with_ymd_and_hms(2024, 11, 14, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn failed_counter_write_rolls_back_the_response() {
        let (seed, seeded) = catalog();
        let form = seed.save(request("form-1")).unwrap();

        let store = Arc::new(FailingKey {
            inner: MemoryStore::new(),
            key: SAVED_FORMS_KEY,
        });
        let saved = seeded.get(SAVED_FORMS_KEY).unwrap().unwrap();
        store.inner.set(SAVED_FORMS_KEY, &saved).unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
        let catalog = FormCatalog::new(store.clone(), Arc::new(clock));

        let result = catalog.record_response(&form, ResponseData::new());
        assert!(matches!(result, Err(CoreError::Storage(_))));
        assert!(catalog.responses_for("form-1").is_empty());
        assert!(store.inner.get(FORM_RESPONSES_KEY).unwrap().is_none());
        assert_eq!(catalog.get("form-1").unwrap().responses, 0);
    }

    #[test]
    fn delete_unknown_form_is_an_error() {
        let (catalog, _) = catalog();
        assert!(matches!(
            catalog.delete("missing"),
            Err(CoreError::FormNotFound(_))
        ));
    }
}
