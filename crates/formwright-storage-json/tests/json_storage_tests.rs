use std::{fs, sync::Arc};

use chrono::{TimeZone, Utc};
use formwright_core::{
    storage::{KeyValueStore, DRAFT_FORM_KEY, SAVED_FORMS_KEY},
    DraftStore, FixedClock, FormCatalog, NavigationContext, RestoreSource, SaveRequest,
};
use formwright_domain::{Field, FieldType};
use formwright_storage_json::JsonFileStore;
use tempfile::tempdir;

#[test]
fn json_store_round_trips_entries() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("data")).expect("create store");

    assert_eq!(store.get("missing").expect("get"), None);
    store.set("greeting", r#"{"hello":"world"}"#).expect("set");
    let raw = store.get("greeting").expect("get").expect("present");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(parsed["hello"], "world");

    let path = store.entry_path("greeting");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());

    store.remove("greeting").expect("remove");
    assert!(!path.exists());
    store.remove("greeting").expect("removing twice is fine");
}

#[test]
fn json_store_lists_keys() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");
    store.set(SAVED_FORMS_KEY, "[]").expect("set");
    store.set(DRAFT_FORM_KEY, "{}").expect("set");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

    assert_eq!(
        store.keys().expect("keys"),
        vec![DRAFT_FORM_KEY.to_string(), SAVED_FORMS_KEY.to_string()]
    );
}

#[test]
fn catalog_and_draft_survive_reopening_the_store() {
    let dir = tempdir().expect("tempdir");
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap());

    {
        let store = Arc::new(JsonFileStore::new(dir.path().to_path_buf()).expect("store"));
        let catalog = FormCatalog::new(store, Arc::new(clock));
        catalog
            .save(SaveRequest {
                id: "form-1".into(),
                name: "Persisted".into(),
                fields: vec![Field::with_defaults("a", FieldType::Textarea, 1)],
                max_steps: 1,
            })
            .expect("save form");
    }

    let store = Arc::new(JsonFileStore::new(dir.path().to_path_buf()).expect("store"));
    let catalog = FormCatalog::new(store.clone(), Arc::new(clock));
    let form = catalog.get("form-1").expect("form persisted");
    assert_eq!(form.name, "Persisted");
    assert!(form.shareable_id.is_some());

    let drafts = DraftStore::new(store);
    let session = drafts
        .restore(NavigationContext::edit("form-1"), &catalog, &clock)
        .expect("restore");
    assert_eq!(session.source, RestoreSource::SavedForm);
    assert!(drafts.load().is_some());
}

#[test]
fn unreadable_catalog_degrades_to_empty() {
    let dir = tempdir().expect("tempdir");
    let store = Arc::new(JsonFileStore::new(dir.path().to_path_buf()).expect("store"));
    fs::write(store.entry_path(SAVED_FORMS_KEY), "not json").expect("write");

    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap());
    let catalog = FormCatalog::new(store, Arc::new(clock));
    assert!(catalog.list().is_empty());
}
