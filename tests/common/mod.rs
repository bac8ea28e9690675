#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use formwright::{BuilderSettings, FormBuilder};
use formwright_core::{Clock, NavigationContext};
use formwright_storage_json::JsonFileStore;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Clock the test moves forward by hand.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap()),
        })
    }

    pub fn advance(&self, seconds: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::seconds(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// A JSON store rooted in a fresh directory that outlives the test.
pub fn temp_store() -> Arc<JsonFileStore> {
    let temp = TempDir::new().expect("create temp dir");
    let store = JsonFileStore::new(temp.path().join("data")).expect("create json store");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    Arc::new(store)
}

pub fn open_builder(
    store: &Arc<JsonFileStore>,
    clock: &Arc<ManualClock>,
    nav: NavigationContext,
) -> FormBuilder {
    FormBuilder::open(
        store.clone(),
        clock.clone(),
        BuilderSettings::default(),
        nav,
    )
    .expect("open builder")
}
