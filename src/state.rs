use chrono::{Local, NaiveDate};

use crate::cursor::Cursors;
use crate::models::{Settings, SettingsFile, Task, TaskId, ViewMode};
use crate::storage::{Storage, StorageError};
use crate::store::TaskStore;

const SCHEMA_VERSION: u32 = 1;

const THEMES: [&str; 3] = ["dark", "light", "system"];
const ACCENTS: [&str; 3] = ["blue", "green", "dark-blue"];

/// Everything a shell needs to drive the app: the store, the date cursors,
/// the current view and the settings. Owned by the controller and passed by
/// reference; there is no global state.
#[derive(Debug)]
pub struct AppState {
    storage: Storage,
    store: TaskStore,
    cursors: Cursors,
    view: ViewMode,
    settings: Settings,
}

impl AppState {
    pub fn load(storage: Storage) -> Result<Self, StorageError> {
        Self::load_at(storage, Local::now().date_naive())
    }

    /// Loads settings and tasks and positions the cursors at `today`.
    /// Missing or unreadable settings fall back to defaults; unreadable task
    /// data is fatal because silently dropping it would lose user work.
    pub fn load_at(storage: Storage, today: NaiveDate) -> Result<Self, StorageError> {
        let settings = match storage.load_settings() {
            Ok(Some(file)) => file.settings,
            Ok(None) => Settings::default(),
            Err(err) => {
                log::warn!("settings unreadable, falling back to defaults: {err}");
                Settings::default()
            }
        };
        let store = TaskStore::load(storage.clone(), today)?;
        let cursors = Cursors::starting_at(today);
        let view = settings.default_view;
        Ok(Self {
            storage,
            store,
            cursors,
            view,
            settings,
        })
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// The bucket key the current view and cursor point at.
    pub fn active_key(&self) -> String {
        self.cursors.key(self.view)
    }

    pub fn step_forward(&mut self) {
        self.cursors.step_forward(self.view);
    }

    pub fn step_back(&mut self) {
        self.cursors.step_back(self.view);
    }

    /// Tasks under the active key, materializing the bucket if it is new.
    pub fn active_bucket(&mut self) -> &[Task] {
        let key = self.active_key();
        self.store.bucket(&key)
    }

    pub fn add_task(&mut self, name: &str) -> Result<Option<Task>, StorageError> {
        let key = self.active_key();
        self.store.add_task(&key, name)
    }

    pub fn mark_done(&mut self, id: TaskId) -> Result<bool, StorageError> {
        let key = self.active_key();
        self.store.mark_done(&key, id)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<bool, StorageError> {
        let key = self.active_key();
        self.store.delete_task(&key, id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Sanitizes and persists new settings. On a failed write the previous
    /// value is restored so memory and disk stay in step.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), StorageError> {
        let next = normalize_settings(settings);
        let previous = std::mem::replace(&mut self.settings, next);
        let file = SettingsFile {
            schema_version: SCHEMA_VERSION,
            settings: self.settings.clone(),
        };
        if let Err(err) = self.storage.save_settings(&file) {
            self.settings = previous;
            return Err(err);
        }
        Ok(())
    }
}

/// Unknown theme or accent names drop back to the defaults instead of being
/// handed to the shell verbatim.
fn normalize_settings(mut settings: Settings) -> Settings {
    let defaults = Settings::default();
    if !THEMES.contains(&settings.theme.as_str()) {
        settings.theme = defaults.theme;
    }
    if !ACCENTS.contains(&settings.accent.as_str()) {
        settings.accent = defaults.accent;
    }
    settings
}
