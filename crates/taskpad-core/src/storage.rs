use std::collections::BTreeMap;

use anyhow::Context;
use tracing::{debug, error, info};

use crate::task::Task;

pub const DEFAULT_STORAGE_KEY: &str = "tasks";

/// Opaque string key-value store backing the task list.
///
/// Browsers provide `localStorage`; tests and hosts without one use [`MemoryStore`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the whole task sequence as one JSON array under a single key.
#[derive(Debug, Clone)]
pub struct TaskRepository<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> TaskRepository<S> {
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Missing or undecodable data yields an empty list; the failure is logged, never returned.
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Vec<Task> {
        let Some(raw) = self.backend.get(&self.key) else {
            debug!("no stored tasks, starting empty");
            return vec![];
        };

        match decode_tasks(&raw) {
            Ok(tasks) => {
                info!(count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "failed to load tasks, starting fresh");
                vec![]
            }
        }
    }

    /// Overwrites the stored value. A rejected write is logged and dropped.
    #[tracing::instrument(skip(self, tasks), fields(key = %self.key, count = tasks.len()))]
    pub fn save(&mut self, tasks: &[Task]) {
        let result = encode_tasks(tasks).and_then(|encoded| {
            self.backend
                .set(&self.key, &encoded)
                .with_context(|| format!("failed writing storage key {}", self.key))
        });

        match result {
            Ok(()) => debug!("saved tasks"),
            Err(err) => error!(error = %format!("{err:#}"), "failed to save tasks"),
        }
    }
}

fn decode_tasks(raw: &str) -> anyhow::Result<Vec<Task>> {
    serde_json::from_str(raw).context("stored tasks are not a valid task array")
}

fn encode_tasks(tasks: &[Task]) -> anyhow::Result<String> {
    serde_json::to_string(tasks).context("failed to serialize tasks")
}
