use anyhow::anyhow;
use taskpad_core::{
  KeyValueStore,
  MemoryStore
};

/// `localStorage` when the page has one,
/// otherwise an in-memory map that lives
/// as long as the tab.
pub enum BrowserStore {
  Local(web_sys::Storage),
  Memory(MemoryStore)
}

impl BrowserStore {
  pub fn detect() -> Self {
    let storage = web_sys::window()
      .and_then(|window| {
        window
          .local_storage()
          .ok()
          .flatten()
      });

    match storage {
      | Some(storage) => {
        BrowserStore::Local(storage)
      }
      | None => {
        tracing::warn!(
          "localStorage unavailable; \
           tasks will not survive a \
           reload"
        );
        BrowserStore::Memory(
          MemoryStore::new()
        )
      }
    }
  }
}

impl BrowserStore {
  pub fn kind(&self) -> &'static str {
    match self {
      | BrowserStore::Local(_) => {
        "localStorage"
      }
      | BrowserStore::Memory(_) => {
        "memory"
      }
    }
  }
}

impl KeyValueStore for BrowserStore {
  fn get(
    &self,
    key: &str
  ) -> Option<String> {
    match self {
      | BrowserStore::Local(storage) => {
        storage
          .get_item(key)
          .ok()
          .flatten()
      }
      | BrowserStore::Memory(memory) => {
        memory.get(key)
      }
    }
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    match self {
      | BrowserStore::Local(storage) => {
        storage
          .set_item(key, value)
          .map_err(|err| {
            anyhow!(
              "localStorage rejected \
               write: {err:?}"
            )
          })
      }
      | BrowserStore::Memory(memory) => {
        memory.set(key, value)
      }
    }
  }
}
