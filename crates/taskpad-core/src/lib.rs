//! Task list state, persistence and
//! view projection for the taskpad
//! front end. Nothing here touches a
//! DOM, so it runs and tests natively.

pub mod config;
pub mod controller;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;

pub use config::AppConfig;
pub use controller::{
  ClickTarget,
  Command,
  Controller,
  Interaction,
  Key,
  KeyTarget,
  Outcome
};
pub use storage::{
  KeyValueStore,
  MemoryStore,
  TaskRepository
};
pub use store::{
  AppState,
  Change,
  TaskStore
};
pub use task::{
  Filter,
  Task,
  TaskId
};
pub use view::{
  Entry,
  EntryMode,
  FilterButton,
  Renderer,
  ViewModel
};
