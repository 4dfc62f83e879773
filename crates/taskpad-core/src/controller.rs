//! Turns parsed UI interactions into store operations.
//!
//! Hosts attach one listener per stable container (form, list, filter bar)
//! and describe what was hit as an [`Interaction`]. [`resolve`] is the only
//! place that decides which operation an interaction means.

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::storage::{KeyValueStore, TaskRepository};
use crate::store::{AppState, TaskStore};
use crate::task::{Filter, TaskId};
use crate::view::{Renderer, ViewModel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// New-task form submitted with the raw input value.
    Submit { value: String },
    /// Click inside the list. `hits` holds every control under the pointer,
    /// in any order.
    ListClick { hits: Vec<ClickTarget> },
    /// Key pressed while focus was inside the list.
    ListKey { key: Key, target: KeyTarget },
    /// Filter control clicked, identified by its text.
    FilterClick { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    Delete(TaskId),
    Label(TaskId),
    /// Confirm button of an edit row, with the live value of its input.
    Save { id: TaskId, value: String },
    Cancel(TaskId),
    Checkbox(TaskId),
}

impl ClickTarget {
    fn priority(&self) -> u8 {
        match self {
            ClickTarget::Delete(_) => 0,
            ClickTarget::Label(_) => 1,
            ClickTarget::Save { .. } => 2,
            ClickTarget::Cancel(_) => 3,
            ClickTarget::Checkbox(_) => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyTarget {
    EditInput { id: TaskId, value: String },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Delete(TaskId),
    Toggle(TaskId),
    StartEditing(TaskId),
    UpdateText(TaskId, String),
    CancelEditing,
    SetFilter(Filter),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub command: Option<Command>,
    /// The new-task input should be emptied.
    pub clear_input: bool,
}

/// Dispatch table from interaction to command. `None` means the event is ignored.
pub fn resolve(interaction: &Interaction, state: &AppState) -> Option<Command> {
    match interaction {
        Interaction::Submit { value } => {
            let text = value.trim();
            (!text.is_empty()).then(|| Command::Add(text.to_string()))
        }
        Interaction::ListClick { hits } => {
            let mut ranked: Vec<&ClickTarget> = hits.iter().collect();
            ranked.sort_by_key(|hit| hit.priority());
            ranked.into_iter().find_map(|hit| click_command(hit, state))
        }
        Interaction::ListKey {
            key,
            target: KeyTarget::EditInput { id, value },
        } => match key {
            Key::Enter => Some(Command::UpdateText(*id, value.clone())),
            Key::Escape => Some(Command::CancelEditing),
            Key::Other => None,
        },
        Interaction::ListKey { .. } => None,
        Interaction::FilterClick { label } => {
            let filter = Filter::from_label(label);
            if filter.is_none() {
                warn!(label = %label, "unknown filter control");
            }
            filter.map(Command::SetFilter)
        }
    }
}

fn click_command(hit: &ClickTarget, state: &AppState) -> Option<Command> {
    match hit {
        ClickTarget::Delete(id) => Some(Command::Delete(*id)),
        ClickTarget::Label(id) => match state.get(*id) {
            Some(task) if !task.completed => Some(Command::StartEditing(*id)),
            _ => None,
        },
        ClickTarget::Save { id, value } => Some(Command::UpdateText(*id, value.clone())),
        ClickTarget::Cancel(_) => Some(Command::CancelEditing),
        ClickTarget::Checkbox(id) => Some(Command::Toggle(*id)),
    }
}

/// Owns the store and forwards a fresh [`ViewModel`] to the host after every change.
pub struct Controller<S> {
    store: TaskStore<S>,
}

impl<S: KeyValueStore> Controller<S> {
    pub fn new(
        mut store: TaskStore<S>,
        renderer: Renderer,
        mut sink: impl FnMut(ViewModel) + 'static,
    ) -> Self {
        store.subscribe(move |change, state| {
            debug!(?change, "re-rendering");
            sink(renderer.render(state));
        });
        Self { store }
    }

    /// Loads the task list from `backend` using the configured key.
    pub fn open(backend: S, cfg: &AppConfig, sink: impl FnMut(ViewModel) + 'static) -> Self {
        let repo = TaskRepository::new(backend, cfg.storage_key.clone());
        Self::new(TaskStore::open(repo), Renderer::new(cfg), sink)
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    /// Startup paint.
    pub fn render_now(&mut self) {
        self.store.refresh();
    }

    #[tracing::instrument(skip(self))]
    pub fn handle(&mut self, interaction: Interaction) -> Outcome {
        let Some(command) = resolve(&interaction, self.store.state()) else {
            return Outcome::default();
        };

        let clear_input = matches!(command, Command::Add(_));
        self.execute(command.clone());
        Outcome {
            command: Some(command),
            clear_input,
        }
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Add(text) => {
                self.store.add(&text);
            }
            Command::Delete(id) => self.store.delete(id),
            Command::Toggle(id) => self.store.toggle(id),
            Command::StartEditing(id) => self.store.start_editing(id),
            Command::UpdateText(id, text) => self.store.update_text(id, &text),
            Command::CancelEditing => self.store.cancel_editing(),
            Command::SetFilter(filter) => self.store.set_filter(filter),
        }
    }
}
