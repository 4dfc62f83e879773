//! Pure projection of [`AppState`] into what the page shows.
//!
//! The renderer holds no task data between calls, so rendering the same state
//! twice yields equal view models.

use crate::config::AppConfig;
use crate::store::AppState;
use crate::task::{Filter, Task, TaskId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewModel {
    pub entries: Vec<Entry>,
    pub status: String,
    pub filters: Vec<FilterButton>,
    /// Edit input that should take focus and select its text after this render.
    pub focus: Option<TaskId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: TaskId,
    pub index: usize,
    pub delay_ms: u64,
    pub mode: EntryMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryMode {
    Display {
        text: String,
        checked: bool,
        struck: bool,
        editable: bool,
    },
    Edit {
        draft: String,
        checked: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub filter: Filter,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    stagger_ms: u64,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl Renderer {
    pub fn new(cfg: &AppConfig) -> Self {
        Self {
            stagger_ms: cfg.entry_stagger_ms,
        }
    }

    #[tracing::instrument(skip_all, fields(filter = %state.filter, editing = ?state.editing))]
    pub fn render(&self, state: &AppState) -> ViewModel {
        let entries: Vec<Entry> = state
            .filtered()
            .enumerate()
            .map(|(index, task)| self.entry(index, task, state.is_editing(task.id)))
            .collect();

        let focus = state
            .editing
            .filter(|id| entries.iter().any(|e| e.id == *id));

        let (active, completed) = state.counts();
        tracing::trace!(shown = entries.len(), active, completed, "rendered view");

        ViewModel {
            entries,
            status: status_line(active, completed),
            filters: filter_buttons(state.filter),
            focus,
        }
    }

    fn entry(&self, index: usize, task: &Task, editing: bool) -> Entry {
        let mode = if editing {
            EntryMode::Edit {
                draft: task.text.clone(),
                checked: task.completed,
            }
        } else {
            EntryMode::Display {
                text: task.text.clone(),
                checked: task.completed,
                struck: task.completed,
                editable: !task.completed,
            }
        };

        Entry {
            id: task.id,
            index,
            delay_ms: self.stagger_ms.saturating_mul(index as u64),
            mode,
        }
    }
}

pub fn status_line(active: usize, completed: usize) -> String {
    format!("TASKS: {active} ACTIVE | {completed} COMPLETED")
}

pub fn filter_buttons(current: Filter) -> Vec<FilterButton> {
    Filter::ORDER
        .into_iter()
        .map(|filter| FilterButton {
            filter,
            label: filter.label(),
            selected: filter == current,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{EntryMode, Renderer, status_line};
    use crate::config::AppConfig;
    use crate::store::AppState;
    use crate::task::{Filter, Task};

    fn state() -> AppState {
        let mut done = Task::new(1, "ship it");
        done.completed = true;
        AppState::with_tasks(vec![done, Task::new(2, "write docs"), Task::new(3, "review")])
    }

    #[test]
    fn status_line_format() {
        assert_eq!(status_line(0, 1), "TASKS: 0 ACTIVE | 1 COMPLETED");
    }

    #[test]
    fn render_is_idempotent() {
        let renderer = Renderer::default();
        let mut state = state();
        state.editing = Some(2);
        assert_eq!(renderer.render(&state), renderer.render(&state));
    }

    #[test]
    fn display_mode_reflects_completion() {
        let view = Renderer::default().render(&state());

        assert_eq!(view.entries.len(), 3);
        assert_eq!(
            view.entries[0].mode,
            EntryMode::Display {
                text: "ship it".to_string(),
                checked: true,
                struck: true,
                editable: false,
            }
        );
        assert_eq!(
            view.entries[1].mode,
            EntryMode::Display {
                text: "write docs".to_string(),
                checked: false,
                struck: false,
                editable: true,
            }
        );
        assert_eq!(view.status, "TASKS: 2 ACTIVE | 1 COMPLETED");
        assert_eq!(view.focus, None);
    }

    #[test]
    fn edit_mode_prefills_and_focuses() {
        let mut state = state();
        state.editing = Some(3);
        let view = Renderer::default().render(&state);

        assert_eq!(
            view.entries[2].mode,
            EntryMode::Edit {
                draft: "review".to_string(),
                checked: false,
            }
        );
        assert_eq!(view.focus, Some(3));
        assert!(matches!(view.entries[1].mode, EntryMode::Display { .. }));
    }

    #[test]
    fn hidden_edit_target_gets_no_focus() {
        let mut state = state();
        state.editing = Some(2);
        state.filter = Filter::Completed;
        let view = Renderer::default().render(&state);
        assert_eq!(view.focus, None);
        assert_eq!(view.entries.len(), 1);
    }

    #[test]
    fn filter_highlight_and_counts_ignore_filter() {
        let mut state = state();
        state.filter = Filter::Active;
        let view = Renderer::default().render(&state);

        let selected: Vec<_> = view
            .filters
            .iter()
            .filter(|b| b.selected)
            .map(|b| b.label)
            .collect();
        assert_eq!(selected, vec!["ACTIVE"]);
        assert_eq!(view.entries.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(view.status, "TASKS: 2 ACTIVE | 1 COMPLETED");
    }

    #[test]
    fn entries_are_staggered_by_position() {
        let cfg = AppConfig {
            entry_stagger_ms: 20,
            ..AppConfig::default()
        };
        let mut state = state();
        state.filter = Filter::Active;
        let view = Renderer::new(&cfg).render(&state);

        let delays: Vec<_> = view.entries.iter().map(|e| (e.index, e.delay_ms)).collect();
        assert_eq!(delays, vec![(0, 0), (1, 20)]);
    }
}
