use std::fmt;

use serde::{Deserialize, Serialize};

pub type TaskId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// Display-only predicate over the task list. Never affects storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ORDER: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Exact text of the filter control for this filter.
    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "ALL",
            Filter::Active => "ACTIVE",
            Filter::Completed => "COMPLETED",
        }
    }

    /// Inverse of [`Filter::label`]. Matching is exact, no trimming or case folding.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|filter| filter.label() == label)
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
