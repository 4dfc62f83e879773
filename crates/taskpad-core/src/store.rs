use std::collections::BTreeSet;

use chrono::Utc;
use tracing::{debug, info, trace, warn};

use crate::storage::{KeyValueStore, TaskRepository};
use crate::task::{Filter, Task, TaskId};

/// Milliseconds since the Unix epoch. Seeds new task ids.
pub type Clock = fn() -> i64;

pub fn system_clock() -> i64 {
    Utc::now().timestamp_millis()
}

/// What a store operation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The task list changed and has already been persisted.
    Tasks,
    /// Only filter or editing state changed. Nothing was written.
    View,
}

type Subscriber = Box<dyn FnMut(Change, &AppState)>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub filter: Filter,
    pub editing: Option<TaskId>,
}

impl AppState {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks passing the current filter, in insertion order.
    pub fn filtered(&self) -> impl Iterator<Item = &Task> + '_ {
        let filter = self.filter;
        self.tasks.iter().filter(move |t| filter.matches(t))
    }

    /// `(active, completed)`.
    pub fn counts(&self) -> (usize, usize) {
        let active = self.tasks.iter().filter(|t| !t.completed).count();
        (active, self.tasks.len() - active)
    }

    pub fn is_editing(&self, id: TaskId) -> bool {
        self.editing == Some(id)
    }
}

/// Owns the task list plus filter and editing mode.
///
/// Every task mutation is written through the repository before the single
/// subscriber hears about it. Filter and editing changes only notify.
pub struct TaskStore<S> {
    state: AppState,
    repo: TaskRepository<S>,
    clock: Clock,
    subscriber: Option<Subscriber>,
}

impl<S: KeyValueStore> TaskStore<S> {
    #[tracing::instrument(skip(repo), fields(key = %repo.key()))]
    pub fn open(repo: TaskRepository<S>) -> Self {
        let tasks = repo.load();
        info!(count = tasks.len(), "opened task store");
        Self {
            state: AppState::with_tasks(tasks),
            repo,
            clock: system_clock,
            subscriber: None,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces any previous subscriber.
    pub fn subscribe(&mut self, subscriber: impl FnMut(Change, &AppState) + 'static) {
        self.subscriber = Some(Box::new(subscriber));
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn repository(&self) -> &TaskRepository<S> {
        &self.repo
    }

    pub fn filtered(&self) -> Vec<&Task> {
        self.state.filtered().collect()
    }

    /// Appends a new incomplete task. Blank text is ignored.
    #[tracing::instrument(skip(self))]
    pub fn add(&mut self, text: &str) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring blank task");
            return None;
        }

        let id = next_id((self.clock)(), &self.state.tasks);
        self.state.tasks.push(Task::new(id, text));
        debug!(id, "added task");
        self.commit();
        Some(id)
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: TaskId) {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| t.id != id);
        if self.state.tasks.len() == before {
            trace!(id, "delete of unknown task ignored");
            return;
        }

        if self.state.is_editing(id) {
            debug!(id, "deleted task was being edited, leaving edit mode");
            self.state.editing = None;
        }
        self.commit();
    }

    #[tracing::instrument(skip(self))]
    pub fn toggle(&mut self, id: TaskId) {
        let Some(task) = self.task_mut(id) else {
            trace!(id, "toggle of unknown task ignored");
            return;
        };
        task.completed = !task.completed;
        debug!(id, completed = task.completed, "toggled task");
        self.commit();
    }

    /// Completed tasks cannot be edited in place.
    #[tracing::instrument(skip(self))]
    pub fn start_editing(&mut self, id: TaskId) {
        match self.state.get(id) {
            Some(task) if !task.completed => {
                self.state.editing = Some(id);
                self.emit(Change::View);
            }
            Some(_) => trace!(id, "completed task is not editable"),
            None => trace!(id, "edit of unknown task ignored"),
        }
    }

    /// A blank edit cancels instead of deleting. Editing mode ends either way.
    #[tracing::instrument(skip(self))]
    pub fn update_text(&mut self, id: TaskId, new_text: &str) {
        let text = new_text.trim();
        let mut changed = false;
        if !text.is_empty() {
            if let Some(task) = self.task_mut(id) {
                task.text = text.to_string();
                changed = true;
            }
        }
        self.state.editing = None;

        if changed {
            debug!(id, "updated task text");
            self.commit();
        } else {
            debug!(id, "edit discarded");
            self.emit(Change::View);
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn cancel_editing(&mut self) {
        self.state.editing = None;
        self.emit(Change::View);
    }

    #[tracing::instrument(skip(self))]
    pub fn set_filter(&mut self, filter: Filter) {
        self.state.filter = filter;
        self.emit(Change::View);
    }

    /// Notifies the subscriber without changing anything. Used for the first paint.
    pub fn refresh(&mut self) {
        self.emit(Change::View);
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.state.tasks.iter_mut().find(|t| t.id == id)
    }

    fn commit(&mut self) {
        self.repo.save(&self.state.tasks);
        self.emit(Change::Tasks);
    }

    fn emit(&mut self, change: Change) {
        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber(change, &self.state);
        }
    }
}

/// Timestamp-derived id, bumped past every existing id so ids stay unique
/// when the clock stalls or runs backwards. A stored id at `TaskId::MAX`
/// leaves no room above it; the lowest free id is used instead.
fn next_id(now_millis: i64, tasks: &[Task]) -> TaskId {
    let now = TaskId::try_from(now_millis).unwrap_or(0);
    match tasks.iter().map(|t| t.id).max() {
        Some(max) if max >= now => max.checked_add(1).unwrap_or_else(|| lowest_free_id(tasks)),
        _ => now,
    }
}

fn lowest_free_id(tasks: &[Task]) -> TaskId {
    let taken: BTreeSet<TaskId> = tasks.iter().map(|t| t.id).collect();
    let id = (0..=TaskId::MAX)
        .find(|id| !taken.contains(id))
        .unwrap_or_default();
    warn!(id, "task ids exhausted above the newest; reusing a free slot");
    id
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{AppState, Change, TaskStore, next_id};
    use crate::storage::{KeyValueStore, MemoryStore, TaskRepository};
    use crate::task::{Filter, Task};

    fn fixed_clock() -> i64 {
        1_000
    }

    fn store_with(tasks: &[Task]) -> TaskStore<MemoryStore> {
        let raw = serde_json::to_string(tasks).expect("encode fixture");
        let repo = TaskRepository::new(MemoryStore::with_entry("tasks", &raw), "tasks");
        TaskStore::open(repo).with_clock(fixed_clock)
    }

    fn stored(store: &TaskStore<MemoryStore>) -> Vec<Task> {
        let raw = store
            .repository()
            .backend()
            .get("tasks")
            .expect("tasks key present");
        serde_json::from_str(&raw).expect("decode stored tasks")
    }

    fn done(id: u64, text: &str) -> Task {
        let mut task = Task::new(id, text);
        task.completed = true;
        task
    }

    #[test]
    fn add_appends_with_unique_id() {
        let mut store = store_with(&[Task::new(1_000, "a"), Task::new(1_001, "b")]);
        let (active_before, _) = store.state().counts();

        let id = store.add("  c  ").expect("task added");

        assert_eq!(id, 1_002);
        let last = store.state().tasks.last().expect("non-empty");
        assert_eq!(last, &Task::new(1_002, "c"));
        assert_eq!(store.state().counts().0, active_before + 1);
        assert_eq!(stored(&store), store.state().tasks);
    }

    #[test]
    fn add_uses_clock_when_ahead() {
        let mut store = store_with(&[Task::new(5, "old")]);
        assert_eq!(store.add("new"), Some(1_000));
    }

    #[test]
    fn add_after_max_id_takes_lowest_free_id() {
        let mut store = store_with(&[Task::new(u64::MAX, "x"), Task::new(0, "y")]);

        let id = store.add("new").expect("task added");

        assert_eq!(id, 1);
        let mut ids: Vec<u64> = store.state().tasks.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert_eq!(stored(&store), store.state().tasks);
    }

    #[test]
    fn add_ignores_blank_text() {
        let mut store = store_with(&[]);
        assert_eq!(store.add("   "), None);
        assert!(store.state().tasks.is_empty());
        assert!(store.repository().backend().get("tasks").is_some_and(|raw| raw == "[]"));
    }

    #[test]
    fn next_id_handles_negative_clock() {
        assert_eq!(next_id(-5, &[]), 0);
        assert_eq!(next_id(-5, &[Task::new(3, "x")]), 4);
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let mut store = store_with(&[Task::new(1, "a")]);
        let events = Rc::new(RefCell::new(0));
        let counter = events.clone();
        store.subscribe(move |_, _| *counter.borrow_mut() += 1);

        store.delete(99);

        assert_eq!(store.state().tasks, vec![Task::new(1, "a")]);
        assert_eq!(*events.borrow(), 0);
    }

    #[test]
    fn delete_clears_matching_edit() {
        let mut store = store_with(&[Task::new(1, "a"), Task::new(2, "b")]);
        store.start_editing(2);
        store.delete(1);
        assert_eq!(store.state().editing, Some(2));

        store.delete(2);
        assert_eq!(store.state().editing, None);
        assert!(stored(&store).is_empty());
    }

    #[test]
    fn toggle_twice_restores() {
        let original = vec![Task::new(1, "a"), done(2, "b"), Task::new(3, "c")];
        let mut store = store_with(&original);

        store.toggle(2);
        assert!(!store.state().get(2).expect("task 2").completed);
        store.toggle(2);

        assert_eq!(store.state().tasks, original);
        assert_eq!(stored(&store), original);
    }

    #[test]
    fn start_editing_does_not_persist_or_change_text() {
        let mut store = store_with(&[Task::new(1, "a")]);
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        store.subscribe(move |change, _| sink.borrow_mut().push(change));

        store.start_editing(1);

        assert_eq!(store.state().editing, Some(1));
        assert_eq!(store.state().get(1).expect("task").text, "a");
        assert_eq!(*changes.borrow(), vec![Change::View]);
    }

    #[test]
    fn start_editing_rejects_completed_and_unknown() {
        let mut store = store_with(&[done(1, "a")]);
        store.start_editing(1);
        store.start_editing(42);
        assert_eq!(store.state().editing, None);
    }

    #[test]
    fn blank_edit_cancels() {
        let mut store = store_with(&[Task::new(1, "buy milk")]);
        store.start_editing(1);
        store.update_text(1, "  ");

        assert_eq!(store.state().get(1).expect("task").text, "buy milk");
        assert_eq!(store.state().editing, None);
    }

    #[test]
    fn edit_stores_trimmed_text() {
        let mut store = store_with(&[Task::new(1, "old")]);
        store.start_editing(1);
        store.update_text(1, " new ");

        assert_eq!(store.state().get(1).expect("task").text, "new");
        assert_eq!(store.state().editing, None);
        assert_eq!(stored(&store), vec![Task::new(1, "new")]);
    }

    #[test]
    fn update_unknown_id_only_leaves_edit_mode() {
        let mut store = store_with(&[Task::new(1, "a")]);
        store.start_editing(1);
        store.update_text(7, "zzz");
        assert_eq!(store.state().editing, None);
        assert_eq!(store.state().tasks, vec![Task::new(1, "a")]);
    }

    #[test]
    fn filtered_preserves_order() {
        let mut store = store_with(&[
            done(1, "a"),
            Task::new(2, "b"),
            done(3, "c"),
            Task::new(4, "d"),
        ]);
        let ids = |store: &TaskStore<MemoryStore>| {
            store.filtered().iter().map(|t| t.id).collect::<Vec<_>>()
        };

        assert_eq!(ids(&store), vec![1, 2, 3, 4]);
        store.set_filter(Filter::Active);
        assert_eq!(ids(&store), vec![2, 4]);
        store.set_filter(Filter::Completed);
        assert_eq!(ids(&store), vec![1, 3]);
    }

    #[test]
    fn subscriber_sees_committed_state() {
        let mut store = store_with(&[]);
        let seen: Rc<RefCell<Vec<(Change, AppState)>>> = Rc::default();
        let sink = seen.clone();
        store.subscribe(move |change, state| sink.borrow_mut().push((change, state.clone())));

        store.add("write tests");
        store.set_filter(Filter::Completed);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, Change::Tasks);
        assert_eq!(seen[0].1.tasks.len(), 1);
        assert_eq!(seen[1].0, Change::View);
        assert_eq!(seen[1].1.filter, Filter::Completed);
    }
}
