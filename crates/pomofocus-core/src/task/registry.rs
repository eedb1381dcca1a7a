use std::rc::Rc;

use tracing::debug;

use super::Task;
use crate::clock::{unique_millis_id, Clock};
use crate::observer::Observers;
use crate::storage::{load_list, save_list, KeyValueStore, TASKS_KEY};

/// Owns the task list and mirrors it to the store.
///
/// Every successful mutation rewrites the whole list under
/// [`TASKS_KEY`] and then notifies observers. Invalid input and unknown
/// ids are silently ignored.
pub struct TaskRegistry {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    tasks: Vec<Task>,
    observers: Observers<Task>,
}

impl TaskRegistry {
    /// Load the persisted list. Missing or malformed data starts empty.
    pub fn load(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        let tasks = load_list(store.as_ref(), TASKS_KEY);
        debug!(count = tasks.len(), "loaded tasks");
        Self {
            store,
            clock,
            tasks,
            observers: Observers::default(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Register a callback run with the full list after every change.
    pub fn subscribe(&mut self, observer: impl Fn(&[Task]) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Append a new task. Returns `None` (and changes nothing) when the
    /// title is blank or the estimate is zero.
    pub fn add(&mut self, title: &str, estimated_pomodoros: u32) -> Option<&Task> {
        if title.trim().is_empty() || estimated_pomodoros == 0 {
            return None;
        }
        let id = unique_millis_id(self.clock.now_ms(), |candidate| self.contains(candidate));
        self.tasks.push(Task {
            id,
            title: title.to_string(),
            completed: false,
            estimated_pomodoros,
            completed_pomodoros: 0,
        });
        self.commit();
        self.tasks.last()
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.commit();
        true
    }

    pub fn toggle_complete(&mut self, id: &str) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        self.commit();
        true
    }

    /// Count one more finished pomodoro against the task, clamped at the
    /// estimate. Returns `false` for unknown ids and already-maxed tasks.
    pub fn increment_completed_pomodoros(&mut self, id: &str) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if task.is_maxed() {
            return false;
        }
        task.completed_pomodoros += 1;
        self.commit();
        true
    }

    fn commit(&self) {
        save_list(self.store.as_ref(), TASKS_KEY, &self.tasks);
        self.observers.notify(&self.tasks);
    }
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("tasks", &self.tasks)
            .field("observers", &self.observers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};
    use std::cell::Cell;

    fn registry() -> (TaskRegistry, Rc<MemoryStore>) {
        let store = Rc::new(MemoryStore::new());
        let clock = Rc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
        ));
        (TaskRegistry::load(store.clone(), clock), store)
    }

    #[test]
    fn add_rejects_blank_titles() {
        let (mut reg, store) = registry();
        assert!(reg.add("", 2).is_none());
        assert!(reg.add("   ", 2).is_none());
        assert!(reg.tasks().is_empty());
        assert!(store.get(TASKS_KEY).unwrap().is_none());
    }

    #[test]
    fn add_rejects_zero_estimate() {
        let (mut reg, _) = registry();
        assert!(reg.add("Write report", 0).is_none());
        assert!(reg.tasks().is_empty());
    }

    #[test]
    fn add_creates_fresh_task() {
        let (mut reg, _) = registry();
        let task = reg.add("Write report", 3).unwrap().clone();
        assert_eq!(task.title, "Write report");
        assert_eq!(task.estimated_pomodoros, 3);
        assert_eq!(task.completed_pomodoros, 0);
        assert!(!task.completed);
        assert_eq!(reg.tasks().len(), 1);
    }

    #[test]
    fn ids_are_unique_within_one_millisecond() {
        let (mut reg, _) = registry();
        let a = reg.add("a", 1).unwrap().id.clone();
        let b = reg.add("b", 1).unwrap().id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn every_mutation_persists_full_list() {
        let (mut reg, store) = registry();
        let id = reg.add("Write report", 2).unwrap().id.clone();
        reg.add("Review PR", 1);
        reg.toggle_complete(&id);

        let persisted: Vec<Task> =
            serde_json::from_str(&store.get(TASKS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, reg.tasks());
        assert!(persisted[0].completed);

        assert!(reg.remove(&id));
        let persisted: Vec<Task> =
            serde_json::from_str(&store.get(TASKS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].title, "Review PR");
    }

    #[test]
    fn toggle_flips_back_and_forth() {
        let (mut reg, _) = registry();
        let id = reg.add("t", 1).unwrap().id.clone();
        reg.toggle_complete(&id);
        reg.toggle_complete(&id);
        assert!(!reg.get(&id).unwrap().completed);
        assert!(!reg.toggle_complete("missing"));
    }

    #[test]
    fn increment_clamps_at_estimate() {
        let (mut reg, _) = registry();
        let id = reg.add("t", 2).unwrap().id.clone();
        assert!(reg.increment_completed_pomodoros(&id));
        assert!(reg.increment_completed_pomodoros(&id));
        for _ in 0..5 {
            assert!(!reg.increment_completed_pomodoros(&id));
        }
        assert_eq!(reg.get(&id).unwrap().completed_pomodoros, 2);
    }

    #[test]
    fn reload_restores_tasks() {
        let (mut reg, store) = registry();
        reg.add("Write report", 3);
        let clock = Rc::new(ManualClock::new(Utc::now()));
        let reloaded = TaskRegistry::load(store, clock);
        assert_eq!(reloaded.tasks(), reg.tasks());
    }

    #[test]
    fn malformed_store_starts_empty() {
        let store = Rc::new(MemoryStore::new());
        store.set(TASKS_KEY, "[{\"id\":").unwrap();
        let reg = TaskRegistry::load(store, Rc::new(ManualClock::new(Utc::now())));
        assert!(reg.tasks().is_empty());
    }

    #[test]
    fn observers_fire_once_per_mutation() {
        let (mut reg, _) = registry();
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        reg.subscribe(move |_| seen.set(seen.get() + 1));

        let id = reg.add("t", 1).unwrap().id.clone();
        reg.add("  ", 1);
        reg.increment_completed_pomodoros(&id);
        reg.increment_completed_pomodoros(&id);
        reg.remove("missing");
        assert_eq!(calls.get(), 2);
    }
}
