//! Wiring between the timer, the task registry and the session log.
//!
//! The coordinator is the single entry point for user actions. It owns the
//! three components, routes timer events to them and remembers which task
//! finished pomodoros are attributed to.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::events::Event;
use crate::notifier::Notifier;
use crate::session::{SessionLog, SessionStats};
use crate::storage::KeyValueStore;
use crate::task::{Task, TaskRegistry};
use crate::timer::{TimerEngine, TimerMode, TimerSnapshot};

pub struct Coordinator {
    timer: TimerEngine,
    tasks: TaskRegistry,
    sessions: SessionLog,
    notifier: Box<dyn Notifier>,
    selected_task_id: Option<String>,
}

impl Coordinator {
    pub fn new(tasks: TaskRegistry, sessions: SessionLog, notifier: Box<dyn Notifier>) -> Self {
        Self {
            timer: TimerEngine::new(),
            tasks,
            sessions,
            notifier,
            selected_task_id: None,
        }
    }

    /// Load both lists from `store` and start with a fresh timer.
    pub fn open(
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let tasks = TaskRegistry::load(store.clone(), clock.clone());
        let sessions = SessionLog::load(store, clock);
        Self::new(tasks, sessions, notifier)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.timer.snapshot()
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn session_log(&self) -> &SessionLog {
        &self.sessions
    }

    pub fn session_log_mut(&mut self) -> &mut SessionLog {
        &mut self.sessions
    }

    pub fn stats(&self) -> SessionStats {
        self.sessions.aggregate()
    }

    pub fn selected_task_id(&self) -> Option<&str> {
        self.selected_task_id.as_deref()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_task_id
            .as_deref()
            .and_then(|id| self.tasks.get(id))
    }

    // ── Task actions ─────────────────────────────────────────────────

    pub fn add_task(&mut self, title: &str, estimated_pomodoros: u32) -> Option<&Task> {
        self.tasks.add(title, estimated_pomodoros)
    }

    pub fn toggle_task_complete(&mut self, id: &str) -> bool {
        self.tasks.toggle_complete(id)
    }

    /// Remove a task; clears the selection if it pointed at it.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let removed = self.tasks.remove(id);
        if self.selected_task_id.as_deref() == Some(id) {
            self.selected_task_id = None;
        }
        removed
    }

    /// Select a task for attribution. Selecting the already selected task
    /// clears the selection; unknown ids are ignored.
    pub fn select_task(&mut self, id: &str) -> Option<&str> {
        if self.selected_task_id.as_deref() == Some(id) {
            self.selected_task_id = None;
        } else if self.tasks.contains(id) {
            self.selected_task_id = Some(id.to_string());
        }
        self.selected_task_id()
    }

    // ── Timer actions ────────────────────────────────────────────────

    pub fn toggle_timer(&mut self) -> Event {
        self.timer.toggle()
    }

    pub fn reset_timer(&mut self) -> Event {
        self.timer.reset()
    }

    pub fn switch_mode(&mut self, mode: TimerMode) -> Event {
        self.timer.switch_mode(mode)
    }

    /// Advance the timer one second and apply whatever it emitted.
    /// Returns the emitted events for display.
    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.timer.tick();
        for event in &events {
            self.handle(event);
        }
        events
    }

    fn handle(&mut self, event: &Event) {
        match *event {
            Event::LogSession {
                duration_secs,
                mode,
            } => {
                self.sessions
                    .append(duration_secs, mode, self.selected_task_id.clone());
            }
            Event::TimerCompleted { mode } => self.on_timer_complete(mode),
            _ => {}
        }
    }

    fn on_timer_complete(&mut self, mode: TimerMode) {
        if let Err(e) = self.notifier.play_cue() {
            warn!(error = %e, "audio cue failed");
        }

        if mode != TimerMode::Pomodoro {
            return;
        }
        if let Some(id) = self.selected_task_id.clone() {
            if !self.tasks.increment_completed_pomodoros(&id) {
                debug!(task_id = %id, "pomodoro not counted, task missing or already at estimate");
            }
        }
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("timer", &self.timer)
            .field("tasks", &self.tasks)
            .field("sessions", &self.sessions)
            .field("selected_task_id", &self.selected_task_id)
            .finish()
    }
}
