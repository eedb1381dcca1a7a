//! # Pomofocus Core Library
//!
//! This library provides the core logic for the Pomofocus Pomodoro timer.
//! The CLI binary is a thin shell over it: every user action goes through
//! the [`Coordinator`].
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven countdown state machine; the caller
//!   invokes `tick()` once per second while running
//! - **Task Registry**: the task list with pomodoro estimates
//! - **Session Log**: the history of completed intervals and the statistics
//!   derived from it
//! - **Storage**: a synchronous key-value store (SQLite or in-memory) and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TaskRegistry`]: Task persistence and pomodoro attribution
//! - [`SessionLog`]: Session history and [`SessionStats`]
//! - [`Coordinator`]: Routes timer events to the other components
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod notifier;
pub mod observer;
pub mod session;
pub mod storage;
pub mod task;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::Coordinator;
pub use error::{ConfigError, CoreError, StoreError};
pub use events::Event;
pub use notifier::{CommandNotifier, Notifier, SilentNotifier, TerminalBell};
pub use session::{format_minutes, DailySummary, Session, SessionLog, SessionStats};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use task::{Task, TaskRegistry};
pub use timer::{format_clock, TimerEngine, TimerMode, TimerSnapshot};
