#![forbid(unsafe_code)]

//! Core domain model and business logic for the rehab tracker.
//!
//! This crate provides:
//! - Domain types (exercises, pain readings, session records)
//! - The built-in exercise program and config-driven custom programs
//! - Week-based set progression with deload
//! - The session state machine and rest timer
//! - Persistence (JSON file store, CSV export)
//! - The `RehabTracker` facade with its observer interface

pub mod types;
pub mod error;
pub mod program;
pub mod config;
pub mod logging;
pub mod progression;
pub mod session;
pub mod timer;
pub mod store;
pub mod history;
pub mod export;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use program::{build_default_program, get_default_program, Program};
pub use config::Config;
pub use progression::{effective_sets, plan_for};
pub use session::{Advance, SessionState};
pub use timer::{RestTimer, TickHandle, TickOutcome, TimerState};
pub use store::{JsonFileStore, MemoryStore, ProgressStore};
pub use history::History;
pub use export::export_csv;
pub use tracker::{RehabTracker, SessionView, TrackerEvent, TrackerObserver};
