//! Tracker facade.
//!
//! `RehabTracker` owns the program, the session state machine, the rest
//! timer, the history log and the persistence collaborator. Every user
//! intent is a named method; after each transition the subscribed
//! observers receive a `TrackerEvent`.
//!
//! Persistence failures never abort a transition: loads fall back to
//! defaults and saves are reported as `PersistenceWarning` events while the
//! in-memory state carries on.

use crate::config::Config;
use crate::history::History;
use crate::program::Program;
use crate::progression::multiplier_percent;
use crate::session::{Advance, SessionState};
use crate::store::ProgressStore;
use crate::timer::{RestTimer, TickHandle, TickOutcome, TimerState};
use crate::types::{Joint, PainReadings, SessionRecord, MIN_WEEK};
use crate::Result;
use chrono::NaiveDate;

/// Something that happened to the tracker
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackerEvent {
    SetAdvanced { exercise_index: usize, set_index: u32 },
    ExerciseChanged { exercise_index: usize },
    SessionCompleted(SessionRecord),
    WeekChanged(u8),
    DeloadChanged(bool),
    PainChanged { joint: Joint, value: u8 },
    NotesChanged,
    RestDurationChanged(u32),
    TimerStarted { remaining: u32 },
    TimerTicked { remaining: u32 },
    TimerPaused { remaining: u32 },
    TimerReset { remaining: u32 },
    /// Fire-once alert: the rest interval has run out
    RestFinished,
    /// A save failed; in-memory state was kept
    PersistenceWarning(String),
}

/// Rendering-side subscriber
pub trait TrackerObserver {
    fn notify(&mut self, event: &TrackerEvent);
}

impl<F> TrackerObserver for F
where
    F: FnMut(&TrackerEvent),
{
    fn notify(&mut self, event: &TrackerEvent) {
        self(event)
    }
}

/// Everything a rendering surface needs to draw the current screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionView {
    pub week: u8,
    pub deload: bool,
    pub multiplier_percent: u32,
    pub exercise_index: usize,
    pub exercise_count: usize,
    pub exercise_name: String,
    pub reps: String,
    pub media_ref: Option<String>,
    pub set_index: u32,
    pub total_sets: u32,
    pub rest_remaining: u32,
    pub rest_duration: u32,
    pub timer_state: TimerState,
    pub pain: PainReadings,
    pub notes: Option<String>,
    pub sessions_completed: usize,
}

impl SessionView {
    /// "Set X of Y"
    pub fn set_progress(&self) -> String {
        format!("Set {} of {}", self.set_index, self.total_sets)
    }
}

pub struct RehabTracker<S: ProgressStore> {
    program: Program,
    state: SessionState,
    timer: RestTimer,
    history: History,
    store: S,
    observers: Vec<Box<dyn TrackerObserver>>,
}

impl<S: ProgressStore> RehabTracker<S> {
    /// Build a tracker, restoring week and history from `store`
    ///
    /// Load failures are logged and replaced by week 1 / empty history.
    pub fn new(program: Program, store: S, rest_seconds: u32) -> Self {
        let week = store.load_week().unwrap_or_else(|e| {
            tracing::warn!("Failed to load week: {}. Starting at week {}.", e, MIN_WEEK);
            MIN_WEEK
        });
        let history = History::load(&store).unwrap_or_else(|e| {
            tracing::warn!("Failed to load history: {}. Starting with empty history.", e);
            History::default()
        });

        tracing::info!(
            "Tracker ready: {} exercises, week {}, {} past sessions",
            program.len(),
            week,
            history.len()
        );

        Self {
            program,
            state: SessionState::new(week),
            timer: RestTimer::new(rest_seconds),
            history,
            store,
            observers: Vec::new(),
        }
    }

    /// Build from configuration; an invalid program is a startup error
    pub fn from_config(config: &Config, store: S) -> Result<Self> {
        let program = config.program()?;
        Ok(Self::new(program, store, config.rest_seconds()))
    }

    pub fn subscribe(&mut self, observer: impl TrackerObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn timer(&self) -> &RestTimer {
        &self.timer
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Snapshot for rendering
    pub fn view(&self) -> SessionView {
        let exercise = self.state.current_exercise(&self.program);
        SessionView {
            week: self.state.week(),
            deload: self.state.deload(),
            multiplier_percent: multiplier_percent(self.state.week()),
            exercise_index: self.state.exercise_index(),
            exercise_count: self.program.len(),
            exercise_name: exercise.name.clone(),
            reps: exercise.reps.clone(),
            media_ref: exercise.media_ref.clone(),
            set_index: self.state.set_index(),
            total_sets: self.state.current_effective_sets(&self.program),
            rest_remaining: self.timer.remaining(),
            rest_duration: self.timer.duration(),
            timer_state: self.timer.state(),
            pain: self.state.pain(),
            notes: self.state.notes().map(str::to_string),
            sessions_completed: self.history.len(),
        }
    }

    // ------------------------------------------------------------------
    // Session intents
    // ------------------------------------------------------------------

    /// Complete the active set; a finished program is recorded in history
    pub fn advance_set(&mut self, today: NaiveDate) -> Advance {
        let advance = self.state.advance_set(&self.program, today);
        match &advance {
            Advance::NextSet { set_index } => {
                let event = TrackerEvent::SetAdvanced {
                    exercise_index: self.state.exercise_index(),
                    set_index: *set_index,
                };
                self.emit(event);
            }
            Advance::NextExercise { exercise_index } => {
                self.emit(TrackerEvent::ExerciseChanged {
                    exercise_index: *exercise_index,
                });
            }
            Advance::SessionComplete(record) => {
                self.record_session(record.clone());
            }
        }
        advance
    }

    /// Finish the session now, wherever it is
    pub fn complete_session(&mut self, today: NaiveDate) -> SessionRecord {
        let record = self.state.complete_session(today);
        self.record_session(record.clone());
        record
    }

    fn record_session(&mut self, record: SessionRecord) {
        if let Err(e) = self.history.append(record.clone(), &mut self.store) {
            self.warn_persistence("history", e);
        }
        self.emit(TrackerEvent::SessionCompleted(record));
    }

    /// Shift the week by `delta`, clamped into 1..=6, and persist it
    pub fn set_week(&mut self, delta: i64) -> u8 {
        let week = self.state.set_week(&self.program, delta);
        self.persist_week(week);
        week
    }

    /// Jump to an absolute week, clamped into 1..=6, and persist it
    pub fn set_week_absolute(&mut self, week: i64) -> u8 {
        let week = self.state.set_week_absolute(&self.program, week);
        self.persist_week(week);
        week
    }

    fn persist_week(&mut self, week: u8) {
        if let Err(e) = self.store.save_week(week) {
            self.warn_persistence("week", e);
        }
        self.emit(TrackerEvent::WeekChanged(week));
    }

    pub fn set_deload(&mut self, deload: bool) {
        self.state.set_deload(&self.program, deload);
        self.emit(TrackerEvent::DeloadChanged(deload));
    }

    pub fn set_pain(&mut self, joint: Joint, value: i64) -> u8 {
        let value = self.state.set_pain(joint, value);
        self.emit(TrackerEvent::PainChanged { joint, value });
        value
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.state.set_notes(notes);
        self.emit(TrackerEvent::NotesChanged);
    }

    // ------------------------------------------------------------------
    // Timer intents
    // ------------------------------------------------------------------

    pub fn set_rest_duration(&mut self, seconds: u32) -> u32 {
        let seconds = self.timer.set_duration(seconds);
        self.emit(TrackerEvent::RestDurationChanged(seconds));
        seconds
    }

    pub fn start_timer(&mut self) -> Option<TickHandle> {
        let handle = self.timer.start()?;
        self.emit(TrackerEvent::TimerStarted {
            remaining: self.timer.remaining(),
        });
        Some(handle)
    }

    /// One elapsed second; emits `RestFinished` exactly once per expiry
    pub fn tick(&mut self, handle: TickHandle) -> TickOutcome {
        let outcome = self.timer.tick(handle);
        match outcome {
            TickOutcome::Ticked { remaining } => self.emit(TrackerEvent::TimerTicked { remaining }),
            TickOutcome::Expired => self.emit(TrackerEvent::RestFinished),
            TickOutcome::Ignored => {}
        }
        outcome
    }

    pub fn pause_timer(&mut self) {
        if self.timer.is_running() {
            self.timer.pause();
            self.emit(TrackerEvent::TimerPaused {
                remaining: self.timer.remaining(),
            });
        }
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
        self.emit(TrackerEvent::TimerReset {
            remaining: self.timer.remaining(),
        });
    }

    // ------------------------------------------------------------------

    fn warn_persistence(&mut self, what: &str, error: crate::Error) {
        let message = format!("Failed to save {}: {}", what, error);
        tracing::warn!("{}", message);
        self.emit(TrackerEvent::PersistenceWarning(message));
    }

    fn emit(&mut self, event: TrackerEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }
}
