//! Session state machine.
//!
//! Tracks the active exercise and set, advances on set completion and turns
//! the final set of the final exercise into a `SessionRecord`. After a
//! completed session the machine loops back to the first exercise, so the
//! program is a repeatable cycle rather than a plan that halts.

use crate::program::Program;
use crate::progression::effective_sets;
use crate::types::{clamp_week, Exercise, Joint, PainReadings, SessionRecord, MIN_WEEK};
use chrono::NaiveDate;

/// Result of completing a set
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next set of the same exercise
    NextSet { set_index: u32 },
    /// Moved to the first set of the next exercise
    NextExercise { exercise_index: usize },
    /// The whole program was finished; indices are back at the start
    SessionComplete(SessionRecord),
}

/// Mutable progress through the program
///
/// Indices are kept in bounds by every transition: `exercise_index` is
/// always a valid program index and `set_index` is in
/// `1..=effective_sets(current exercise)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    week: u8,
    deload: bool,
    exercise_index: usize,
    set_index: u32,
    pain: PainReadings,
    notes: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(MIN_WEEK)
    }
}

impl SessionState {
    /// Start at the first set of the first exercise
    pub fn new(week: u8) -> Self {
        Self {
            week: clamp_week(week as i64),
            deload: false,
            exercise_index: 0,
            set_index: 1,
            pain: PainReadings::default(),
            notes: None,
        }
    }

    pub fn week(&self) -> u8 {
        self.week
    }

    pub fn deload(&self) -> bool {
        self.deload
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    pub fn set_index(&self) -> u32 {
        self.set_index
    }

    pub fn pain(&self) -> PainReadings {
        self.pain
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// The active exercise
    ///
    /// A state carried over from a longer program resolves to the final
    /// exercise of `program`.
    pub fn current_exercise<'a>(&self, program: &'a Program) -> &'a Exercise {
        &program.exercises()[self.exercise_index.min(program.last_index())]
    }

    /// Effective set count of the active exercise, recomputed on every call
    pub fn current_effective_sets(&self, program: &Program) -> u32 {
        effective_sets(
            self.current_exercise(program).base_sets,
            self.week,
            self.deload,
        )
    }

    /// Record completion of the active set
    pub fn advance_set(&mut self, program: &Program, today: NaiveDate) -> Advance {
        self.clamp_position(program);
        let total = self.current_effective_sets(program);

        if self.set_index < total {
            self.set_index += 1;
            tracing::debug!(
                "Exercise {} set {} of {}",
                self.exercise_index,
                self.set_index,
                total
            );
            Advance::NextSet {
                set_index: self.set_index,
            }
        } else if self.exercise_index < program.last_index() {
            self.exercise_index += 1;
            self.set_index = 1;
            tracing::debug!(
                "Moved to exercise {} ({})",
                self.exercise_index,
                self.current_exercise(program).name
            );
            Advance::NextExercise {
                exercise_index: self.exercise_index,
            }
        } else {
            Advance::SessionComplete(self.complete_session(today))
        }
    }

    /// Finish the session regardless of position
    ///
    /// Builds the record from the current week, pain readings and notes,
    /// then resets to the first set of the first exercise.
    pub fn complete_session(&mut self, today: NaiveDate) -> SessionRecord {
        let record = SessionRecord::new(today, self.week, self.pain, self.notes.take());
        self.exercise_index = 0;
        self.set_index = 1;
        tracing::info!("Session {} completed in week {}", record.id, record.week);
        record
    }

    /// Move the week by `delta`, clamped into 1..=6
    pub fn set_week(&mut self, program: &Program, delta: i64) -> u8 {
        self.week = clamp_week((self.week as i64).saturating_add(delta));
        self.clamp_position(program);
        self.week
    }

    /// Jump to an absolute week, clamped into 1..=6
    pub fn set_week_absolute(&mut self, program: &Program, week: i64) -> u8 {
        self.week = clamp_week(week);
        self.clamp_position(program);
        self.week
    }

    pub fn set_deload(&mut self, program: &Program, deload: bool) {
        self.deload = deload;
        self.clamp_position(program);
    }

    /// Update a pain reading, returning the stored (clamped) value
    pub fn set_pain(&mut self, joint: Joint, value: i64) -> u8 {
        self.pain.set(joint, value)
    }

    /// Attach notes to the session in progress; blank text clears them
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes.trim().to_string())
        };
    }

    // A shorter program or a shrinking set count would otherwise leave the
    // indices past the end.
    fn clamp_position(&mut self, program: &Program) {
        if self.exercise_index > program.last_index() {
            tracing::debug!(
                "Exercise index {} clamped to {}",
                self.exercise_index,
                program.last_index()
            );
            self.exercise_index = program.last_index();
        }
        let total = self.current_effective_sets(program);
        if self.set_index > total {
            tracing::debug!("Set index {} clamped to {}", self.set_index, total);
            self.set_index = total;
        }
    }
}
