//! Rest timer.
//!
//! A cooperative one-second countdown. Every `start()` hands out a
//! `TickHandle` stamped with the timer's current generation; `pause()`,
//! `reset()` and expiry bump the generation, so a tick that was already
//! scheduled when the state moved on is recognised as stale and ignored.

use crate::types::{clamp_rest_seconds, DEFAULT_REST_SECONDS};
use std::time::Duration;

/// Coarse timer state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Expired,
}

/// Ticket for the scheduled tick of one run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickHandle {
    generation: u64,
}

/// What a tick did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Counted down one second
    Ticked { remaining: u32 },
    /// Reached zero on this tick; the alert fires now and only now
    Expired,
    /// Stale handle or timer not running; nothing changed
    Ignored,
}

#[derive(Clone, Debug)]
pub struct RestTimer {
    duration: u32,
    remaining: u32,
    state: TimerState,
    generation: u64,
}

impl Default for RestTimer {
    fn default() -> Self {
        Self::new(DEFAULT_REST_SECONDS)
    }
}

impl RestTimer {
    /// Idle timer with the given target, clamped into 15..=180 seconds
    pub fn new(duration: u32) -> Self {
        let duration = clamp_rest_seconds(duration);
        Self {
            duration,
            remaining: duration,
            state: TimerState::Idle,
            generation: 0,
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Begin or resume counting down
    ///
    /// Returns `None` when already running or when nothing is left to count.
    pub fn start(&mut self) -> Option<TickHandle> {
        if self.state == TimerState::Running || self.remaining == 0 {
            return None;
        }
        self.generation += 1;
        self.state = TimerState::Running;
        tracing::debug!("Rest timer started at {}s", self.remaining);
        Some(TickHandle {
            generation: self.generation,
        })
    }

    /// One elapsed second for the run identified by `handle`
    pub fn tick(&mut self, handle: TickHandle) -> TickOutcome {
        if self.state != TimerState::Running || handle.generation != self.generation {
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Expired;
            self.generation += 1;
            tracing::debug!("Rest timer expired");
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked {
                remaining: self.remaining,
            }
        }
    }

    /// Stop counting, keeping the remaining time
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Idle;
            self.generation += 1;
            tracing::debug!("Rest timer paused at {}s", self.remaining);
        }
    }

    /// Back to idle at the configured duration
    pub fn reset(&mut self) {
        self.reset_to(self.duration);
    }

    /// Back to idle at an arbitrary value; cancels any pending tick
    pub fn reset_to(&mut self, seconds: u32) {
        self.state = TimerState::Idle;
        self.remaining = seconds;
        self.generation += 1;
    }

    /// Change the target duration (clamped into 15..=180)
    ///
    /// A stopped timer also takes the new value as its remaining time. A
    /// running countdown keeps going and picks up the new target on reset.
    pub fn set_duration(&mut self, seconds: u32) -> u32 {
        self.duration = clamp_rest_seconds(seconds);
        if self.state != TimerState::Running {
            self.reset_to(self.duration);
        }
        self.duration
    }
}

/// Drive a countdown in real time
///
/// Sleeps `interval` between calls to `step` until it reports expiry
/// (returns true) or a stale/stopped tick (returns false).
pub fn drive<F>(interval: Duration, mut step: F) -> bool
where
    F: FnMut() -> TickOutcome,
{
    loop {
        std::thread::sleep(interval);
        match step() {
            TickOutcome::Ticked { .. } => continue,
            TickOutcome::Expired => return true,
            TickOutcome::Ignored => return false,
        }
    }
}
