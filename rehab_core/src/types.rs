//! Core domain types for the rehab tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and the validated program they form
//! - Pain readings per joint
//! - Completed session records
//! - Range constants and clamping helpers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Ranges
// ============================================================================

/// First week of the progression schedule
pub const MIN_WEEK: u8 = 1;

/// Last week of the progression schedule
pub const MAX_WEEK: u8 = 6;

/// Shortest configurable rest interval, in seconds
pub const MIN_REST_SECONDS: u32 = 15;

/// Longest configurable rest interval, in seconds
pub const MAX_REST_SECONDS: u32 = 180;

/// Rest interval used when nothing else is configured
pub const DEFAULT_REST_SECONDS: u32 = 60;

/// Highest pain reading (0 means no pain)
pub const MAX_PAIN: u8 = 10;

/// Largest prescribed set count a program accepts for one exercise
pub const MAX_BASE_SETS: u32 = 50;

/// Clamp an arbitrary week value into the schedule
pub fn clamp_week(week: i64) -> u8 {
    week.clamp(MIN_WEEK as i64, MAX_WEEK as i64) as u8
}

/// Clamp a rest duration into the configurable range
pub fn clamp_rest_seconds(seconds: u32) -> u32 {
    seconds.clamp(MIN_REST_SECONDS, MAX_REST_SECONDS)
}

/// Clamp a pain reading into 0..=10
pub fn clamp_pain(value: i64) -> u8 {
    value.clamp(0, MAX_PAIN as i64) as u8
}

// ============================================================================
// Exercise Types
// ============================================================================

/// A single prescribed exercise
///
/// `reps` is free text because prescriptions mix counts, per-side counts and
/// holds ("15", "8/side", "30s"). `media_ref` is passed to the rendering
/// layer untouched.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    pub base_sets: u32,
    pub reps: String,
    pub media_ref: Option<String>,
}

/// Joints tracked with a pain slider
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Shoulder,
    Hip,
}

impl std::fmt::Display for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Joint::Shoulder => write!(f, "Shoulder"),
            Joint::Hip => write!(f, "Hip"),
        }
    }
}

/// Current pain readings, each in 0..=10
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PainReadings {
    pub shoulder: u8,
    pub hip: u8,
}

impl PainReadings {
    /// Set the reading for one joint, clamping into range
    pub fn set(&mut self, joint: Joint, value: i64) -> u8 {
        let value = clamp_pain(value);
        match joint {
            Joint::Shoulder => self.shoulder = value,
            Joint::Hip => self.hip = value,
        }
        value
    }

    pub fn get(&self, joint: Joint) -> u8 {
        match joint {
            Joint::Shoulder => self.shoulder,
            Joint::Hip => self.hip,
        }
    }
}

// ============================================================================
// Session Records
// ============================================================================

/// A completed pass through the whole program
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub week: u8,
    pub pain_shoulder: u8,
    pub pain_hip: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SessionRecord {
    /// Build a record for a session finished on `date`
    pub fn new(date: NaiveDate, week: u8, pain: PainReadings, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            week,
            pain_shoulder: pain.shoulder,
            pain_hip: pain.hip,
            notes,
        }
    }
}

impl std::fmt::Display for SessionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | Week {} | Shoulder: {} | Hip: {}",
            self.date, self.week, self.pain_shoulder, self.pain_hip
        )?;
        if let Some(ref notes) = self.notes {
            write!(f, " | {}", notes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_week() {
        assert_eq!(clamp_week(-3), 1);
        assert_eq!(clamp_week(0), 1);
        assert_eq!(clamp_week(4), 4);
        assert_eq!(clamp_week(99), 6);
    }

    #[test]
    fn test_clamp_rest_seconds() {
        assert_eq!(clamp_rest_seconds(0), 15);
        assert_eq!(clamp_rest_seconds(90), 90);
        assert_eq!(clamp_rest_seconds(600), 180);
    }

    #[test]
    fn test_pain_readings_clamp() {
        let mut pain = PainReadings::default();
        assert_eq!(pain.set(Joint::Shoulder, 14), 10);
        assert_eq!(pain.set(Joint::Hip, -2), 0);
        assert_eq!(pain.get(Joint::Shoulder), 10);
        assert_eq!(pain.get(Joint::Hip), 0);
    }

    #[test]
    fn test_record_without_notes_parses() {
        // Files written before notes existed
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000000",
            "date": "2025-03-01",
            "week": 2,
            "pain_shoulder": 3,
            "pain_hip": 1
        }"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.week, 2);
        assert!(record.notes.is_none());
    }

    #[test]
    fn test_record_display() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let record = SessionRecord::new(
            date,
            3,
            PainReadings { shoulder: 2, hip: 4 },
            Some("felt tight after rolling".into()),
        );
        assert_eq!(
            record.to_string(),
            "2025-03-01 | Week 3 | Shoulder: 2 | Hip: 4 | felt tight after rolling"
        );
    }
}
