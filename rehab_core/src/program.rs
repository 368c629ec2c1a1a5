//! Exercise programs: the built-in protocol and validated custom lists.

use crate::config::ExerciseConfig;
use crate::types::{Exercise, MAX_BASE_SETS};
use crate::{Error, Result};
use once_cell::sync::Lazy;

/// Cached default program - built once and reused across all operations
static DEFAULT_PROGRAM: Lazy<Program> = Lazy::new(build_default_program_internal);

/// An ordered, non-empty list of exercises with positive set counts
///
/// The only way to obtain a `Program` is through validation, so the session
/// state machine can rely on `len() >= 1` and `1 <= base_sets <= MAX_BASE_SETS`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    exercises: Vec<Exercise>,
}

impl Program {
    /// Validate and wrap an exercise list
    pub fn new(exercises: Vec<Exercise>) -> Result<Self> {
        let errors = validate(&exercises);
        if !errors.is_empty() {
            return Err(Error::Config(errors.join("; ")));
        }
        Ok(Self { exercises })
    }

    /// Build a program from config entries
    ///
    /// Set counts are signed in the config file so that zero and negative
    /// values are reported rather than failing to parse.
    pub fn from_config(entries: &[ExerciseConfig]) -> Result<Self> {
        let mut exercises = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.base_sets <= 0 {
                return Err(Error::Config(format!(
                    "Exercise '{}': base_sets must be positive, got {}",
                    entry.name, entry.base_sets
                )));
            }
            let base_sets = u32::try_from(entry.base_sets).map_err(|_| {
                Error::Config(format!(
                    "Exercise '{}': base_sets {} is too large",
                    entry.name, entry.base_sets
                ))
            })?;
            exercises.push(Exercise {
                name: entry.name.clone(),
                base_sets,
                reps: entry.reps.clone(),
                media_ref: entry.media.clone(),
            });
        }
        Self::new(exercises)
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// Always false for a constructed program
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    /// Index of the final exercise
    pub fn last_index(&self) -> usize {
        self.exercises.len() - 1
    }
}

/// Check an exercise list, returning every problem found
pub fn validate(exercises: &[Exercise]) -> Vec<String> {
    let mut errors = Vec::new();

    if exercises.is_empty() {
        errors.push("Program has no exercises".to_string());
    }

    for (idx, exercise) in exercises.iter().enumerate() {
        if exercise.name.trim().is_empty() {
            errors.push(format!("Exercise #{} has an empty name", idx + 1));
        }
        if exercise.base_sets == 0 {
            errors.push(format!(
                "Exercise '{}': base_sets must be at least 1",
                exercise.name
            ));
        } else if exercise.base_sets > MAX_BASE_SETS {
            errors.push(format!(
                "Exercise '{}': base_sets {} exceeds the maximum of {}",
                exercise.name, exercise.base_sets, MAX_BASE_SETS
            ));
        }
    }

    errors
}

/// Get a reference to the cached default program
pub fn get_default_program() -> &'static Program {
    &DEFAULT_PROGRAM
}

/// Builds the default shoulder/hip protocol
///
/// **Note**: prefer `get_default_program()` which returns a cached
/// reference. This function is retained for tests that need an owned copy.
pub fn build_default_program() -> Program {
    build_default_program_internal()
}

fn exercise(name: &str, base_sets: u32, reps: &str, media: &str) -> Exercise {
    Exercise {
        name: name.into(),
        base_sets,
        reps: reps.into(),
        media_ref: Some(media.into()),
    }
}

fn build_default_program_internal() -> Program {
    Program {
        exercises: vec![
            // Shoulder
            exercise(
                "Side-Lying External Rotation",
                3,
                "15",
                "https://www.youtube.com/embed/6u8QpNmQy_g",
            ),
            exercise(
                "Prone Trap 3 Raise",
                3,
                "10",
                "https://www.youtube.com/embed/0G2_XV7slIg",
            ),
            exercise(
                "Half-Kneeling Landmine Press",
                3,
                "8/side",
                "https://www.youtube.com/embed/8R3dBfG9XwQ",
            ),
            // Hip
            exercise(
                "Wall Lean Glute Med Isometric",
                3,
                "30s",
                "https://www.youtube.com/embed/ydcy3dPf__M",
            ),
            exercise(
                "Slow Step-Down",
                3,
                "8/side",
                "https://www.youtube.com/embed/N3xWfQ2wZ9k",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program_loads() {
        let program = build_default_program();
        assert_eq!(program.len(), 5);
        assert_eq!(program.last_index(), 4);
        assert_eq!(program.exercises()[0].name, "Side-Lying External Rotation");
    }

    #[test]
    fn test_default_program_validates() {
        let errors = validate(build_default_program().exercises());
        assert!(
            errors.is_empty(),
            "Default program has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_cached_program_matches_fresh_build() {
        assert_eq!(get_default_program(), &build_default_program());
    }

    #[test]
    fn test_empty_program_rejected() {
        let result = Program::new(vec![]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_sets_rejected() {
        let result = Program::new(vec![Exercise {
            name: "Band Pull-Apart".into(),
            base_sets: 0,
            reps: "12".into(),
            media_ref: None,
        }]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_config_rejects_negative_sets() {
        let entries = vec![ExerciseConfig {
            name: "Dead Bug".into(),
            base_sets: -1,
            reps: "10".into(),
            media: None,
        }];
        match Program::from_config(&entries) {
            Err(Error::Config(msg)) => assert!(msg.contains("Dead Bug")),
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_config_rejects_oversized_sets() {
        let entries = vec![ExerciseConfig {
            name: "Pallof Press".into(),
            base_sets: 400_000_000,
            reps: "10".into(),
            media: None,
        }];
        match Program::from_config(&entries) {
            Err(Error::Config(msg)) => {
                assert!(msg.contains("Pallof Press"));
                assert!(msg.contains("maximum"));
            }
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_max_base_sets_accepted() {
        let program = Program::new(vec![Exercise {
            name: "Side Plank".into(),
            base_sets: MAX_BASE_SETS,
            reps: "20s".into(),
            media_ref: None,
        }])
        .unwrap();
        assert_eq!(program.exercises()[0].base_sets, MAX_BASE_SETS);
    }

    #[test]
    fn test_from_config_builds_program() {
        let entries = vec![
            ExerciseConfig {
                name: "Wall Slide".into(),
                base_sets: 2,
                reps: "10".into(),
                media: Some("wall-slide.mp4".into()),
            },
            ExerciseConfig {
                name: "Copenhagen Plank".into(),
                base_sets: 4,
                reps: "20s".into(),
                media: None,
            },
        ];
        let program = Program::from_config(&entries).unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(program.exercises()[1].base_sets, 4);
        assert_eq!(
            program.exercises()[0].media_ref.as_deref(),
            Some("wall-slide.mp4")
        );
    }
}
