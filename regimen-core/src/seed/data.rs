use crate::db::models::{ExerciseDefinition, MeasurementKind};

pub const MUSCLE_GROUPS: &[&str] = &[
    "Chest",
    "Back",
    "Shoulders",
    "Biceps",
    "Triceps",
    "Forearms",
    "Core",
    "Glutes",
    "Quadriceps",
    "Hamstrings",
    "Calves",
    "Cardiovascular",
];

// Bundled programs and workouts refer to these by position (first is id 1).
// Append new exercises at the end.
pub const EXERCISES: &[ExerciseDefinition] = &[
    ExerciseDefinition {
        name: "Barbell Bench Press",
        measurement: MeasurementKind::RepsWeight,
        muscle_groups: &["Chest", "Triceps", "Shoulders"],
    },
    ExerciseDefinition {
        name: "Barbell Row",
        measurement: MeasurementKind::RepsWeight,
        muscle_groups: &["Back", "Biceps"],
    },
    ExerciseDefinition {
        name: "Overhead Press",
        measurement: MeasurementKind::RepsWeight,
        muscle_groups: &["Shoulders", "Triceps"],
    },
    ExerciseDefinition {
        name: "Deadlift",
        measurement: MeasurementKind::RepsWeight,
        muscle_groups: &["Back", "Glutes", "Hamstrings"],
    },
    ExerciseDefinition {
        name: "Pull-up",
        measurement: MeasurementKind::Reps,
        muscle_groups: &["Back", "Biceps"],
    },
    ExerciseDefinition {
        name: "Push-up",
        measurement: MeasurementKind::Reps,
        muscle_groups: &["Chest", "Triceps"],
    },
    ExerciseDefinition {
        name: "Barbell Back Squat",
        measurement: MeasurementKind::RepsWeight,
        muscle_groups: &["Quadriceps", "Glutes", "Hamstrings"],
    },
    ExerciseDefinition {
        name: "Romanian Deadlift",
        measurement: MeasurementKind::RepsWeight,
        muscle_groups: &["Hamstrings", "Glutes"],
    },
    ExerciseDefinition {
        name: "Dumbbell Curl",
        measurement: MeasurementKind::RepsWeight,
        muscle_groups: &["Biceps", "Forearms"],
    },
    ExerciseDefinition {
        name: "Triceps Dip",
        measurement: MeasurementKind::Reps,
        muscle_groups: &["Triceps", "Chest"],
    },
    ExerciseDefinition {
        name: "Standing Calf Raise",
        measurement: MeasurementKind::RepsWeight,
        muscle_groups: &["Calves"],
    },
    ExerciseDefinition {
        name: "Plank",
        measurement: MeasurementKind::Time,
        muscle_groups: &["Core"],
    },
    ExerciseDefinition {
        name: "Hanging Leg Raise",
        measurement: MeasurementKind::Reps,
        muscle_groups: &["Core"],
    },
    ExerciseDefinition {
        name: "Running",
        measurement: MeasurementKind::TimeDistance,
        muscle_groups: &["Cardiovascular", "Quadriceps", "Calves"],
    },
    ExerciseDefinition {
        name: "Rowing Machine",
        measurement: MeasurementKind::TimeDistance,
        muscle_groups: &["Cardiovascular", "Back"],
    },
    ExerciseDefinition {
        name: "Jump Rope",
        measurement: MeasurementKind::Time,
        muscle_groups: &["Cardiovascular", "Calves"],
    },
    ExerciseDefinition {
        name: "Walking Lunge",
        measurement: MeasurementKind::RepsWeight,
        muscle_groups: &["Quadriceps", "Glutes"],
    },
    ExerciseDefinition {
        name: "Farmer's Carry",
        measurement: MeasurementKind::TimeDistance,
        muscle_groups: &["Forearms", "Core"],
    },
];

pub const PROGRAMS_JSON: &str = include_str!("programs.json");
pub const WORKOUTS_JSON: &str = include_str!("workouts.json");
