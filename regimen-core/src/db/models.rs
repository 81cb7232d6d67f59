use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

// Measurement kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum MeasurementKind {
    RepsWeight,
    Reps,
    Time,
    TimeDistance,
}

impl MeasurementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKind::RepsWeight => "reps_weight",
            MeasurementKind::Reps => "reps",
            MeasurementKind::Time => "time",
            MeasurementKind::TimeDistance => "time_distance",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static definition of a built-in exercise, as bundled with the seed data.
#[derive(Debug, Clone, Copy)]
pub struct ExerciseDefinition {
    pub name: &'static str,
    pub measurement: MeasurementKind,
    pub muscle_groups: &'static [&'static str],
}

// Input records. These arrive fully shaped from the editor layer or from JSON
// and carry no store-generated identifiers.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub author: String,
    #[serde(default)]
    pub workouts: Vec<WorkoutRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub week: Option<i64>,
    #[serde(default)]
    pub day: Option<i64>,
    #[serde(default)]
    pub exercises: Vec<ExerciseInstanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseInstanceRecord {
    #[serde(alias = "id")]
    pub exercise_id: i64,
    #[serde(default)]
    pub sets: Vec<SetRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    #[serde(default)]
    pub reps: Option<i64>,
    #[serde(default)]
    pub weight: Option<f64>,
    /// Seconds.
    #[serde(default)]
    pub time: Option<i64>,
    /// Meters.
    #[serde(default)]
    pub distance: Option<f64>,
}

// Stored rows

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct MuscleGroup {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub measurement: MeasurementKind,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Program {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub author: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Workout {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ProgramWorkout {
    pub program_id: i64,
    pub workout_id: i64,
    pub week: i64,
    pub day: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct WorkoutExercise {
    pub instance_id: i64,
    pub workout_id: i64,
    pub exercise_id: i64,
    pub order_index: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WorkoutExerciseSet {
    pub workout_exercise_instance_id: i64,
    pub set_index: i64,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub time: Option<i64>,
    pub distance: Option<f64>,
}

impl fmt::Display for WorkoutExerciseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(weight) = self.weight {
            parts.push(format!("{:.1}kg", weight));
        }
        if let Some(reps) = self.reps {
            parts.push(format!("{} reps", reps));
        }
        if let Some(time) = self.time {
            parts.push(format!("{}s", time));
        }
        if let Some(distance) = self.distance {
            parts.push(format!("{:.0}m", distance));
        }
        if parts.is_empty() {
            write!(f, "Set {}: (empty)", self.set_index + 1)
        } else {
            write!(f, "Set {}: {}", self.set_index + 1, parts.join(" x "))
        }
    }
}

// Nested read views, reassembled from the stored rows.

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseInstanceView {
    pub instance: WorkoutExercise,
    pub exercise_name: String,
    pub sets: Vec<WorkoutExerciseSet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutView {
    pub workout: Workout,
    pub slot: Option<ProgramWorkout>,
    pub exercises: Vec<ExerciseInstanceView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramView {
    pub program: Program,
    pub workouts: Vec<WorkoutView>,
}

impl fmt::Display for WorkoutView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Some(slot) => writeln!(
                f,
                "Week {} Day {}: {} (#{})",
                slot.week, slot.day, self.workout.name, self.workout.id
            )?,
            None => writeln!(f, "{} (#{})", self.workout.name, self.workout.id)?,
        }
        for entry in &self.exercises {
            writeln!(
                f,
                "  {}. {}",
                entry.instance.order_index + 1,
                entry.exercise_name
            )?;
            for set in &entry.sets {
                writeln!(f, "     {}", set)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ProgramView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} by {}", self.program.name, self.program.author)?;
        if !self.program.description.is_empty() {
            writeln!(f, "{}", self.program.description)?;
        }
        for workout in &self.workouts {
            write!(f, "{}", workout)?;
        }
        Ok(())
    }
}

/// Single-table edit of a program's own columns. `None` leaves a column as is.
#[derive(Debug, Clone, Default)]
pub struct ProgramEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
}
