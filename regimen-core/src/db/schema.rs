use std::fmt;

use crate::db::statements::Statement;

/// Every table the store manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    MuscleGroup,
    Exercise,
    ExerciseMuscleGroup,
    Program,
    Workout,
    ProgramWorkout,
    WorkoutExercise,
    WorkoutExerciseSet,
}

impl Table {
    /// Parents before children. Create in this order, drop in reverse.
    pub const ALL: [Table; 8] = [
        Table::MuscleGroup,
        Table::Exercise,
        Table::ExerciseMuscleGroup,
        Table::Program,
        Table::Workout,
        Table::ProgramWorkout,
        Table::WorkoutExercise,
        Table::WorkoutExerciseSet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::MuscleGroup => "muscle_group",
            Table::Exercise => "exercise",
            Table::ExerciseMuscleGroup => "exercise_muscle_group",
            Table::Program => "program",
            Table::Workout => "workout",
            Table::ProgramWorkout => "program_workout",
            Table::WorkoutExercise => "workout_exercise",
            Table::WorkoutExerciseSet => "workout_exercise_set",
        }
    }

    fn create_sql(&self) -> &'static str {
        match self {
            Table::MuscleGroup => {
                "CREATE TABLE muscle_group (
                    id INTEGER NOT NULL PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE
                )"
            }
            Table::Exercise => {
                "CREATE TABLE exercise (
                    id INTEGER NOT NULL PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    measurement TEXT NOT NULL
                        CHECK (measurement IN ('reps_weight', 'reps', 'time', 'time_distance'))
                )"
            }
            Table::ExerciseMuscleGroup => {
                "CREATE TABLE exercise_muscle_group (
                    exercise_id INTEGER NOT NULL REFERENCES exercise (id) ON DELETE CASCADE,
                    muscle_group_id INTEGER NOT NULL REFERENCES muscle_group (id) ON DELETE CASCADE,
                    PRIMARY KEY (exercise_id, muscle_group_id)
                )"
            }
            Table::Program => {
                "CREATE TABLE program (
                    id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    author TEXT NOT NULL,
                    created_at TEXT NOT NULL
                )"
            }
            Table::Workout => {
                "CREATE TABLE workout (
                    id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    description TEXT,
                    created_at TEXT NOT NULL
                )"
            }
            Table::ProgramWorkout => {
                "CREATE TABLE program_workout (
                    program_id INTEGER NOT NULL REFERENCES program (id) ON DELETE CASCADE,
                    workout_id INTEGER NOT NULL REFERENCES workout (id) ON DELETE CASCADE,
                    week INTEGER NOT NULL CHECK (week >= 1),
                    day INTEGER NOT NULL CHECK (day >= 1),
                    PRIMARY KEY (program_id, workout_id)
                )"
            }
            Table::WorkoutExercise => {
                "CREATE TABLE workout_exercise (
                    instance_id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                    workout_id INTEGER NOT NULL REFERENCES workout (id) ON DELETE CASCADE,
                    exercise_id INTEGER NOT NULL REFERENCES exercise (id),
                    order_index INTEGER NOT NULL,
                    UNIQUE (workout_id, order_index)
                )"
            }
            Table::WorkoutExerciseSet => {
                "CREATE TABLE workout_exercise_set (
                    workout_exercise_instance_id INTEGER NOT NULL
                        REFERENCES workout_exercise (instance_id) ON DELETE CASCADE,
                    set_index INTEGER NOT NULL,
                    reps INTEGER,
                    weight REAL,
                    time INTEGER,
                    distance REAL,
                    PRIMARY KEY (workout_exercise_instance_id, set_index)
                )"
            }
        }
    }

    pub fn create_statement(&self) -> Statement {
        Statement::new(self.create_sql())
    }

    pub fn drop_statement(&self) -> Statement {
        Statement::new(format!("DROP TABLE IF EXISTS {}", self.name()))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
