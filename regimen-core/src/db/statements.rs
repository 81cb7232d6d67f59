//! Parameterized statement construction.
//!
//! Builders in this module never touch the store. They validate the record
//! they are given and return a [`Statement`] for a [`Gateway`](crate::db::gateway::Gateway)
//! to run. Inserts whose generated identifier is needed by a dependent row
//! (program, workout, workout exercise) end in a `RETURNING` clause.

use std::fmt;

use chrono::Utc;

use crate::db::models::{
    ExerciseDefinition, ProgramEdit, ProgramRecord, SetRecord, WorkoutRecord,
};
use crate::db::schema::Table;
use crate::error::{Error, Result};

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// SQL text with positional `?` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Multi-row `INSERT INTO table (cols) VALUES (?, ..), (?, ..)`.
    pub fn bulk_insert(table: Table, columns: &[&str], rows: Vec<Vec<Value>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::validation(format!(
                "bulk insert into {} needs at least one row",
                table
            )));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(Error::validation(format!(
                "bulk insert into {} expects {} values per row, got {}",
                table,
                columns.len(),
                bad.len()
            )));
        }

        let placeholders = format!("({})", vec!["?"; columns.len()].join(", "));
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            table,
            columns.join(", "),
            vec![placeholders; rows.len()].join(", ")
        );

        Ok(Self {
            sql,
            params: rows.into_iter().flatten().collect(),
        })
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.sql, self.params)
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{} is required", field)));
    }
    Ok(())
}

fn require_id(field: &str, value: i64) -> Result<()> {
    if value < 1 {
        return Err(Error::validation(format!(
            "{} must be a stored identifier, got {}",
            field, value
        )));
    }
    Ok(())
}

fn index_value(field: &str, index: usize) -> Result<i64> {
    i64::try_from(index).map_err(|_| Error::validation(format!("{} {} out of range", field, index)))
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

// Reference data. Ids are assigned by position so bundled workouts can refer
// to exercises by a stable number.

pub fn populate_muscle_groups(names: &[&str]) -> Result<Statement> {
    let rows = names
        .iter()
        .enumerate()
        .map(|(i, name)| -> Result<Vec<Value>> {
            require_text("muscle group name", name)?;
            Ok(vec![Value::Integer(index_value("muscle group", i)? + 1), (*name).into()])
        })
        .collect::<Result<Vec<_>>>()?;
    Statement::bulk_insert(Table::MuscleGroup, &["id", "name"], rows)
}

pub fn populate_exercises(exercises: &[ExerciseDefinition]) -> Result<Statement> {
    let rows = exercises
        .iter()
        .enumerate()
        .map(|(i, exercise)| -> Result<Vec<Value>> {
            require_text("exercise name", exercise.name)?;
            Ok(vec![
                Value::Integer(index_value("exercise", i)? + 1),
                exercise.name.into(),
                exercise.measurement.as_str().into(),
            ])
        })
        .collect::<Result<Vec<_>>>()?;
    Statement::bulk_insert(Table::Exercise, &["id", "name", "measurement"], rows)
}

/// Join rows for every exercise/muscle-group pair, resolving names to the
/// positional ids assigned by the two populate builders above.
pub fn populate_exercise_muscle_groups(
    exercises: &[ExerciseDefinition],
    muscle_groups: &[&str],
) -> Result<Statement> {
    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (i, exercise) in exercises.iter().enumerate() {
        let exercise_id = index_value("exercise", i)? + 1;
        for group in exercise.muscle_groups {
            let position = muscle_groups
                .iter()
                .position(|g| g == group)
                .ok_or_else(|| {
                    Error::validation(format!(
                        "exercise '{}' names unknown muscle group '{}'",
                        exercise.name, group
                    ))
                })?;
            let muscle_group_id = index_value("muscle group", position)? + 1;
            rows.push(vec![exercise_id.into(), muscle_group_id.into()]);
        }
    }
    Statement::bulk_insert(
        Table::ExerciseMuscleGroup,
        &["exercise_id", "muscle_group_id"],
        rows,
    )
}

// Cascade inserts

pub fn insert_program(program: &ProgramRecord) -> Result<Statement> {
    require_text("program name", &program.name)?;
    require_text("program author", &program.author)?;
    Ok(Statement::new(
        "INSERT INTO program (name, description, author, created_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(program.name.as_str())
    .bind(program.description.as_str())
    .bind(program.author.as_str())
    .bind(now()))
}

pub fn insert_workout(workout: &WorkoutRecord) -> Result<Statement> {
    require_text("workout name", &workout.name)?;
    Ok(Statement::new(
        "INSERT INTO workout (name, description, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(workout.name.as_str())
    .bind(workout.description.clone())
    .bind(now()))
}

/// Week and day are optional on a workout record but mandatory once the
/// workout is placed in a program.
pub fn insert_program_workout(
    program_id: i64,
    workout_id: i64,
    week: Option<i64>,
    day: Option<i64>,
) -> Result<Statement> {
    require_id("program id", program_id)?;
    require_id("workout id", workout_id)?;
    let week = week.ok_or_else(|| Error::validation("week is required for a program workout"))?;
    let day = day.ok_or_else(|| Error::validation("day is required for a program workout"))?;
    if week < 1 || day < 1 {
        return Err(Error::validation(format!(
            "program workout slot must be positive, got week {} day {}",
            week, day
        )));
    }
    Ok(Statement::new(
        "INSERT INTO program_workout (program_id, workout_id, week, day) VALUES (?, ?, ?, ?)",
    )
    .bind(program_id)
    .bind(workout_id)
    .bind(week)
    .bind(day))
}

pub fn insert_workout_exercise(
    workout_id: i64,
    exercise_id: i64,
    order_index: usize,
) -> Result<Statement> {
    require_id("workout id", workout_id)?;
    require_id("exercise id", exercise_id)?;
    Ok(Statement::new(
        "INSERT INTO workout_exercise (workout_id, exercise_id, order_index) VALUES (?, ?, ?) RETURNING instance_id",
    )
    .bind(workout_id)
    .bind(exercise_id)
    .bind(index_value("order index", order_index)?))
}

pub fn insert_workout_exercise_set(
    instance_id: i64,
    set_index: usize,
    set: &SetRecord,
) -> Result<Statement> {
    require_id("workout exercise instance id", instance_id)?;
    if set.reps.is_some_and(|v| v < 0) || set.time.is_some_and(|v| v < 0) {
        return Err(Error::validation(format!(
            "set {} has a negative reps or time value",
            set_index
        )));
    }
    for (field, value) in [("weight", set.weight), ("distance", set.distance)] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::validation(format!(
                    "set {} has an invalid {}: {}",
                    set_index, field, v
                )));
            }
        }
    }
    Ok(Statement::new(
        "INSERT INTO workout_exercise_set \
         (workout_exercise_instance_id, set_index, reps, weight, time, distance) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(instance_id)
    .bind(index_value("set index", set_index)?)
    .bind(set.reps)
    .bind(set.weight)
    .bind(set.time)
    .bind(set.distance))
}

// Single-table edits

pub fn update_program(program_id: i64, edit: &ProgramEdit) -> Result<Statement> {
    require_id("program id", program_id)?;
    if let Some(name) = &edit.name {
        require_text("program name", name)?;
    }
    if let Some(author) = &edit.author {
        require_text("program author", author)?;
    }
    Ok(Statement::new(
        "UPDATE program SET name = COALESCE(?, name), description = COALESCE(?, description), \
         author = COALESCE(?, author) WHERE id = ?",
    )
    .bind(edit.name.clone())
    .bind(edit.description.clone())
    .bind(edit.author.clone())
    .bind(program_id))
}
