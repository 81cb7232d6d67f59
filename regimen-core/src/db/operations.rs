use log::debug;
use sqlx::SqlitePool;

use crate::db::gateway::{Gateway, SqliteGateway};
use crate::db::models::{
    Exercise, ExerciseInstanceView, MuscleGroup, Program, ProgramEdit, ProgramView,
    ProgramWorkout, Workout, WorkoutExercise, WorkoutExerciseSet, WorkoutView,
};
use crate::db::schema::Table;
use crate::db::statements;
use crate::error::Result;

// Tables

pub async fn count_rows(pool: &SqlitePool, table: Table) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Names of all user tables currently in the store, sorted.
pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(names)
}

// Reference data

pub async fn list_muscle_groups(pool: &SqlitePool) -> Result<Vec<MuscleGroup>> {
    let groups = sqlx::query_as::<_, MuscleGroup>("SELECT id, name FROM muscle_group ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(groups)
}

pub async fn list_exercises(pool: &SqlitePool) -> Result<Vec<Exercise>> {
    let exercises =
        sqlx::query_as::<_, Exercise>("SELECT id, name, measurement FROM exercise ORDER BY id")
            .fetch_all(pool)
            .await?;
    Ok(exercises)
}

/// Muscle group names linked to an exercise, in the order they were linked.
pub async fn exercise_muscle_groups(pool: &SqlitePool, exercise_id: i64) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT mg.name FROM exercise_muscle_group emg
         JOIN muscle_group mg ON mg.id = emg.muscle_group_id
         WHERE emg.exercise_id = ?1
         ORDER BY emg.rowid",
    )
    .bind(exercise_id)
    .fetch_all(pool)
    .await?;
    Ok(names)
}

// Programs

pub async fn list_programs(pool: &SqlitePool) -> Result<Vec<Program>> {
    let programs = sqlx::query_as::<_, Program>(
        "SELECT id, name, description, author, created_at FROM program ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(programs)
}

pub async fn get_program(pool: &SqlitePool, program_id: i64) -> Result<Option<Program>> {
    let program = sqlx::query_as::<_, Program>(
        "SELECT id, name, description, author, created_at FROM program WHERE id = ?1",
    )
    .bind(program_id)
    .fetch_optional(pool)
    .await?;
    Ok(program)
}

/// Applies a single-table edit to a program's own columns. Returns the
/// updated program, or `None` if no program has that id.
pub async fn edit_program(
    pool: &SqlitePool,
    program_id: i64,
    edit: &ProgramEdit,
) -> Result<Option<Program>> {
    let statement = statements::update_program(program_id, edit)?;
    let mut conn = pool.acquire().await?;
    SqliteGateway::new(&mut conn).execute(&statement).await?;
    drop(conn);
    debug!("Edited program #{}", program_id);
    get_program(pool, program_id).await
}

/// Loads a program with its workouts (in week/day order) and everything below them.
pub async fn load_program_view(pool: &SqlitePool, program_id: i64) -> Result<Option<ProgramView>> {
    let Some(program) = get_program(pool, program_id).await? else {
        return Ok(None);
    };

    let slots = sqlx::query_as::<_, ProgramWorkout>(
        "SELECT program_id, workout_id, week, day FROM program_workout
         WHERE program_id = ?1
         ORDER BY week, day, workout_id",
    )
    .bind(program_id)
    .fetch_all(pool)
    .await?;

    let mut workouts = Vec::with_capacity(slots.len());
    for slot in slots {
        if let Some(view) = load_workout_view(pool, slot.workout_id).await? {
            workouts.push(WorkoutView {
                slot: Some(slot),
                ..view
            });
        }
    }

    Ok(Some(ProgramView { program, workouts }))
}

// Workouts

pub async fn get_workout(pool: &SqlitePool, workout_id: i64) -> Result<Option<Workout>> {
    let workout = sqlx::query_as::<_, Workout>(
        "SELECT id, name, description, created_at FROM workout WHERE id = ?1",
    )
    .bind(workout_id)
    .fetch_optional(pool)
    .await?;
    Ok(workout)
}

/// Workouts not placed in any program.
pub async fn list_standalone_workouts(pool: &SqlitePool) -> Result<Vec<Workout>> {
    let workouts = sqlx::query_as::<_, Workout>(
        "SELECT w.id, w.name, w.description, w.created_at FROM workout w
         WHERE NOT EXISTS (SELECT 1 FROM program_workout pw WHERE pw.workout_id = w.id)
         ORDER BY w.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(workouts)
}

/// Loads a workout with its exercise instances and sets. The slot is filled
/// in when the workout belongs to a program.
pub async fn load_workout_view(pool: &SqlitePool, workout_id: i64) -> Result<Option<WorkoutView>> {
    let Some(workout) = get_workout(pool, workout_id).await? else {
        return Ok(None);
    };

    let slot = sqlx::query_as::<_, ProgramWorkout>(
        "SELECT program_id, workout_id, week, day FROM program_workout WHERE workout_id = ?1",
    )
    .bind(workout_id)
    .fetch_optional(pool)
    .await?;

    let instances = sqlx::query_as::<_, (i64, i64, i64, i64, String)>(
        "SELECT we.instance_id, we.workout_id, we.exercise_id, we.order_index, e.name
         FROM workout_exercise we
         JOIN exercise e ON e.id = we.exercise_id
         WHERE we.workout_id = ?1
         ORDER BY we.order_index",
    )
    .bind(workout_id)
    .fetch_all(pool)
    .await?;

    let mut exercises = Vec::with_capacity(instances.len());
    for (instance_id, workout_id, exercise_id, order_index, exercise_name) in instances {
        let sets = sqlx::query_as::<_, WorkoutExerciseSet>(
            "SELECT workout_exercise_instance_id, set_index, reps, weight, time, distance
             FROM workout_exercise_set
             WHERE workout_exercise_instance_id = ?1
             ORDER BY set_index",
        )
        .bind(instance_id)
        .fetch_all(pool)
        .await?;

        exercises.push(ExerciseInstanceView {
            instance: WorkoutExercise {
                instance_id,
                workout_id,
                exercise_id,
                order_index,
            },
            exercise_name,
            sets,
        });
    }

    Ok(Some(WorkoutView {
        workout,
        slot,
        exercises,
    }))
}
