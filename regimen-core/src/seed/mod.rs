//! Destructive schema reset and seeding.
//!
//! Nothing in here runs implicitly. Opening a database never resets it; the
//! only entry points are [`reset_database`] and [`reset_with`].

mod data;

use log::{debug, info};
use sqlx::SqlitePool;

use crate::cascade::{self, CascadeOptions, add_program, add_workout};
use crate::db::gateway::{Gateway, SqliteGateway};
use crate::db::models::{ExerciseDefinition, ProgramRecord, WorkoutRecord};
use crate::db::schema::Table;
use crate::db::statements;
use crate::error::Result;

pub use data::{EXERCISES, MUSCLE_GROUPS};

/// Everything a bootstrap writes after the tables exist.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub muscle_groups: &'static [&'static str],
    pub exercises: &'static [ExerciseDefinition],
    pub programs: Vec<ProgramRecord>,
    pub workouts: Vec<WorkoutRecord>,
}

impl SeedData {
    /// Reference data plus the example programs and standalone workouts
    /// compiled into the crate.
    pub fn bundled() -> Result<Self> {
        Ok(Self {
            programs: serde_json::from_str(data::PROGRAMS_JSON)?,
            workouts: serde_json::from_str(data::WORKOUTS_JSON)?,
            ..Self::reference_only()
        })
    }

    /// Muscle groups and exercises only.
    pub fn reference_only() -> Self {
        Self {
            muscle_groups: MUSCLE_GROUPS,
            exercises: EXERCISES,
            programs: Vec::new(),
            workouts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub program_ids: Vec<i64>,
    pub workout_ids: Vec<i64>,
}

pub async fn drop_all_tables<G: Gateway>(gateway: &mut G) -> Result<()> {
    for table in Table::ALL.iter().rev() {
        gateway.execute(&table.drop_statement()).await?;
    }
    Ok(())
}

pub async fn create_all_tables<G: Gateway>(gateway: &mut G) -> Result<()> {
    for table in Table::ALL {
        gateway.execute(&table.create_statement()).await?;
    }
    Ok(())
}

pub async fn populate_reference_data<G: Gateway>(gateway: &mut G, data: &SeedData) -> Result<()> {
    gateway
        .execute(&statements::populate_muscle_groups(data.muscle_groups)?)
        .await?;
    gateway
        .execute(&statements::populate_exercises(data.exercises)?)
        .await?;
    gateway
        .execute(&statements::populate_exercise_muscle_groups(
            data.exercises,
            data.muscle_groups,
        )?)
        .await?;
    debug!(
        "Populated {} muscle groups and {} exercises",
        data.muscle_groups.len(),
        data.exercises.len()
    );
    Ok(())
}

/// Drops and recreates every table, then writes `data`. Programs are seeded
/// before standalone workouts, one cascade at a time.
pub async fn bootstrap<G: Gateway>(
    gateway: &mut G,
    data: &SeedData,
    options: CascadeOptions,
) -> Result<SeedReport> {
    drop_all_tables(gateway).await?;
    create_all_tables(gateway).await?;
    populate_reference_data(gateway, data).await?;

    let mut report = SeedReport::default();
    for program in &data.programs {
        report
            .program_ids
            .push(add_program(gateway, program, options).await?);
    }
    for workout in &data.workouts {
        report
            .workout_ids
            .push(add_workout(gateway, workout, None, options).await?);
    }
    Ok(report)
}

/// Destroys all managed data and rebuilds the store from `data` in one
/// transaction.
pub async fn reset_with(
    pool: &SqlitePool,
    data: &SeedData,
    options: CascadeOptions,
) -> Result<SeedReport> {
    let mut tx = pool.begin().await?;
    let outcome = bootstrap(&mut SqliteGateway::new(&mut tx), data, options).await;
    cascade::finish(tx, outcome).await
}

/// Destroys all managed data and rebuilds the store from the bundled seed set.
pub async fn reset_database(pool: &SqlitePool, options: CascadeOptions) -> Result<SeedReport> {
    let data = SeedData::bundled()?;
    info!("Resetting database: dropping {} tables", Table::ALL.len());
    let report = reset_with(pool, &data, options).await?;
    info!(
        "Seeded {} muscle groups, {} exercises, {} programs, {} standalone workouts",
        data.muscle_groups.len(),
        data.exercises.len(),
        report.program_ids.len(),
        report.workout_ids.len()
    );
    Ok(report)
}
