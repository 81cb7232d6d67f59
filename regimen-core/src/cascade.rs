//! Multi-table inserts for one program or workout graph.
//!
//! Each step returns the identifier its insert generated and hands it to the
//! steps below it as an argument. Inserts are awaited one after another; a
//! child row is never written before its parent's insert has returned.
//!
//! `add_program` and `add_workout` run on whatever [`Gateway`] they are given
//! and do not undo earlier inserts when a later one fails. `create_program`
//! and `create_workout` wrap them in a transaction on the pool so that a
//! failed call leaves no rows behind.

use log::{debug, info, warn};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::db::gateway::{Gateway, SqliteGateway};
use crate::db::models::{ProgramRecord, WorkoutRecord};
use crate::db::statements;
use crate::error::{Error, Result};

/// What to do with an exercise entry that carries no sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptySetPolicy {
    /// Stop processing the rest of the workout's exercise entries. Entries
    /// after the empty one are not inserted. This is the historical behaviour.
    #[default]
    HaltWorkout,
    /// Insert the empty entry and carry on with the next one.
    SkipInstance,
}

impl EmptySetPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "halt" | "halt_workout" => Some(EmptySetPolicy::HaltWorkout),
            "skip" | "skip_instance" => Some(EmptySetPolicy::SkipInstance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeOptions {
    pub empty_sets: EmptySetPolicy,
}

/// Inserts a workout and everything below it. When `program_id` is given the
/// workout is also placed in that program at its week/day slot.
///
/// Returns the generated workout id.
pub async fn add_workout<G: Gateway>(
    gateway: &mut G,
    workout: &WorkoutRecord,
    program_id: Option<i64>,
    options: CascadeOptions,
) -> Result<i64> {
    let workout_id = gateway
        .execute_returning_id(&statements::insert_workout(workout)?)
        .await?;
    debug!("Inserted workout '{}' as #{}", workout.name, workout_id);

    if let Some(program_id) = program_id {
        gateway
            .execute(&statements::insert_program_workout(
                program_id,
                workout_id,
                workout.week,
                workout.day,
            )?)
            .await?;
    }

    for (order_index, entry) in workout.exercises.iter().enumerate() {
        let instance_id = gateway
            .execute_returning_id(&statements::insert_workout_exercise(
                workout_id,
                entry.exercise_id,
                order_index,
            )?)
            .await?;

        if entry.sets.is_empty() {
            match options.empty_sets {
                EmptySetPolicy::HaltWorkout => {
                    warn!(
                        "Workout #{}: exercise entry {} has no sets, skipping the remaining {} entries",
                        workout_id,
                        order_index,
                        workout.exercises.len() - order_index - 1
                    );
                    break;
                }
                EmptySetPolicy::SkipInstance => continue,
            }
        }

        for (set_index, set) in entry.sets.iter().enumerate() {
            gateway
                .execute(&statements::insert_workout_exercise_set(
                    instance_id,
                    set_index,
                    set,
                )?)
                .await?;
        }
    }

    Ok(workout_id)
}

/// Inserts a program, then each of its workouts in order. Returns the
/// generated program id.
pub async fn add_program<G: Gateway>(
    gateway: &mut G,
    program: &ProgramRecord,
    options: CascadeOptions,
) -> Result<i64> {
    let program_id = gateway
        .execute_returning_id(&statements::insert_program(program)?)
        .await?;
    debug!("Inserted program '{}' as #{}", program.name, program_id);

    for workout in &program.workouts {
        add_workout(gateway, workout, Some(program_id), options).await?;
    }
    Ok(program_id)
}

/// Commits on success, rolls back otherwise. The cascade's own error wins
/// over a rollback failure.
pub(crate) async fn finish<T>(tx: Transaction<'static, Sqlite>, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                warn!("Rollback failed after '{}': {}", e, rollback);
            }
            Err(e)
        }
    }
}

/// Creates a program graph atomically.
pub async fn create_program(
    pool: &SqlitePool,
    program: &ProgramRecord,
    options: CascadeOptions,
) -> Result<i64> {
    let mut tx = pool.begin().await?;
    let outcome = add_program(&mut SqliteGateway::new(&mut tx), program, options).await;
    let program_id = finish(tx, outcome).await?;
    info!(
        "Created program '{}' (#{}) with {} workouts",
        program.name,
        program_id,
        program.workouts.len()
    );
    Ok(program_id)
}

/// Creates a workout graph atomically, optionally placing it in an existing
/// program.
pub async fn create_workout(
    pool: &SqlitePool,
    workout: &WorkoutRecord,
    program_id: Option<i64>,
    options: CascadeOptions,
) -> Result<i64> {
    if program_id.is_some() && (workout.week.is_none() || workout.day.is_none()) {
        return Err(Error::validation(format!(
            "workout '{}' needs a week and day to join a program",
            workout.name
        )));
    }
    let mut tx = pool.begin().await?;
    let outcome = add_workout(&mut SqliteGateway::new(&mut tx), workout, program_id, options).await;
    let workout_id = finish(tx, outcome).await?;
    info!("Created workout '{}' (#{})", workout.name, workout_id);
    Ok(workout_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::gateway::RecordingGateway;
    use crate::db::models::{ExerciseInstanceRecord, SetRecord};
    use crate::db::statements::Value;
    use crate::db::{self, Table, operations};
    use crate::seed::{self, SeedData};

    fn set(reps: i64, weight: f64) -> SetRecord {
        SetRecord {
            reps: Some(reps),
            weight: Some(weight),
            ..Default::default()
        }
    }

    fn entry(exercise_id: i64, sets: Vec<SetRecord>) -> ExerciseInstanceRecord {
        ExerciseInstanceRecord { exercise_id, sets }
    }

    fn workout(name: &str, slot: Option<(i64, i64)>, exercises: Vec<ExerciseInstanceRecord>) -> WorkoutRecord {
        WorkoutRecord {
            name: name.into(),
            description: None,
            week: slot.map(|s| s.0),
            day: slot.map(|s| s.1),
            exercises,
        }
    }

    fn five_by_five() -> ProgramRecord {
        ProgramRecord {
            name: "5x5".into(),
            description: String::new(),
            author: "coach".into(),
            workouts: vec![workout(
                "Day A",
                Some((1, 1)),
                vec![entry(7, vec![set(5, 100.0), set(5, 105.0)])],
            )],
        }
    }

    fn int(v: &Value) -> i64 {
        match v {
            Value::Integer(i) => *i,
            other => panic!("expected integer, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn program_cascade_threads_parent_ids_into_children() {
        let mut gateway = RecordingGateway::default();
        let program_id = add_program(&mut gateway, &five_by_five(), CascadeOptions::default())
            .await
            .unwrap();
        assert_eq!(program_id, 1);

        let sql: Vec<_> = gateway.statements.iter().map(|s| s.sql()).collect();
        assert!(sql[0].starts_with("INSERT INTO program "));
        assert!(sql[1].starts_with("INSERT INTO workout "));
        assert!(sql[2].starts_with("INSERT INTO program_workout "));
        assert!(sql[3].starts_with("INSERT INTO workout_exercise "));
        assert!(sql[4].starts_with("INSERT INTO workout_exercise_set "));
        assert!(sql[5].starts_with("INSERT INTO workout_exercise_set "));
        assert_eq!(sql.len(), 6);

        // program #1, workout #2, instance #3
        let link = gateway.statements[2].params();
        assert_eq!((int(&link[0]), int(&link[1])), (1, 2));
        assert_eq!(int(&gateway.statements[3].params()[0]), 2);
        for (i, stmt) in gateway.statements[4..].iter().enumerate() {
            assert_eq!(int(&stmt.params()[0]), 3);
            assert_eq!(int(&stmt.params()[1]), i as i64);
        }
    }

    #[tokio::test]
    async fn standalone_workout_writes_no_program_link() {
        let mut gateway = RecordingGateway::default();
        let standalone = workout("Mobility", None, vec![entry(3, vec![set(10, 0.0)])]);
        add_workout(&mut gateway, &standalone, None, CascadeOptions::default())
            .await
            .unwrap();
        assert!(gateway.sql_starting_with("INSERT INTO program_workout").is_empty());
        assert_eq!(gateway.statements.len(), 3);
    }

    #[tokio::test]
    async fn empty_workout_is_just_the_workout_row() {
        let mut gateway = RecordingGateway::default();
        add_workout(&mut gateway, &workout("Rest", Some((1, 7)), vec![]), Some(4), CascadeOptions::default())
            .await
            .unwrap();
        assert_eq!(gateway.statements.len(), 2);
    }

    #[tokio::test]
    async fn linked_workout_without_slot_is_a_validation_error() {
        let mut gateway = RecordingGateway::default();
        let err = add_workout(&mut gateway, &workout("Day B", None, vec![]), Some(1), CascadeOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    fn workout_with_empty_middle_entry() -> WorkoutRecord {
        workout(
            "Day A",
            None,
            vec![
                entry(1, vec![set(5, 60.0)]),
                entry(2, vec![]),
                entry(3, vec![set(8, 20.0), set(8, 20.0)]),
            ],
        )
    }

    // Historical behaviour: an entry without sets ends the workout's cascade.
    #[tokio::test]
    async fn empty_sets_halt_the_rest_of_the_workout_by_default() {
        let mut gateway = RecordingGateway::default();
        add_workout(&mut gateway, &workout_with_empty_middle_entry(), None, CascadeOptions::default())
            .await
            .unwrap();
        assert_eq!(gateway.sql_starting_with("INSERT INTO workout_exercise ").len(), 2);
        assert_eq!(gateway.sql_starting_with("INSERT INTO workout_exercise_set").len(), 1);
    }

    #[tokio::test]
    async fn empty_sets_skip_only_that_entry_when_asked() {
        let mut gateway = RecordingGateway::default();
        let options = CascadeOptions {
            empty_sets: EmptySetPolicy::SkipInstance,
        };
        add_workout(&mut gateway, &workout_with_empty_middle_entry(), None, options)
            .await
            .unwrap();
        let instances = gateway.sql_starting_with("INSERT INTO workout_exercise ");
        assert_eq!(instances.len(), 3);
        assert_eq!(int(&instances[2].params()[2]), 2);
        assert_eq!(gateway.sql_starting_with("INSERT INTO workout_exercise_set").len(), 3);
    }

    #[tokio::test]
    async fn halted_workout_does_not_stop_the_next_program_workout() {
        let mut gateway = RecordingGateway::default();
        let mut program = five_by_five();
        program.workouts.insert(0, {
            let mut w = workout_with_empty_middle_entry();
            w.week = Some(1);
            w.day = Some(1);
            w
        });
        program.workouts[1].day = Some(3);
        add_program(&mut gateway, &program, CascadeOptions::default())
            .await
            .unwrap();
        assert_eq!(gateway.sql_starting_with("INSERT INTO workout (").len(), 2);
        assert_eq!(gateway.sql_starting_with("INSERT INTO workout_exercise_set").len(), 3);
    }

    #[tokio::test]
    async fn failure_aborts_the_remaining_cascade() {
        // program, workout, link, instance, then fail on the first set
        let mut gateway = RecordingGateway::failing_at(4);
        let err = add_program(&mut gateway, &five_by_five(), CascadeOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_store());
        assert_eq!(gateway.statements.len(), 4);
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!(EmptySetPolicy::parse("halt"), Some(EmptySetPolicy::HaltWorkout));
        assert_eq!(EmptySetPolicy::parse(" Skip "), Some(EmptySetPolicy::SkipInstance));
        assert_eq!(EmptySetPolicy::parse("ignore"), None);
    }

    async fn reference_pool() -> SqlitePool {
        let pool = db::connect_in_memory().await.unwrap();
        seed::reset_with(&pool, &SeedData::reference_only(), CascadeOptions::default())
            .await
            .unwrap();
        pool
    }

    async fn seeded_pool() -> SqlitePool {
        let pool = db::connect_in_memory().await.unwrap();
        seed::reset_database(&pool, CascadeOptions::default()).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn five_by_five_lands_in_the_store() {
        let pool = seeded_pool().await;
        let before: Vec<i64> = {
            let mut counts = Vec::new();
            for table in Table::ALL {
                counts.push(operations::count_rows(&pool, table).await.unwrap());
            }
            counts
        };

        let program_id = create_program(&pool, &five_by_five(), CascadeOptions::default())
            .await
            .unwrap();

        let added = |table: Table| {
            let pool = pool.clone();
            let before = before[Table::ALL.iter().position(|t| *t == table).unwrap()];
            async move { operations::count_rows(&pool, table).await.unwrap() - before }
        };
        assert_eq!(added(Table::Program).await, 1);
        assert_eq!(added(Table::Workout).await, 1);
        assert_eq!(added(Table::ProgramWorkout).await, 1);
        assert_eq!(added(Table::WorkoutExercise).await, 1);
        assert_eq!(added(Table::WorkoutExerciseSet).await, 2);

        let view = operations::load_program_view(&pool, program_id)
            .await
            .unwrap()
            .unwrap();
        let day_a = &view.workouts[0];
        let slot = day_a.slot.as_ref().unwrap();
        assert_eq!((slot.program_id, slot.week, slot.day), (program_id, 1, 1));
        assert_eq!(day_a.exercises.len(), 1);
        let instance = &day_a.exercises[0];
        assert_eq!(instance.instance.exercise_id, 7);
        assert_eq!(instance.instance.order_index, 0);
        let sets = &instance.sets;
        assert_eq!(sets.len(), 2);
        assert_eq!((sets[0].set_index, sets[0].reps, sets[0].weight), (0, Some(5), Some(100.0)));
        assert_eq!((sets[1].set_index, sets[1].reps, sets[1].weight), (1, Some(5), Some(105.0)));
        assert!(sets.iter().all(|s| s.time.is_none() && s.distance.is_none()));
    }

    #[tokio::test]
    async fn counts_and_indices_follow_the_input_graph() {
        let pool = reference_pool().await;

        let program = ProgramRecord {
            name: "Upper/Lower".into(),
            description: "Four days a week".into(),
            author: "coach".into(),
            workouts: vec![
                workout(
                    "Upper",
                    Some((1, 1)),
                    vec![
                        entry(1, vec![set(5, 80.0), set(5, 80.0), set(5, 80.0)]),
                        entry(2, vec![set(8, 40.0)]),
                        entry(1, vec![set(3, 90.0), set(3, 90.0)]),
                    ],
                ),
                workout("Lower", Some((1, 2)), vec![entry(3, vec![set(5, 120.0)])]),
                workout("Rest", Some((1, 3)), vec![]),
            ],
        };
        let program_id = create_program(&pool, &program, CascadeOptions::default())
            .await
            .unwrap();

        assert_eq!(operations::count_rows(&pool, Table::Program).await.unwrap(), 1);
        assert_eq!(operations::count_rows(&pool, Table::Workout).await.unwrap(), 3);
        assert_eq!(operations::count_rows(&pool, Table::ProgramWorkout).await.unwrap(), 3);
        assert_eq!(operations::count_rows(&pool, Table::WorkoutExercise).await.unwrap(), 4);
        assert_eq!(operations::count_rows(&pool, Table::WorkoutExerciseSet).await.unwrap(), 7);

        let view = operations::load_program_view(&pool, program_id)
            .await
            .unwrap()
            .unwrap();
        let names: Vec<_> = view.workouts.iter().map(|w| w.workout.name.as_str()).collect();
        assert_eq!(names, ["Upper", "Lower", "Rest"]);

        let upper = &view.workouts[0];
        let orders: Vec<_> = upper.exercises.iter().map(|e| e.instance.order_index).collect();
        assert_eq!(orders, [0, 1, 2]);
        // the same exercise appears twice as distinct instances
        assert_eq!(upper.exercises[0].instance.exercise_id, upper.exercises[2].instance.exercise_id);
        assert_ne!(upper.exercises[0].instance.instance_id, upper.exercises[2].instance.instance_id);
        for e in &upper.exercises {
            let indices: Vec<_> = e.sets.iter().map(|s| s.set_index).collect();
            assert_eq!(indices, (0..e.sets.len() as i64).collect::<Vec<_>>());
            assert!(e.sets.iter().all(|s| s.workout_exercise_instance_id == e.instance.instance_id));
        }
    }

    #[tokio::test]
    async fn failed_create_leaves_no_rows() {
        let pool = reference_pool().await;

        let mut program = five_by_five();
        // exercise 9999 does not exist, so the instance insert trips the foreign key
        program.workouts.push(workout("Day B", Some((1, 3)), vec![entry(9999, vec![set(5, 50.0)])]));
        let err = create_program(&pool, &program, CascadeOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_store(), "{err}");

        for table in [Table::Program, Table::Workout, Table::ProgramWorkout, Table::WorkoutExercise, Table::WorkoutExerciseSet] {
            assert_eq!(operations::count_rows(&pool, table).await.unwrap(), 0, "{table}");
        }
    }

    #[tokio::test]
    async fn linking_without_slot_is_rejected_before_writing() {
        let pool = reference_pool().await;
        let program_id = create_program(
            &pool,
            &ProgramRecord {
                workouts: Vec::new(),
                ..five_by_five()
            },
            CascadeOptions::default(),
        )
        .await
        .unwrap();

        let err = create_workout(&pool, &workout("Day C", None, vec![]), Some(program_id), CascadeOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(operations::count_rows(&pool, Table::Workout).await.unwrap(), 0);

        let standalone = create_workout(&pool, &workout("Day C", None, vec![]), None, CascadeOptions::default())
            .await
            .unwrap();
        assert!(standalone > 0);
        assert_eq!(operations::count_rows(&pool, Table::ProgramWorkout).await.unwrap(), 0);
    }
}
