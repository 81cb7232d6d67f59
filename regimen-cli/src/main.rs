use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};

use regimen::cascade::{create_program, create_workout};
use regimen::db::models::{ProgramEdit, ProgramRecord, WorkoutRecord};
use regimen::db::{self, operations};
use regimen::{Config, EmptySetPolicy, logging, seed};

#[derive(Parser, Debug)]
#[command(version, about = "Regimen - fitness program store", long_about = None)]
struct Args {
    /// SQLite database URL (overrides DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Keep going past exercise entries that have no sets instead of ending
    /// the workout there
    #[arg(long, global = true)]
    skip_empty_sets: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drop every table, recreate the schema and load the bundled seed data
    Reset {
        /// Confirm that all existing data will be destroyed
        #[arg(long)]
        yes: bool,
    },
    /// Create a program (with its workouts) from a JSON file
    ImportProgram { file: PathBuf },
    /// Create a workout from a JSON file, optionally placing it in a program
    ImportWorkout {
        file: PathBuf,
        #[arg(short, long)]
        program_id: Option<i64>,
    },
    /// List all programs
    Programs,
    /// List workouts that belong to no program
    Workouts {
        /// Print each workout's exercises and sets
        #[arg(short, long)]
        detail: bool,
    },
    /// Show a program with its workouts, exercises and sets
    Show { program_id: i64 },
    /// List built-in exercises
    Exercises,
    /// Change a program's name, description or author
    EditProgram {
        program_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = args.database_url {
        config.database_url = url;
    }
    if args.verbose {
        config.log_level = LevelFilter::Debug;
    }
    if args.skip_empty_sets {
        config.cascade.empty_sets = EmptySetPolicy::SkipInstance;
    }
    logging::init_logger(config.log_level);

    let pool = db::connect(&config.database_url).await?;

    match args.command {
        Commands::Reset { yes } => {
            if !yes {
                bail!(
                    "reset destroys all data in {}; pass --yes to confirm",
                    config.database_url
                );
            }
            let report = seed::reset_database(&pool, config.cascade).await?;
            println!(
                "Database reset: {} programs, {} standalone workouts",
                report.program_ids.len(),
                report.workout_ids.len()
            );
        }
        Commands::ImportProgram { file } => {
            let program: ProgramRecord = read_json(&file)?;
            let id = create_program(&pool, &program, config.cascade).await?;
            println!("Created program #{}: {}", id, program.name);
        }
        Commands::ImportWorkout { file, program_id } => {
            let workout: WorkoutRecord = read_json(&file)?;
            let id = create_workout(&pool, &workout, program_id, config.cascade).await?;
            println!("Created workout #{}: {}", id, workout.name);
        }
        Commands::Programs => {
            for program in operations::list_programs(&pool).await? {
                println!("{}, {} ({})", program.id, program.name, program.author);
            }
        }
        Commands::Workouts { detail } => {
            for workout in operations::list_standalone_workouts(&pool).await? {
                if detail {
                    if let Some(view) = operations::load_workout_view(&pool, workout.id).await? {
                        print!("{}", view);
                    }
                } else {
                    println!("{}, {}", workout.id, workout.name);
                }
            }
        }
        Commands::Show { program_id } => match operations::load_program_view(&pool, program_id).await? {
            Some(view) => print!("{}", view),
            None => bail!("no program with id {}", program_id),
        },
        Commands::Exercises => {
            for exercise in operations::list_exercises(&pool).await? {
                let groups = operations::exercise_muscle_groups(&pool, exercise.id).await?;
                println!(
                    "{}, {} [{}] {}",
                    exercise.id,
                    exercise.name,
                    exercise.measurement,
                    groups.join(", ")
                );
            }
        }
        Commands::EditProgram {
            program_id,
            name,
            description,
            author,
        } => {
            let edit = ProgramEdit {
                name,
                description,
                author,
            };
            match operations::edit_program(&pool, program_id, &edit).await? {
                Some(program) => println!("Updated program #{}: {}", program.id, program.name),
                None => bail!("no program with id {}", program_id),
            }
        }
    }

    Ok(())
}
