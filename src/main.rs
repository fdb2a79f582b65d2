use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod calc;
mod curriculum;
mod model;
mod planner;
mod report;
mod store;
mod sync;

use model::{CourseAverageRow, FptSemester, FptSemesterCourse, Mode, OtherSemesterCourse};
use store::{PgStore, UserStore};
use sync::Synchronizer;

#[derive(Parser)]
#[command(name = "gpa-tracker")]
#[command(about = "GPA tracking and target planning for students", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Fpt,
    Other,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Mode {
        match mode {
            ModeArg::Fpt => Mode::Fpt,
            ModeArg::Other => Mode::Other,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ImportKind {
    /// Weighted components of a single course (name, score, weight)
    CourseAverage,
    /// Fixed-curriculum semester courses (semester, name, score)
    SemesterCourses,
    /// Credit-bearing courses (name, score, credits)
    CreditCourses,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Create or update a user profile
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
    },
    /// Print a GPA summary for a user
    Show {
        #[arg(long)]
        email: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Switch the active grading mode
    SetMode {
        #[arg(long)]
        email: String,
        #[arg(long, value_enum)]
        mode: ModeArg,
    },
    /// Import score rows from a CSV file
    Import {
        #[arg(long)]
        email: String,
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, value_enum)]
        kind: ImportKind,
    },
    /// Record a grade for a curriculum course
    SetGrade {
        #[arg(long)]
        email: String,
        #[arg(long)]
        block: String,
        #[arg(long)]
        major: String,
        #[arg(long)]
        semester: u32,
        #[arg(long)]
        course: String,
        #[arg(long)]
        score: f64,
    },
    /// Compute the required-GPA plan for the active mode
    Plan {
        #[arg(long)]
        email: String,
        #[arg(long)]
        target: Option<f64>,
        #[arg(long)]
        current: Option<f64>,
        #[arg(long)]
        completed: Option<f64>,
        #[arg(long)]
        total: Option<f64>,
    },
    /// Browse the curriculum catalog
    Curriculum {
        #[arg(long)]
        block: Option<String>,
        #[arg(long)]
        major: Option<String>,
        #[arg(long)]
        semester: Option<u32>,
    },
    /// Overwrite a user's data with the defaults
    Reset {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // The catalog is static; browsing it needs no database.
    if let Commands::Curriculum {
        block,
        major,
        semester,
    } = &cli.command
    {
        print_curriculum(block.as_deref(), major.as_deref(), *semester);
        return Ok(());
    }

    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;
    let store = Arc::new(PgStore::new(pool));

    match cli.command {
        Commands::InitDb => {
            store.init_db().await?;
            println!("Schema ready.");
        }
        Commands::Register { email, username } => {
            let user_id = store.register_profile(&email, &username).await?;
            println!("Profile ready for {email} (id {user_id}).");
        }
        Commands::Show { email, out } => {
            let sync = open_session(&store, &email).await?;
            let report = report::build_report(&sync.data());
            match out {
                Some(path) => {
                    std::fs::write(&path, report)?;
                    println!("Report written to {}.", path.display());
                }
                None => print!("{report}"),
            }
        }
        Commands::SetMode { email, mode } => {
            let mut sync = open_session(&store, &email).await?;
            let mode = Mode::from(mode);
            sync.update(|prev| {
                let mut next = prev.clone();
                next.selected_mode = mode;
                next
            });
            sync.save_now().await?;
            println!("Active mode updated.");
        }
        Commands::Import { email, csv, kind } => {
            let mut sync = open_session(&store, &email).await?;
            let imported = import_csv(&mut sync, &csv, kind)?;
            sync.save_now().await?;
            println!("Imported {imported} rows from {}.", csv.display());
        }
        Commands::SetGrade {
            email,
            block,
            major,
            semester,
            course,
            score,
        } => {
            let offered = curriculum::semester_courses(&block, &major, semester);
            if !offered.contains(&course.as_str()) {
                anyhow::bail!(
                    "{course} is not taught in semester {semester} of {major} ({block}); \
                     available courses: {}",
                    offered.join(", ")
                );
            }

            let mut sync = open_session(&store, &email).await?;
            sync.update(|prev| {
                let mut next = prev.clone();
                next.fpt.major.block = Some(block.clone());
                next.fpt.major.sub_major = Some(major.clone());
                next.fpt.selected_semester_for_major_ui = semester;
                // A zero score means "not graded yet" and clears the entry.
                if score > 0.0 {
                    next.fpt.major_grades.set(&major, semester, &course, score);
                } else {
                    next.fpt.major_grades.remove(&major, semester, &course);
                }
                next
            });
            sync.save_now().await?;
            if score > 0.0 {
                println!("Recorded {score} for {course} in semester {semester}.");
            } else {
                println!("Cleared the grade for {course} in semester {semester}.");
            }
        }
        Commands::Plan {
            email,
            target,
            current,
            completed,
            total,
        } => {
            let mut sync = open_session(&store, &email).await?;
            let mode = sync.data().selected_mode;
            sync.update(|prev| {
                let mut next = prev.clone();
                match mode {
                    Mode::Fpt => {
                        let planner = &mut next.fpt.planner;
                        if let Some(value) = target {
                            planner.target_gpa = value;
                        }
                        if let Some(value) = current {
                            planner.current_gpa = value;
                        }
                        if let Some(value) = completed {
                            planner.completed_semesters = value;
                        }
                        if let Some(value) = total {
                            planner.total_semesters = value;
                        }
                    }
                    Mode::Other => {
                        let planner = &mut next.other.planner;
                        if let Some(value) = target {
                            planner.target_gpa = value;
                        }
                        if let Some(value) = current {
                            planner.current_gpa = value;
                        }
                        if let Some(value) = completed {
                            planner.completed_credits = value;
                        }
                        if let Some(value) = total {
                            planner.total_credits = value;
                        }
                    }
                }
                next
            });
            sync.save_now().await?;

            let data = sync.data();
            let outcome = match mode {
                Mode::Fpt => planner::required_gpa(
                    data.fpt.planner.total_semesters,
                    data.fpt.planner.completed_semesters,
                    data.fpt.planner.current_gpa,
                    data.fpt.planner.target_gpa,
                    10.0,
                    planner::UnitKind::Semesters,
                ),
                Mode::Other => planner::required_gpa(
                    data.other.planner.total_credits,
                    data.other.planner.completed_credits,
                    data.other.planner.current_gpa,
                    data.other.planner.target_gpa,
                    data.other.scale_per_feature.planner_scale.max(),
                    planner::UnitKind::Credits,
                ),
            };
            println!("{}", outcome.message);
            if !outcome.feasible {
                println!("The target is not attainable on this trajectory.");
            }
        }
        Commands::Reset { email } => {
            let mut sync = open_session(&store, &email).await?;
            sync.reset().await?;
            println!("Data reset to defaults.");
        }
        Commands::Curriculum { .. } => unreachable!("handled before connecting"),
    }

    Ok(())
}

async fn open_session(store: &Arc<PgStore>, email: &str) -> anyhow::Result<Synchronizer> {
    let user_id = store.resolve_user(email).await?;
    let store: Arc<dyn UserStore> = Arc::clone(store) as Arc<dyn UserStore>;
    let sync = Synchronizer::load(store, user_id)
        .await
        .context("failed to load user data")?;
    Ok(sync)
}

fn import_csv(
    sync: &mut Synchronizer,
    csv_path: &std::path::Path,
    kind: ImportKind,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        name: String,
        score: f64,
        #[serde(default)]
        weight: Option<f64>,
        #[serde(default)]
        credits: Option<f64>,
        #[serde(default)]
        semester: Option<u32>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut imported = 0usize;

    // Imports replace the placeholder rows instead of appending to them.
    match kind {
        ImportKind::CourseAverage => sync.update(|prev| {
            let mut next = prev.clone();
            next.fpt.course_average_rows.clear();
            next
        }),
        ImportKind::SemesterCourses => sync.update(|prev| {
            let mut next = prev.clone();
            next.fpt.semesters.clear();
            next
        }),
        ImportKind::CreditCourses => sync.update(|prev| {
            let mut next = prev.clone();
            next.other.semester_courses.clear();
            next
        }),
    }

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;

        match kind {
            ImportKind::CourseAverage => {
                let weight = row
                    .weight
                    .context("course-average rows need a weight column")?;
                sync.update(move |prev| {
                    let mut next = prev.clone();
                    next.fpt.course_average_rows.push(CourseAverageRow {
                        id: Uuid::new_v4().to_string(),
                        name: row.name,
                        score: row.score,
                        weight,
                    });
                    next
                });
            }
            ImportKind::SemesterCourses => {
                let semester = import_semester(row.semester)?;
                sync.update(move |prev| {
                    let mut next = prev.clone();
                    while next.fpt.semesters.len() < semester {
                        next.fpt.semesters.push(FptSemester {
                            id: (next.fpt.semesters.len() + 1).to_string(),
                            courses: Vec::new(),
                        });
                    }
                    next.fpt.semesters[semester - 1]
                        .courses
                        .push(FptSemesterCourse {
                            id: Uuid::new_v4().to_string(),
                            name: row.name,
                            score: row.score,
                        });
                    next
                });
            }
            ImportKind::CreditCourses => {
                let credits = row.credits.unwrap_or(3.0);
                sync.update(move |prev| {
                    let mut next = prev.clone();
                    next.other.semester_courses.push(OtherSemesterCourse {
                        id: Uuid::new_v4().to_string(),
                        course_name: row.name,
                        grade: row.score,
                        credits,
                    });
                    next
                });
            }
        }
        imported += 1;
    }

    Ok(imported)
}

/// Missing semester column defaults to 1. Anything outside the catalog's
/// range is rejected so a typo in the CSV cannot balloon the semester list.
fn import_semester(raw: Option<u32>) -> anyhow::Result<usize> {
    let semester = raw.unwrap_or(1);
    if semester == 0 || semester > curriculum::DEFAULT_TOTAL_SEMESTERS {
        anyhow::bail!(
            "semester {semester} is out of range (expected 1..={})",
            curriculum::DEFAULT_TOTAL_SEMESTERS
        );
    }
    Ok(semester as usize)
}

fn print_curriculum(block: Option<&str>, major: Option<&str>, semester: Option<u32>) {
    match (block, major) {
        (None, _) => {
            println!("Blocks:");
            for block in curriculum::blocks() {
                println!("- {} ({})", block.key, block.label);
            }
        }
        (Some(block), None) => {
            let majors = curriculum::majors(block);
            if majors.is_empty() {
                println!("No majors found for block {block}.");
                return;
            }
            println!("Majors in {block}:");
            for major in majors {
                println!("- {} ({})", major.key, major.label);
            }
        }
        (Some(block), Some(major)) => match semester {
            Some(semester) => {
                let courses = curriculum::semester_courses(block, major, semester);
                if courses.is_empty() {
                    println!("No courses found for {major} semester {semester}.");
                    return;
                }
                println!("Semester {semester} of {major}:");
                for course in courses {
                    println!("- {course}");
                }
            }
            None => {
                let total = curriculum::total_semesters(block, major);
                println!("{major} runs {total} semesters:");
                for semester in 1..=total {
                    let courses = curriculum::semester_courses(block, major, semester);
                    println!("- Semester {semester}: {}", courses.join(", "));
                }
            }
        },
    }
}
