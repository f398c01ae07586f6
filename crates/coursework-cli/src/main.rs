//! coursework CLI: browse courses, take assessments, review results.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "coursework",
    version,
    about = "Course and assessment client for the coursework API"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List or delete courses
    Courses {
        #[command(subcommand)]
        action: CourseAction,
    },

    /// List or delete the assessments of a course
    Assessments {
        #[command(subcommand)]
        action: AssessmentAction,
    },

    /// Take an assessment and submit the result
    Take {
        /// Assessment id
        id: String,

        /// Option numbers per question, starting at 1 (e.g. "1,3,,2"; empty = unanswered)
        #[arg(long)]
        answers: Option<String>,
    },

    /// Show your assessment results
    Results,

    /// Show the identity in the stored token
    Whoami,

    /// Create a starter config file
    Init,
}

#[derive(Subcommand)]
enum CourseAction {
    /// List courses
    List {
        /// Only show courses whose title contains this text (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Delete a course
    Delete {
        /// Course id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AssessmentAction {
    /// List the assessments of a course
    List {
        /// Course id
        #[arg(long)]
        course: String,

        /// Only show assessments whose title contains this text (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Delete an assessment
    Delete {
        /// Assessment id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("coursework=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Courses { action } => match action {
            CourseAction::List { filter } => commands::courses::list(config, filter).await,
            CourseAction::Delete { id, yes } => commands::courses::delete(config, id, yes).await,
        },
        Commands::Assessments { action } => match action {
            AssessmentAction::List { course, filter } => {
                commands::assessments::list(config, course, filter).await
            }
            AssessmentAction::Delete { id, yes } => {
                commands::assessments::delete(config, id, yes).await
            }
        },
        Commands::Take { id, answers } => commands::take::execute(config, id, answers).await,
        Commands::Results => commands::results::execute(config).await,
        Commands::Whoami => commands::whoami::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
