//! mathcoach CLI: generate problems, grade answers, ask for hints.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(name = "mathcoach", version, about = "Primary math word problems and answer grading")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Provider to use instead of the configured default
    #[arg(long, global = true)]
    provider: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an answer against an expected answer (offline)
    Check {
        /// Expected answer, e.g. "0.75"
        expected: String,

        /// Answer to check, e.g. "3/4", "75%", "1 1/2"
        answer: String,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a new word problem
    Generate {
        /// Primary level, 1-6 (e.g. "5" or "P5")
        #[arg(long, default_value = "5")]
        grade: String,

        /// Easy, Medium or Hard
        #[arg(long, default_value = "Medium")]
        difficulty: String,

        /// Syllabus outcome or topic
        #[arg(long)]
        outcome: Option<String>,

        /// Also print the stored correct answer
        #[arg(long)]
        show_answer: bool,
    },

    /// Generate a variant of an existing problem
    Improve {
        /// Session to base the variant on
        #[arg(long)]
        session: Uuid,

        #[arg(long, default_value = "5")]
        grade: String,

        #[arg(long, default_value = "Medium")]
        difficulty: String,

        #[arg(long)]
        outcome: Option<String>,
    },

    /// Submit an answer for grading
    Submit {
        #[arg(long)]
        session: Uuid,

        /// The answer as typed, e.g. "1,234.5" or "3/4"
        #[arg(long, allow_hyphen_values = true)]
        answer: String,

        /// Skip model-written feedback
        #[arg(long)]
        no_feedback: bool,
    },

    /// Ask for a hint or a worked solution
    Explain {
        #[arg(long)]
        session: Uuid,

        /// hint or solution
        #[arg(long, default_value = "hint")]
        mode: String,
    },

    /// Show recent problems and attempts
    History {
        /// Maximum number of sessions to show
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// List available models
    ListModels,

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mathcoach=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context {
        config_path: cli.config,
        provider: cli.provider,
    };

    let result = match cli.command {
        Commands::Check {
            expected,
            answer,
            json,
        } => commands::check::execute(&expected, &answer, json),
        Commands::Generate {
            grade,
            difficulty,
            outcome,
            show_answer,
        } => commands::generate::execute(&ctx, grade, difficulty, outcome, show_answer).await,
        Commands::Improve {
            session,
            grade,
            difficulty,
            outcome,
        } => commands::improve::execute(&ctx, session, grade, difficulty, outcome).await,
        Commands::Submit {
            session,
            answer,
            no_feedback,
        } => commands::submit::execute(&ctx, session, answer, !no_feedback).await,
        Commands::Explain { session, mode } => {
            commands::explain::execute(&ctx, session, mode).await
        }
        Commands::History { limit } => commands::history::execute(&ctx, limit).await,
        Commands::ListModels => commands::list_models::execute(&ctx),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
