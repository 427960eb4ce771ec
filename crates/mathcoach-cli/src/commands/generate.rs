//! The `mathcoach generate` command.

use anyhow::Result;

use mathcoach_core::progress::Progress;

use super::{problem_request, Context};

pub async fn execute(
    ctx: &Context,
    grade: String,
    difficulty: String,
    outcome: Option<String>,
    show_answer: bool,
) -> Result<()> {
    let request = problem_request(&grade, &difficulty, outcome.as_deref())?;
    let config = ctx.load_config()?;
    let tutor = ctx.tutor(&config).await?;

    tracing::info!(
        grade = %request.grade,
        difficulty = %request.difficulty,
        "generating problem"
    );
    let session = tutor.generate_problem(&request).await?;

    let progress_path = config.progress_path();
    let mut progress = Progress::load(&progress_path).await?;
    progress.reset_round();
    progress.save(&progress_path).await?;

    println!("Session: {}", session.id);
    println!();
    println!("{}", session.problem_text);
    if show_answer {
        println!();
        println!("Answer: {}", session.correct_answer);
    }

    Ok(())
}
