//! The `mathcoach improve` command.

use anyhow::Result;
use uuid::Uuid;

use mathcoach_core::progress::Progress;

use super::{problem_request, Context};

pub async fn execute(
    ctx: &Context,
    session_id: Uuid,
    grade: String,
    difficulty: String,
    outcome: Option<String>,
) -> Result<()> {
    let request = problem_request(&grade, &difficulty, outcome.as_deref())?;
    let config = ctx.load_config()?;
    let tutor = ctx.tutor(&config).await?;

    let original = tutor.session(session_id).await?;
    let session = tutor
        .improve_problem(&request, &original.problem_text)
        .await?;

    let progress_path = config.progress_path();
    let mut progress = Progress::load(&progress_path).await?;
    progress.reset_round();
    progress.save(&progress_path).await?;

    println!("Session: {} (variant of {})", session.id, original.id);
    println!();
    println!("{}", session.problem_text);

    Ok(())
}
