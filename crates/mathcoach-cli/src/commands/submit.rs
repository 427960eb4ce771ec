//! The `mathcoach submit` command.

use anyhow::Result;
use uuid::Uuid;

use mathcoach_core::progress::{Progress, MAX_STARS};
use mathcoach_core::RawAnswer;

use super::Context;

pub async fn execute(
    ctx: &Context,
    session_id: Uuid,
    answer: String,
    want_feedback: bool,
) -> Result<()> {
    let config = ctx.load_config()?;
    let tutor = ctx.tutor(&config).await?;

    let submission = tutor
        .submit_answer(session_id, &RawAnswer::from(answer), want_feedback)
        .await?;

    let progress_path = config.progress_path();
    let mut progress = Progress::load(&progress_path).await?;
    progress.record(submission.is_correct);
    progress.save(&progress_path).await?;

    if submission.is_correct {
        println!("Correct!");
    } else {
        println!("Not quite.");
    }
    println!("{}", submission.feedback_text);
    println!();
    println!(
        "Streak: {}  Stars: {}/{}",
        progress.streak, progress.stars, MAX_STARS
    );

    Ok(())
}
