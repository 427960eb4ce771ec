//! The `mathcoach history` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::Context;

pub async fn execute(ctx: &Context, limit: usize) -> Result<()> {
    let config = ctx.load_config()?;
    let tutor = ctx.tutor(&config).await?;

    let history = tutor.history(limit).await?;
    if history.is_empty() {
        println!("No problems yet. Run `mathcoach generate` to get started.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Session", "Created", "Problem", "Answer", "Attempts", "Solved",
    ]);

    for entry in &history {
        let session = &entry.session;
        let solved = entry.submissions.iter().any(|s| s.is_correct);
        table.add_row(vec![
            Cell::new(session.id),
            Cell::new(session.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(preview(&session.problem_text, 60)),
            Cell::new(session.correct_answer),
            Cell::new(entry.submissions.len()),
            Cell::new(if solved { "yes" } else { "no" }),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > max {
        let cut: String = line.chars().take(max).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}
