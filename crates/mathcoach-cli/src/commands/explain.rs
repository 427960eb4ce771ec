//! The `mathcoach explain` command.

use anyhow::Result;
use uuid::Uuid;

use mathcoach_core::model::ExplainMode;

use super::Context;

pub async fn execute(ctx: &Context, session_id: Uuid, mode: String) -> Result<()> {
    let mode: ExplainMode = mode.parse().map_err(anyhow::Error::msg)?;
    let config = ctx.load_config()?;
    let tutor = ctx.tutor(&config).await?;

    let text = tutor.explain(session_id, mode).await?;
    println!("{text}");

    Ok(())
}
