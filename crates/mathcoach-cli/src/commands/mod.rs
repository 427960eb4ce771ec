pub mod check;
pub mod explain;
pub mod generate;
pub mod history;
pub mod improve;
pub mod init;
pub mod list_models;
pub mod submit;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use mathcoach_core::model::{Difficulty, GradeLevel, ProblemRequest};
use mathcoach_core::store::JsonFileStore;
use mathcoach_core::tutor::Tutor;
use mathcoach_providers::{load_config_from, provider_by_name, MathcoachConfig};

/// Global options shared by every command that talks to a provider.
pub struct Context {
    pub config_path: Option<PathBuf>,
    pub provider: Option<String>,
}

impl Context {
    pub fn load_config(&self) -> Result<MathcoachConfig> {
        load_config_from(self.config_path.as_deref())
    }

    /// Build a tutor backed by the configured provider and the on-disk store.
    pub async fn tutor(&self, config: &MathcoachConfig) -> Result<Tutor> {
        let generator = provider_by_name(config, self.provider.as_deref())?;
        let store = JsonFileStore::open(config.store_path()).await?;
        tracing::debug!(
            provider = generator.name(),
            store = %store.path().display(),
            "tutor ready"
        );
        Ok(Tutor::new(
            Arc::from(generator),
            Arc::new(store),
            config.tutor_config(),
        ))
    }
}

pub fn problem_request(
    grade: &str,
    difficulty: &str,
    outcome: Option<&str>,
) -> Result<ProblemRequest> {
    let grade: GradeLevel = grade.parse().map_err(anyhow::Error::msg)?;
    let difficulty: Difficulty = difficulty.parse().map_err(anyhow::Error::msg)?;
    Ok(ProblemRequest::new(grade, difficulty, outcome))
}
