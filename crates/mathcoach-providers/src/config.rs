//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mathcoach_core::traits::TextGenerator;
use mathcoach_core::tutor::TutorConfig;

use crate::mock::MockProvider;
use crate::openai::OpenAiProvider;

/// Configuration for a single text-generation provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    /// Canned replies, for demos and tests without network access.
    Mock {
        /// Prompt substring → reply.
        #[serde(default)]
        responses: HashMap<String, String>,
        #[serde(default)]
        default_response: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Mock {
                responses,
                default_response,
            } => f
                .debug_struct("Mock")
                .field("responses", &responses.len())
                .field("default_response", default_response)
                .finish(),
        }
    }
}

/// Top-level mathcoach configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MathcoachConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider to use when none is named.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model for problem generation and feedback.
    #[serde(default = "default_fast_model")]
    pub fast_model: String,
    /// Model for hints and worked solutions.
    #[serde(default = "default_quality_model")]
    pub quality_model: String,
    /// Max retries on provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay between retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Directory holding the session store and progress file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_fast_model() -> String {
    "gpt-4.1-mini".to_string()
}
fn default_quality_model() -> String {
    "gpt-4o".to_string()
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./mathcoach-data")
}

impl Default for MathcoachConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            fast_model: default_fast_model(),
            quality_model: default_quality_model(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            data_dir: default_data_dir(),
        }
    }
}

impl MathcoachConfig {
    /// Tutor settings derived from this config.
    pub fn tutor_config(&self) -> TutorConfig {
        TutorConfig {
            fast_model: self.fast_model.clone(),
            quality_model: self.quality_model.clone(),
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            ..TutorConfig::default()
        }
    }

    /// Path of the JSON session store.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("sessions.json")
    }

    /// Path of the streak/stars file.
    pub fn progress_path(&self) -> PathBuf {
        self.data_dir.join("progress.json")
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        mock @ ProviderConfig::Mock { .. } => mock.clone(),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `mathcoach.toml` in the current directory
/// 2. `~/.config/mathcoach/config.toml`
///
/// Environment variable overrides: `MATHCOACH_OPENAI_KEY`,
/// `MATHCOACH_OPENAI_BASE_URL`, `OPENAI_MODEL_FAST`, `OPENAI_MODEL_QUALITY`.
pub fn load_config() -> Result<MathcoachConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MathcoachConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mathcoach.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<MathcoachConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MathcoachConfig::default(),
    };

    apply_env_overrides(&mut config);

    // Resolve env vars in all provider configs
    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn apply_env_overrides(config: &mut MathcoachConfig) {
    let key = std::env::var("MATHCOACH_OPENAI_KEY").ok();
    let base = std::env::var("MATHCOACH_OPENAI_BASE_URL").ok();
    if key.is_some() || base.is_some() {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI {
            api_key, base_url, ..
        } = entry
        {
            if let Some(key) = key {
                *api_key = key;
            }
            if base.is_some() {
                *base_url = base;
            }
        }
    }

    if let Ok(model) = std::env::var("OPENAI_MODEL_FAST") {
        config.fast_model = model;
    }
    if let Ok(model) = std::env::var("OPENAI_MODEL_QUALITY") {
        config.quality_model = model;
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mathcoach"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn TextGenerator>> {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => {
            if api_key.is_empty() {
                anyhow::bail!("openai provider has no api_key (set MATHCOACH_OPENAI_KEY)");
            }
            Ok(Box::new(OpenAiProvider::new(
                api_key,
                base_url.clone(),
                org_id.clone(),
            )?))
        }
        ProviderConfig::Mock {
            responses,
            default_response,
        } => {
            let mut mock = MockProvider::new(responses.clone());
            if let Some(default) = default_response {
                mock = mock.with_default_response(default);
            }
            Ok(Box::new(mock))
        }
    }
}

/// Create the named provider, or the configured default when `name` is
/// `None`.
pub fn provider_by_name(
    config: &MathcoachConfig,
    name: Option<&str>,
) -> Result<Box<dyn TextGenerator>> {
    let name = name.unwrap_or(&config.default_provider);
    let provider_config = config.providers.get(name).with_context(|| {
        format!("provider '{name}' is not configured (run `mathcoach init` to create a config)")
    })?;
    create_provider(provider_config)
}
