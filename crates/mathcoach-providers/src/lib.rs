//! mathcoach-providers: text-generation provider integrations.
//!
//! Implements the `TextGenerator` trait for OpenAI-compatible backends and a
//! canned-reply mock, and loads the mathcoach configuration file.

pub mod config;
pub mod mock;
pub mod openai;

pub use config::{
    create_provider, load_config, load_config_from, provider_by_name, MathcoachConfig,
    ProviderConfig,
};
pub use mathcoach_core::error::ProviderError;
