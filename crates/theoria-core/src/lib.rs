pub mod config;
pub mod error;
pub mod markdown;
pub mod types;

pub use config::{
    ConfigError, ConfigLoader, LoggingConfig, ScoringConfig, SynthesisConfig, TheoriaConfig,
};
pub use error::*;
pub use markdown::to_markdown;
pub use types::*;
