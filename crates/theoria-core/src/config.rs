use std::{
    env,
    path::{Path, PathBuf},
};

use ::config as cfg;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] cfg::ConfigError),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Coefficients of the complexity and coherence heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoringConfig {
    #[serde(default = "ScoringConfig::default_vocabulary_weight")]
    pub vocabulary_weight: f64,
    #[serde(default = "ScoringConfig::default_sentence_length_weight")]
    pub sentence_length_weight: f64,
    #[serde(default = "ScoringConfig::default_concept_density_weight")]
    pub concept_density_weight: f64,
    /// Average sentence length (in tokens) that normalizes to 0.5.
    #[serde(default = "ScoringConfig::default_sentence_length_reference")]
    pub sentence_length_reference: f64,
    /// Complexity reported when the text has at most one token.
    #[serde(default = "ScoringConfig::default_baseline_complexity")]
    pub baseline_complexity: f64,
    /// Coherence reported when the text has at most one token.
    #[serde(default = "ScoringConfig::default_baseline_coherence")]
    pub baseline_coherence: f64,
}

impl ScoringConfig {
    fn default_vocabulary_weight() -> f64 {
        0.45
    }

    fn default_sentence_length_weight() -> f64 {
        0.35
    }

    fn default_concept_density_weight() -> f64 {
        0.20
    }

    fn default_sentence_length_reference() -> f64 {
        20.0
    }

    fn default_baseline_complexity() -> f64 {
        0.30
    }

    fn default_baseline_coherence() -> f64 {
        0.50
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("vocabulary_weight", self.vocabulary_weight),
            ("sentence_length_weight", self.sentence_length_weight),
            ("concept_density_weight", self.concept_density_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "scoring.{} must be a non-negative number",
                    name
                )));
            }
        }
        let sum: f64 = weights.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::ValidationError(format!(
                "scoring weights must sum to 1.0 (got {:.6})",
                sum
            )));
        }
        if !(self.sentence_length_reference > 0.0) || !self.sentence_length_reference.is_finite() {
            return Err(ConfigError::ValidationError(
                "scoring.sentence_length_reference must be > 0".into(),
            ));
        }
        for (name, value) in [
            ("baseline_complexity", self.baseline_complexity),
            ("baseline_coherence", self.baseline_coherence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "scoring.{} must be within [0, 1]",
                    name
                )));
            }
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            vocabulary_weight: Self::default_vocabulary_weight(),
            sentence_length_weight: Self::default_sentence_length_weight(),
            concept_density_weight: Self::default_concept_density_weight(),
            sentence_length_reference: Self::default_sentence_length_reference(),
            baseline_complexity: Self::default_baseline_complexity(),
            baseline_coherence: Self::default_baseline_coherence(),
        }
    }
}

/// Fixed limits and coefficients of the synthesis engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SynthesisConfig {
    /// Characters analysed per request; longer content is truncated.
    #[serde(default = "SynthesisConfig::default_max_input_chars")]
    pub max_input_chars: usize,
    #[serde(default = "SynthesisConfig::default_max_concepts")]
    pub max_concepts: usize,
    #[serde(default = "SynthesisConfig::default_max_phenomena")]
    pub max_phenomena: usize,
    #[serde(default = "SynthesisConfig::default_max_formulas")]
    pub max_formulas: usize,
    #[serde(default = "SynthesisConfig::default_max_models")]
    pub max_models: usize,
    #[serde(default = "SynthesisConfig::default_max_experiments")]
    pub max_experiments: usize,
    /// Token distance over which the positional boost halves.
    #[serde(default = "SynthesisConfig::default_position_decay")]
    pub position_decay: f64,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl SynthesisConfig {
    fn default_max_input_chars() -> usize {
        20_000
    }

    fn default_max_concepts() -> usize {
        6
    }

    fn default_max_phenomena() -> usize {
        4
    }

    fn default_max_formulas() -> usize {
        5
    }

    fn default_max_models() -> usize {
        2
    }

    fn default_max_experiments() -> usize {
        4
    }

    fn default_position_decay() -> f64 {
        25.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn within(name: &str, value: usize, min: usize, max: usize) -> Result<(), ConfigError> {
            if value < min || value > max {
                return Err(ConfigError::ValidationError(format!(
                    "synthesis.{} must be within {}..={} (got {})",
                    name, min, max, value
                )));
            }
            Ok(())
        }

        within("max_input_chars", self.max_input_chars, 1, usize::MAX)?;
        within("max_concepts", self.max_concepts, 1, 64)?;
        within("max_phenomena", self.max_phenomena, 1, 4)?;
        within("max_formulas", self.max_formulas, 1, 5)?;
        within("max_models", self.max_models, 1, 2)?;
        within("max_experiments", self.max_experiments, 2, 4)?;
        if !(self.position_decay > 0.0) || !self.position_decay.is_finite() {
            return Err(ConfigError::ValidationError(
                "synthesis.position_decay must be > 0".into(),
            ));
        }
        self.scoring.validate()
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_input_chars: Self::default_max_input_chars(),
            max_concepts: Self::default_max_concepts(),
            max_phenomena: Self::default_max_phenomena(),
            max_formulas: Self::default_max_formulas(),
            max_models: Self::default_max_models(),
            max_experiments: Self::default_max_experiments(),
            position_decay: Self::default_position_decay(),
            scoring: ScoringConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct TheoriaConfig {
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TheoriaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level cannot be empty".into(),
            ));
        }
        self.synthesis.validate()
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(TheoriaConfig)).unwrap_or_default()
    }
}

/// Loads [`TheoriaConfig`] from layered files and `THEORIA__*` env vars.
pub struct ConfigLoader {
    config_dir: PathBuf,
    env: String,
}

impl ConfigLoader {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            env: Self::default_env(),
        }
    }

    pub fn with_env(mut self, env_name: impl Into<String>) -> Self {
        self.env = env_name.into();
        self
    }

    pub fn default_env() -> String {
        env::var("THEORIA_ENV").unwrap_or_else(|_| "development".to_string())
    }

    /// Get the default configuration directory.
    ///
    /// Priority order:
    /// 1. ~/.theoria/
    /// 2. ./config/
    /// 3. Current directory
    pub fn default_config_dir() -> PathBuf {
        if let Some(home_dir) = dirs::home_dir() {
            let theoria_dir = home_dir.join(".theoria");
            if theoria_dir.exists() {
                info!("Using config directory: {:?}", theoria_dir);
                return theoria_dir;
            }
        }

        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let project_config = cwd.join("config");
        if project_config.exists() {
            info!("Using config directory: {:?}", project_config);
            return project_config;
        }

        info!("Using config directory: {:?}", cwd);
        cwd
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn load(&self) -> Result<TheoriaConfig, ConfigError> {
        let dir = &self.config_dir;
        let loaded: TheoriaConfig = cfg::Config::builder()
            .add_source(cfg::File::from(dir.join("default.toml")).required(false))
            .add_source(cfg::File::from(dir.join(format!("{}.toml", self.env))).required(false))
            .add_source(cfg::File::from(dir.join("local.toml")).required(false))
            .add_source(
                cfg::Environment::with_prefix("THEORIA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        debug!(
            config_dir = ?dir,
            env = %self.env,
            max_concepts = loaded.synthesis.max_concepts,
            "configuration loaded"
        );
        Ok(loaded)
    }
}
