use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::Deserialize;

use crate::crl::Evaluator;
use crate::crl::evaluator::{DEFAULT_CHUNK_SIZE, DEFAULT_WORKERS};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub checker: CheckerConfig,
    pub evaluator: EvaluatorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckerConfig {
    /// PEM certificate whose revocation status is checked
    pub certificate_path: PathBuf,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EvaluatorConfig {
    pub workers: usize,
    pub chunk_size: usize,
}

impl EvaluatorConfig {
    pub fn build(&self) -> Evaluator {
        Evaluator::new(self.workers, self.chunk_size)
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("checker.certificate_path", "spring.io.pem")?
            .set_default("evaluator.workers", DEFAULT_WORKERS as i64)?
            .set_default("evaluator.chunk_size", DEFAULT_CHUNK_SIZE as i64)?
            .add_source(File::with_name("config/settings").required(false));

        // Overrides replace the system environment so tests stay isolated
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // e.g. APP_CHECKER__CERTIFICATE_PATH or APP_EVALUATOR__WORKERS
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        builder.build()?.try_deserialize()
    }
}
