//! Scoring run configuration from environment variables and CLI flags

use crate::persistence::BackendType;
use std::env;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing value for: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for one batch scoring run
///
/// Loaded from environment variables with sensible defaults, then
/// overridden by command-line flags.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Ledger file (JSON array or JSONL)
    pub input_path: PathBuf,

    /// Directory for CSV output
    pub output_dir: PathBuf,

    /// SQLite database file
    pub db_path: PathBuf,

    pub backend: BackendType,

    /// Widest histogram bar, in characters
    pub histogram_width: usize,
}

impl ScoringConfig {
    /// Environment variables:
    /// - `CREDIT_INPUT_PATH` (default: user-wallet-transactions.json)
    /// - `CREDIT_OUTPUT_DIR` (default: output)
    /// - `CREDIT_DB_PATH` (default: data/credit_scores.db)
    /// - `CREDIT_HISTOGRAM_WIDTH` (default: 50)
    pub fn from_env() -> Result<Self, ConfigError> {
        let histogram_width = match env::var("CREDIT_HISTOGRAM_WIDTH") {
            Ok(raw) => parse_width(&raw)?,
            Err(_) => 50,
        };

        Ok(Self {
            input_path: env::var("CREDIT_INPUT_PATH")
                .unwrap_or_else(|_| "user-wallet-transactions.json".to_string())
                .into(),
            output_dir: env::var("CREDIT_OUTPUT_DIR")
                .unwrap_or_else(|_| "output".to_string())
                .into(),
            db_path: env::var("CREDIT_DB_PATH")
                .unwrap_or_else(|_| "data/credit_scores.db".to_string())
                .into(),
            backend: BackendType::Csv,
            histogram_width,
        })
    }

    /// Apply `--backend <csv|sqlite>` and `--input <path>` overrides.
    /// `args` excludes the program name.
    pub fn apply_args(mut self, args: &[String]) -> Result<Self, ConfigError> {
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--backend" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| ConfigError::MissingVariable("--backend".to_string()))?;
                    self.backend = BackendType::parse(value).ok_or_else(|| {
                        ConfigError::InvalidValue(format!(
                            "--backend must be csv or sqlite, got {}",
                            value
                        ))
                    })?;
                }
                "--input" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| ConfigError::MissingVariable("--input".to_string()))?;
                    self.input_path = PathBuf::from(value);
                }
                other => {
                    log::warn!("Ignoring unknown argument: {}", other);
                }
            }
        }
        Ok(self)
    }

    /// Where the selected backend writes
    pub fn output_target(&self) -> &PathBuf {
        match self.backend {
            BackendType::Csv => &self.output_dir,
            BackendType::Sqlite => &self.db_path,
        }
    }
}

fn parse_width(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(width) if width > 0 => Ok(width),
        _ => Err(ConfigError::InvalidValue(format!(
            "CREDIT_HISTOGRAM_WIDTH must be a positive integer, got {}",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn base_config() -> ScoringConfig {
        ScoringConfig {
            input_path: "in.json".into(),
            output_dir: "out".into(),
            db_path: "scores.db".into(),
            backend: BackendType::Csv,
            histogram_width: 50,
        }
    }

    #[test]
    fn test_env_config() {
        // Both cases in one test: env vars are process-global
        env::remove_var("CREDIT_INPUT_PATH");
        env::remove_var("CREDIT_OUTPUT_DIR");
        env::remove_var("CREDIT_DB_PATH");
        env::remove_var("CREDIT_HISTOGRAM_WIDTH");

        let config = ScoringConfig::from_env().unwrap();
        assert_eq!(config.input_path, PathBuf::from("user-wallet-transactions.json"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.db_path, PathBuf::from("data/credit_scores.db"));
        assert_eq!(config.backend, BackendType::Csv);
        assert_eq!(config.histogram_width, 50);

        env::set_var("CREDIT_INPUT_PATH", "/tmp/ledger.jsonl");
        env::set_var("CREDIT_DB_PATH", "/tmp/scores.db");
        env::set_var("CREDIT_HISTOGRAM_WIDTH", "20");

        let config = ScoringConfig::from_env().unwrap();
        assert_eq!(config.input_path, PathBuf::from("/tmp/ledger.jsonl"));
        assert_eq!(config.db_path, PathBuf::from("/tmp/scores.db"));
        assert_eq!(config.histogram_width, 20);

        env::set_var("CREDIT_HISTOGRAM_WIDTH", "0");
        assert!(matches!(ScoringConfig::from_env(), Err(ConfigError::InvalidValue(_))));

        env::remove_var("CREDIT_INPUT_PATH");
        env::remove_var("CREDIT_DB_PATH");
        env::remove_var("CREDIT_HISTOGRAM_WIDTH");
    }

    #[test]
    fn test_args_override() {
        let config = base_config()
            .apply_args(&args(&["--backend", "sqlite", "--input", "other.json"]))
            .unwrap();

        assert_eq!(config.backend, BackendType::Sqlite);
        assert_eq!(config.input_path, PathBuf::from("other.json"));
        assert_eq!(config.output_target(), &PathBuf::from("scores.db"));
    }

    #[test]
    fn test_invalid_args() {
        assert!(matches!(
            base_config().apply_args(&args(&["--backend", "parquet"])),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            base_config().apply_args(&args(&["--input"])),
            Err(ConfigError::MissingVariable(_))
        ));
    }
}
