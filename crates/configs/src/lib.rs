use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

/// Environment variable naming the config file; falls back to `pipeline.toml`.
pub const CONFIG_PATH_ENV: &str = "PIPELINE_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct PipelineConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format(), filter: default_log_filter() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RetryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CircuitBreakerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u64,
    #[serde(default = "default_recovery_timeout")]
    pub recovery_timeout_secs: u64,
    #[serde(default = "default_half_open_max_calls")]
    pub half_open_max_calls: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            failure_threshold: default_failure_threshold(),
            recovery_timeout_secs: default_recovery_timeout(),
            half_open_max_calls: default_half_open_max_calls(),
        }
    }
}

fn default_true() -> bool { true }
fn default_log_format() -> String { "compact".to_string() }
fn default_log_filter() -> String { "info".to_string() }
fn default_max_attempts() -> u32 { 3 }
fn default_backoff_base_ms() -> u64 { 100 }
fn default_backoff_max_ms() -> u64 { 5000 }
fn default_failure_threshold() -> u64 { 5 }
fn default_recovery_timeout() -> u64 { 30 }
fn default_half_open_max_calls() -> u64 { 3 }

pub fn load_default() -> Result<PipelineConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "pipeline.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<PipelineConfig> {
    let cfg: PipelineConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl PipelineConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Like [`PipelineConfig::load_and_validate`], but a missing file yields the defaults.
    /// A file that exists and is invalid is still an error.
    pub fn load_or_default() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "pipeline.toml".to_string());
        if std::fs::metadata(&path).is_err() {
            return Ok(Self::default());
        }
        Self::load_and_validate()
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.logging.normalize()?;
        self.retry.validate()?;
        self.circuit_breaker.validate()?;
        Ok(())
    }
}

impl LoggingConfig {
    fn normalize(&mut self) -> Result<()> {
        self.format = self.format.trim().to_ascii_lowercase();
        if self.format.is_empty() {
            self.format = default_log_format();
        }
        if self.format != "compact" && self.format != "json" {
            return Err(anyhow!("logging.format must be `compact` or `json`, got `{}`", self.format));
        }
        if self.filter.trim().is_empty() {
            self.filter = default_log_filter();
        }
        Ok(())
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl RetryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(anyhow!("retry.max_attempts must be >= 1"));
        }
        if self.backoff_base_ms > self.backoff_max_ms {
            return Err(anyhow!("retry.backoff_base_ms must be <= retry.backoff_max_ms"));
        }
        Ok(())
    }
}

impl CircuitBreakerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.failure_threshold == 0 {
            return Err(anyhow!("circuit_breaker.failure_threshold must be >= 1"));
        }
        if self.half_open_max_calls == 0 {
            return Err(anyhow!("circuit_breaker.half_open_max_calls must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let mut cfg = load_from_str("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg, PipelineConfig::default());
        assert_eq!(cfg.retry.max_attempts, 3);
        assert!(!cfg.logging.is_json());
    }

    #[test]
    fn partial_sections_fill_remaining_fields() {
        let cfg = load_from_str(
            r#"
            [logging]
            format = " JSON "

            [retry]
            max_attempts = 5
            "#,
        )
        .unwrap();
        let mut cfg = cfg;
        cfg.normalize_and_validate().unwrap();
        assert!(cfg.logging.is_json());
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.retry.backoff_base_ms, 100);
        assert_eq!(cfg.circuit_breaker.failure_threshold, 5);
    }

    #[test]
    fn rejects_impossible_values() {
        let mut cfg = load_from_str("[retry]\nmax_attempts = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = load_from_str("[retry]\nbackoff_base_ms = 10\nbackoff_max_ms = 1\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = load_from_str("[logging]\nformat = \"xml\"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = load_from_str("[circuit_breaker]\nfailure_threshold = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn load_from_file_reads_toml() {
        let path = std::env::temp_dir().join(format!("pipeline_cfg_{}.toml", std::process::id()));
        std::fs::write(&path, "[circuit_breaker]\nenabled = false\n").unwrap();
        let cfg = load_from_file(path.to_str().unwrap()).unwrap();
        assert!(!cfg.circuit_breaker.enabled);
        let _ = std::fs::remove_file(&path);
    }
}
