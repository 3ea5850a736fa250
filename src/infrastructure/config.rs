//! Configuration loaded from environment variables.
//!
//! Credentials and tuning knobs come from the process environment so the
//! tool can run unattended. Defaults cover everything except the base URL
//! and the three session cookies.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Result, bail};

/// Default values for everything the environment may omit.
pub mod defaults {
    /// Retry rounds after the initial batch pass.
    pub const MAX_RETRIES: u32 = 5;

    /// Fixed delay before each batch retry, in seconds.
    pub const RETRY_DELAY_SECONDS: f64 = 2.0;

    /// Timestamped output backups to keep.
    pub const BACKUP_KEEP_COUNT: usize = 5;

    /// Backup file name prefix.
    pub const BACKUP_PREFIX: &str = "ex_backup";

    /// Snapshot output path.
    pub const OUTPUT_PATH: &str = "web-static/public/data/galleries.json";

    /// Backup directory.
    pub const BACKUP_DIR: &str = "web-static/public/data/backup_data";

    /// Log level when neither RUST_LOG nor LOG_LEVEL is set.
    pub const LOG_LEVEL: &str = "info";
}

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Favorites listing URL pagination starts from.
    pub base_url: String,
    pub auth: AuthConfig,
    pub retry: RetryConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Session cookie values for the favorites listing.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub member_id: String,
    pub pass_hash: String,
    pub igneous: String,
}

/// Retry tuning for the batch fetch stage.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retry rounds after the initial pass.
    pub max_retries: u32,
    /// Fixed delay before every retry fetch, in seconds.
    pub retry_delay_seconds: f64,
}

impl RetryConfig {
    /// The retry delay as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay_seconds.max(0.0))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: defaults::MAX_RETRIES,
            retry_delay_seconds: defaults::RETRY_DELAY_SECONDS,
        }
    }
}

/// Where the snapshot and its backups live.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub output_path: PathBuf,
    pub backup_dir: PathBuf,
    /// Newest backups retained after rotation.
    pub keep_count: usize,
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(defaults::OUTPUT_PATH),
            backup_dir: PathBuf::from(defaults::BACKUP_DIR),
            keep_count: defaults::BACKUP_KEEP_COUNT,
            prefix: defaults::BACKUP_PREFIX.to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: String,
    /// Also write logs to a rolling file under `logs/`.
    pub file_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            file_output: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: require("EXHENTAI_BASE_URL")?,
            auth: AuthConfig {
                member_id: require("EXHENTAI_COOKIE_MEMBER_ID")?,
                pass_hash: require("EXHENTAI_COOKIE_PASS_HASH")?,
                igneous: require("EXHENTAI_COOKIE_IGNEOUS")?,
            },
            retry: RetryConfig {
                max_retries: parse_or("MAX_RETRIES", defaults::MAX_RETRIES)?,
                retry_delay_seconds: parse_or("RETRY_DELAY_SECONDS", defaults::RETRY_DELAY_SECONDS)?,
            },
            output: OutputConfig {
                output_path: PathBuf::from(string_or("OUTPUT_PATH", defaults::OUTPUT_PATH)),
                backup_dir: PathBuf::from(string_or("BACKUP_DIR", defaults::BACKUP_DIR)),
                keep_count: parse_or("BACKUP_KEEP_COUNT", defaults::BACKUP_KEEP_COUNT)?,
                prefix: defaults::BACKUP_PREFIX.to_string(),
            },
            logging: LoggingConfig {
                level: string_or("LOG_LEVEL", defaults::LOG_LEVEL),
                file_output: parse_or("LOG_FILE_OUTPUT", false)?,
            },
        })
    }
}

fn require(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("required environment variable {name} is not set"),
    }
}

fn string_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_or<T: FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {name}: {e}")),
        _ => Ok(default),
    }
}
