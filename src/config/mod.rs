mod file_config;

pub use file_config::{AdminConfig, FileConfig};

use crate::latency::Latency;
use crate::session::AdminCredentials;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_SESSION_FILE: &str = "session.json";
pub const DEFAULT_TOAST_DURATION_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LatencyMode {
    /// Operations complete immediately.
    #[default]
    None,
    /// Every operation waits `latency_ms`.
    Fixed,
    /// Per-operation delays of a slow remote backend.
    Realistic,
}

/// CLI arguments that can be overridden by the TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub fixtures_dir: Option<PathBuf>,
    pub latency: LatencyMode,
    pub latency_ms: u64,
    pub session_file: PathBuf,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub toast_duration_ms: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            fixtures_dir: None,
            latency: LatencyMode::None,
            latency_ms: 0,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            admin_username: None,
            admin_password: None,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Built-in fixtures are used when unset.
    pub fixtures_dir: Option<PathBuf>,
    pub latency: Latency,
    pub session_file: PathBuf,
    pub credentials: AdminCredentials,
    pub toast_duration: Duration,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let fixtures_dir = file
            .fixtures_dir
            .map(PathBuf::from)
            .or_else(|| cli.fixtures_dir.clone());
        if let Some(dir) = &fixtures_dir {
            if !dir.exists() {
                bail!("Fixtures directory does not exist: {:?}", dir);
            }
            if !dir.is_dir() {
                bail!("fixtures_dir is not a directory: {:?}", dir);
            }
        }

        let latency_mode = match file.latency {
            Some(s) => parse_latency_mode(&s).unwrap_or_else(|| {
                warn!("Unknown latency mode \"{}\" in config file, using {:?}", s, cli.latency);
                cli.latency
            }),
            None => cli.latency,
        };
        let latency_ms = file.latency_ms.unwrap_or(cli.latency_ms);
        let latency = match latency_mode {
            LatencyMode::None => Latency::None,
            LatencyMode::Fixed => Latency::Fixed(Duration::from_millis(latency_ms)),
            LatencyMode::Realistic => Latency::Realistic,
        };

        let session_file = file
            .session_file
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.session_file.clone());

        let admin = file.admin.unwrap_or_default();
        let defaults = AdminCredentials::default();
        let credentials = AdminCredentials {
            username: admin
                .username
                .or_else(|| cli.admin_username.clone())
                .unwrap_or(defaults.username),
            password: admin
                .password
                .or_else(|| cli.admin_password.clone())
                .unwrap_or(defaults.password),
        };

        let toast_duration =
            Duration::from_millis(file.toast_duration_ms.unwrap_or(cli.toast_duration_ms));

        Ok(Self {
            fixtures_dir,
            latency,
            session_file,
            credentials,
            toast_duration,
        })
    }
}

fn parse_latency_mode(s: &str) -> Option<LatencyMode> {
    LatencyMode::from_str(s, true).ok()
}
