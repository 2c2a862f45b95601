//! Configuration management for the tracker
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (GitHubRepos, GitHubProject, GFI_*)
//! 3. Config file (~/.config/gfi-tracker/config.toml)
//! 4. Default values
//!
//! The repository list and project are kept as the raw strings an operator
//! wrote. They are parsed into a [`RunConfig`](crate::RunConfig) at the start
//! of each run so a bad value aborts that run instead of the process.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, Result, RunConfig};

/// GitHub GraphQL endpoint used when none is configured
pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";

/// GitHub-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Comma-separated `owner/repo` list
    pub repos: Option<String>,

    /// Target board as `org/number`
    pub project: Option<String>,

    /// GraphQL endpoint
    pub api_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            repos: None,
            project: None,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Timer settings for watch mode
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Time between run starts
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// Run immediately instead of waiting for the first tick
    pub run_on_startup: bool,
}

impl ScheduleConfig {
    /// Reject intervals a timer cannot be built from
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::Config("Interval must be greater than zero".to_string()));
        }

        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10 * 60),
            run_on_startup: true,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration
    pub github: GitHubConfig,

    /// Schedule configuration
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;

        config.schedule.validate()?;
        Ok(config)
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/gfi-tracker/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gfi-tracker").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - GitHubRepos: comma-separated owner/repo list
    /// - GitHubProject: org/number
    /// - GFI_API_URL: GraphQL endpoint
    /// - GFI_INTERVAL: watch interval, e.g. `10m`
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(repos) = std::env::var("GitHubRepos") {
            self.github.repos = Some(repos);
        }

        if let Ok(project) = std::env::var("GitHubProject") {
            self.github.project = Some(project);
        }

        if let Ok(api_url) = std::env::var("GFI_API_URL") {
            self.github.api_url = api_url;
        }

        if let Ok(interval) = std::env::var("GFI_INTERVAL") {
            match parse_interval(&interval) {
                Ok(interval) => self.schedule.interval = interval,
                Err(e) => warn!(value = %interval, error = %e, "Ignoring GFI_INTERVAL"),
            }
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        repos: Option<String>,
        project: Option<String>,
        interval: Option<Duration>,
    ) -> Self {
        if let Some(repos) = repos {
            self.github.repos = Some(repos);
        }

        if let Some(project) = project {
            self.github.project = Some(project);
        }

        if let Some(interval) = interval {
            self.schedule.interval = interval;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        repos: Option<String>,
        project: Option<String>,
        interval: Option<Duration>,
    ) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(repos, project, interval))
    }

    /// Parse the repository list and project into targets for one run
    pub fn run_config(&self) -> Result<RunConfig> {
        RunConfig::parse(self.github.repos.as_deref(), self.github.project.as_deref())
    }
}

/// Parse a human-readable interval such as `10m` or `1h 30m`
pub fn parse_interval(value: &str) -> Result<Duration> {
    let interval = humantime_serde::re::humantime::parse_duration(value)
        .map_err(|e| Error::Config(format!("Invalid interval '{}': {}", value, e)))?;

    if interval.is_zero() {
        return Err(Error::Config("Interval must be greater than zero".to_string()));
    }

    Ok(interval)
}
