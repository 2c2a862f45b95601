//! GFI Core - Shared configuration for the good first issue tracker
//!
//! This crate loads the tracker settings and secrets, and turns the raw
//! repository and project strings into typed run targets.

pub mod config;
pub mod error;
pub mod secrets;
pub mod target;

pub use config::{parse_interval, Config, GitHubConfig, ScheduleConfig, DEFAULT_API_URL};
pub use error::{Error, Result};
pub use secrets::{GitHubSecrets, Secrets};
pub use target::{ProjectRef, RepoRef, RunConfig};
