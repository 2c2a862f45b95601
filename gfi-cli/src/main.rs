//! GFI Tracker - Adds good first issues to an organization project board
//!
//! Scans the configured repositories for open issues labeled
//! "good first issue" and adds each one to a GitHub project, either once
//! or on a fixed interval.

mod commands;

use clap::{Parser, Subcommand};
use gfi_core::{Config, Secrets};
use gfi_github::GitHubClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{RunArgs, WatchArgs};

/// Good first issue tracker
#[derive(Parser, Debug)]
#[command(name = "gfi-tracker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Comma-separated owner/repo list (overrides config and env)
    #[arg(long, global = true)]
    repos: Option<String>,

    /// Target project as org/number (overrides config and env)
    #[arg(long, global = true)]
    project: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Add good first issues to the project once
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Add good first issues to the project on a fixed interval
    #[command(visible_alias = "w")]
    Watch(WatchArgs),

    /// Show current configuration
    Config,

    /// Create a secrets file template for the GitHub token
    InitSecrets,
}

/// CLI-level configuration overrides, re-applied whenever config is reloaded
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub repos: Option<String>,
    pub project: Option<String>,
}

impl Overrides {
    pub fn load(&self, interval: Option<std::time::Duration>) -> gfi_core::Result<Config> {
        Config::load_with_overrides(self.repos.clone(), self.project.clone(), interval)
    }
}

fn github_client(config: &Config) -> anyhow::Result<GitHubClient> {
    let secrets = Secrets::load()?;
    Ok(GitHubClient::from_secrets(&secrets, &config.github.api_url)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let overrides = Overrides {
        repos: cli.repos.clone(),
        project: cli.project.clone(),
    };

    match cli.command {
        Some(Commands::Version) => {
            println!("gfi-tracker {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Run(args)) => {
            let config = overrides.load(None)?;
            let client = github_client(&config)?;
            args.execute(&config, client).await?;
        }
        Some(Commands::Watch(args)) => {
            let config = overrides.load(args.interval)?;
            let client = github_client(&config)?;
            args.execute(&overrides, &config, client).await?;
        }
        Some(Commands::Config) => {
            let config = overrides.load(None)?;
            let token = Secrets::load()?.github_token();

            println!("Good First Issue Tracker Configuration");
            println!("======================================");
            println!();
            println!("GitHub Settings:");
            println!("  repos: {}", config.github.repos.as_deref().unwrap_or("(not set)"));
            println!("  project: {}", config.github.project.as_deref().unwrap_or("(not set)"));
            println!("  api_url: {}", config.github.api_url);
            println!("  token: {}", if token.is_some() { "(set)" } else { "(not set)" });
            println!();
            println!("Schedule:");
            println!("  interval: {}s", config.schedule.interval.as_secs());
            println!("  run_on_startup: {}", config.schedule.run_on_startup);
            println!();
            if let Err(e) = config.run_config() {
                println!("Warning: {}", e);
                println!();
            }
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        Some(Commands::InitSecrets) => {
            let path = Secrets::create_template()?;
            println!("Created {}", path.display());
            println!("Add your GitHub token to it, or set the GitHubToken environment variable.");
        }
        None => {
            println!("gfi-tracker - Adds good first issues to a GitHub project board");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
