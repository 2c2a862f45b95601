//! Run command - Add good first issues to the project once

use clap::Args;
use gfi_core::Config;
use gfi_github::{GitHubClient, RunOutcome, Tracker};

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {}

impl RunArgs {
    /// Execute the run command
    ///
    /// A fatal run error is returned so the process exits non-zero.
    pub async fn execute(&self, config: &Config, client: GitHubClient) -> anyhow::Result<()> {
        let tracker = Tracker::new(client);

        match tracker.run_once(config, None).await? {
            RunOutcome::Completed(summary) => {
                println!(
                    "Added {} issues from {} repositories ({} skipped)",
                    summary.issues_added, summary.repositories, summary.skipped_repositories
                );
            }
            RunOutcome::Aborted(e) => {
                println!("Run skipped: {}", e);
            }
        }

        Ok(())
    }
}
