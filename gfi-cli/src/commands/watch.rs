//! Watch command - Run the tracker on a fixed interval

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use clap::Args;
use gfi_core::Config;
use gfi_github::{GitHubClient, GraphQlTransport, Tracker};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::Overrides;

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Time between runs, e.g. 10m (overrides config and GFI_INTERVAL)
    #[arg(short, long, value_parser = gfi_core::parse_interval)]
    pub interval: Option<Duration>,

    /// Wait one interval before the first run
    #[arg(long)]
    pub no_run_on_startup: bool,
}

/// Validated timer settings
#[derive(Debug)]
struct Schedule {
    interval: Duration,
    first_tick: Instant,
    until_next_run: chrono::Duration,
}

impl Schedule {
    fn new(interval: Duration, run_on_startup: bool) -> gfi_core::Result<Self> {
        let too_large = || {
            gfi_core::Error::Config(format!("Interval of {}s is too large", interval.as_secs()))
        };

        if interval.is_zero() {
            return Err(gfi_core::Error::Config(
                "Interval must be greater than zero".to_string(),
            ));
        }

        let now = Instant::now();
        let first_tick = if run_on_startup {
            now
        } else {
            now.checked_add(interval).ok_or_else(too_large)?
        };
        // The tick after the first one has to be representable too
        first_tick.checked_add(interval).ok_or_else(too_large)?;

        let until_next_run = chrono::Duration::from_std(interval).map_err(|_| too_large())?;

        Ok(Self {
            interval,
            first_tick,
            until_next_run,
        })
    }
}

impl WatchArgs {
    /// Execute the watch command
    ///
    /// Runs never overlap: the next tick is only awaited once the current run
    /// has finished. Configuration is reloaded before every run, the client
    /// and its token are not. Ctrl-C stops the loop, also in the middle of a run.
    pub async fn execute(
        &self,
        overrides: &Overrides,
        config: &Config,
        client: GitHubClient,
    ) -> anyhow::Result<()> {
        let run_on_startup = config.schedule.run_on_startup && !self.no_run_on_startup;
        let schedule = Schedule::new(config.schedule.interval, run_on_startup)?;
        let tracker = Tracker::new(client);

        info!(
            interval_secs = schedule.interval.as_secs(),
            run_on_startup, "Watching for good first issues"
        );

        watch(
            &tracker,
            &schedule,
            || overrides.load(self.interval),
            tokio::signal::ctrl_c(),
        )
        .await
    }
}

async fn watch<T, L, S>(
    tracker: &Tracker<T>,
    schedule: &Schedule,
    load_config: L,
    shutdown: S,
) -> anyhow::Result<()>
where
    T: GraphQlTransport,
    L: Fn() -> gfi_core::Result<Config>,
    S: Future,
{
    let mut ticker = tokio::time::interval_at(schedule.first_tick, schedule.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                info!("Shutting down");
                return Ok(());
            }
        }

        let next_run = Utc::now() + schedule.until_next_run;

        let config = match load_config() {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "Failed to reload configuration, skipping run");
                continue;
            }
        };

        tokio::select! {
            result = tracker.run_once(&config, Some(next_run)) => {
                if let Err(e) = result {
                    error!(error = %e, "Tracker run failed");
                }
            }
            _ = &mut shutdown => {
                info!("Shutting down, current run abandoned");
                return Ok(());
            }
        }
    }
}
