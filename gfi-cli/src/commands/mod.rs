//! CLI command implementations

pub mod run;
pub mod watch;

pub use run::RunArgs;
pub use watch::WatchArgs;
