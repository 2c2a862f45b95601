//! GFI GitHub - GitHub integration for the good first issue tracker
//!
//! This crate builds the GraphQL documents the tracker sends, posts them to
//! the GitHub GraphQL endpoint, decodes the responses and drives a single
//! tracker run that adds every open "good first issue" to a project board.

mod client;
mod error;
mod graphql;
mod issues;
mod project;
pub mod query;
mod tracker;

pub use client::{GitHubClient, USER_AGENT};
pub use error::{Error, Result};
pub use graphql::{decode, GraphQlError, GraphQlResponse, GraphQlTransport};
pub use issues::{fetch_good_first_issues, Issue};
pub use project::{add_issue_to_project, resolve_project_id, ProjectId};
pub use tracker::{RunOutcome, RunSummary, Tracker};
