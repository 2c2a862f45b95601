//! Fetching good first issues from a repository

use gfi_core::RepoRef;
use serde::Deserialize;
use tracing::debug;

use crate::{decode, query, GraphQlResponse, GraphQlTransport, Result};

/// An open issue carrying the good first issue label
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    /// GraphQL node id
    pub id: String,
    /// Web URL of the issue
    pub url: String,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IssueQueryData {
    repository: Option<RepositoryData>,
}

#[derive(Debug, Deserialize)]
struct RepositoryData {
    issues: Option<IssueConnection>,
}

#[derive(Debug, Deserialize)]
struct IssueConnection {
    nodes: Option<Vec<Option<Issue>>>,
}

/// Fetch the first page of open good first issues in `repo`
///
/// Returns `Ok(None)` when the response has no issue list, for example
/// because the repository does not exist or is not visible to the token.
pub async fn fetch_good_first_issues<T>(transport: &T, repo: &RepoRef) -> Result<Option<Vec<Issue>>>
where
    T: GraphQlTransport + ?Sized,
{
    debug!(repo = %repo, "Fetching good first issues");

    let body = transport
        .execute(&query::issue_query(&repo.owner, &repo.name))
        .await?;

    let response: GraphQlResponse<IssueQueryData> = decode(&body)?;
    response.warn_on_errors("issues");

    let issues = response
        .data
        .and_then(|d| d.repository)
        .and_then(|r| r.issues)
        .and_then(|i| i.nodes)
        .map(|nodes| nodes.into_iter().flatten().collect::<Vec<_>>());

    if let Some(ref issues) = issues {
        debug!(repo = %repo, count = issues.len(), "Fetched good first issues");
    }

    Ok(issues)
}
