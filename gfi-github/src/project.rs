//! Project board lookup and issue attachment

use std::fmt;

use gfi_core::ProjectRef;
use serde::de::IgnoredAny;
use serde::Deserialize;
use tracing::debug;

use crate::{decode, query, Error, GraphQlResponse, GraphQlTransport, Result};

/// GraphQL node id of a project board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Deserialize)]
struct ProjectQueryData {
    organization: Option<OrganizationData>,
}

#[derive(Debug, Deserialize)]
struct OrganizationData {
    #[serde(rename = "projectv2")]
    project_v2: Option<ProjectData>,
}

#[derive(Debug, Deserialize)]
struct ProjectData {
    id: Option<String>,
}

/// Resolve `project` to its node id
///
/// A response without an id is an error: nothing can be attached to a
/// project that could not be found.
pub async fn resolve_project_id<T>(transport: &T, project: &ProjectRef) -> Result<ProjectId>
where
    T: GraphQlTransport + ?Sized,
{
    debug!(project = %project, "Resolving project node id");

    let body = transport
        .execute(&query::project_lookup_query(&project.org, project.number))
        .await?;

    let response: GraphQlResponse<ProjectQueryData> = decode(&body)?;
    response.warn_on_errors("project");

    response
        .data
        .and_then(|d| d.organization)
        .and_then(|o| o.project_v2)
        .and_then(|p| p.id)
        .filter(|id| !id.is_empty())
        .map(ProjectId)
        .ok_or_else(|| Error::ProjectNotFound(project.to_string()))
}

/// Add the issue with node id `issue_id` to `project_id`
///
/// Succeeds once GitHub answers with a decodable response. The returned item
/// is not inspected, GitHub treats re-adding an existing item as a no-op.
pub async fn add_issue_to_project<T>(transport: &T, issue_id: &str, project_id: &ProjectId) -> Result<()>
where
    T: GraphQlTransport + ?Sized,
{
    let body = transport
        .execute(&query::attach_mutation(issue_id, project_id.as_str()))
        .await?;

    let response: GraphQlResponse<IgnoredAny> = decode(&body)?;
    response.warn_on_errors("addProjectV2ItemById");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_project_id() {
        let body = r#"{"data": {"organization": {"projectV2": {"id": "PVT_kwDO"}}}}"#;
        let response: GraphQlResponse<ProjectQueryData> = decode(body).unwrap();
        let id = response.data.unwrap().organization.unwrap().project_v2.unwrap().id;
        assert_eq!(id.as_deref(), Some("PVT_kwDO"));
    }

    #[test]
    fn test_decode_missing_project() {
        let body = r#"{"data": {"organization": {}}}"#;
        let response: GraphQlResponse<ProjectQueryData> = decode(body).unwrap();
        assert!(response.data.unwrap().organization.unwrap().project_v2.is_none());
    }
}
