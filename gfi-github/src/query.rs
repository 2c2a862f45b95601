//! GraphQL documents sent by the tracker
//!
//! Arguments are interpolated into the document text as-is. Nothing is
//! escaped: a value containing `"` or `\` produces a broken document. The
//! owner, repository and node id values are GitHub-issued identifiers, which
//! never contain those characters, and the exact request bytes are kept
//! stable on purpose. Do not pass free-form user input to these builders.

/// Label that marks an issue as suitable for newcomers
pub const GOOD_FIRST_ISSUE_LABEL: &str = "good first issue";

/// Issues fetched per repository. There is no cursor, so anything past the
/// first page is never seen.
pub const ISSUE_PAGE_SIZE: u32 = 100;

/// Open issues labeled [`GOOD_FIRST_ISSUE_LABEL`] in `owner/repo_name`
pub fn issue_query(owner: &str, repo_name: &str) -> String {
    format!(
        r#"{{
  repository(owner: "{owner}", name: "{repo_name}") {{
    issues(labels: "{label}", first: {first}, states: OPEN) {{
      nodes {{
        id
        url
        title
      }}
    }}
  }}
}}"#,
        label = GOOD_FIRST_ISSUE_LABEL,
        first = ISSUE_PAGE_SIZE,
    )
}

/// Node id of project number `project_number` owned by organization `org_login`
pub fn project_lookup_query(org_login: &str, project_number: u64) -> String {
    format!(
        r#"{{
  organization(login: "{org_login}") {{
    projectV2(number: {project_number}) {{
      id
    }}
  }}
}}"#
    )
}

/// Add the issue with node id `issue_id` to the project with node id `project_id`
pub fn attach_mutation(issue_id: &str, project_id: &str) -> String {
    format!(
        r#"mutation {{
  addProjectV2ItemById(input: {{projectId: "{project_id}", contentId: "{issue_id}"}}) {{
    item {{
      id
    }}
  }}
}}"#
    )
}
