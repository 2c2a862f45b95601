//! A single tracker run: resolve the board, scan repositories, attach issues

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use gfi_core::{Config, RunConfig};
use tracing::{error, info, warn};

use crate::{add_issue_to_project, fetch_good_first_issues, resolve_project_id, Error, GraphQlTransport, Result};

/// Counters reported at the end of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Repositories visited
    pub repositories: usize,
    /// Repositories whose issue list could not be loaded
    pub skipped_repositories: usize,
    /// Attach mutations that completed
    pub issues_added: usize,
}

/// How a run ended, short of a fatal error
#[derive(Debug)]
pub enum RunOutcome {
    /// Every configured repository was visited
    Completed(RunSummary),
    /// The configuration was missing or malformed; nothing was sent
    Aborted(gfi_core::Error),
}

/// Adds good first issues to a project board, one run at a time
///
/// The transport is built once and reused for every run.
pub struct Tracker<T> {
    transport: T,
    running: AtomicBool,
}

/// Clears the in-flight flag when a run ends, however it ends
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<T: GraphQlTransport> Tracker<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            running: AtomicBool::new(false),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform one run against the repositories and project in `config`
    ///
    /// Configuration problems end the run with [`RunOutcome::Aborted`] before
    /// any request is made. An unresolvable project, a failed request or an
    /// undecodable response is returned as an error. A repository without an
    /// issue list is skipped with a warning.
    ///
    /// `next_run` is only reported in the summary log.
    pub async fn run_once(&self, config: &Config, next_run: Option<DateTime<Utc>>) -> Result<RunOutcome> {
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(Error::RunInProgress);
        }
        let _guard = RunGuard(&self.running);

        let run = match config.run_config() {
            Ok(run) => run,
            Err(e) => {
                error!(error = %e, "Invalid tracker configuration, skipping run");
                return Ok(RunOutcome::Aborted(e));
            }
        };

        let summary = self.run(&run).await?;

        info!(
            issues_added = summary.issues_added,
            repositories = summary.repositories,
            skipped_repositories = summary.skipped_repositories,
            next_run = %next_run.map(|t| t.to_rfc3339()).unwrap_or_else(|| "unscheduled".to_string()),
            "Added {} issues to project",
            summary.issues_added
        );

        Ok(RunOutcome::Completed(summary))
    }

    async fn run(&self, run: &RunConfig) -> Result<RunSummary> {
        let project_id = resolve_project_id(&self.transport, &run.project).await?;

        info!(
            repositories = run.repos.len(),
            project = %run.project.url(),
            project_id = %project_id,
            "Found {} repositories in configuration",
            run.repos.len()
        );

        let mut summary = RunSummary::default();

        for repo in &run.repos {
            summary.repositories += 1;

            let Some(issues) = fetch_good_first_issues(&self.transport, repo).await? else {
                warn!(repo = %repo, "Unable to load issues from {}", repo);
                summary.skipped_repositories += 1;
                continue;
            };

            for issue in issues {
                if issue.id.is_empty() {
                    warn!(repo = %repo, url = %issue.url, "Skipping issue without node id");
                    continue;
                }

                add_issue_to_project(&self.transport, &issue.id, &project_id).await?;
                info!(repo = %repo, title = issue.title.as_deref().unwrap_or_default(), "Added {}", issue.url);
                summary.issues_added += 1;
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Replays canned response bodies and records every document it receives
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<String>>>,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(|r| Ok(r.to_string())).collect()),
                queries: Mutex::default(),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }

        fn mutations(&self) -> Vec<String> {
            self.queries()
                .into_iter()
                .filter(|q| q.starts_with("mutation"))
                .collect()
        }
    }

    #[async_trait]
    impl GraphQlTransport for ScriptedTransport {
        async fn execute(&self, query: &str) -> Result<String> {
            self.queries.lock().unwrap().push(query.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    const PROJECT_P1: &str = r#"{"data": {"organization": {"projectV2": {"id": "P_1"}}}}"#;
    const ATTACHED: &str = r#"{"data": {"addProjectV2ItemById": {"item": {"id": "PVTI_1"}}}}"#;

    fn issues(nodes: &[(&str, &str)]) -> String {
        let nodes: Vec<String> = nodes
            .iter()
            .map(|(id, url)| format!(r#"{{"id": "{}", "url": "{}"}}"#, id, url))
            .collect();
        format!(
            r#"{{"data": {{"repository": {{"issues": {{"nodes": [{}]}}}}}}}}"#,
            nodes.join(",")
        )
    }

    fn config(repos: &str, project: &str) -> Config {
        Config::default().with_cli_overrides(Some(repos.to_string()), Some(project.to_string()), None)
    }

    #[tokio::test]
    async fn test_single_issue_scenario() {
        let repo_a = issues(&[("I1", "u1")]);
        let repo_b = issues(&[]);
        let tracker = Tracker::new(ScriptedTransport::new(&[PROJECT_P1, repo_a.as_str(), ATTACHED, repo_b.as_str()]));

        let outcome = tracker
            .run_once(&config("octo/repoA,octo/repoB", "octo/5"), None)
            .await
            .unwrap();

        let RunOutcome::Completed(summary) = outcome else {
            panic!("expected completed run");
        };
        assert_eq!(summary.issues_added, 1);
        assert_eq!(summary.repositories, 2);
        assert_eq!(summary.skipped_repositories, 0);

        let queries = tracker.transport().queries();
        assert_eq!(queries.len(), 4);
        assert!(queries[0].contains("projectV2(number: 5)"));
        assert!(queries[1].contains(r#"name: "repoA""#));
        assert!(queries[2].contains(r#"projectId: "P_1", contentId: "I1""#));
        assert!(queries[3].contains(r#"name: "repoB""#));
    }

    #[tokio::test]
    async fn test_attaches_in_response_and_config_order() {
        let first = issues(&[("A1", "a1"), ("A2", "a2")]);
        let second = issues(&[("B1", "b1")]);
        let tracker = Tracker::new(ScriptedTransport::new(&[
            PROJECT_P1, first.as_str(), ATTACHED, ATTACHED, second.as_str(), ATTACHED,
        ]));

        tracker
            .run_once(&config("octo/first,octo/second", "octo/1"), None)
            .await
            .unwrap();

        let attached: Vec<String> = tracker
            .transport()
            .mutations()
            .iter()
            .map(|m| {
                ["A1", "A2", "B1"]
                    .iter()
                    .find(|id| m.contains(&format!(r#"contentId: "{}""#, id)))
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert_eq!(attached, vec!["A1", "A2", "B1"]);
    }

    #[tokio::test]
    async fn test_missing_issue_list_skips_repository() {
        let missing = r#"{"data": {"repository": {"issues": {}}}}"#;
        let not_found = r#"{"data": {"repository": null}, "errors": [{"message": "Could not resolve to a Repository"}]}"#;
        let found = issues(&[("I9", "u9")]);
        let tracker = Tracker::new(ScriptedTransport::new(&[
            PROJECT_P1, missing, not_found, found.as_str(), ATTACHED,
        ]));

        let outcome = tracker
            .run_once(&config("octo/a,octo/gone,octo/c", "octo/1"), None)
            .await
            .unwrap();

        let RunOutcome::Completed(summary) = outcome else {
            panic!("expected completed run");
        };
        assert_eq!(summary.skipped_repositories, 2);
        assert_eq!(summary.issues_added, 1);
        assert_eq!(tracker.transport().mutations().len(), 1);
    }

    #[tokio::test]
    async fn test_unresolved_project_is_fatal() {
        let no_project = r#"{"data": {"organization": {}}}"#;
        let tracker = Tracker::new(ScriptedTransport::new(&[no_project]));

        let err = tracker
            .run_once(&config("octo/repoA,octo/repoB", "octo/5"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ProjectNotFound(ref p) if p == "octo/5"));
        assert_eq!(tracker.transport().queries().len(), 1);
        assert!(tracker.transport().mutations().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_response_is_fatal() {
        let body = "{\"data\": {\"repository\": ";
        let tracker = Tracker::new(ScriptedTransport::new(&[PROJECT_P1, body]));

        let err = tracker
            .run_once(&config("octo/a,octo/b", "octo/1"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.to_string().contains(body));
        assert_eq!(tracker.transport().queries().len(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_is_fatal() {
        let transport = ScriptedTransport::new(&[PROJECT_P1]);
        transport.responses.lock().unwrap().push_back(Err(Error::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream".to_string(),
        }));
        let tracker = Tracker::new(transport);

        let err = tracker
            .run_once(&config("octo/a,octo/b", "octo/1"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Status { .. }));
        assert_eq!(tracker.transport().queries().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_issue_id_is_not_attached() {
        let body = issues(&[("", "u0"), ("I1", "u1")]);
        let tracker = Tracker::new(ScriptedTransport::new(&[PROJECT_P1, body.as_str(), ATTACHED]));

        let outcome = tracker.run_once(&config("octo/a", "octo/1"), None).await.unwrap();

        assert!(matches!(outcome, RunOutcome::Completed(RunSummary { issues_added: 1, .. })));
        assert_eq!(tracker.transport().mutations().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_configuration_aborts_without_requests() {
        let tracker = Tracker::new(ScriptedTransport::default());

        let missing_repos = Config::default().with_cli_overrides(None, Some("octo/1".to_string()), None);
        let outcome = tracker.run_once(&missing_repos, None).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Aborted(gfi_core::Error::MissingRepos)));

        let outcome = tracker.run_once(&config("octo/a", "octo"), None).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Aborted(gfi_core::Error::InvalidProject(_))));

        assert!(tracker.transport().queries().is_empty());
    }

    /// Blocks the first request until released
    struct GatedTransport {
        inner: ScriptedTransport,
        entered: Notify,
        gate: Notify,
        gated: AtomicBool,
    }

    #[async_trait]
    impl GraphQlTransport for GatedTransport {
        async fn execute(&self, query: &str) -> Result<String> {
            if !self.gated.swap(true, Ordering::SeqCst) {
                self.entered.notify_one();
                self.gate.notified().await;
            }
            self.inner.execute(query).await
        }
    }

    #[tokio::test]
    async fn test_overlapping_run_is_rejected() {
        let no_project = r#"{"data": {"organization": null}}"#;
        let tracker = Tracker::new(GatedTransport {
            inner: ScriptedTransport::new(&[no_project, no_project]),
            entered: Notify::new(),
            gate: Notify::new(),
            gated: AtomicBool::new(false),
        });
        let config = config("octo/a", "octo/1");

        let (first, second) = tokio::join!(tracker.run_once(&config, None), async {
            tracker.transport().entered.notified().await;
            let second = tracker.run_once(&config, None).await;
            tracker.transport().gate.notify_one();
            second
        });

        assert!(matches!(first, Err(Error::ProjectNotFound(_))));
        assert!(matches!(second, Err(Error::RunInProgress)));

        // The guard is released even though the first run failed
        let third = tracker.run_once(&config, None).await;
        assert!(matches!(third, Err(Error::ProjectNotFound(_))));
    }
}
