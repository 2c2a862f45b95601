//! GitHub GraphQL client using reqwest

use async_trait::async_trait;
use gfi_core::{Secrets, DEFAULT_API_URL};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::json;
use tracing::{debug, info};
use url::Url;

use crate::{Error, GraphQlTransport, Result};

/// User agent sent with every request
pub const USER_AGENT: &str = "good-first-issue-tracker";

/// GitHub REST v3 media type, also accepted by the GraphQL endpoint
const ACCEPT: &str = "application/vnd.github.v3+json";

/// Authenticated GraphQL client
///
/// Credentials are baked into the default headers when the client is built
/// and never change afterwards. Rotating the token means building a new
/// client, in practice restarting the process.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl GitHubClient {
    /// Create a client for the GraphQL endpoint at `endpoint`
    pub fn new(token: &str, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Auth("GitHub token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        info!(endpoint = %endpoint, "Created GitHub client");

        Ok(Self { http, endpoint })
    }

    /// Create a client for the public GitHub endpoint
    pub fn with_token(token: &str) -> Result<Self> {
        Self::new(token, DEFAULT_API_URL)
    }

    /// Create a client using the token from `secrets`
    ///
    /// The environment (GitHubToken, GITHUB_TOKEN) takes priority over the
    /// secrets file.
    pub fn from_secrets(secrets: &Secrets, endpoint: &str) -> Result<Self> {
        let token = secrets.github_token().ok_or_else(|| {
            Error::Auth(
                "GitHub token not found. Set the GitHubToken environment variable \
                 or add token to ~/.config/gfi-tracker/secrets.toml"
                    .to_string(),
            )
        })?;

        Self::new(&token, endpoint)
    }
}

#[async_trait]
impl GraphQlTransport for GitHubClient {
    async fn execute(&self, query: &str) -> Result<String> {
        debug!(endpoint = %self.endpoint, "Sending GraphQL request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Status { status, body });
        }

        debug!(status = %status, bytes = body.len(), "Received GraphQL response");

        Ok(body)
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}
