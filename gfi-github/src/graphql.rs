//! GitHub GraphQL envelope, transport seam and response decoding

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::{Error, Result};

/// Something that can post a GraphQL document and hand back the raw response text
///
/// Implemented by [`GitHubClient`](crate::GitHubClient). The tracker awaits
/// each call before issuing the next, so implementations never see two
/// documents in flight from the same run.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    /// Post `query` and return the response body
    async fn execute(&self, query: &str) -> Result<String>;
}

/// GraphQL query response wrapper
///
/// Field names are matched case-insensitively, see [`decode`].
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlError>>,
}

/// GraphQL error
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Log any errors GitHub reported alongside the data
    ///
    /// The tracker works with whatever data came back; errors are surfaced
    /// only in the log.
    pub fn warn_on_errors(&self, context: &str) {
        if let Some(errors) = self.errors.as_deref().filter(|e| !e.is_empty()) {
            let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
            warn!(context, errors = %messages.join(", "), "GraphQL response contained errors");
        }
    }
}

/// Decode a response body into `T`, ignoring case in field names
///
/// Every object key is lowercased before deserialization, so target types
/// name their fields in lowercase. On failure the error carries `body`
/// verbatim.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let decode_error = |source| Error::Decode {
        body: body.to_string(),
        source,
    };

    let value: Value = serde_json::from_str(body).map_err(decode_error)?;
    serde_json::from_value(lowercase_keys(value)).map_err(decode_error)
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.to_lowercase(), lowercase_keys(value)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}
