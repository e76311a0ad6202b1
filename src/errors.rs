use crate::models::content::ContentId;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Failures talking to the content backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not build the HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned {status}: {message}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        message: String,
    },
    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("deleting {} of {total} content items failed (ids {failed:?})", .failed.len())]
    BatchDelete {
        failed: Vec<ContentId>,
        total: usize,
        #[source]
        first: Box<ClientError>,
    },
}

impl ClientError {
    /// Build a `Status` error from a response body, preferring the message in
    /// the backend's `{success, data, error}` envelope over the raw text.
    pub fn from_status(method: Method, url: String, status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .map(|error| match error {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_else(|| body.trim().to_string());

        ClientError::Status {
            method,
            url,
            status,
            message,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<serde_json::Value>,
}

/// An effect that failed; published on the dispatcher's error channel.
#[derive(Debug, Error)]
#[error("{effect} ({correlation_id}) failed: {source}")]
pub struct PipelineError {
    pub effect: &'static str,
    pub correlation_id: Uuid,
    #[source]
    pub source: ClientError,
}
