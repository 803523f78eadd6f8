use std::error::Error as StdError;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures reported by the control-plane client.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Not authorized")]
    Unauthorized,
    /// The service answered with an error status. The message is already
    /// stripped down to what the service said.
    #[error("{0}")]
    Status(String),
    #[error("{0}")]
    Transport(String),
    #[error("unexpected response from server: {0}")]
    Decode(String),
}

impl ApiError {
    /// Builds the error for a non-success response from its status and body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            return Self::Unauthorized;
        }
        Self::Status(strip_error_body(status, body))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(root_cause(&err.without_url()));
        }
        Self::Transport(root_cause(&err.without_url()))
    }
}

/// The service wraps failures as `{"code": .., "message": ..}`.
fn strip_error_body(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    if let Some(message) = parsed
        .as_ref()
        .and_then(|value| value.get("message"))
        .and_then(|message| message.as_str())
        .filter(|message| !message.is_empty())
    {
        return message.to_string();
    }

    let body = body.trim();
    if parsed.is_none() && !body.is_empty() {
        return body.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

fn root_cause(err: &(dyn StdError + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

/// Terminal failures of a single invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("The number of args is not correct!\n{usage}")]
    Usage { usage: String },
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Remote(#[from] ApiError),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// Usage errors share clap's exit status; everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. } => 2,
            _ => 1,
        }
    }
}
