//! Error types for the HTTP layer and their JSON rendering.

use bjround::{ActionError, BetError, StateError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use warp::Reply;
use warp::http::StatusCode;
use warp::reply::{self, Response};

use crate::codec::CodecError;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code, e.g. `game_not_found`.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn into_response(self, status: StatusCode) -> Response {
        reply::with_status(reply::json(&self), status).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Log level classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 4xx, caused by the caller.
    Client,
    /// 5xx, needs an operator.
    Server,
}

/// Conversion of an error into a logged HTTP response.
pub trait IntoErrorResponse {
    fn status_code(&self) -> StatusCode;

    fn error_code(&self) -> &'static str;

    fn error_message(&self) -> String;

    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity {
        if self.status_code().is_server_error() {
            ErrorSeverity::Server
        } else {
            ErrorSeverity::Client
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        match self.error_details() {
            Some(details) => {
                ErrorResponse::with_details(self.error_code(), self.error_message(), details)
            }
            None => ErrorResponse::new(self.error_code(), self.error_message()),
        }
    }

    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let status = self.status_code();
        let body = self.to_error_response();

        match self.severity() {
            ErrorSeverity::Client => {
                tracing::warn!(status = status.as_u16(), error = %body.error, "{}", body.message);
            }
            ErrorSeverity::Server => {
                tracing::error!(status = status.as_u16(), error = %body.error, "{}", body.message);
            }
        }

        body.into_response(status)
    }
}

/// Everything a game endpoint can fail with.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid bet: {0}")]
    InvalidBet(#[from] BetError),
    #[error("invalid bet amount")]
    MissingAmount,
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("game not found")]
    GameNotFound,
    #[error("session codec failure: {0}")]
    CodecFailure(String),
    #[error("invalid session: {0}")]
    ValidationFailure(String),
    #[error("balance must reach {threshold} to claim the reward")]
    RewardLocked { threshold: usize },
    #[error("stored game could not be (de)serialized: {0}")]
    Storage(#[from] serde_json::Error),
}

impl From<CodecError> for GameError {
    fn from(err: CodecError) -> Self {
        if err.is_malformed_input() {
            Self::ValidationFailure(err.to_string())
        } else {
            Self::CodecFailure(err.to_string())
        }
    }
}

impl From<StateError> for GameError {
    fn from(err: StateError) -> Self {
        Self::ValidationFailure(err.to_string())
    }
}

impl IntoErrorResponse for GameError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidBet(_)
            | Self::MissingAmount
            | Self::Action(_)
            | Self::ValidationFailure(_)
            | Self::RewardLocked { .. } => StatusCode::BAD_REQUEST,
            Self::GameNotFound => StatusCode::NOT_FOUND,
            Self::CodecFailure(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidBet(_) | Self::MissingAmount => "invalid_bet",
            Self::Action(ActionError::NotStarted) => "round_not_started",
            Self::Action(ActionError::RoundAlreadyFinished) => "round_already_finished",
            Self::GameNotFound => "game_not_found",
            Self::CodecFailure(_) => "codec_failure",
            Self::ValidationFailure(_) => "validation_failure",
            Self::RewardLocked { .. } => "reward_locked",
            Self::Storage(_) => "storage_failure",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            Self::InvalidBet(BetError::BelowMinimum { minimum }) => {
                Some(serde_json::json!({ "minimum": minimum }))
            }
            Self::RewardLocked { threshold } => Some(serde_json::json!({ "threshold": threshold })),
            _ => None,
        }
    }
}
