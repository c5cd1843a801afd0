//! Service errors and their HTTP / GraphQL renderings.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<serde_json::Value>,
    },
    #[error("Player '{0}' not found")]
    PlayerNotFound(String),
    #[error("{0}")]
    Model(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl PredictorError {
    pub fn validation(message: impl Into<String>) -> Self {
        PredictorError::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PredictorError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PredictorError::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            PredictorError::Model(_) | PredictorError::ServiceUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            PredictorError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error name.
    pub fn code(&self) -> &'static str {
        match self {
            PredictorError::Validation { .. } => "ValidationError",
            PredictorError::PlayerNotFound(_) => "PlayerNotFoundError",
            PredictorError::Model(_) => "ModelError",
            PredictorError::ServiceUnavailable(_) => "ServiceUnavailableError",
            PredictorError::Storage(_) => "StorageError",
        }
    }

    pub fn body(&self) -> ErrorBody {
        let details = match self {
            PredictorError::Validation { details, .. } => details.clone(),
            PredictorError::PlayerNotFound(name) => {
                Some(serde_json::json!({ "player_name": name }))
            }
            _ => None,
        };
        ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: self.status().as_u16(),
            details,
            request_id: None,
        }
    }
}

/// JSON error envelope. `request_id` is filled in by the request-context
/// middleware once the response is on its way out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub request_id: Option<String>,
}

impl IntoResponse for PredictorError {
    fn into_response(self) -> Response {
        match &self {
            PredictorError::Storage(_) | PredictorError::Model(_) => {
                tracing::error!(error = %self, "request failed")
            }
            _ => tracing::debug!(error = %self, "request rejected"),
        }
        let body = self.body();
        let mut resp = (self.status(), Json(body.clone())).into_response();
        resp.extensions_mut().insert(body);
        resp
    }
}

impl async_graphql::ErrorExtensions for PredictorError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            e.set("status", self.status().as_u16());
        })
    }
}
