use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::automation::RuleEngineError;
use crate::workflows::shortlist::{ScoreSourceError, ShortlistError};

/// Top-level error for hosts embedding the automation and shortlist workflows.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Rules(RuleEngineError),
    Shortlist(ShortlistError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "invalid json: {}", err),
            AppError::Rules(err) => write!(f, "rule error: {}", err),
            AppError::Shortlist(err) => write!(f, "shortlist error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Rules(err) => Some(err),
            AppError::Shortlist(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Json(_) | AppError::Shortlist(ShortlistError::InvalidOptions(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Rules(RuleEngineError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Shortlist(ShortlistError::Source(_)) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Rules(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<RuleEngineError> for AppError {
    fn from(value: RuleEngineError) -> Self {
        Self::Rules(value)
    }
}

impl From<ShortlistError> for AppError {
    fn from(value: ShortlistError) -> Self {
        Self::Shortlist(value)
    }
}

impl From<ScoreSourceError> for AppError {
    fn from(value: ScoreSourceError) -> Self {
        Self::Shortlist(ShortlistError::Source(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::automation::ValidationError;

    #[test]
    fn maps_workflow_errors_to_statuses() {
        let cases = [
            (
                AppError::from(ShortlistError::InvalidOptions("minScore".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(ScoreSourceError::Unavailable("offline".to_string())),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::from(RuleEngineError::Validation(
                    ValidationError::MissingRuleField("name"),
                )),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::from(ConfigError::InvalidPort), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
