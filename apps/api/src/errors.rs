#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::mail::MailError;
use crate::pipeline::PipelineError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, hint) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Pipeline(PipelineError::Configuration { missing }) => (
                StatusCode::BAD_REQUEST,
                "CONFIGURATION_ERROR",
                format!("Missing required configuration: {}", missing.join(", ")),
                None,
            ),
            AppError::Pipeline(PipelineError::Mail(mail)) => match mail {
                MailError::Authentication => (
                    StatusCode::UNAUTHORIZED,
                    "MAIL_AUTH_ERROR",
                    "The mail server rejected the credentials".to_string(),
                    Some("Use an app-specific password, not the account password"),
                ),
                MailError::FolderNotFound(folder) => (
                    StatusCode::NOT_FOUND,
                    "FOLDER_NOT_FOUND",
                    format!("Folder '{folder}' was not found on the account"),
                    Some("Check the label name and that it is shown in IMAP"),
                ),
                MailError::Connect(msg) => {
                    tracing::error!("Mail connect error: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "MAIL_CONNECT_ERROR",
                        "Could not reach the mail server".to_string(),
                        None,
                    )
                }
                MailError::Protocol(msg) => {
                    tracing::error!("Mail protocol error: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "MAIL_PROTOCOL_ERROR",
                        "The mail server returned an unexpected response".to_string(),
                        None,
                    )
                }
            },
            AppError::Pipeline(PipelineError::Internal(msg)) => {
                tracing::error!("Pipeline error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PIPELINE_ERROR",
                    "The analysis run failed unexpectedly".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": {
                "code": code,
                "message": message
            }
        });
        if let Some(hint) = hint {
            body["error"]["hint"] = json!(hint);
        }

        (status, Json(body)).into_response()
    }
}
