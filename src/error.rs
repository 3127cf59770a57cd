use crate::repositories::RepositoryError;
use crate::services::{AdminServiceError, AuthServiceError, ListingServiceError, UserServiceError};
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Autenticação necessária")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidCredentials(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Autenticação necessária".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Database(ref e) => {
                tracing::error!(error = %e, "Database failure");
                internal_error()
            }
            AppError::Internal(ref msg) => {
                tracing::error!(error = %msg, "Unhandled failure");
                internal_error()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn internal_error() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Erro interno do servidor".to_string(),
    )
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) => AppError::Database(e),
            RepositoryError::NotFound => AppError::NotFound("Registro não encontrado".to_string()),
            RepositoryError::AlreadyExists => {
                AppError::Validation("Registro já existe".to_string())
            }
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::MissingFields
            | UserServiceError::InvalidEmail
            | UserServiceError::WeakPassword
            | UserServiceError::EmailTaken => AppError::Validation(err.to_string()),
            UserServiceError::UserNotFound => AppError::NotFound(err.to_string()),
            UserServiceError::HashingError(msg) => AppError::Internal(msg),
            UserServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => {
                AppError::InvalidCredentials("Credenciais incorretas".to_string())
            }
            AuthServiceError::UserNotFound | AuthServiceError::AdminNotFound => {
                AppError::Unauthorized
            }
            AuthServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<AdminServiceError> for AppError {
    fn from(err: AdminServiceError) -> Self {
        match err {
            AdminServiceError::InvalidUsername
            | AdminServiceError::WeakPassword
            | AdminServiceError::UsernameTaken => AppError::Validation(err.to_string()),
            AdminServiceError::AdminNotFound => AppError::NotFound(err.to_string()),
            AdminServiceError::HashingError(msg) => AppError::Internal(msg),
            AdminServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<ListingServiceError> for AppError {
    fn from(err: ListingServiceError) -> Self {
        match err {
            ListingServiceError::Validation(msg) => AppError::Validation(msg),
            ListingServiceError::NotFound => AppError::NotFound(err.to_string()),
            ListingServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            ListingServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Corpo da requisição inválido: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!("Parâmetros inválidos: {}", rejection.body_text()))
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::Internal(format!("session: {err}"))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{err:#}"))
    }
}
