// Erreurs applicatives et leur traduction en réponses HTTP.
// Chaque variante porte un message lisible renvoyé tel quel au client,
// sauf `Internal` dont le détail reste dans les logs.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::utils::jwt::TokenError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Champ manquant ou invalide dans la requête
    #[error("{0}")]
    InvalidInput(String),

    /// Identifiant qui n'est pas un UUID valide
    #[error("{0}")]
    InvalidIdentifier(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidCredentials(String),

    /// Header Authorization absent, mal formé, ou token invalide/expiré
    #[error("{0}")]
    Unauthenticated(String),

    /// Username ou email déjà utilisé
    #[error("{0}")]
    DuplicateIdentity(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::InvalidCredentials(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn duplicate_identity(message: impl Into<String>) -> Self {
        Self::DuplicateIdentity(message.into())
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(format!("Database error: {}", err))
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidToken(_) => AppError::unauthenticated("Invalid or expired token"),
            TokenError::Encoding(_) => AppError::Internal(err.to_string()),
        }
    }
}

/// Vrai si l'erreur vient d'un index unique (insert/update concurrent)
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::InvalidIdentifier(_)
            | AppError::InvalidCredentials(_)
            | AppError::DuplicateIdentity(_)
            | AppError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "Server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": message
        }))
    }
}
