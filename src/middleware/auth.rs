use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;
use crate::utils::jwt::TokenService;

/// Identité de l'utilisateur authentifié.
/// Utilisée comme extracteur dans les routes protégées : la présence de
/// `AuthUser` dans la signature d'un handler suffit à protéger la route,
/// et l'extraction a lieu avant le corps du handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, AppError> {
    // 1. Header Authorization obligatoire
    let auth_header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::unauthenticated("No authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::unauthenticated("Invalid authorization format"))?;

    // 2. Format exact "Bearer <token>"
    let token = bearer_token(auth_str)
        .ok_or_else(|| AppError::unauthenticated("Invalid authorization format"))?;

    // 3. Vérifier le token
    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| AppError::internal("TokenService not configured"))?;

    let user_id = tokens.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        AppError::unauthenticated("Invalid or expired token")
    })?;

    Ok(AuthUser { user_id })
}

/// Extrait le token d'un header `Bearer <token>` (exactement deux segments)
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}
