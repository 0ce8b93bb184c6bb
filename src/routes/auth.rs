use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::models::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::services::user_service::UserService;
use crate::utils::jwt::TokenService;
use crate::utils::password::PasswordHasher;

/// POST /api/auth/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    hasher: web::Data<PasswordHasher>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::register(db.get_ref(), hasher.get_ref(), body.into_inner()).await?;
    let token = tokens.issue(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse { token, user }))
}

/// POST /api/auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    hasher: web::Data<PasswordHasher>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::authenticate(db.get_ref(), hasher.get_ref(), body.into_inner()).await?;
    let token = tokens.issue(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse { token, user }))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
    );
}
