use actix_web::{delete, get, put, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::ProfileUpdate;
use crate::services::user_service::UserService;
use crate::utils::password::PasswordHasher;

/// GET /api/users/profile - Profil de l'utilisateur connecté (PROTÉGÉE)
#[get("/profile")]
pub async fn get_profile(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::get_profile(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// PUT /api/users/profile - Modifier son profil et/ou son mot de passe (PROTÉGÉE)
#[put("/profile")]
pub async fn update_profile(
    auth_user: AuthUser,
    body: web::Json<ProfileUpdate>,
    db: web::Data<DatabaseConnection>,
    hasher: web::Data<PasswordHasher>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::update_profile(
        db.get_ref(),
        hasher.get_ref(),
        auth_user.user_id,
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(user))
}

/// DELETE /api/users/profile - Supprimer son compte et ses favoris (PROTÉGÉE)
#[delete("/profile")]
pub async fn delete_profile(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    UserService::delete_account(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

pub fn users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(get_profile)
            .service(update_profile)
            .service(delete_profile)
    );
}
