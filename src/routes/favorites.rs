use actix_web::{delete, get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::AddFavoriteRequest;
use crate::services::favorite_service::FavoriteService;

// Montées dans le scope /books (voir books::books_routes)

/// GET /api/books/favorites - Livres favoris, plus récents d'abord (PROTÉGÉE)
#[get("/favorites")]
pub async fn get_favorites(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let books = FavoriteService::list_for_user(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(books))
}

/// POST /api/books/favorites - Ajouter un favori (PROTÉGÉE)
#[post("/favorites")]
pub async fn add_favorite(
    auth_user: AuthUser,
    body: web::Json<AddFavoriteRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let favorite = FavoriteService::add(db.get_ref(), auth_user.user_id, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Successfully added to favorites",
        "favorite": favorite
    })))
}

/// DELETE /api/books/favorites/{book_id} - Retirer un favori (PROTÉGÉE)
#[delete("/favorites/{book_id}")]
pub async fn remove_favorite(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    FavoriteService::remove(db.get_ref(), auth_user.user_id, &path).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Successfully removed from favorites"
    })))
}
