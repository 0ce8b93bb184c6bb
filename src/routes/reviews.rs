use actix_web::{delete, get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::SubmitReviewRequest;
use crate::services::review_service::ReviewService;

/// POST /api/reviews - Créer ou remplacer son avis sur un livre (PROTÉGÉE)
/// Body: { bookId, rating (1-5), comment }
#[post("")]
pub async fn submit_review(
    auth_user: AuthUser,
    body: web::Json<SubmitReviewRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let review = ReviewService::submit(db.get_ref(), auth_user.user_id, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "review": review
    })))
}

/// GET /api/reviews/my - Avis de l'utilisateur connecté (PROTÉGÉE)
#[get("/my")]
pub async fn my_reviews(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let reviews = ReviewService::list_for_user(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// DELETE /api/reviews/{id} - Supprimer un de ses avis (PROTÉGÉE)
#[delete("/{id}")]
pub async fn delete_review(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    ReviewService::delete(db.get_ref(), &path, auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// GET /api/books/{book_id}/reviews - Avis d'un livre (PUBLIC)
/// Monté dans le scope /books, avant /books/{id}
#[get("/{book_id}/reviews")]
pub async fn get_book_reviews(
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let reviews = ReviewService::list_for_book(db.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

pub fn reviews_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .service(submit_review)
            .service(my_reviews)
            .service(delete_review)
    );
}
