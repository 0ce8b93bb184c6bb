use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::models::dto::{BookSearchQuery, LibraryResponse};
use crate::routes::{favorites, reviews};
use crate::services::catalog_service::CatalogService;

/// GET /api/books/search?title&author&publicationYear&genre&library (PUBLIC)
#[get("/search")]
pub async fn search_books(
    query: web::Query<BookSearchQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let books = CatalogService::search(db.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(books))
}

/// GET /api/books/libraries - Liste des bibliothèques (PUBLIC)
#[get("/libraries")]
pub async fn list_libraries(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let libraries: Vec<LibraryResponse> = CatalogService::list_libraries(db.get_ref())
        .await?
        .into_iter()
        .map(|name| LibraryResponse { name })
        .collect();

    Ok(HttpResponse::Ok().json(libraries))
}

/// GET /api/books/{id} - Détail d'un livre (PUBLIC)
#[get("/{id}")]
pub async fn get_book(
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let book = CatalogService::get_by_id(db.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(book))
}

pub fn books_routes(cfg: &mut web::ServiceConfig) {
    // L'ordre compte : /{id} doit rester en dernier, sinon il intercepte
    // /favorites et les autres chemins spécifiques
    cfg.service(
        web::scope("/books")
            .service(search_books)
            .service(list_libraries)
            .service(favorites::get_favorites)
            .service(favorites::add_favorite)
            .service(favorites::remove_favorite)
            .service(reviews::get_book_reviews)
            .service(get_book)
    );
}
