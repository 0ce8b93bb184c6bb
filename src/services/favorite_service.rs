use std::collections::HashMap;

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::error::{AppError, is_unique_violation};
use crate::models::dto::AddFavoriteRequest;
use crate::models::{books, favorites};
use crate::services::parse_id;

pub struct FavoriteService;

impl FavoriteService {
    /// Ajoute un livre aux favoris. Un second ajout du même couple échoue.
    pub async fn add(
        db: &DatabaseConnection,
        user_id: Uuid,
        request: AddFavoriteRequest,
    ) -> Result<favorites::Model, AppError> {
        let raw_id = request.book_id.unwrap_or_default();
        let book_id = parse_id(&raw_id, "Invalid book ID format")?;

        let book = books::Entity::find_by_id(book_id).one(db).await?;
        if book.is_none() {
            tracing::debug!(book_id = %book_id, "book not found");
            return Err(AppError::not_found("Book not found"));
        }

        let existing = favorites::Entity::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::BookId.eq(book_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(AppError::already_exists("Book already in favorites"));
        }

        let new_favorite = favorites::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            book_id: Set(book_id),
            added_at: Set(Utc::now()),
        };

        // L'index unique rattrape les ajouts concurrents
        let favorite = new_favorite.insert(db).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("Book already in favorites")
            } else {
                e.into()
            }
        })?;

        tracing::info!(user_id = %user_id, book_id = %book_id, "favorite added");
        Ok(favorite)
    }

    /// Un identifiant mal formé ne peut correspondre à aucun favori : NotFound
    pub async fn remove(
        db: &DatabaseConnection,
        user_id: Uuid,
        raw_book_id: &str,
    ) -> Result<(), AppError> {
        let not_found = || AppError::not_found("Favorite not found");
        let book_id = Uuid::parse_str(raw_book_id.trim()).map_err(|_| not_found())?;

        let result = favorites::Entity::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::BookId.eq(book_id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(not_found());
        }

        tracing::info!(user_id = %user_id, book_id = %book_id, "favorite removed");
        Ok(())
    }

    /// Livres favoris, du plus récent au plus ancien.
    /// Les favoris dont le livre n'existe plus sont ignorés.
    pub async fn list_for_user(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<Vec<books::Model>, AppError> {
        let favorites = favorites::Entity::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .order_by_desc(favorites::Column::AddedAt)
            .all(db)
            .await?;

        if favorites.is_empty() {
            return Ok(Vec::new());
        }

        let book_ids: Vec<Uuid> = favorites.iter().map(|f| f.book_id).collect();
        let mut books_by_id: HashMap<Uuid, books::Model> = books::Entity::find()
            .filter(books::Column::Id.is_in(book_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|book| (book.id, book))
            .collect();

        let valid: Vec<books::Model> = favorites
            .into_iter()
            .filter_map(|favorite| {
                let book = books_by_id.remove(&favorite.book_id);
                if book.is_none() {
                    tracing::warn!(favorite_id = %favorite.id, "invalid book reference in favorite");
                }
                book
            })
            .collect();

        Ok(valid)
    }
}
