use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::dto::{BookReview, ReviewAuthor, ReviewedBook, SubmitReviewRequest, UserReview};
use crate::models::{books, reviews, users};
use crate::services::{non_blank, parse_id};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

pub struct ReviewService;

impl ReviewService {
    /// Crée ou remplace l'avis de l'utilisateur pour ce livre (upsert).
    /// Ordre des vérifications : champs requis, format de l'id, existence
    /// du livre, puis bornes de la note.
    pub async fn submit(
        db: &DatabaseConnection,
        user_id: Uuid,
        request: SubmitReviewRequest,
    ) -> Result<reviews::Model, AppError> {
        let raw_rating = request.rating.as_ref().filter(|v| rating_present(v));
        let (Some(raw_id), Some(raw_rating)) = (non_blank(&request.book_id), raw_rating) else {
            return Err(AppError::invalid_input("bookId and rating are required"));
        };

        let book_id = parse_id(raw_id, "Invalid bookId")?;

        if books::Entity::find_by_id(book_id).one(db).await?.is_none() {
            return Err(AppError::not_found("Book not found"));
        }

        let rating = coerce_rating(raw_rating)
            .ok_or_else(|| AppError::invalid_input("Rating must be between 1 and 5"))?;
        let comment = request.comment.unwrap_or_default().trim().to_string();

        let now = Utc::now();
        let review = reviews::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            book_id: Set(book_id),
            rating: Set(rating),
            comment: Set(comment),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Une seule écriture : INSERT ... ON CONFLICT (user_id, book_id) DO UPDATE
        reviews::Entity::insert(review)
            .on_conflict(
                OnConflict::columns([reviews::Column::UserId, reviews::Column::BookId])
                    .update_columns([
                        reviews::Column::Rating,
                        reviews::Column::Comment,
                        reviews::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        let stored = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(user_id))
            .filter(reviews::Column::BookId.eq(book_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::internal("review missing after upsert"))?;

        tracing::info!(
            review_id = %stored.id,
            user_id = %user_id,
            book_id = %book_id,
            rating,
            "review saved"
        );
        Ok(stored)
    }

    /// Avis publics d'un livre, du plus récent au plus ancien
    pub async fn list_for_book(
        db: &DatabaseConnection,
        raw_book_id: &str,
    ) -> Result<Vec<BookReview>, AppError> {
        let book_id = parse_id(raw_book_id, "Invalid bookId")?;

        let reviews = reviews::Entity::find()
            .filter(reviews::Column::BookId.eq(book_id))
            .order_by_desc(reviews::Column::CreatedAt)
            .all(db)
            .await?;

        if reviews.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<Uuid> = reviews.iter().map(|r| r.user_id).collect();
        let authors: HashMap<Uuid, ReviewAuthor> = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .all(db)
            .await?
            .iter()
            .map(|user| (user.id, ReviewAuthor::from(user)))
            .collect();

        Ok(reviews
            .into_iter()
            .map(|review| BookReview {
                user: authors.get(&review.user_id).cloned(),
                review,
            })
            .collect())
    }

    /// Avis écrits par l'utilisateur, du plus récent au plus ancien
    pub async fn list_for_user(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<Vec<UserReview>, AppError> {
        let reviews = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(user_id))
            .order_by_desc(reviews::Column::CreatedAt)
            .all(db)
            .await?;

        if reviews.is_empty() {
            return Ok(Vec::new());
        }

        let book_ids: Vec<Uuid> = reviews.iter().map(|r| r.book_id).collect();
        let titles: HashMap<Uuid, ReviewedBook> = books::Entity::find()
            .filter(books::Column::Id.is_in(book_ids))
            .all(db)
            .await?
            .iter()
            .map(|book| (book.id, ReviewedBook::from(book)))
            .collect();

        Ok(reviews
            .into_iter()
            .map(|review| UserReview {
                book: titles.get(&review.book_id).cloned(),
                review,
            })
            .collect())
    }

    /// Supprime un avis de l'utilisateur. Avis inexistant et avis d'un autre
    /// utilisateur donnent la même réponse NotFound.
    pub async fn delete(
        db: &DatabaseConnection,
        raw_review_id: &str,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let not_found = || AppError::not_found("Review not found");
        let review_id = Uuid::parse_str(raw_review_id.trim()).map_err(|_| not_found())?;

        let result = reviews::Entity::delete_many()
            .filter(reviews::Column::Id.eq(review_id))
            .filter(reviews::Column::UserId.eq(user_id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(not_found());
        }

        tracing::info!(review_id = %review_id, user_id = %user_id, "review deleted");
        Ok(())
    }
}

// null, "", 0 et false comptent comme absents
fn rating_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Convertit la note (nombre ou chaîne numérique) en entier dans [1, 5]
fn coerce_rating(value: &Value) -> Option<i32> {
    let numeric = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(true) => 1.0,
        _ => return None,
    };

    let in_range = numeric.is_finite()
        && numeric.fract() == 0.0
        && numeric >= f64::from(MIN_RATING)
        && numeric <= f64::from(MAX_RATING);

    in_range.then_some(numeric as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_db;
    use crate::services::test_support::insert_book;
    use rstest::rstest;
    use serde_json::json;

    fn submit_request(book_id: &Uuid, rating: Value, comment: &str) -> SubmitReviewRequest {
        SubmitReviewRequest {
            book_id: Some(book_id.to_string()),
            rating: Some(rating),
            comment: Some(comment.to_string()),
        }
    }

    async fn insert_user(db: &DatabaseConnection, username: &str) -> users::Model {
        users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            email: Set(format!("{}@x.com", username)),
            password_hash: Set("pbkdf2:sha256:1$AA$AA".to_string()),
            first_name: Set(Some("Hidden".to_string())),
            last_name: Set(None),
            phone: Set(None),
            address: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[rstest]
    #[case(json!(4), Some(4))]
    #[case(json!("3"), Some(3))]
    #[case(json!(" 5 "), Some(5))]
    #[case(json!(1.0), Some(1))]
    #[case(json!(2.5), None)]
    #[case(json!(6), None)]
    #[case(json!(-1), None)]
    #[case(json!("abc"), None)]
    #[case(json!([4]), None)]
    fn test_coerce_rating(#[case] raw: Value, #[case] expected: Option<i32>) {
        assert_eq!(coerce_rating(&raw), expected);
    }

    #[tokio::test]
    async fn test_concurrent_submits_keep_one_review() {
        let db = memory_db().await;
        let alice = insert_user(&db, "alice").await;
        let book = insert_book(&db, "1984", 1949, "North Branch").await;

        let (first, second) = tokio::join!(
            ReviewService::submit(&db, alice.id, submit_request(&book.id, json!(4), "first")),
            ReviewService::submit(&db, alice.id, submit_request(&book.id, json!(2), "second")),
        );

        assert!(first.is_ok());
        assert!(second.is_ok());
        let stored = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(alice.id))
            .filter(reviews::Column::BookId.eq(book.id))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_resubmit_replaces_review() {
        let db = memory_db().await;
        let alice = insert_user(&db, "alice").await;
        let book = insert_book(&db, "1984", 1949, "North Branch").await;

        let first = ReviewService::submit(&db, alice.id, submit_request(&book.id, json!(4), "ok"))
            .await
            .unwrap();
        let second = ReviewService::submit(&db, alice.id, submit_request(&book.id, json!(2), "  changed  "))
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);

        let reviews = ReviewService::list_for_book(&db, &book.id.to_string()).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].review.rating, 2);
        assert_eq!(reviews[0].review.comment, "changed");
    }

    #[tokio::test]
    async fn test_submit_validation_order() {
        let db = memory_db().await;
        let user_id = Uuid::new_v4();
        let book = insert_book(&db, "1984", 1949, "North Branch").await;

        let missing = ReviewService::submit(
            &db,
            user_id,
            SubmitReviewRequest {
                book_id: Some(book.id.to_string()),
                rating: None,
                comment: None,
            },
        )
        .await;
        assert!(matches!(missing, Err(AppError::InvalidInput(_))));

        let malformed = ReviewService::submit(
            &db,
            user_id,
            SubmitReviewRequest {
                book_id: Some("xyz".to_string()),
                rating: Some(json!(9)),
                comment: None,
            },
        )
        .await;
        assert!(matches!(malformed, Err(AppError::InvalidIdentifier(_))));

        let unknown = ReviewService::submit(&db, user_id, submit_request(&Uuid::new_v4(), json!(9), "")).await;
        assert!(matches!(unknown, Err(AppError::NotFound(_))));

        let out_of_range = ReviewService::submit(&db, user_id, submit_request(&book.id, json!(9), "")).await;
        assert!(matches!(out_of_range, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_comment_defaults_to_empty() {
        let db = memory_db().await;
        let book = insert_book(&db, "1984", 1949, "North Branch").await;

        let review = ReviewService::submit(
            &db,
            Uuid::new_v4(),
            SubmitReviewRequest {
                book_id: Some(book.id.to_string()),
                rating: Some(json!("5")),
                comment: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(review.rating, 5);
        assert_eq!(review.comment, "");
    }

    #[tokio::test]
    async fn test_list_for_book_exposes_only_username() {
        let db = memory_db().await;
        let alice = insert_user(&db, "alice").await;
        let book = insert_book(&db, "1984", 1949, "North Branch").await;
        ReviewService::submit(&db, alice.id, submit_request(&book.id, json!(4), "ok"))
            .await
            .unwrap();

        let reviews = ReviewService::list_for_book(&db, &book.id.to_string()).await.unwrap();
        let json = serde_json::to_value(&reviews).unwrap();

        assert_eq!(json[0]["user"], json!({ "id": alice.id, "username": "alice" }));
        assert_eq!(json[0]["rating"], 4);

        let malformed = ReviewService::list_for_book(&db, "nope").await;
        assert!(matches!(malformed, Err(AppError::InvalidIdentifier(_))));
    }

    #[tokio::test]
    async fn test_list_for_user_includes_book_title() {
        let db = memory_db().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let book = insert_book(&db, "1984", 1949, "North Branch").await;
        ReviewService::submit(&db, alice.id, submit_request(&book.id, json!(4), "ok"))
            .await
            .unwrap();
        ReviewService::submit(&db, bob.id, submit_request(&book.id, json!(1), "meh"))
            .await
            .unwrap();

        let mine = ReviewService::list_for_user(&db, alice.id).await.unwrap();

        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].review.comment, "ok");
        assert_eq!(mine[0].book.as_ref().map(|b| b.title.as_str()), Some("1984"));
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let db = memory_db().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let book = insert_book(&db, "1984", 1949, "North Branch").await;
        let review = ReviewService::submit(&db, alice.id, submit_request(&book.id, json!(4), "ok"))
            .await
            .unwrap();

        let by_bob = ReviewService::delete(&db, &review.id.to_string(), bob.id).await;
        let unknown = ReviewService::delete(&db, &Uuid::new_v4().to_string(), bob.id).await;
        assert_eq!(by_bob.unwrap_err().to_string(), unknown.unwrap_err().to_string());

        ReviewService::delete(&db, &review.id.to_string(), alice.id).await.unwrap();
        assert!(ReviewService::list_for_book(&db, &book.id.to_string()).await.unwrap().is_empty());
    }
}
