// Payloads des requêtes (typés, champs requis explicites) et des réponses.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::models::{books, reviews, users};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

// Réponse après login/register
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: users::Model,
}

// ---------------------------------------------------------------------------
// Profil
// ---------------------------------------------------------------------------

/// Mise à jour partielle du profil.
/// Seuls ces champs sont acceptés, toute autre clé du JSON est ignorée.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Critères de recherche, tous optionnels (combinés en ET)
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookSearchQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publication_year: Option<String>,
    pub genre: Option<String>,
    pub library: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LibraryResponse {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Favoris
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddFavoriteRequest {
    pub book_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Avis
// ---------------------------------------------------------------------------

/// `rating` reste brut : nombre JSON ou chaîne numérique, converti par le service
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitReviewRequest {
    pub book_id: Option<String>,
    pub rating: Option<Value>,
    pub comment: Option<String>,
}

/// Auteur d'un avis : seul le username est exposé
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReviewAuthor {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReviewedBook {
    pub id: Uuid,
    pub title: String,
}

/// Avis listé pour un livre. `user` est null si le compte a été supprimé.
#[derive(Debug, Serialize)]
pub struct BookReview {
    #[serde(flatten)]
    pub review: reviews::Model,
    pub user: Option<ReviewAuthor>,
}

/// Avis listé pour son auteur. `book` est null si le livre n'existe plus.
#[derive(Debug, Serialize)]
pub struct UserReview {
    #[serde(flatten)]
    pub review: reviews::Model,
    pub book: Option<ReviewedBook>,
}

impl From<&books::Model> for ReviewedBook {
    fn from(book: &books::Model) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
        }
    }
}

impl From<&users::Model> for ReviewAuthor {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
