use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::*;

use crate::error::AppError;
use crate::models::books;
use crate::models::dto::BookSearchQuery;
use crate::services::{non_blank, parse_id};

pub struct CatalogService;

impl CatalogService {
    /// Recherche dans le catalogue. Critères combinés en ET :
    /// title/author/genre en sous-chaîne insensible à la casse,
    /// publicationYear et library en égalité exacte.
    pub async fn search(
        db: &DatabaseConnection,
        query: &BookSearchQuery,
    ) -> Result<Vec<books::Model>, AppError> {
        let mut condition = Condition::all();

        if let Some(title) = non_blank(&query.title) {
            condition = condition.add(contains_ignore_case(books::Column::Title, title));
        }
        if let Some(author) = non_blank(&query.author) {
            condition = condition.add(contains_ignore_case(books::Column::Author, author));
        }
        if let Some(genre) = non_blank(&query.genre) {
            condition = condition.add(contains_ignore_case(books::Column::Genre, genre));
        }
        if let Some(year) = non_blank(&query.publication_year) {
            match leading_year(year) {
                Some(year) => condition = condition.add(books::Column::PublicationYear.eq(year)),
                // Aucun livre ne peut avoir une année non numérique
                None => return Ok(Vec::new()),
            }
        }
        if let Some(library) = non_blank(&query.library) {
            condition = condition.add(books::Column::LibraryName.eq(library));
        }

        let books = books::Entity::find()
            .filter(condition)
            .order_by_asc(books::Column::Title)
            .all(db)
            .await?;

        tracing::debug!(count = books.len(), "search found books");
        Ok(books)
    }

    /// Noms de bibliothèques distincts, triés
    pub async fn list_libraries(db: &DatabaseConnection) -> Result<Vec<String>, AppError> {
        let names: Vec<String> = books::Entity::find()
            .select_only()
            .column(books::Column::LibraryName)
            .distinct()
            .order_by_asc(books::Column::LibraryName)
            .into_tuple()
            .all(db)
            .await?;

        Ok(names)
    }

    pub async fn get_by_id(db: &DatabaseConnection, raw_id: &str) -> Result<books::Model, AppError> {
        let book_id = parse_id(raw_id, "Invalid book ID format")?;

        books::Entity::find_by_id(book_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Book not found"))
    }
}

// LOWER(col) LIKE '%needle%' : portable entre PostgreSQL et SQLite
fn contains_ignore_case(column: books::Column, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Année lue sur les chiffres de tête : "1949abc" vaut 1949, "abc" rien
fn leading_year(raw: &str) -> Option<i32> {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let digits = unsigned.len() - unsigned.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let sign_len = raw.len() - unsigned.len();
    raw[..sign_len + digits].parse().ok()
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
