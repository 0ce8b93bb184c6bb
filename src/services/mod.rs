pub mod user_service;
pub mod catalog_service;
pub mod favorite_service;
pub mod review_service;
pub mod seed;

use uuid::Uuid;

use crate::error::AppError;

/// Parse un identifiant de document (UUID), `message` décrit l'échec
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::invalid_identifier(message))
}

/// Vide ou absent : même traitement
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
    use uuid::Uuid;

    use crate::models::books;

    /// Insère un livre minimal dans le catalogue
    pub async fn insert_book(
        db: &DatabaseConnection,
        title: &str,
        year: i32,
        library: &str,
    ) -> books::Model {
        books::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title.to_string()),
            author: Set(format!("Author of {}", title)),
            publication_year: Set(year),
            genre: Set(Some("Fiction".to_string())),
            publisher: Set(None),
            isbn: Set(None),
            description: Set(None),
            library_name: Set(library.to_string()),
            library_address: Set(None),
            library_phone: Set(None),
            copies_available: Set(1),
            total_copies: Set(1),
        }
        .insert(db)
        .await
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "bad").unwrap(), id);
        assert!(matches!(
            parse_id("507f1f77bcf86cd799439011", "bad"),
            Err(AppError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(&Some("  the ".to_string())), Some("the"));
        assert_eq!(non_blank(&Some("   ".to_string())), None);
        assert_eq!(non_blank(&None), None);
    }
}
