// Données d'exemple insérées une seule fois, quand le catalogue est vide.

use sea_orm::*;
use uuid::Uuid;

use crate::models::books;

struct SampleBook {
    title: &'static str,
    author: &'static str,
    publication_year: i32,
    genre: &'static str,
    publisher: &'static str,
    isbn: &'static str,
    description: &'static str,
    library_name: &'static str,
    library_address: &'static str,
    library_phone: &'static str,
    copies_available: i32,
    total_copies: i32,
}

const SAMPLE_BOOKS: [SampleBook; 4] = [
    SampleBook {
        title: "The Great Gatsby",
        author: "F. Scott Fitzgerald",
        publication_year: 1925,
        genre: "Fiction",
        publisher: "Scribner",
        isbn: "9780743273565",
        description: "A classic novel about the American Dream",
        library_name: "Central Library",
        library_address: "123 Main St",
        library_phone: "555-0101",
        copies_available: 3,
        total_copies: 5,
    },
    SampleBook {
        title: "To Kill a Mockingbird",
        author: "Harper Lee",
        publication_year: 1960,
        genre: "Fiction",
        publisher: "J.B. Lippincott & Co.",
        isbn: "9780061120084",
        description: "Classic novel about racial inequality and moral growth",
        library_name: "Central Library",
        library_address: "123 Main St",
        library_phone: "555-0101",
        copies_available: 2,
        total_copies: 3,
    },
    SampleBook {
        title: "1984",
        author: "George Orwell",
        publication_year: 1949,
        genre: "Science Fiction",
        publisher: "Secker & Warburg",
        isbn: "9780451524935",
        description: "Dystopian classic novel",
        library_name: "North Branch",
        library_address: "456 North St",
        library_phone: "555-0102",
        copies_available: 1,
        total_copies: 2,
    },
    SampleBook {
        title: "Pride and Prejudice",
        author: "Jane Austen",
        publication_year: 1813,
        genre: "Romance",
        publisher: "T. Egerton",
        isbn: "9780141439518",
        description: "Classic English romance novel",
        library_name: "South Branch",
        library_address: "789 South St",
        library_phone: "555-0103",
        copies_available: 4,
        total_copies: 4,
    },
];

impl SampleBook {
    fn to_active_model(&self) -> books::ActiveModel {
        books::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(self.title.to_string()),
            author: Set(self.author.to_string()),
            publication_year: Set(self.publication_year),
            genre: Set(Some(self.genre.to_string())),
            publisher: Set(Some(self.publisher.to_string())),
            isbn: Set(Some(self.isbn.to_string())),
            description: Set(Some(self.description.to_string())),
            library_name: Set(self.library_name.to_string()),
            library_address: Set(Some(self.library_address.to_string())),
            library_phone: Set(Some(self.library_phone.to_string())),
            copies_available: Set(self.copies_available),
            total_copies: Set(self.total_copies),
        }
    }
}

/// Retourne le nombre de livres insérés (0 si le catalogue n'était pas vide)
pub async fn seed_sample_books(db: &DatabaseConnection) -> Result<usize, DbErr> {
    let book_count = books::Entity::find().count(db).await?;
    tracing::info!(book_count, "current book count in database");

    if book_count > 0 {
        return Ok(0);
    }

    let models: Vec<books::ActiveModel> = SAMPLE_BOOKS.iter().map(SampleBook::to_active_model).collect();
    let inserted = models.len();

    books::Entity::insert_many(models)
        .exec_without_returning(db)
        .await?;

    tracing::info!(inserted, "sample books data initialized");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_db;

    #[tokio::test]
    async fn test_seed_runs_once() {
        let db = memory_db().await;

        assert_eq!(seed_sample_books(&db).await.unwrap(), 4);
        assert_eq!(seed_sample_books(&db).await.unwrap(), 0);
        assert_eq!(books::Entity::find().count(&db).await.unwrap(), 4);
    }

    #[test]
    fn test_sample_copies_never_exceed_total() {
        for book in &SAMPLE_BOOKS {
            assert!(book.copies_available <= book.total_copies, "{}", book.title);
        }
    }
}
