// connexion BD + création du schéma

use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};

use crate::config::AppConfig;
use crate::models::{books, favorites, reviews, users};

pub async fn establish_connection(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(false);

    Database::connect(options).await
}

/// Crée les tables et les index uniques s'ils n'existent pas.
/// Les index sont la vraie garantie d'unicité : deux requêtes concurrentes
/// peuvent passer la vérification applicative en même temps.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, users::Entity).await?;
    create_table(db, books::Entity).await?;
    create_table(db, favorites::Entity).await?;
    create_table(db, reviews::Entity).await?;

    // users.username et users.email sont déclarés `unique` sur le modèle
    create_index(
        db,
        Index::create()
            .name("idx_favorites_user_book")
            .table(favorites::Entity)
            .col(favorites::Column::UserId)
            .col(favorites::Column::BookId)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;

    create_index(
        db,
        Index::create()
            .name("idx_reviews_user_book")
            .table(reviews::Entity)
            .col(reviews::Column::UserId)
            .col(reviews::Column::BookId)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;

    create_index(
        db,
        Index::create()
            .name("idx_reviews_book")
            .table(reviews::Entity)
            .col(reviews::Column::BookId)
            .if_not_exists()
            .to_owned(),
    )
    .await?;

    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;
    Ok(())
}

async fn create_index(db: &DatabaseConnection, statement: IndexCreateStatement) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::test_support::memory_db;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Set};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let db = memory_db().await;
        ensure_schema(&db).await.unwrap();
    }

    #[tokio::test]
    async fn test_favorite_pair_is_unique_in_store() {
        let db = memory_db().await;
        let (user_id, book_id) = (Uuid::new_v4(), Uuid::new_v4());

        let favorite = |id| favorites::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            book_id: Set(book_id),
            added_at: Set(Utc::now()),
        };

        favorite(Uuid::new_v4()).insert(&db).await.unwrap();
        let err = favorite(Uuid::new_v4()).insert(&db).await.unwrap_err();

        assert!(crate::error::is_unique_violation(&err));
    }
}
