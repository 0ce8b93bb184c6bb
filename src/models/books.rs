use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

// Champs obligatoires : title, author, publication_year, library_name.
// copies_available <= total_copies n'est pas vérifié ici.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub library_name: String,
    pub library_address: Option<String>,
    pub library_phone: Option<String>,
    #[sea_orm(default_value = 1)]
    pub copies_available: i32,
    #[sea_orm(default_value = 1)]
    pub total_copies: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
