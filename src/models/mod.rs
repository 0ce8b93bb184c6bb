// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une collection persistée avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - users : Utilisateurs (username et email uniques)
//   - books : Catalogue des livres
//   - favorites : Favoris (au plus un par couple user/livre)
//   - reviews : Avis (au plus un par couple user/livre, upsert)
//   - dto : Payloads des requêtes et réponses API
//
// Points d'attention:
//   - Les identifiants sont des UUID v4 (tout autre format est rejeté)
//   - Pas de clés étrangères : les références se comportent comme des
//     références de documents, un favori peut pointer vers un livre disparu
//   - Les contraintes d'unicité sont posées par des index (voir db.rs)
//
// ============================================================================

pub mod health;
pub mod users;
pub mod books;
pub mod favorites;
pub mod reviews;
pub mod dto;
