use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, is_unique_violation};
use crate::models::dto::{LoginRequest, ProfileUpdate, RegisterRequest};
use crate::models::{favorites, users};
use crate::services::non_blank;
use crate::utils::password::PasswordHasher;

pub struct UserService;

impl UserService {
    /// Crée un compte. Username et email doivent être libres tous les deux
    /// (une seule recherche combinée), l'index unique tranche en cas de course.
    pub async fn register(
        db: &DatabaseConnection,
        hasher: &PasswordHasher,
        request: RegisterRequest,
    ) -> Result<users::Model, AppError> {
        if request.validate().is_err() {
            return Err(AppError::invalid_input("Username, email and password are required"));
        }

        let existing = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(&request.username))
                    .add(users::Column::Email.eq(&request.email)),
            )
            .one(db)
            .await?;

        if existing.is_some() {
            return Err(AppError::duplicate_identity("Username or email already in use"));
        }

        let password_hash = hash_password(hasher, request.password).await?;

        let new_user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(request.username),
            email: Set(request.email),
            password_hash: Set(password_hash),
            first_name: Set(non_blank(&request.first_name).map(str::to_string)),
            last_name: Set(non_blank(&request.last_name).map(str::to_string)),
            phone: Set(non_blank(&request.phone).map(str::to_string)),
            address: Set(non_blank(&request.address).map(str::to_string)),
            created_at: Set(Utc::now()),
        };

        let user = new_user.insert(db).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::duplicate_identity("Username or email already in use")
            } else {
                e.into()
            }
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Même erreur pour "utilisateur inconnu" et "mauvais mot de passe"
    pub async fn authenticate(
        db: &DatabaseConnection,
        hasher: &PasswordHasher,
        request: LoginRequest,
    ) -> Result<users::Model, AppError> {
        if request.validate().is_err() {
            return Err(AppError::invalid_input("Username and password are required"));
        }

        let user = users::Entity::find()
            .filter(users::Column::Username.eq(&request.username))
            .one(db)
            .await?
            .ok_or_else(|| AppError::invalid_credentials("Invalid credentials"))?;

        if !verify_password(hasher, request.password, user.password_hash.clone()).await? {
            return Err(AppError::invalid_credentials("Invalid credentials"));
        }

        Ok(user)
    }

    pub async fn get_profile(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<users::Model, AppError> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Applique uniquement les champs autorisés de `ProfileUpdate`.
    /// Changer le mot de passe demande l'ancien ET le nouveau.
    pub async fn update_profile(
        db: &DatabaseConnection,
        hasher: &PasswordHasher,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<users::Model, AppError> {
        // 1. Unicité du username / email (hors compte courant)
        if let Some(username) = &update.username {
            if username.trim().is_empty() {
                return Err(AppError::invalid_input("Username cannot be empty"));
            }
            if Self::identity_taken(db, users::Column::Username, username, user_id).await? {
                return Err(AppError::duplicate_identity("Username already in use"));
            }
        }
        if let Some(email) = &update.email {
            if email.trim().is_empty() {
                return Err(AppError::invalid_input("Email cannot be empty"));
            }
            if Self::identity_taken(db, users::Column::Email, email, user_id).await? {
                return Err(AppError::duplicate_identity("Email already in use"));
            }
        }

        // 2. Récupérer l'utilisateur
        let user = Self::get_profile(db, user_id).await?;

        // 3. Changement de mot de passe éventuel
        let old_password = non_blank(&update.old_password).map(str::to_string);
        let new_password = non_blank(&update.new_password).map(str::to_string);
        let new_hash = match (old_password, new_password) {
            (None, None) => None,
            (Some(old), Some(new)) => {
                if !verify_password(hasher, old, user.password_hash.clone()).await? {
                    return Err(AppError::invalid_credentials("Old password is incorrect"));
                }
                Some(hash_password(hasher, new).await?)
            }
            _ => {
                return Err(AppError::invalid_input(
                    "oldPassword and newPassword are required to change password",
                ));
            }
        };

        // 4. Appliquer les modifications
        let mut active_model: users::ActiveModel = user.into();
        if let Some(username) = update.username {
            active_model.username = Set(username);
        }
        if let Some(email) = update.email {
            active_model.email = Set(email);
        }
        if update.first_name.is_some() {
            active_model.first_name = Set(non_blank(&update.first_name).map(str::to_string));
        }
        if update.last_name.is_some() {
            active_model.last_name = Set(non_blank(&update.last_name).map(str::to_string));
        }
        if update.phone.is_some() {
            active_model.phone = Set(non_blank(&update.phone).map(str::to_string));
        }
        if update.address.is_some() {
            active_model.address = Set(non_blank(&update.address).map(str::to_string));
        }
        if let Some(hash) = new_hash {
            active_model.password_hash = Set(hash);
        }

        let user = active_model.update(db).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::duplicate_identity("Username or email already in use")
            } else {
                e.into()
            }
        })?;

        tracing::info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    /// Supprime le compte et ses favoris. Les avis de l'utilisateur restent.
    pub async fn delete_account(db: &DatabaseConnection, user_id: Uuid) -> Result<(), AppError> {
        let txn = db.begin().await?;

        let removed_favorites = favorites::Entity::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?
            .rows_affected;

        users::Entity::delete_by_id(user_id).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(user_id = %user_id, removed_favorites, "account deleted");
        Ok(())
    }

    async fn identity_taken(
        db: &DatabaseConnection,
        column: users::Column,
        value: &str,
        user_id: Uuid,
    ) -> Result<bool, AppError> {
        let other = users::Entity::find()
            .filter(column.eq(value))
            .filter(users::Column::Id.ne(user_id))
            .one(db)
            .await?;
        Ok(other.is_some())
    }
}

// PBKDF2 est coûteux : on sort du thread de l'executor
async fn hash_password(hasher: &PasswordHasher, password: String) -> Result<String, AppError> {
    let hasher = *hasher;
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::internal(format!("hash task failed: {}", e)))?
        .map_err(AppError::internal)
}

async fn verify_password(
    hasher: &PasswordHasher,
    password: String,
    stored_hash: String,
) -> Result<bool, AppError> {
    let hasher = *hasher;
    tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
        .await
        .map_err(|e| AppError::internal(format!("verify task failed: {}", e)))?
        .map_err(AppError::internal)
}
