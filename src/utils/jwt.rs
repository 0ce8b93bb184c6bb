use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Duration};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,     // user_id (UUID)
    pub iat: i64,        // issued at
    pub exp: i64,        // expiration timestamp
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Failed to generate token: {0}")]
    Encoding(String),
}

/// Émet et vérifie les tokens signés (HS256).
/// Aucun registre côté serveur : changer le secret invalide tous les tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Génère un JWT pour un utilisateur, valable `ttl` à partir de maintenant
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Génère un JWT comme s'il avait été émis à `issued_at`
    pub fn issue_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let expiration = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Encoding("Failed to calculate expiration".to_string()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Vérifie signature et expiration, retourne l'identifiant de l'utilisateur
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::InvalidToken(e.to_string()))?;

        Uuid::parse_str(&claims.sub)
            .map_err(|_| TokenError::InvalidToken("malformed subject".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_token() {
        let service = TokenService::new("test-secret", 7);
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).unwrap();

        assert_eq!(service.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_invalid_token() {
        let service = TokenService::new("test-secret", 7);
        let result = service.verify("invalid.token.here");
        assert!(matches!(result, Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = TokenService::new("test-secret", 7);
        let issued_at = Utc::now() - Duration::days(8);

        let token = service.issue_at(Uuid::new_v4(), issued_at).unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn test_token_still_valid_before_expiry() {
        let service = TokenService::new("test-secret", 7);
        let user_id = Uuid::new_v4();
        let issued_at = Utc::now() - Duration::days(6);

        let token = service.issue_at(user_id, issued_at).unwrap();

        assert_eq!(service.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_rotated_secret_invalidates_tokens() {
        let old = TokenService::new("old-secret", 7);
        let new = TokenService::new("new-secret", 7);

        let token = old.issue(Uuid::new_v4()).unwrap();

        assert!(new.verify(&token).is_err());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = TokenService::new("test-secret", 7);
        let token = service.issue(Uuid::new_v4()).unwrap();

        // Remplace la signature par celle d'un autre token
        let other = service.issue(Uuid::new_v4()).unwrap();
        let forged = format!(
            "{}.{}",
            token.rsplit_once('.').unwrap().0,
            other.rsplit_once('.').unwrap().1
        );

        assert!(service.verify(&forged).is_err());
    }
}
