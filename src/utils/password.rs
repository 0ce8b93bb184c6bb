use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use rand::Rng;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;

/// Hash des mots de passe : PBKDF2-HMAC-SHA256, salt aléatoire de 16 bytes.
/// Le nombre d'itérations (coût) est stocké dans le hash, on peut donc
/// l'augmenter sans invalider les anciens hashs.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Format: pbkdf2:sha256:iterations$salt$hash
    pub fn hash(&self, password: &str) -> Result<String, String> {
        let mut salt = [0u8; SALT_LENGTH];
        rand::thread_rng().fill(&mut salt);

        let mut key = [0u8; KEY_LENGTH];
        pbkdf2::<HmacSha256>(password.as_bytes(), &salt, self.iterations, &mut key)
            .map_err(|e| format!("PBKDF2 hash generation failed: {}", e))?;

        let salt_b64 = URL_SAFE_NO_PAD.encode(salt);
        let hash_b64 = URL_SAFE_NO_PAD.encode(key);

        Ok(format!("pbkdf2:sha256:{}${}${}", self.iterations, salt_b64, hash_b64))
    }

    /// Vérifie un mot de passe contre un hash stocké
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, String> {
        let (header, salt_str, hash_str) = match stored_hash.split('$').collect::<Vec<_>>()[..] {
            [header, salt, hash] => (header, salt, hash),
            _ => return Err("Invalid hash format".to_string()),
        };

        let iterations = match header.split(':').collect::<Vec<_>>()[..] {
            ["pbkdf2", "sha256", iterations] => iterations
                .parse::<u32>()
                .map_err(|_| "Invalid iterations".to_string())?,
            _ => return Err("Invalid header".to_string()),
        };

        let salt = URL_SAFE_NO_PAD
            .decode(salt_str)
            .map_err(|e| format!("Invalid salt: {}", e))?;
        let expected_hash = URL_SAFE_NO_PAD
            .decode(hash_str)
            .map_err(|e| format!("Invalid hash: {}", e))?;

        // Toujours KEY_LENGTH bytes : un hash stocké tronqué ne correspond jamais
        let mut computed = [0u8; KEY_LENGTH];
        pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut computed)
            .map_err(|e| format!("PBKDF2 hash verification failed: {}", e))?;

        // Comparaison en temps constant, false si les longueurs diffèrent
        Ok(bool::from(computed.as_slice().ct_eq(&expected_hash)))
    }
}
