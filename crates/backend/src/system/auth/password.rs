use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2id (PHC string with salt and parameters)
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Пароль из конфигурации: готовый хеш берётся как есть
pub fn ensure_hashed(password: &str) -> Result<String> {
    if password.starts_with("$argon2") {
        PasswordHash::new(password)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;
        return Ok(password.to_string());
    }
    hash_password(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("manager123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("manager123", &hash).unwrap());
        assert!(!verify_password("manager124", &hash).unwrap());
    }

    #[test]
    fn configured_hash_is_kept() {
        let hash = hash_password("sales123").unwrap();
        assert_eq!(ensure_hashed(&hash).unwrap(), hash);
        assert!(ensure_hashed("$argon2id$broken").is_err());
    }
}
