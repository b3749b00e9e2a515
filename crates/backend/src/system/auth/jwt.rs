use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::{TokenClaims, UserInfo};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

pub const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 90;

/// Ключ подписи и срок жизни access-токена
#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    access_token_hours: i64,
}

impl JwtKeys {
    /// Без секрета в конфигурации генерируется новый, токены не переживают перезапуск
    pub fn new(secret: Option<&str>, access_token_hours: i64) -> Self {
        let secret = match secret.map(str::trim).filter(|s| !s.is_empty()) {
            Some(secret) => secret.to_string(),
            None => {
                tracing::warn!("auth.jwt_secret is not set, generated a random secret");
                generate_jwt_secret()
            }
        };
        Self {
            secret,
            access_token_hours: access_token_hours.max(1),
        }
    }

    pub fn generate_access_token(&self, user: &UserInfo) -> Result<String> {
        let now = Utc::now();
        let exp = (now + chrono::Duration::hours(self.access_token_hours)).timestamp() as usize;
        let iat = now.timestamp() as usize;

        let claims = TokenClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            exp,
            iat,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to encode JWT token")
    }

    /// Validate JWT token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims> {
        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("Failed to decode JWT token")?;
        Ok(token_data.claims)
    }
}

/// Generate refresh token (UUID-based)
pub fn generate_refresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}
