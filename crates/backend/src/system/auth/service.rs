//! Пользователи из конфигурации и сессии refresh-токенов.
//!
//! Refresh-токены живут только в памяти процесса и теряются при перезапуске.

use chrono::{DateTime, Utc};
use contracts::system::auth::{LoginResponse, RefreshResponse, TokenClaims, UserInfo};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use super::jwt::{self, JwtKeys, REFRESH_TOKEN_LIFETIME_DAYS};
use super::password;
use crate::shared::config::{AuthConfig, UserConfig};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Неверный email или пароль")]
    InvalidCredentials,

    #[error("Недействительный или просроченный токен")]
    InvalidToken,

    #[error("Пользователь '{0}' не найден")]
    UnknownUser(String),

    #[error("Внутренняя ошибка авторизации: {0}")]
    Internal(#[from] anyhow::Error),
}

struct StoredUser {
    info: UserInfo,
    password_hash: String,
}

struct RefreshSession {
    user_id: String,
    expires_at: DateTime<Utc>,
}

pub struct AuthService {
    keys: JwtKeys,
    users: Vec<StoredUser>,
    sessions: RwLock<HashMap<String, RefreshSession>>,
}

impl AuthService {
    pub fn from_config(auth: &AuthConfig, users: &[UserConfig]) -> anyhow::Result<Self> {
        let keys = JwtKeys::new(auth.jwt_secret.as_deref(), auth.access_token_hours);
        let mut stored = Vec::with_capacity(users.len());
        for user in users {
            if stored
                .iter()
                .any(|s: &StoredUser| s.info.email.eq_ignore_ascii_case(&user.email))
            {
                anyhow::bail!("Duplicate user email in config: {}", user.email);
            }
            stored.push(StoredUser {
                info: UserInfo {
                    id: user.id.clone(),
                    email: user.email.clone(),
                    name: user.name.clone(),
                    role: user.role.clone(),
                    permissions: user.permissions.clone(),
                    department: user.department.clone(),
                    default_route: user.default_route.clone(),
                },
                password_hash: password::ensure_hashed(&user.password)?,
            });
        }
        if stored.is_empty() {
            tracing::warn!("No users configured, login is impossible");
        }

        Ok(Self {
            keys,
            users: stored,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn user(&self, id: &str) -> Option<UserInfo> {
        self.users
            .iter()
            .find(|u| u.info.id == id)
            .map(|u| u.info.clone())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let email = email.trim();
        let user = self
            .users
            .iter()
            .find(|u| u.info.email.eq_ignore_ascii_case(email))
            .ok_or(AuthError::InvalidCredentials)?;
        if !password::verify_password(password, &user.password_hash)? {
            tracing::warn!("Failed login attempt for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.keys.generate_access_token(&user.info)?;
        let refresh_token = jwt::generate_refresh_token();
        self.sessions.write().await.insert(
            refresh_token.clone(),
            RefreshSession {
                user_id: user.info.id.clone(),
                expires_at: Utc::now() + chrono::Duration::days(REFRESH_TOKEN_LIFETIME_DAYS),
            },
        );
        tracing::info!("User {} logged in", user.info.email);

        Ok(LoginResponse {
            access_token,
            refresh_token,
            user: user.info.clone(),
        })
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AuthError> {
        let user_id = {
            let mut sessions = self.sessions.write().await;
            let session = sessions
                .get(refresh_token)
                .map(|s| (s.user_id.clone(), s.expires_at));
            match session {
                Some((user_id, expires_at)) if expires_at > Utc::now() => user_id,
                Some(_) => {
                    sessions.remove(refresh_token);
                    return Err(AuthError::InvalidToken);
                }
                None => return Err(AuthError::InvalidToken),
            }
        };
        let user = self.user(&user_id).ok_or(AuthError::InvalidToken)?;
        let access_token = self.keys.generate_access_token(&user)?;
        Ok(RefreshResponse { access_token })
    }

    /// Отзывает refresh-токен; неизвестный токен не считается ошибкой
    pub async fn logout(&self, refresh_token: &str) {
        if self.sessions.write().await.remove(refresh_token).is_some() {
            tracing::info!("Refresh token revoked");
        }
    }

    pub fn validate(&self, access_token: &str) -> Result<TokenClaims, AuthError> {
        self.keys
            .validate_token(access_token)
            .map_err(|_| AuthError::InvalidToken)
    }

    pub fn current_user(&self, claims: &TokenClaims) -> Result<UserInfo, AuthError> {
        self.user(&claims.sub)
            .ok_or_else(|| AuthError::UnknownUser(claims.sub.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::{Config, DEFAULT_CONFIG};

    fn service() -> AuthService {
        let mut config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        config.auth.jwt_secret = Some("test-secret".to_string());
        AuthService::from_config(&config.auth, &config.users).unwrap()
    }

    #[tokio::test]
    async fn login_returns_tokens_and_profile() {
        let auth = service();
        let response = auth.login(" Manager@Example.com ", "manager123").await.unwrap();
        assert_eq!(response.user.role, "manager");
        assert_eq!(response.user.default_route.as_deref(), Some("/purchase_order/list"));

        let claims = auth.validate(&response.access_token).unwrap();
        assert_eq!(auth.current_user(&claims).unwrap().id, "u-manager");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = service();
        assert!(matches!(
            auth.login("sales@example.com", "nope").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("ghost@example.com", "sales123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn logout_revokes_refresh_token() {
        let auth = service();
        let response = auth.login("admin@example.com", "admin123").await.unwrap();
        assert!(auth.refresh(&response.refresh_token).await.is_ok());

        auth.logout(&response.refresh_token).await;
        assert!(matches!(
            auth.refresh(&response.refresh_token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn duplicate_emails_are_rejected() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        let mut users = config.users.clone();
        users.push(users[0].clone());
        assert!(AuthService::from_config(&config.auth, &users).is_err());
    }
}
