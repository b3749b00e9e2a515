use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Пользователь в том виде, в каком его видит интерфейс.
/// Ролевые ограничения действий опираются только на поле `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub default_route: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user_id
    pub email: String,
    pub role: String,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at
}

/// Пустой список ролей разрешает всем, без пользователя доступа нет.
pub fn has_access(roles: &[String], user_role: Option<&str>) -> bool {
    if roles.is_empty() {
        return true;
    }
    match user_role {
        Some(role) => roles.iter().any(|r| r == role),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_role_list_allows_everyone() {
        assert!(has_access(&[], Some("sales")));
        assert!(has_access(&[], None));
    }

    #[test]
    fn restricted_action_requires_matching_role() {
        let roles = vec!["admin".to_string(), "manager".to_string()];
        assert!(has_access(&roles, Some("admin")));
        assert!(!has_access(&roles, Some("sales")));
        assert!(!has_access(&roles, None));
    }
}
