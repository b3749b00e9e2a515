use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pages: PagesConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Каталог дополнительных документов `*.json`.
/// Файл `<model>.json` заменяет встроенный документ той же модели.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PagesConfig {
    pub dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Если не задан, генерируется при каждом запуске
    pub jwt_secret: Option<String>,
    #[serde(default = "default_access_token_hours")]
    pub access_token_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_hours: default_access_token_hours(),
        }
    }
}

/// Пользователь из `[[users]]`. Пароль задаётся открытым текстом
/// или готовым хешем argon2 (`$argon2...`).
#[derive(Debug, Deserialize, Clone)]
pub struct UserConfig {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub department: Option<String>,
    pub default_route: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_access_token_hours() -> i64 {
    24
}

/// Default configuration embedded in the binary
pub const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[pages]

[auth]
access_token_hours = 24

[[users]]
id = "u-admin"
email = "admin@example.com"
name = "Администратор"
password = "admin123"
role = "admin"
permissions = ["*"]
department = "Управление"
default_route = "/sales_order/list"

[[users]]
id = "u-manager"
email = "manager@example.com"
name = "Менеджер закупок"
password = "manager123"
role = "manager"
permissions = ["purchase_order", "purchase_list", "sales_order"]
department = "Закупки"
default_route = "/purchase_order/list"

[[users]]
id = "u-sales"
email = "sales@example.com"
name = "Продавец"
password = "sales123"
role = "sales"
permissions = ["sales_order"]
department = "Продажи"
default_route = "/sales_order/board"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Каталог документов страниц; относительный путь берётся от каталога исполняемого файла
pub fn pages_dir(config: &Config) -> Option<PathBuf> {
    let dir = config.pages.dir.as_deref()?.trim();
    if dir.is_empty() {
        return None;
    }
    let path = Path::new(dir);
    if path.is_absolute() {
        return Some(path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Some(exe_dir.join(path));
        }
    }

    Some(PathBuf::from(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.access_token_hours, 24);
        assert!(config.auth.jwt_secret.is_none());
        assert!(config.pages.dir.is_none());

        let roles: Vec<&str> = config.users.iter().map(|u| u.role.as_str()).collect();
        assert_eq!(roles, vec!["admin", "manager", "sales"]);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.users.is_empty());
        assert!(pages_dir(&config).is_none());
    }

    #[test]
    fn absolute_pages_dir_is_kept() {
        let config: Config = toml::from_str("[pages]\ndir = \"/srv/pages\"\n").unwrap();
        assert_eq!(pages_dir(&config), Some(PathBuf::from("/srv/pages")));
    }
}
