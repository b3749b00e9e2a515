//! Адрес backend-сервиса, вычисляемый из адреса страницы

/// Порт backend-сервиса
pub const BACKEND_PORT: u16 = 3000;

pub fn base_from_location(protocol: &str, hostname: &str) -> String {
    format!("{}//{}:{}", protocol, hostname, BACKEND_PORT)
}

/// Базовый URL API, например `http://localhost:3000`.
/// Пустая строка, если окна нет.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    base_from_location(&protocol, &hostname)
}

/// Полный URL по пути `/api/...`
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_uses_backend_port() {
        assert_eq!(base_from_location("https:", "erp.local"), "https://erp.local:3000");
    }
}
