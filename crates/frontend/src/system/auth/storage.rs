//! Сессия пользователя в локальном хранилище браузера.
//!
//! Токены и пользователь читаются при старте, чтобы не показывать экран
//! загрузки. Сессия сохраняется и очищается целиком: без access-токена
//! ни refresh-токен, ни данные пользователя не считаются действительными.

use contracts::system::auth::UserInfo;
use serde::{Deserialize, Serialize};
use web_sys::window;

pub const ACCESS_TOKEN_KEY: &str = "app_access_token";
pub const REFRESH_TOKEN_KEY: &str = "app_refresh_token";
pub const USER_DATA_KEY: &str = "userData";

/// Строковое хранилище ключ → значение
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`
pub struct LocalStorage;

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        get_local_storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = get_local_storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("localStorage write failed for {}", key);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = get_local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserInfo>,
}

impl SessionState {
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(access_token) = store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty()) else {
            // остатки прошлой сессии без токена недействительны
            Self::clear(store);
            return Self::default();
        };

        let user = store.get(USER_DATA_KEY).and_then(|raw| {
            serde_json::from_str::<UserInfo>(&raw)
                .map_err(|e| log::warn!("stored user data ignored: {}", e))
                .ok()
        });

        Self {
            access_token: Some(access_token),
            refresh_token: store.get(REFRESH_TOKEN_KEY),
            user,
        }
    }

    pub fn save(&self, store: &impl KeyValueStore) {
        let Some(access_token) = &self.access_token else {
            Self::clear(store);
            return;
        };
        store.set(ACCESS_TOKEN_KEY, access_token);
        match &self.refresh_token {
            Some(token) => store.set(REFRESH_TOKEN_KEY, token),
            None => store.remove(REFRESH_TOKEN_KEY),
        }
        match self.user.as_ref().and_then(|u| serde_json::to_string(u).ok()) {
            Some(json) => store.set(USER_DATA_KEY, &json),
            None => store.remove(USER_DATA_KEY),
        }
    }

    pub fn clear(store: &impl KeyValueStore) {
        store.remove(ACCESS_TOKEN_KEY);
        store.remove(REFRESH_TOKEN_KEY);
        store.remove(USER_DATA_KEY);
    }
}

pub fn load_session() -> SessionState {
    SessionState::load(&LocalStorage)
}

pub fn save_session(session: &SessionState) {
    session.save(&LocalStorage);
}

pub fn clear_session() {
    SessionState::clear(&LocalStorage);
}

/// Access-токен для заголовка `Authorization`
pub fn get_access_token() -> Option<String> {
    LocalStorage.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
}

pub fn get_refresh_token() -> Option<String> {
    get_access_token().and_then(|_| LocalStorage.get(REFRESH_TOKEN_KEY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore(RefCell<HashMap<String, String>>);

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }
        fn set(&self, key: &str, value: &str) {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
        }
        fn remove(&self, key: &str) {
            self.0.borrow_mut().remove(key);
        }
    }

    fn user() -> UserInfo {
        UserInfo {
            id: "u1".into(),
            email: "admin@example.com".into(),
            name: "Admin".into(),
            role: "admin".into(),
            permissions: vec!["all".into()],
            department: None,
            default_route: Some("/sales_order/list".into()),
        }
    }

    #[test]
    fn session_round_trips_through_fixed_keys() {
        let store = MemoryStore::default();
        let session = SessionState {
            access_token: Some("a".into()),
            refresh_token: Some("r".into()),
            user: Some(user()),
        };
        session.save(&store);
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("a"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("r"));
        assert!(store.get(USER_DATA_KEY).is_some());
        assert_eq!(SessionState::load(&store), session);
    }

    #[test]
    fn missing_access_token_invalidates_everything() {
        let store = MemoryStore::default();
        store.set(REFRESH_TOKEN_KEY, "r");
        store.set(USER_DATA_KEY, "{}");
        assert_eq!(SessionState::load(&store), SessionState::default());
        assert!(store.get(REFRESH_TOKEN_KEY).is_none());
        assert!(store.get(USER_DATA_KEY).is_none());
    }

    #[test]
    fn saving_without_token_clears_store() {
        let store = MemoryStore::default();
        SessionState {
            access_token: Some("a".into()),
            refresh_token: None,
            user: Some(user()),
        }
        .save(&store);
        SessionState::default().save(&store);
        assert!(store.0.borrow().is_empty());
    }

    #[test]
    fn corrupt_user_data_keeps_token() {
        let store = MemoryStore::default();
        store.set(ACCESS_TOKEN_KEY, "a");
        store.set(USER_DATA_KEY, "not json");
        let session = SessionState::load(&store);
        assert_eq!(session.access_token.as_deref(), Some("a"));
        assert!(session.user.is_none());
    }
}
