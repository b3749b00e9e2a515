use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::storage::{self, SessionState};
use super::api;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
}

impl AuthState {
    /// Роль для проверки доступа к действиям
    pub fn role(&self) -> Option<String> {
        self.user_info.as_ref().map(|u| u.role.clone())
    }
}

impl From<&SessionState> for AuthState {
    fn from(session: &SessionState) -> Self {
        Self {
            access_token: session.access_token.clone(),
            user_info: session.user.clone(),
        }
    }
}

/// Провайдер состояния авторизации.
///
/// Состояние сразу берётся из локального хранилища, затем токен
/// проверяется на сервере; при отказе выполняется обновление по refresh-токену.
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let restored = storage::load_session();
    let (auth_state, set_auth_state) = signal(AuthState::from(&restored));

    if let Some(access_token) = restored.access_token.clone() {
        spawn_local(async move {
            match api::get_current_user(&access_token).await {
                Ok(user_info) => {
                    let session = SessionState {
                        user: Some(user_info.clone()),
                        ..storage::load_session()
                    };
                    storage::save_session(&session);
                    set_auth_state.set(AuthState {
                        access_token: Some(access_token),
                        user_info: Some(user_info),
                    });
                }
                Err(e) => {
                    log::info!("stored token rejected ({}), trying refresh", e);
                    restore_by_refresh(restored.refresh_token, set_auth_state).await;
                }
            }
        });
    }

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

async fn restore_by_refresh(refresh_token: Option<String>, set_auth_state: WriteSignal<AuthState>) {
    let Some(refresh_token) = refresh_token else {
        storage::clear_session();
        set_auth_state.set(AuthState::default());
        return;
    };

    let refreshed = match api::refresh_token(refresh_token.clone()).await {
        Ok(response) => api::get_current_user(&response.access_token)
            .await
            .map(|user| (response.access_token, user)),
        Err(e) => Err(e),
    };

    match refreshed {
        Ok((access_token, user)) => {
            let session = SessionState {
                access_token: Some(access_token),
                refresh_token: Some(refresh_token),
                user: Some(user),
            };
            storage::save_session(&session);
            set_auth_state.set(AuthState::from(&session));
        }
        Err(e) => {
            log::warn!("session refresh failed: {}", e);
            storage::clear_session();
            set_auth_state.set(AuthState::default());
        }
    }
}

pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Вход: сохраняет сессию целиком и переключает интерфейс
pub async fn do_login(
    email: String,
    password: String,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<UserInfo, String> {
    let response = api::login(email, password).await?;

    let session = SessionState {
        access_token: Some(response.access_token),
        refresh_token: Some(response.refresh_token),
        user: Some(response.user.clone()),
    };
    storage::save_session(&session);
    set_auth_state.set(AuthState::from(&session));

    Ok(response.user)
}

/// Выход: отзыв refresh-токена на сервере и очистка сессии
pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("logout request failed: {}", e);
        }
    }

    storage::clear_session();
    set_auth_state.set(AuthState::default());
}
