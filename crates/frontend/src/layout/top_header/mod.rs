//! Верхняя панель: переключатель навигации, название, пользователь, выход

use crate::layout::global_context::use_global_context;
use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_global_context();
    let (auth_state, set_auth_state) = use_auth();

    let logout = move |_| {
        spawn_local(async move {
            do_logout(set_auth_state).await;
            ctx.nav.navigate("/");
        });
    };

    let is_sidebar_visible = move || ctx.left_open.get();

    let user_label = move || {
        auth_state.with(|state| match &state.user_info {
            Some(user) => format!("{} ({})", user.name, user.role),
            None => "Гость".to_string(),
        })
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if is_sidebar_visible() { "Скрыть навигацию" } else { "Показать навигацию" }
                >
                    {move || if is_sidebar_visible() {
                        icon("panel-left-close")
                    } else {
                        icon("panel-left-open")
                    }}
                </button>
                <span class="top-header__title" on:click=move |_| ctx.nav.navigate("/")>
                    "ERP Pages"
                </span>
            </div>

            <div class="top-header__actions">
                <div class="top-header__user">
                    {icon("user")}
                    <span>{user_label}</span>
                </div>

                <button class="top-header__icon-btn" on:click=logout title="Выход">
                    {icon("log-out")}
                </button>
            </div>
        </div>
    }
}
