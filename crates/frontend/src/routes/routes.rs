use crate::layout::global_context::use_global_context;
use crate::layout::left::sidebar::Sidebar;
use crate::layout::Shell;
use crate::shared::dynamic_page::{AppRoute, PageRenderer};
use crate::system::auth::context::use_auth;
use crate::system::pages::index::IndexPage;
use crate::system::pages::login::LoginPage;
use leptos::prelude::*;

/// Что показывать в центральной области
#[derive(Debug, Clone, PartialEq)]
enum ContentKind {
    Index,
    Page,
    NotFound(String),
}

fn content_kind(route: &AppRoute) -> ContentKind {
    match route {
        AppRoute::Index => ContentKind::Index,
        AppRoute::Model(_) | AppRoute::Page(_) => ContentKind::Page,
        AppRoute::NotFound(path) => ContentKind::NotFound(path.clone()),
    }
}

#[component]
fn AppContent() -> impl IntoView {
    let nav = use_global_context().nav;
    let kind = Memo::new(move |_| content_kind(&nav.route().get()));

    move || match kind.get() {
        ContentKind::Index => view! { <IndexPage /> }.into_any(),
        ContentKind::Page => view! { <PageRenderer /> }.into_any(),
        ContentKind::NotFound(path) => view! {
            <div class="page-state page-state--error">
                <h3>"Страница не найдена"</h3>
                <p>{path}</p>
                <button class="btn-primary" on:click=move |_| nav.navigate("/")>"На главную"</button>
            </div>
        }
        .into_any(),
    }
}

#[component]
fn MainLayout() -> impl IntoView {
    view! {
        <Shell
            left=|| view! { <Sidebar /> }.into_any()
            center=|| view! { <AppContent /> }.into_any()
        />
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.get().access_token.is_some()
            fallback=|| view! { <LoginPage /> }
        >
            <MainLayout />
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_maps_to_one_content_area() {
        assert_eq!(content_kind(&AppRoute::parse("/")), ContentKind::Index);
        assert_eq!(content_kind(&AppRoute::parse("/sales_order")), ContentKind::Page);
        assert_eq!(content_kind(&AppRoute::parse("/sales_order/list")), ContentKind::Page);
        assert!(matches!(content_kind(&AppRoute::parse("/a/b/c/d")), ContentKind::NotFound(_)));
    }
}
