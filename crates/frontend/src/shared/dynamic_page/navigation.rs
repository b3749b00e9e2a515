//! Связь активной модели, представления и записи с адресной строкой.
//!
//! Грамматика путей: `/{model}/{view}` и `/{model}/{view}/{id}`,
//! `/{model}` открывает первое представление модели, `/` показывает список моделей.
//! URL единственный источник истины: состояние компонентов выводится из сигнала маршрута.

use leptos::prelude::*;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoute {
    pub model: String,
    pub view: String,
    pub id: Option<String>,
}

impl PageRoute {
    pub fn new(model: &str, view: &str, id: Option<&str>) -> Self {
        Self {
            model: model.to_string(),
            view: view.to_string(),
            id: id.map(str::to_string),
        }
    }

    pub fn to_path(&self) -> String {
        let mut path = format!(
            "/{}/{}",
            urlencoding::encode(&self.model),
            urlencoding::encode(&self.view)
        );
        if let Some(id) = &self.id {
            path.push('/');
            path.push_str(&urlencoding::encode(id));
        }
        path
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Index,
    /// Модель без представления: перенаправляется на первое представление
    Model(String),
    Page(PageRoute),
    NotFound(String),
}

impl AppRoute {
    pub fn parse(path: &str) -> AppRoute {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                urlencoding::decode(s)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| s.to_string())
            })
            .collect();

        match segments.as_slice() {
            [] => AppRoute::Index,
            [model] => AppRoute::Model(model.clone()),
            [model, view] => AppRoute::Page(PageRoute::new(model, view, None)),
            [model, view, id] => AppRoute::Page(PageRoute::new(model, view, Some(id))),
            _ => AppRoute::NotFound(path.to_string()),
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            AppRoute::Index => "/".to_string(),
            AppRoute::Model(model) => format!("/{}", urlencoding::encode(model)),
            AppRoute::Page(page) => page.to_path(),
            AppRoute::NotFound(path) => path.clone(),
        }
    }

    pub fn page(&self) -> Option<&PageRoute> {
        match self {
            AppRoute::Page(page) => Some(page),
            _ => None,
        }
    }

    pub fn model(&self) -> Option<&str> {
        match self {
            AppRoute::Model(model) => Some(model),
            AppRoute::Page(page) => Some(&page.model),
            _ => None,
        }
    }
}

fn current_browser_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn write_history(path: &str, replace: bool) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        let result = if replace {
            history.replace_state_with_url(&JsValue::NULL, "", Some(path))
        } else {
            history.push_state_with_url(&JsValue::NULL, "", Some(path))
        };
        if let Err(e) = result {
            log::warn!("history update failed for {}: {:?}", path, e);
        }
    }
}

/// Мост между маршрутом приложения и историей браузера
#[derive(Clone, Copy)]
pub struct NavigationBridge {
    route: RwSignal<AppRoute>,
}

impl NavigationBridge {
    pub fn new() -> Self {
        Self {
            route: RwSignal::new(AppRoute::parse(&current_browser_path())),
        }
    }

    /// Подписка на назад/вперёд. Вызывается один раз в корне приложения.
    pub fn listen(&self) {
        let route = self.route;
        let handle = window_event_listener(leptos::ev::popstate, move |_| {
            let next = AppRoute::parse(&current_browser_path());
            log::debug!("popstate -> {:?}", next);
            route.set(next);
        });
        // слушатель живёт столько же, сколько приложение
        std::mem::forget(handle);
    }

    pub fn route(&self) -> Signal<AppRoute> {
        self.route.into()
    }

    pub fn current(&self) -> AppRoute {
        self.route.get_untracked()
    }

    /// Переход без перезагрузки страницы
    pub fn navigate(&self, path: &str) {
        let next = AppRoute::parse(path);
        let path = next.to_path();
        if self.route.with_untracked(|r| *r == next) {
            return;
        }
        write_history(&path, false);
        leptos::logging::log!("navigate: {}", path);
        self.route.set(next);
    }

    /// Замена текущего адреса (перенаправление `/{model}` на представление)
    pub fn redirect(&self, path: &str) {
        let next = AppRoute::parse(path);
        write_history(&next.to_path(), true);
        self.route.set(next);
    }

    pub fn on_view_change(&self, view: &str) {
        if let Some(page) = self.current().page() {
            self.navigate(&PageRoute::new(&page.model, view, None).to_path());
        }
    }

    pub fn on_record_select(&self, view: &str, id: &str) {
        if let Some(page) = self.current().page() {
            self.navigate(&PageRoute::new(&page.model, view, Some(id)).to_path());
        }
    }
}

impl Default for NavigationBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_route_grammar() {
        assert_eq!(AppRoute::parse("/"), AppRoute::Index);
        assert_eq!(AppRoute::parse(""), AppRoute::Index);
        assert_eq!(AppRoute::parse("/sales_order"), AppRoute::Model("sales_order".into()));
        assert_eq!(
            AppRoute::parse("/sales_order/list"),
            AppRoute::Page(PageRoute::new("sales_order", "list", None))
        );
        assert_eq!(
            AppRoute::parse("/sales_order/view/SO-1001?tab=1"),
            AppRoute::Page(PageRoute::new("sales_order", "view", Some("SO-1001")))
        );
        assert!(matches!(AppRoute::parse("/a/b/c/d"), AppRoute::NotFound(_)));
    }

    #[test]
    fn segments_are_url_encoded() {
        let route = PageRoute::new("purchase_order", "view", Some("A 1/2"));
        let path = route.to_path();
        assert_eq!(path, "/purchase_order/view/A%201%2F2");
        assert_eq!(AppRoute::parse(&path), AppRoute::Page(route));
    }

    #[test]
    fn path_round_trip_for_every_variant() {
        for path in ["/", "/orders", "/orders/list", "/orders/edit/7"] {
            assert_eq!(AppRoute::parse(path).to_path(), path);
        }
    }
}
