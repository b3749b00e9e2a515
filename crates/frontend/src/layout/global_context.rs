use crate::shared::dynamic_page::NavigationBridge;
use leptos::prelude::*;

/// Общее состояние оболочки: маршрут и видимость боковой панели
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub nav: NavigationBridge,
    pub left_open: RwSignal<bool>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            nav: NavigationBridge::new(),
            left_open: RwSignal::new(true),
        }
    }

    /// Подключает кнопки браузера назад/вперёд к сигналу маршрута
    pub fn init_router_integration(&self) {
        self.nav.listen();
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|open| *open = !*open);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_global_context() -> AppGlobalContext {
    use_context::<AppGlobalContext>().expect("AppGlobalContext not found")
}
