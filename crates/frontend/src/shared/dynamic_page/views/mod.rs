//! Компоненты страницы: рендерер и общие представления
//! (список, форма, карточка записи, канбан).

pub mod detail_view;
pub mod effects;
pub mod form_view;
pub mod kanban_view;
pub mod list_view;
pub mod parts;
pub mod renderer;
pub mod status_cards;
pub mod view_switcher;

pub use renderer::PageRenderer;

use super::actions::ActionContext;
use super::effect_queue::EffectQueue;
use super::navigation::NavigationBridge;
use super::page_store::PageStore;
use super::resolver::ResolvedView;
use crate::layout::ToastService;
use contracts::shared::data_row::DataRow;
use contracts::shared::page_config::{DataSourceKind, PageConfiguration};
use leptos::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard};

/// Результат успешной загрузки пары модель/представление
#[derive(Clone)]
pub struct LoadedView {
    pub config: Arc<PageConfiguration>,
    pub view: Arc<ResolvedView>,
    pub record_id: Option<String>,
}

/// Всё, что нужно представлению загруженной страницы
#[derive(Clone)]
pub struct PageHandle {
    pub config: Arc<PageConfiguration>,
    pub view: Arc<ResolvedView>,
    pub record_id: Option<String>,
    pub store: RwSignal<PageStore>,
    /// Файлы импорта применяются в порядке выбора
    pub imports: Arc<Mutex<EffectQueue<Vec<DataRow>>>>,
    pub import_input: NodeRef<leptos::html::Input>,
    pub role: Signal<Option<String>>,
    pub nav: NavigationBridge,
    pub toasts: ToastService,
}

impl PageHandle {
    pub fn with_action_context<R>(
        &self,
        record_id: Option<&str>,
        f: impl FnOnce(&ActionContext) -> R,
    ) -> R {
        let role = self.role.get_untracked();
        let ctx = ActionContext {
            module: &self.config.module,
            model: &self.config.model,
            page_title: &self.config.title,
            view: &self.view.name,
            record_id,
            edit_mode: self.view.config.edit_mode,
            user_role: role.as_deref(),
            available_views: &self.view.available_views,
        };
        f(&ctx)
    }

    pub fn is_api(&self) -> bool {
        self.config.data_source == DataSourceKind::Api
    }

    pub fn has_view(&self, name: &str) -> bool {
        self.view.available_views.iter().any(|v| v == name)
    }

    /// Путь представления этой модели
    pub fn view_path(&self, view: &str, id: Option<&str>) -> String {
        super::navigation::PageRoute::new(&self.config.module, view, id).to_path()
    }

    /// Куда уходить после сохранения или удаления: список, иначе главная
    pub fn list_path(&self) -> String {
        if self.has_view("list") {
            self.view_path("list", None)
        } else {
            "/".to_string()
        }
    }

    pub fn title(&self) -> String {
        let template = self
            .view
            .config
            .title
            .clone()
            .unwrap_or_else(|| self.config.title.clone());
        self.with_action_context(self.record_id.as_deref(), |ctx| {
            super::actions::substitute(&template, ctx)
        })
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
