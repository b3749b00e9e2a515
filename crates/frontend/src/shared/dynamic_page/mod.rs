//! Страницы, построенные по конфигурации.
//!
//! Модель и представление приходят из URL, [`registry::ConfigRegistry`]
//! отдаёт нормализованную конфигурацию, [`resolver::resolve_view`] выбирает
//! представление, а `views::PageRenderer` монтирует нужный компонент.
//! Вся логика таблиц, форм и действий живёт в чистых модулях без DOM,
//! компоненты только связывают её с сигналами.

pub mod actions;
pub mod api;
pub mod effect_queue;
pub mod form;
pub mod formatter;
pub mod importer;
pub mod kanban;
pub mod navigation;
pub mod page_store;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod status_summary;
pub mod table_engine;
pub mod view_state;
pub mod views;

pub use navigation::{AppRoute, NavigationBridge, PageRoute};
pub use registry::{ConfigRegistry, RegistrySource};
pub use views::PageRenderer;
