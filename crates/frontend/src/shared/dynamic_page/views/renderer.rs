//! Рендерер страницы: маршрут → конфигурация → представление.
//!
//! Загрузка идёт через [`PageSession`]: ответ, пришедший после ухода
//! со страницы или после более нового перехода, отбрасывается.
//! Ошибка разрешения показывается на границе страницы и не роняет оболочку.

use super::detail_view::DetailView;
use super::effects::ImportInput;
use super::form_view::FormView;
use super::kanban_view::KanbanView;
use super::list_view::ListView;
use super::view_switcher::ViewSwitcher;
use super::{lock, LoadedView, PageHandle};
use crate::layout::global_context::use_global_context;
use crate::layout::use_toasts;
use crate::shared::dynamic_page::api;
use crate::shared::dynamic_page::effect_queue::EffectQueue;
use crate::shared::dynamic_page::navigation::{AppRoute, NavigationBridge, PageRoute};
use crate::shared::dynamic_page::page_store::PageStore;
use crate::shared::dynamic_page::registry::ConfigRegistry;
use crate::shared::dynamic_page::resolver::{resolve_view, ResolvedView};
use crate::shared::dynamic_page::session::{LoadToken, PagePhase, PageSession};
use crate::system::auth::context::use_auth;
use contracts::shared::data_row::DataRow;
use contracts::shared::page_config::{ComponentKind, DataSourceKind, PageConfiguration, PageError};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::{Arc, Mutex};

/// Заголовок экрана ошибки
pub fn error_title(error: &PageError) -> &'static str {
    match error {
        PageError::ConfigurationNotFound { .. } | PageError::ViewNotFound { .. } => {
            "Страница не найдена"
        }
        PageError::MalformedConfiguration { .. } => "Ошибка конфигурации",
        PageError::Transport(_) => "Ошибка загрузки",
        PageError::Validation(_) | PageError::Import(_) => "Ошибка",
    }
}

#[component]
pub fn PageErrorState(error: PageError) -> impl IntoView {
    let nav = use_global_context().nav;
    view! {
        <div class="page-state page-state--error">
            <h3>{error_title(&error)}</h3>
            <p>{error.to_string()}</p>
            <button class="btn-primary" on:click=move |_| nav.navigate("/")>"На главную"</button>
        </div>
    }
}

/// Точка входа для маршрутов `/{model}` и `/{model}/{view}[/{id}]`.
/// Смена модели пересоздаёт страницу целиком вместе с её состоянием.
#[component]
pub fn PageRenderer() -> impl IntoView {
    let nav = use_global_context().nav;
    let route = nav.route();
    let model = Memo::new(move |_| route.with(|r| r.model().map(str::to_string)));

    move || match model.get() {
        Some(model) => view! { <ModelPage model=model /> }.into_any(),
        None => view! {
            <PageErrorState error=PageError::ConfigurationNotFound { model: String::new() } />
        }
        .into_any(),
    }
}

struct PageLoad {
    config: Arc<PageConfiguration>,
    view: ResolvedView,
    rows: Option<Vec<DataRow>>,
}

async fn load_page(
    registry: ConfigRegistry,
    route: PageRoute,
    fetch_rows: bool,
) -> Result<PageLoad, PageError> {
    let config = registry.resolve(&route.model).await?;
    let view = resolve_view(&config, &route.view)?;
    let rows = if fetch_rows {
        let rows = match config.data_source {
            DataSourceKind::Local => config.sample_data.clone(),
            DataSourceKind::Api => api::list_rows(&config.model)
                .await
                .map_err(PageError::Transport)?,
        };
        Some(rows)
    } else {
        None
    };
    Ok(PageLoad { config, view, rows })
}

#[derive(Clone, Copy)]
struct PageSignals {
    phase: RwSignal<PagePhase>,
    loaded: RwSignal<Option<LoadedView>>,
    store: RwSignal<PageStore>,
    rows_loaded: StoredValue<bool>,
}

fn finish(
    session: &Mutex<PageSession>,
    signals: PageSignals,
    token: LoadToken,
    result: Result<(), PageError>,
) -> bool {
    let (applied, phase) = {
        let mut session = lock(session);
        let applied = session.complete(token, result);
        (applied, session.phase().clone())
    };
    if applied {
        let _ = signals.phase.try_set(phase);
    }
    applied
}

fn open_model(
    model: String,
    session: Arc<Mutex<PageSession>>,
    signals: PageSignals,
    registry: ConfigRegistry,
    nav: NavigationBridge,
) {
    let Some(token) = lock(&session).begin(&model, "") else {
        return;
    };
    signals.phase.set(lock(&session).phase().clone());

    spawn_local(async move {
        let entry = registry.resolve(&model).await.and_then(|config| {
            config
                .entry_view()
                .map(str::to_string)
                .ok_or_else(|| PageError::ViewNotFound {
                    model: model.clone(),
                    view: String::new(),
                })
        });
        match entry {
            Ok(view) => {
                if lock(&session).accepts(token) {
                    nav.redirect(&PageRoute::new(&model, &view, None).to_path());
                }
            }
            Err(error) => {
                finish(&session, signals, token, Err(error));
            }
        }
    });
}

fn open_page(
    route: PageRoute,
    session: Arc<Mutex<PageSession>>,
    signals: PageSignals,
    registry: ConfigRegistry,
    nav: NavigationBridge,
) {
    let Some(token) = lock(&session).begin(&route.model, &route.view) else {
        // та же пара уже загружается или в ошибке; запись могла смениться
        if let Some(loaded) = signals.loaded.get_untracked() {
            if loaded.view.name == route.view && loaded.record_id != route.id {
                signals.loaded.set(Some(LoadedView {
                    record_id: route.id.clone(),
                    ..loaded
                }));
            }
        }
        return;
    };
    signals.phase.set(lock(&session).phase().clone());
    leptos::logging::log!("page load: {}/{}", route.model, route.view);

    let fetch_rows = !signals.rows_loaded.get_value();
    spawn_local(async move {
        match load_page(registry, route.clone(), fetch_rows).await {
            Ok(load) => {
                if !lock(&session).accepts(token) {
                    return;
                }
                // адрес мог смениться на другую запись того же представления
                let record_id = nav
                    .current()
                    .page()
                    .filter(|p| p.model == route.model && p.view == route.view)
                    .map(|p| p.id.clone())
                    .unwrap_or(route.id);

                let rows = match load.rows {
                    Some(rows) => {
                        signals.rows_loaded.set_value(true);
                        rows
                    }
                    None => signals
                        .store
                        .try_with_untracked(|s| s.rows.clone())
                        .unwrap_or_default(),
                };
                let store = PageStore::new(
                    rows,
                    &load.config.row_key,
                    &load.view.name,
                    &load.view.config,
                );
                let _ = signals.store.try_set(store);
                let _ = signals.loaded.try_set(Some(LoadedView {
                    config: load.config,
                    view: Arc::new(load.view),
                    record_id,
                }));
                finish(&session, signals, token, Ok(()));
            }
            Err(error) => {
                finish(&session, signals, token, Err(error));
            }
        }
    });
}

/// Экземпляр страницы одной модели
#[component]
fn ModelPage(model: String) -> impl IntoView {
    let nav = use_global_context().nav;
    let registry = use_context::<ConfigRegistry>().expect("ConfigRegistry not provided");
    let toasts = use_toasts();
    let (auth_state, _) = use_auth();
    let role = Signal::derive(move || auth_state.with(|s| s.role()));

    let session = Arc::new(Mutex::new(PageSession::new()));
    let signals = PageSignals {
        phase: RwSignal::new(PagePhase::Idle),
        loaded: RwSignal::new(None),
        store: RwSignal::new(PageStore::default()),
        rows_loaded: StoredValue::new(false),
    };
    let imports = Arc::new(Mutex::new(EffectQueue::new()));
    let import_input = NodeRef::<leptos::html::Input>::new();

    {
        let session = session.clone();
        on_cleanup(move || lock(&session).unmount());
    }

    {
        let session = session.clone();
        Effect::new(move |_| {
            let route = nav.route().get();
            let session = session.clone();
            let registry = registry.clone();
            match route {
                AppRoute::Model(m) if m == model => open_model(m, session, signals, registry, nav),
                AppRoute::Page(page) if page.model == model => {
                    open_page(page, session, signals, registry, nav)
                }
                _ => {}
            }
        });
    }

    let loading = || view! { <div class="page-state">"Загрузка..."</div> }.into_any();

    view! {
        <div class="page">
            {move || match signals.phase.get() {
                PagePhase::Error { error, .. } => view! { <PageErrorState error=error /> }.into_any(),
                _ => match signals.loaded.get() {
                    Some(loaded) => render_view(PageHandle {
                        config: loaded.config,
                        view: loaded.view,
                        record_id: loaded.record_id,
                        store: signals.store,
                        imports: imports.clone(),
                        import_input,
                        role,
                        nav,
                        toasts,
                    }),
                    None => loading(),
                },
            }}
        </div>
    }
}

fn render_view(page: PageHandle) -> AnyView {
    let body = match page.view.config.component.clone() {
        ComponentKind::ListView | ComponentKind::TableView => {
            view! { <ListView page=page.clone() /> }.into_any()
        }
        ComponentKind::FormView => view! { <FormView page=page.clone() /> }.into_any(),
        ComponentKind::DetailView => view! { <DetailView page=page.clone() /> }.into_any(),
        ComponentKind::KanbanView => view! { <KanbanView page=page.clone() /> }.into_any(),
        ComponentKind::Unregistered(tag) => {
            log::warn!("component not registered: {}", tag);
            view! {
                <div class="page-state page-state--error">
                    {format!("Component not registered: {}", tag)}
                </div>
            }
            .into_any()
        }
    };

    view! {
        <div class="page__header">
            <h2 class="page__title">{page.title()}</h2>
            <ViewSwitcher page=page.clone() />
        </div>
        <ImportInput page=page.clone() />
        {body}
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::page_config::ImportError;

    #[test]
    fn not_found_errors_share_one_title() {
        let missing_model = PageError::ConfigurationNotFound { model: "x".into() };
        let missing_view = PageError::ViewNotFound {
            model: "x".into(),
            view: "y".into(),
        };
        assert_eq!(error_title(&missing_model), error_title(&missing_view));
        assert_eq!(error_title(&PageError::malformed("x", "views", "empty")), "Ошибка конфигурации");
        assert_eq!(error_title(&PageError::Transport("502".into())), "Ошибка загрузки");
        assert_eq!(error_title(&PageError::Import(ImportError::Empty)), "Ошибка");
    }
}
