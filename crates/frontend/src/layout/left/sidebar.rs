//! Боковая панель: модели, известные реестру конфигураций

use crate::layout::global_context::use_global_context;
use crate::shared::dynamic_page::{AppRoute, ConfigRegistry};
use crate::shared::icons::icon;
use contracts::shared::data_api::ModelInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Путь, на который ведёт пункт меню модели
pub fn model_link(info: &ModelInfo) -> String {
    AppRoute::Model(info.model.clone()).to_path()
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_global_context();
    let registry = use_context::<ConfigRegistry>().expect("ConfigRegistry not provided");

    let models = RwSignal::new(Vec::<ModelInfo>::new());
    let error = RwSignal::new(None::<String>);

    spawn_local(async move {
        match registry.models().await {
            Ok(list) => {
                let _ = models.try_set(list);
            }
            Err(e) => {
                log::warn!("model list unavailable: {}", e);
                let _ = error.try_set(Some(e.to_string()));
            }
        }
    });

    let active_model = Memo::new(move |_| ctx.nav.route().get().model().map(str::to_string));

    view! {
        <div class="app-sidebar__content">
            <div
                class="app-sidebar__item"
                class:app-sidebar__item--active=move || ctx.nav.route().get() == AppRoute::Index
                on:click=move |_| ctx.nav.navigate("/")
            >
                <div class="app-sidebar__item-content">
                    {icon("home")}
                    <span>"Главная"</span>
                </div>
            </div>

            {move || error.get().map(|e| view! {
                <div class="app-sidebar__error">{e}</div>
            })}

            <For
                each=move || models.get()
                key=|info| info.model.clone()
                children=move |info| {
                    let model = info.model.clone();
                    let path = model_link(&info);
                    view! {
                        <div
                            class="app-sidebar__item"
                            class:app-sidebar__item--active=move || {
                                active_model.get().as_deref() == Some(model.as_str())
                            }
                            style:padding-left="12px"
                            on:click=move |_| ctx.nav.navigate(&path)
                        >
                            <div class="app-sidebar__item-content">
                                {icon("file-text")}
                                <span>{info.title.clone()}</span>
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}
