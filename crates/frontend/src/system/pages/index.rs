//! Главная страница: карточки моделей реестра

use crate::layout::global_context::use_global_context;
use crate::layout::left::sidebar::model_link;
use crate::shared::dynamic_page::ConfigRegistry;
use contracts::shared::data_api::ModelInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn IndexPage() -> impl IntoView {
    let ctx = use_global_context();
    let registry = use_context::<ConfigRegistry>().expect("ConfigRegistry not provided");

    let models = RwSignal::new(None::<Result<Vec<ModelInfo>, String>>);
    spawn_local(async move {
        let result = registry.models().await.map_err(|e| e.to_string());
        let _ = models.try_set(Some(result));
    });

    view! {
        <div class="page">
            <div class="page__header">
                <h2 class="page__title">"Разделы"</h2>
            </div>
            {move || match models.get() {
                None => view! { <div class="page-state">"Загрузка..."</div> }.into_any(),
                Some(Err(e)) => view! {
                    <div class="page-state page-state--error">{e}</div>
                }.into_any(),
                Some(Ok(list)) if list.is_empty() => view! {
                    <div class="page-state">"Нет доступных разделов"</div>
                }.into_any(),
                Some(Ok(list)) => view! {
                    <div class="model-grid">
                        {list.into_iter().map(|info| {
                            let path = model_link(&info);
                            view! {
                                <div class="model-card" on:click=move |_| ctx.nav.navigate(&path)>
                                    <div class="model-card__title">{info.title.clone()}</div>
                                    <div class="model-card__model">{info.model.clone()}</div>
                                </div>
                            }
                        }).collect_view()}
                    </div>
                }.into_any(),
            }}
        </div>
    }
}
