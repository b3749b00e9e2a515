use super::PageHandle;
use crate::shared::icons::icon;
use contracts::shared::page_config::{ComponentKind, PageConfiguration};
use leptos::prelude::*;

/// Представления-коллекции модели, между которыми можно переключаться
pub fn switchable_views(config: &PageConfiguration) -> Vec<(String, String, ComponentKind)> {
    config
        .views
        .iter()
        .filter(|v| {
            matches!(
                v.config.component,
                ComponentKind::ListView | ComponentKind::TableView | ComponentKind::KanbanView
            )
        })
        .map(|v| {
            let title = v
                .config
                .title
                .clone()
                .filter(|t| !t.contains("{{"))
                .unwrap_or_else(|| v.name.clone());
            (v.name.clone(), title, v.config.component.clone())
        })
        .collect()
}

#[component]
pub fn ViewSwitcher(page: PageHandle) -> impl IntoView {
    let views = switchable_views(&page.config);
    let current = page.view.name.clone();
    if views.len() < 2 || !views.iter().any(|(name, _, _)| *name == current) {
        return ().into_any();
    }

    let nav = page.nav;
    view! {
        <div class="view-switcher">
            {views.into_iter().map(|(name, title, component)| {
                let active = name == current;
                let icon_name = if component == ComponentKind::KanbanView { "kanban" } else { "table" };
                let tooltip = title.clone();
                view! {
                    <button
                        class="view-switcher__btn"
                        class:view-switcher__btn--active=active
                        title=tooltip
                        on:click=move |_| nav.on_view_change(&name)
                    >
                        {icon(icon_name)}
                        <span>{title}</span>
                    </button>
                }
            }).collect_view()}
        </div>
    }
    .into_any()
}
