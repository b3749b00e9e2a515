use super::effects::run_action;
use super::PageHandle;
use crate::shared::components::ui::StatusBadge;
use crate::shared::dynamic_page::actions::{is_visible, label};
use crate::shared::dynamic_page::formatter::{CellDisplay, MISSING_VALUE};
use crate::shared::icons::icon;
use crate::shared::list_utils::highlight_matches;
use contracts::shared::page_config::ActionSpec;
use leptos::prelude::*;
use thaw::*;

/// Отформатированное значение ячейки с подсветкой поиска
pub fn cell_view(display: CellDisplay, filter: &str) -> AnyView {
    match display {
        CellDisplay::Text(text) => highlight_matches(&text, filter),
        CellDisplay::Badge { text, color } => {
            let content = highlight_matches(&text, filter);
            view! { <StatusBadge color=color>{content}</StatusBadge> }.into_any()
        }
        CellDisplay::Missing => view! { <span class="cell--missing">{MISSING_VALUE}</span> }.into_any(),
    }
}

fn appearance(action: &ActionSpec) -> ButtonAppearance {
    match action.variant.as_deref() {
        Some("primary") => ButtonAppearance::Primary,
        Some("subtle") => ButtonAppearance::Subtle,
        Some("transparent") => ButtonAppearance::Transparent,
        _ => ButtonAppearance::Secondary,
    }
}

/// Кнопки действий, доступных текущей роли
#[component]
pub fn ActionButtons(
    page: PageHandle,
    actions: Vec<ActionSpec>,
    #[prop(into, default = None)]
    record_id: Option<String>,
    #[prop(optional)]
    compact: bool,
) -> impl IntoView {
    let page = StoredValue::new(page);
    let actions = StoredValue::new(actions);
    let record_id = StoredValue::new(record_id);

    move || {
        let role = page.with_value(|p| p.role);
        role.track();
        let visible: Vec<(ActionSpec, String)> = page.with_value(|p| {
            record_id.with_value(|rid| {
                p.with_action_context(rid.as_deref(), |ctx| {
                    actions.with_value(|list| {
                        list.iter()
                            .filter(|a| is_visible(a, ctx))
                            .map(|a| (a.clone(), label(a, ctx)))
                            .collect()
                    })
                })
            })
        });

        visible
            .into_iter()
            .map(|(action, text)| {
                let tooltip = action.tooltip.clone().unwrap_or_else(|| text.clone());
                let icon_name = action.icon.clone();
                let look = appearance(&action);
                let show_text = !compact || action.icon.is_none();
                let on_click = move |ev: leptos::ev::MouseEvent| {
                    ev.stop_propagation();
                    let rid = record_id.get_value();
                    run_action(&page.get_value(), &action, rid.as_deref());
                };
                view! {
                    <span title=tooltip>
                        <Button
                            size=if compact { ButtonSize::Small } else { ButtonSize::Medium }
                            appearance=look
                            on_click=on_click
                        >
                            {icon_name.map(|name| icon(&name))}
                            {show_text.then_some(text)}
                        </Button>
                    </span>
                }
            })
            .collect_view()
    }
}
