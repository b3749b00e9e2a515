use super::parts::{cell_view, ActionButtons};
use super::PageHandle;
use crate::shared::components::ui::StatusBadge;
use crate::shared::dynamic_page::formatter::format_cell;
use crate::shared::dynamic_page::kanban::{card_title, group_rows};
use crate::shared::list_utils::{highlight_matches, SearchInput};
use contracts::shared::data_row::DataRow;
use contracts::shared::page_config::KanbanConfig;
use leptos::prelude::*;

const DEFAULT_EMPTY_MESSAGE: &str = "Нет записей";

/// Доска: колонки по значению `groupKey` отфильтрованных строк
#[component]
pub fn KanbanBoard(page: PageHandle, config: KanbanConfig) -> impl IntoView {
    let store = page.store;
    let row_key = page.config.row_key.clone();
    let empty_message = page
        .view
        .config
        .empty_state
        .kanban
        .clone()
        .unwrap_or_else(|| DEFAULT_EMPTY_MESSAGE.to_string());
    let config = StoredValue::new(config);
    let page = StoredValue::new(page);
    let row_key = StoredValue::new(row_key);

    let columns = Memo::new(move |_| {
        store.with(|s| {
            let rows = s.engine().filtered_rows(&s.state);
            config.with_value(|c| group_rows(&rows, c))
        })
    });
    let filter = Memo::new(move |_| store.with(|s| s.state.filter.clone()));

    let render_card = move |row: DataRow| {
        let id = row_key.with_value(|k| row.id(k)).unwrap_or_default();
        let title = config.with_value(|c| row_key.with_value(|k| card_title(&row, c, k)));
        let fields = config.with_value(|c| c.card_fields.clone());
        let card_actions = config.with_value(|c| c.card_actions.clone());
        let status_colors = page.with_value(|p| p.view.config.status_colors.clone());
        let id_for_click = id.clone();

        view! {
            <div
                class="kanban-card"
                on:click=move |_| {
                    let p = page.get_value();
                    if p.has_view("view") && !id_for_click.is_empty() {
                        p.nav.on_record_select("view", &id_for_click);
                    }
                }
            >
                <div class="kanban-card__title">{highlight_matches(&title, &filter.get_untracked())}</div>
                {fields.into_iter().map(|field| {
                    let display = format_cell(row.get(&field.key), field.column_type, &status_colors);
                    view! {
                        <div class="kanban-card__field">
                            <span class="kanban-card__label">{field.display_label().to_string()}</span>
                            <span class="kanban-card__value">{cell_view(display, &filter.get_untracked())}</span>
                        </div>
                    }
                }).collect_view()}
                {(!card_actions.is_empty()).then(|| view! {
                    <div class="kanban-card__actions">
                        <ActionButtons
                            page=page.get_value()
                            actions=card_actions
                            record_id=id.clone()
                            compact=true
                        />
                    </div>
                })}
            </div>
        }
    };

    view! {
        {move || {
            let columns = columns.get();
            if columns.iter().all(|c| c.rows.is_empty()) {
                return view! { <div class="kanban-empty">{empty_message.clone()}</div> }.into_any();
            }
            view! {
                <div class="kanban-board">
                    {columns.into_iter().map(|column| {
                        let color = column.color.clone().unwrap_or_else(|| "informative".to_string());
                        let count = column.count();
                        let other = column.is_other();
                        view! {
                            <div class="kanban-column" class:kanban-column--other=other>
                                <div class="kanban-column__header">
                                    <span class="kanban-column__title">{column.label.clone()}</span>
                                    <StatusBadge color=color>{count}</StatusBadge>
                                </div>
                                <div class="kanban-column__cards">
                                    {if column.rows.is_empty() {
                                        view! { <div class="kanban-column__empty">"—"</div> }.into_any()
                                    } else {
                                        column.rows.into_iter().map(render_card).collect_view().into_any()
                                    }}
                                </div>
                            </div>
                        }
                    }).collect_view()}
                </div>
            }
            .into_any()
        }}
    }
}

#[component]
pub fn KanbanView(page: PageHandle) -> impl IntoView {
    let store = page.store;
    let placeholder = page.view.config.search_placeholder.clone().unwrap_or_default();
    let filter = Signal::derive(move || store.with(|s| s.state.filter.clone()));
    let on_filter = Callback::new(move |value: String| store.update(|s| s.state.set_filter(value)));

    let board = match page.view.config.kanban_config.clone() {
        Some(config) => view! { <KanbanBoard page=page.clone() config=config /> }.into_any(),
        None => view! {
            <div class="page-state page-state--error">"Доска не настроена: нет kanbanConfig"</div>
        }
        .into_any(),
    };

    view! {
        <div class="page__toolbar">
            <SearchInput value=filter on_change=on_filter placeholder=placeholder />
        </div>
        {board}
    }
}
