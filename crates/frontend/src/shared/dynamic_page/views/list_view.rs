//! Табличное представление: поиск, сводка по статусам, сортировка,
//! выбор строк, пагинация, инлайн-редактирование и переключение
//! таблица/канбан.

use super::effects::{delete_selected, finish_inline_edit, reload_rows};
use super::kanban_view::KanbanBoard;
use super::parts::{cell_view, ActionButtons};
use super::status_cards::StatusCards;
use super::PageHandle;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::table::{
    CheckboxState, SortableHeaderCell, TableCellCheckbox, TableHeaderCheckbox,
};
use crate::shared::dynamic_page::actions::is_visible;
use crate::shared::dynamic_page::formatter::format_cell;
use crate::shared::icons::icon;
use crate::shared::list_utils::SearchInput;
use contracts::shared::data_row::{CellValue, DataRow};
use contracts::shared::page_config::{
    ActionEffect, ActionSpec, ColumnSpec, ColumnType, DisplayMode, FieldOption,
};
use leptos::prelude::*;
use thaw::*;

const DEFAULT_EMPTY_MESSAGE: &str = "Нет данных";

/// Редактор ячейки строки в режиме инлайн-редактирования
fn cell_editor(page: &PageHandle, row: &DataRow, id: &str, column: &ColumnSpec) -> AnyView {
    let store = page.store;
    let id = id.to_string();
    let key = column.key.clone();
    let current = row.get(&column.key).map(|v| v.as_plain_string()).unwrap_or_default();
    let commit = move |raw: String| {
        store.update(|s| {
            s.update_cell(&id, &key, CellValue::from_import_text(&raw));
        });
    };

    if column.column_type == ColumnType::Select && !column.options.is_empty() {
        let options: Vec<FieldOption> = column.options.clone();
        return view! {
            <select class="table__cell-editor" on:change=move |ev| commit(event_target_value(&ev))>
                {options.into_iter().map(|o| {
                    let selected = o.value == current;
                    view! { <option value=o.value.clone() selected=selected>{o.label.clone()}</option> }
                }).collect_view()}
            </select>
        }
        .into_any();
    }

    let input_type = match column.column_type {
        ColumnType::Number | ColumnType::Currency => "number",
        ColumnType::Date => "date",
        _ => "text",
    };
    view! {
        <input
            class="table__cell-editor"
            type=input_type
            prop:value=current
            on:change=move |ev| commit(event_target_value(&ev))
        />
    }
    .into_any()
}

#[component]
fn ListRow(page: PageHandle, row: DataRow, columns: Vec<ColumnSpec>, row_actions: Vec<ActionSpec>) -> impl IntoView {
    let store = page.store;
    let row_key = page.config.row_key.clone();
    let id = row.id(&row_key).unwrap_or_default();
    let selectable = page.view.config.row_selection;
    let status_colors = page.view.config.status_colors.clone();
    let filter = store.with_untracked(|s| s.state.filter.clone());
    let editing = store.with_untracked(|s| s.state.editing_row.as_deref() == Some(id.as_str()));
    let trailing_actions =
        !row_actions.is_empty() && !columns.iter().any(|c| c.column_type == ColumnType::Action);

    let id_for_check = id.clone();
    let id_for_select = id.clone();
    let checked = Signal::derive(move || store.with(|s| s.state.is_selected(&id_for_check)));
    let on_check = Callback::new(move |value: bool| {
        store.update(|s| s.state.set_selected(&id_for_select, value))
    });

    let id_for_open = id.clone();
    let page_for_open = page.clone();
    let open_record = move |_| {
        if editing || id_for_open.is_empty() || !page_for_open.has_view("view") {
            return;
        }
        page_for_open.nav.on_record_select("view", &id_for_open);
    };

    let actions_cell = {
        let page = page.clone();
        let id = id.clone();
        move || {
            if editing {
                let page = page.clone();
                view! {
                    <Button
                        size=ButtonSize::Small
                        appearance=ButtonAppearance::Primary
                        on_click=move |ev: leptos::ev::MouseEvent| {
                            ev.stop_propagation();
                            finish_inline_edit(&page);
                        }
                    >
                        {icon("save")}
                        "Готово"
                    </Button>
                }
                .into_any()
            } else {
                view! {
                    <ActionButtons
                        page=page.clone()
                        actions=row_actions.clone()
                        record_id=id.clone()
                        compact=true
                    />
                }
                .into_any()
            }
        }
    };

    let cells = columns
        .iter()
        .map(|column| {
            let content = if column.column_type == ColumnType::Action {
                actions_cell()
            } else if editing && column.editable {
                cell_editor(&page, &row, &id, column)
            } else {
                let display = format_cell(row.get(&column.key), column.column_type, &status_colors);
                cell_view(display, &filter)
            };
            view! {
                <TableCell>
                    <TableCellLayout truncate=true>{content}</TableCellLayout>
                </TableCell>
            }
        })
        .collect_view();

    view! {
        <TableRow class:table__row--editing=editing on:click=open_record attr:style="cursor: pointer;">
            {selectable.then(|| view! { <TableCellCheckbox checked=checked on_change=on_check /> })}
            {cells}
            {trailing_actions.then(|| view! {
                <TableCell class="table__actions-cell">{actions_cell()}</TableCell>
            })}
        </TableRow>
    }
}

#[component]
pub fn ListView(page: PageHandle) -> impl IntoView {
    let store = page.store;
    let config = page.view.config.clone();
    let columns: Vec<ColumnSpec> = config.columns.clone();
    let row_actions: Vec<ActionSpec> = config.row_actions().cloned().collect();
    let page_actions: Vec<ActionSpec> = config.page_actions().cloned().collect();
    let has_action_column = columns.iter().any(|c| c.column_type == ColumnType::Action);
    let show_actions_column = !has_action_column && !row_actions.is_empty();
    let selectable = config.row_selection;
    let kanban_config = config.kanban_config.clone();
    let empty_message = config
        .empty_state
        .table
        .clone()
        .unwrap_or_else(|| DEFAULT_EMPTY_MESSAGE.to_string());
    let column_count = columns.len() + usize::from(selectable) + usize::from(show_actions_column);

    let bulk_delete = {
        let role = page.role;
        let delete_actions: Vec<ActionSpec> = row_actions
            .iter()
            .filter(|a| a.effect == ActionEffect::Delete)
            .cloned()
            .collect();
        let page = page.clone();
        Signal::derive(move || {
            role.track();
            page.with_action_context(None, |ctx| delete_actions.iter().any(|a| is_visible(a, ctx)))
        })
    };

    let table_page = Memo::new(move |_| store.with(|s| s.engine().page(&s.state)));
    let filter = Signal::derive(move || store.with(|s| s.state.filter.clone()));
    let sort = Signal::derive(move || store.with(|s| s.state.sort.clone()));
    let display_mode = Signal::derive(move || store.with(|s| s.state.display_mode));
    let editing_row = Memo::new(move |_| store.with(|s| s.state.editing_row.clone()));
    let selected_count = Signal::derive(move || store.with(|s| s.state.selected_ids().len()));
    let header_state = Signal::derive(move || {
        store.with(|s| {
            let engine = s.engine();
            CheckboxState::from_flags(
                engine.all_visible_selected(&s.state),
                engine.any_visible_selected(&s.state),
            )
        })
    });

    let on_filter = Callback::new(move |value: String| store.update(|s| s.state.set_filter(value)));
    let on_sort = Callback::new(move |key: String| store.update(|s| s.state.toggle_sort(&key)));
    let on_select_page = Callback::new(move |checked: bool| store.update(|s| s.select_all_visible(checked)));
    let on_page = Callback::new(move |p: usize| store.update(|s| s.state.set_page(p)));
    let on_page_size = Callback::new(move |size: usize| store.update(|s| s.state.set_page_size(size)));

    let toolbar = {
        let page = page.clone();
        let has_kanban = kanban_config.is_some();
        let is_api = page.is_api();
        view! {
            <div class="page__toolbar">
                <SearchInput
                    value=filter
                    on_change=on_filter
                    placeholder=config.search_placeholder.clone().unwrap_or_default()
                />
                {has_kanban.then(|| view! {
                    <div class="display-toggle">
                        <button
                            class="display-toggle__btn"
                            class:display-toggle__btn--active=move || display_mode.get() == DisplayMode::Table
                            title="Таблица"
                            on:click=move |_| store.update(|s| s.state.set_display_mode(DisplayMode::Table))
                        >
                            {icon("table")}
                        </button>
                        <button
                            class="display-toggle__btn"
                            class:display-toggle__btn--active=move || display_mode.get() == DisplayMode::Kanban
                            title="Канбан"
                            on:click=move |_| store.update(|s| s.state.set_display_mode(DisplayMode::Kanban))
                        >
                            {icon("kanban")}
                        </button>
                    </div>
                })}
                {is_api.then(|| {
                    let page = page.clone();
                    view! {
                        <button class="display-toggle__btn" title="Обновить" on:click=move |_| reload_rows(&page)>
                            {icon("refresh")}
                        </button>
                    }
                })}
                <div class="page__actions">
                    <ActionButtons page=page actions=page_actions />
                </div>
            </div>
        }
    };

    let bulk_bar = {
        let page = page.clone();
        move || {
            let count = selected_count.get();
            if count == 0 {
                return ().into_any();
            }
            let filtered = table_page.with(|p| p.filtered_count);
            let page = page.clone();
            view! {
                <div class="bulk-bar">
                    <span class="bulk-bar__count">{format!("Выбрано: {}", count)}</span>
                    {(count < filtered).then(|| view! {
                        <a
                            href="#"
                            class="bulk-bar__link"
                            on:click=move |ev| {
                                ev.prevent_default();
                                store.update(|s| s.select_all_filtered(true));
                            }
                        >
                            {format!("Выбрать все найденные ({})", filtered)}
                        </a>
                    })}
                    <a
                        href="#"
                        class="bulk-bar__link"
                        on:click=move |ev| {
                            ev.prevent_default();
                            store.update(|s| s.state.clear_selection());
                        }
                    >
                        "Снять выбор"
                    </a>
                    <Show when=move || bulk_delete.get()>
                        {
                            let page = page.clone();
                            view! {
                                <Button
                                    size=ButtonSize::Small
                                    appearance=ButtonAppearance::Secondary
                                    on_click=move |_| delete_selected(&page)
                                >
                                    {icon("delete")}
                                    "Удалить выбранные"
                                </Button>
                            }
                        }
                    </Show>
                </div>
            }
            .into_any()
        }
    };

    let header = columns
        .iter()
        .map(|column| {
            if column.column_type == ColumnType::Action {
                let title = column.display_label().to_string();
                view! {
                    <TableHeaderCell resizable=false min_width=80.0>
                        {title}
                    </TableHeaderCell>
                }
                .into_any()
            } else {
                view! {
                    <SortableHeaderCell
                        label=column.display_label().to_string()
                        sort_key=column.key.clone()
                        sort=sort
                        on_sort=on_sort
                        min_width=column.width.map(f64::from).unwrap_or(100.0)
                        sortable=column.sortable
                    />
                }
                .into_any()
            }
        })
        .collect_view();

    let table = {
        let page = page.clone();
        let columns = columns.clone();
        view! {
            <div class="table-wrapper">
                <Table>
                    <TableHeader>
                        <TableRow>
                            {selectable.then(|| view! {
                                <TableHeaderCheckbox state=header_state on_change=on_select_page />
                            })}
                            {header}
                            {show_actions_column.then(|| view! {
                                <TableHeaderCell resizable=false min_width=80.0>"Действия"</TableHeaderCell>
                            })}
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || {
                            // подсветка и режим редактирования меняют строки без смены страницы
                            filter.track();
                            editing_row.track();
                            let rows = table_page.with(|p| p.rows.clone());
                            if rows.is_empty() {
                                let empty_message = empty_message.clone();
                                return view! {
                                    <TableRow>
                                        <TableCell attr:colspan=column_count.to_string()>
                                            <div class="table__empty">{empty_message}</div>
                                        </TableCell>
                                    </TableRow>
                                }
                                .into_any();
                            }
                            rows.into_iter()
                                .map(|row| view! {
                                    <ListRow
                                        page=page.clone()
                                        row=row
                                        columns=columns.clone()
                                        row_actions=row_actions.clone()
                                    />
                                })
                                .collect_view()
                                .into_any()
                        }}
                    </TableBody>
                </Table>
            </div>
            <PaginationControls
                current_page=Signal::derive(move || table_page.with(|p| p.page))
                total_pages=Signal::derive(move || table_page.with(|p| p.total_pages))
                total_count=Signal::derive(move || table_page.with(|p| p.filtered_count))
                page_size=Signal::derive(move || store.with(|s| s.state.page_size))
                on_page_change=on_page
                on_page_size_change=on_page_size
                page_size_options=config.page_size_options.clone()
            />
        }
        .into_any()
    };

    let board = kanban_config.map(|kanban| {
        let page = page.clone();
        view! { <KanbanBoard page=page config=kanban /> }.into_any()
    });

    view! {
        <div class="list-view">
            {toolbar}
            {config.status_summary.clone().map(|summary| view! {
                <StatusCards store=store summary=summary />
            })}
            {bulk_bar}
            <div class="list-view__table" class:hidden=move || display_mode.get() == DisplayMode::Kanban>
                {table}
            </div>
            <div class="list-view__board" class:hidden=move || display_mode.get() != DisplayMode::Kanban>
                {board}
            </div>
        </div>
    }
}
