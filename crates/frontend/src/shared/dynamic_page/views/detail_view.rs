use super::parts::{cell_view, ActionButtons};
use super::PageHandle;
use crate::shared::dynamic_page::actions::{detail_actions, DetailAction};
use crate::shared::dynamic_page::formatter::format_cell;
use crate::shared::icons::icon;
use contracts::shared::data_row::DataRow;
use contracts::shared::page_config::{ColumnSpec, ColumnType};
use leptos::prelude::*;
use thaw::*;

/// Поля карточки: колонки конфигурации, иначе все ключи записи
fn detail_fields(columns: &[ColumnSpec], row: &DataRow) -> Vec<ColumnSpec> {
    if !columns.is_empty() {
        return columns
            .iter()
            .filter(|c| c.column_type != ColumnType::Action)
            .cloned()
            .collect();
    }
    row.keys()
        .map(|key| ColumnSpec {
            key: key.clone(),
            label: key.clone(),
            column_type: ColumnType::Text,
            width: None,
            span: None,
            editable: false,
            sortable: true,
            options: Vec::new(),
        })
        .collect()
}

#[component]
pub fn DetailView(page: PageHandle) -> impl IntoView {
    let store = page.store;
    let record_id = page.record_id.clone();
    let columns = page.view.config.columns.clone();
    let status_colors = page.view.config.status_colors.clone();
    let nav = page.nav;

    let id_for_lookup = record_id.clone();
    let record = Memo::new(move |_| {
        let id = id_for_lookup.as_deref()?;
        store.with(|s| s.row(id).cloned())
    });

    let standard = page.with_action_context(record_id.as_deref(), detail_actions);
    let buttons = standard
        .into_iter()
        .map(|action| match action {
            DetailAction::Back(path) => view! {
                <Button appearance=ButtonAppearance::Subtle on_click=move |_| nav.navigate(&path)>
                    {icon("arrow-left")}
                    "Назад"
                </Button>
            }
            .into_any(),
            DetailAction::Edit(path) => view! {
                <Button appearance=ButtonAppearance::Primary on_click=move |_| nav.navigate(&path)>
                    {icon("edit")}
                    "Изменить"
                </Button>
            }
            .into_any(),
        })
        .collect_view();

    let configured = page.view.config.actions.clone();
    let shown_id = record_id.clone().unwrap_or_default();

    view! {
        <div class="detail-view">
            <div class="detail-view__actions">
                {buttons}
                <ActionButtons page=page.clone() actions=configured record_id=record_id />
            </div>
            {move || match record.get() {
                None => view! {
                    <div class="page-state">
                        {format!("Запись '{}' не найдена", shown_id)}
                    </div>
                }
                .into_any(),
                Some(row) => {
                    let fields = detail_fields(&columns, &row);
                    view! {
                        <div class="detail-view__grid">
                            {fields.into_iter().map(|field| {
                                let display = format_cell(row.get(&field.key), field.column_type, &status_colors);
                                view! {
                                    <div class="detail-view__item">
                                        <div class="detail-view__label">{field.display_label().to_string()}</div>
                                        <div class="detail-view__value">{cell_view(display, "")}</div>
                                    </div>
                                }
                            }).collect_view()}
                        </div>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
