//! Сортируемая ячейка заголовка таблицы
//!
//! ```ignore
//! <SortableHeaderCell
//!     label="Сумма"
//!     sort_key="totalAmount"
//!     sort=Signal::derive(move || store.with(|s| s.state.sort.clone()))
//!     on_sort=Callback::new(move |key| store.update(|s| s.state.toggle_sort(&key)))
//! />
//! ```

use crate::shared::dynamic_page::view_state::{SortDirection, SortState};
use crate::shared::list_utils::sort_indicator;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn SortableHeaderCell(
    #[prop(into)]
    label: String,
    #[prop(into)]
    sort_key: String,
    /// Текущая сортировка страницы
    #[prop(into)]
    sort: Signal<Option<SortState>>,
    on_sort: Callback<String>,
    #[prop(optional, default = 100.0)]
    min_width: f64,
    /// Колонка без сортировки выводит только подпись
    #[prop(optional, default = true)]
    sortable: bool,
) -> impl IntoView {
    let key_for_click = sort_key.clone();
    let key_for_indicator = sort_key;

    let indicator = move || {
        sort.with(|s| match s {
            Some(s) if s.key == key_for_indicator => {
                sort_indicator(true, s.direction == SortDirection::Ascending)
            }
            _ => sort_indicator(false, true),
        })
    };

    view! {
        <TableHeaderCell resizable=false min_width=min_width>
            {if sortable {
                view! {
                    <div
                        class="table__sortable-header"
                        style="cursor: pointer;"
                        on:click=move |_| on_sort.run(key_for_click.clone())
                    >
                        {label}
                        <span class="table__sort-indicator">{indicator}</span>
                    </div>
                }.into_any()
            } else {
                view! { <div>{label}</div> }.into_any()
            }}
        </TableHeaderCell>
    }
}
