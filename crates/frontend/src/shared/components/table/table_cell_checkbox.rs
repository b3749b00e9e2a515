//! Чекбокс выбора строки в ячейке таблицы

use leptos::prelude::*;
use thaw::*;

/// Клик по чекбоксу не доходит до строки, поэтому не открывает запись
#[component]
pub fn TableCellCheckbox(
    #[prop(into)]
    checked: Signal<bool>,
    on_change: Callback<bool>,
) -> impl IntoView {
    view! {
        <TableCell class="fixed-checkbox-column" on:click=|e| e.stop_propagation()>
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=checked
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </TableCell>
    }
}
