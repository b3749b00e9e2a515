//! Чекбокс "выбрать все" в заголовке таблицы.
//!
//! Состояние (нет / все / частично) считает вызывающая сторона
//! по строкам текущей страницы.

use leptos::prelude::*;
use thaw::*;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckboxState {
    Unchecked,
    Checked,
    Indeterminate,
}

impl CheckboxState {
    pub fn from_flags(all: bool, any: bool) -> Self {
        match (all, any) {
            (true, _) => CheckboxState::Checked,
            (false, true) => CheckboxState::Indeterminate,
            (false, false) => CheckboxState::Unchecked,
        }
    }
}

#[component]
pub fn TableHeaderCheckbox(
    #[prop(into)]
    state: Signal<CheckboxState>,
    /// true = выбрать все, false = снять все
    on_change: Callback<bool>,
) -> impl IntoView {
    let checkbox_ref = NodeRef::<leptos::html::Input>::new();

    // indeterminate доступно только через DOM-свойство
    Effect::new(move |_| {
        let is_indeterminate = matches!(state.get(), CheckboxState::Indeterminate);
        if let Some(input) = checkbox_ref.get() {
            if let Some(input_el) = input.dyn_ref::<web_sys::HtmlInputElement>() {
                input_el.set_indeterminate(is_indeterminate);
            }
        }
    });

    view! {
        <TableHeaderCell resizable=false class="fixed-checkbox-column">
            <input
                node_ref=checkbox_ref
                type="checkbox"
                class="table__checkbox"
                prop:checked=move || matches!(state.get(), CheckboxState::Checked)
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </TableHeaderCell>
    }
}
