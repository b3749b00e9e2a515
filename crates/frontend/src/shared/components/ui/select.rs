use super::input::FieldLabel;
use leptos::prelude::*;

/// Выпадающий список; первым идёт пустой вариант с подсказкой
#[component]
pub fn Select(
    #[prop(optional, into)]
    label: Option<String>,
    #[prop(into)]
    value: Signal<String>,
    on_change: Callback<String>,
    /// Пары (значение, подпись)
    options: Vec<(String, String)>,
    #[prop(optional, into)]
    placeholder: Option<String>,
    #[prop(optional)]
    required: bool,
    #[prop(optional, into)]
    id: String,
    #[prop(optional, into)]
    invalid: Signal<bool>,
) -> impl IntoView {
    let placeholder = placeholder.unwrap_or_else(|| "Выберите...".to_string());

    view! {
        <div class="form__group">
            {label.map(|l| view! { <FieldLabel text=l for_id=id.clone() required=required /> })}
            <select
                id=id.clone()
                class="form__select"
                class:form__input--invalid=move || invalid.get()
                prop:value=move || value.get()
                on:change=move |ev| on_change.run(event_target_value(&ev))
            >
                <option value="" selected=move || value.get().is_empty()>{placeholder}</option>
                {options.into_iter().map(|(val, text)| {
                    let val_for_selected = val.clone();
                    view! {
                        <option value=val selected=move || value.get() == val_for_selected>
                            {text}
                        </option>
                    }
                }).collect_view()}
            </select>
        </div>
    }
}
