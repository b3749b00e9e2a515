use super::input::FieldLabel;
use leptos::prelude::*;

/// Многострочное поле; `max_length` ограничивает ввод в браузере
#[component]
pub fn Textarea(
    #[prop(optional, into)]
    label: Option<String>,
    #[prop(into)]
    value: Signal<String>,
    on_input: Callback<String>,
    #[prop(optional, into)]
    placeholder: Option<String>,
    #[prop(optional)]
    required: bool,
    #[prop(into, default = None)]
    max_length: Option<usize>,
    #[prop(optional, into)]
    rows: Option<u32>,
    #[prop(optional, into)]
    id: String,
    #[prop(optional, into)]
    invalid: Signal<bool>,
) -> impl IntoView {
    let counter = max_length.map(|max| {
        view! {
            <div class="form__counter">
                {move || format!("{} / {}", value.get().chars().count(), max)}
            </div>
        }
    });

    view! {
        <div class="form__group">
            {label.map(|l| view! { <FieldLabel text=l for_id=id.clone() required=required /> })}
            <textarea
                id=id.clone()
                class="form__textarea"
                class:form__input--invalid=move || invalid.get()
                placeholder=placeholder.unwrap_or_default()
                maxlength=max_length.map(|m| m.to_string())
                rows=rows.unwrap_or(3)
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            ></textarea>
            {counter}
        </div>
    }
}
