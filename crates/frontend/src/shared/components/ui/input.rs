use leptos::prelude::*;

/// Подпись поля формы; обязательные поля помечаются звёздочкой
#[component]
pub fn FieldLabel(
    #[prop(into)]
    text: String,
    #[prop(into)]
    for_id: String,
    #[prop(optional)]
    required: bool,
) -> impl IntoView {
    view! {
        <label class="form__label" for=for_id>
            {text}
            {required.then(|| view! { <span class="form__required">" *"</span> })}
        </label>
    }
}

/// Однострочное поле ввода: text, number, date
#[component]
pub fn Input(
    #[prop(optional, into)]
    label: Option<String>,
    #[prop(into)]
    value: Signal<String>,
    on_input: Callback<String>,
    #[prop(optional, into)]
    placeholder: Option<String>,
    /// "text" (по умолчанию), "number", "date", "email"
    #[prop(optional, into)]
    input_type: Option<String>,
    #[prop(optional)]
    required: bool,
    #[prop(optional, into)]
    id: String,
    /// Поле не прошло проверку при отправке
    #[prop(optional, into)]
    invalid: Signal<bool>,
) -> impl IntoView {
    let input_t = input_type.unwrap_or_else(|| "text".to_string());

    view! {
        <div class="form__group">
            {label.map(|l| view! { <FieldLabel text=l for_id=id.clone() required=required /> })}
            <input
                id=id.clone()
                class="form__input"
                class:form__input--invalid=move || invalid.get()
                type=input_t
                prop:value=move || value.get()
                placeholder=placeholder.unwrap_or_default()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
        </div>
    }
}
