/// Утилиты списков: подсветка найденного текста, поле поиска, индикатор сортировки
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Задержка применения поискового запроса
const SEARCH_DEBOUNCE_MS: i32 = 300;

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Байтовые диапазоны вхождений фильтра в текст без учёта регистра
pub fn highlight_ranges(text: &str, filter: &str) -> Vec<(usize, usize)> {
    let needle: Vec<char> = filter.chars().map(fold).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let chars: Vec<(usize, char)> = text.char_indices().map(|(i, c)| (i, fold(c))).collect();
    let mut ranges = Vec::new();
    let mut pos = 0;
    while pos + needle.len() <= chars.len() {
        let window = &chars[pos..pos + needle.len()];
        if window.iter().map(|(_, c)| *c).eq(needle.iter().copied()) {
            let start = window[0].0;
            let end = chars
                .get(pos + needle.len())
                .map(|(i, _)| *i)
                .unwrap_or(text.len());
            ranges.push((start, end));
            pos += needle.len();
        } else {
            pos += 1;
        }
    }
    ranges
}

/// Подсветка совпадений в тексте (case-insensitive)
pub fn highlight_matches(text: &str, filter: &str) -> AnyView {
    let ranges = highlight_ranges(text, filter);
    if ranges.is_empty() {
        return view! { <span>{text.to_string()}</span> }.into_any();
    }

    let mut parts: Vec<AnyView> = Vec::new();
    let mut last_pos = 0;
    for (start, end) in ranges {
        if start > last_pos {
            parts.push(view! { <span>{text[last_pos..start].to_string()}</span> }.into_any());
        }
        parts.push(
            view! { <mark class="search-highlight">{text[start..end].to_string()}</mark> }.into_any(),
        );
        last_pos = end;
    }
    if last_pos < text.len() {
        parts.push(view! { <span>{text[last_pos..].to_string()}</span> }.into_any());
    }

    view! { <>{parts}</> }.into_any()
}

/// Компонент поиска с debounce и кнопкой очистки
#[component]
pub fn SearchInput(
    /// Текущее значение фильтра
    #[prop(into)]
    value: Signal<String>,
    /// Callback для обновления значения фильтра
    #[prop(into)]
    on_change: Callback<String>,
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Поиск...".to_string()
    } else {
        placeholder
    };

    let (input_value, set_input_value) = signal(value.get_untracked());
    let debounce_timeout = StoredValue::new(None::<i32>);

    let handle_input_change = move |new_value: String| {
        set_input_value.set(new_value.clone());

        let Some(window) = web_sys::window() else {
            on_change.run(new_value);
            return;
        };
        if let Some(timeout_id) = debounce_timeout.get_value() {
            window.clear_timeout_with_handle(timeout_id);
        }

        let closure = wasm_bindgen::closure::Closure::once(move || {
            on_change.run(new_value);
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref::<js_sys::Function>(),
            SEARCH_DEBOUNCE_MS,
        ) {
            Ok(timeout_id) => {
                closure.forget();
                debounce_timeout.set_value(Some(timeout_id));
            }
            Err(e) => log::warn!("setTimeout failed: {:?}", e),
        }
    };

    let is_filter_active = move || !value.get().is_empty();

    let clear_filter = move |_| {
        set_input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input" style="position: relative; display: inline-flex; align-items: center;">
            <input
                type="text"
                placeholder=placeholder
                class="search-input__field"
                class:search-input__field--active=is_filter_active
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input_change(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button
                    class="search-input__clear"
                    on:click=clear_filter
                    title="Очистить"
                >
                    {crate::shared::icons::icon("x")}
                </button>
            </Show>
        </div>
    }
}

/// Индикатор сортировки для заголовка
pub fn sort_indicator(active: bool, ascending: bool) -> &'static str {
    match (active, ascending) {
        (true, true) => " ▲",
        (true, false) => " ▼",
        (false, _) => " ⇅",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_case_insensitive() {
        assert_eq!(highlight_ranges("Acme acme", "ACME"), vec![(0, 4), (5, 9)]);
        assert!(highlight_ranges("Acme", "").is_empty());
        assert!(highlight_ranges("Acme", "zz").is_empty());
    }

    #[test]
    fn ranges_keep_surrounding_spaces_of_filter() {
        assert_eq!(highlight_ranges("Acme Corp", "acme "), vec![(0, 5)]);
        assert!(highlight_ranges("Acme", "acme ").is_empty());
    }

    #[test]
    fn ranges_respect_multibyte_text() {
        let text = "Заказ ЗАКАЗ";
        let ranges = highlight_ranges(text, "заказ");
        assert_eq!(ranges.len(), 2);
        assert_eq!(&text[ranges[1].0..ranges[1].1], "ЗАКАЗ");
    }

    #[test]
    fn indicator_marks_active_column() {
        assert_eq!(sort_indicator(true, true), " ▲");
        assert_eq!(sort_indicator(true, false), " ▼");
        assert_eq!(sort_indicator(false, true), " ⇅");
    }
}
