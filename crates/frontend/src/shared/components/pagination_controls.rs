use crate::shared::icons::icon;
use leptos::prelude::*;

/// Размеры страницы, если конфигурация их не задаёт
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];

/// Варианты выбора размера страницы; текущий размер всегда среди них
pub fn page_size_choices(configured: &[usize], current: usize) -> Vec<usize> {
    let mut choices: Vec<usize> = if configured.is_empty() {
        DEFAULT_PAGE_SIZE_OPTIONS.to_vec()
    } else {
        configured.iter().copied().filter(|s| *s > 0).collect()
    };
    if !choices.contains(&current) {
        choices.push(current);
    }
    choices.sort_unstable();
    choices.dedup();
    choices
}

/// Переключение страниц и выбор размера страницы
#[component]
pub fn PaginationControls(
    /// Текущая страница (с нуля)
    #[prop(into)]
    current_page: Signal<usize>,
    #[prop(into)]
    total_pages: Signal<usize>,
    /// Число строк после фильтров
    #[prop(into)]
    total_count: Signal<usize>,
    #[prop(into)]
    page_size: Signal<usize>,
    on_page_change: Callback<usize>,
    on_page_size_change: Callback<usize>,
    #[prop(optional)]
    page_size_options: Vec<usize>,
) -> impl IntoView {
    let options = StoredValue::new(page_size_options);
    let choices = move || options.with_value(|o| page_size_choices(o, page_size.get()));

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(0)
                disabled=move || current_page.get() == 0
                title="Первая страница"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page.get();
                    if page > 0 {
                        on_page_change.run(page - 1);
                    }
                }
                disabled=move || current_page.get() == 0
                title="Предыдущая страница"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || {
                    let page = current_page.get();
                    let total = total_pages.get().max(1);
                    let count = total_count.get();
                    format!("{} / {} ({})", page + 1, total, count)
                }}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page.get();
                    if page + 1 < total_pages.get() {
                        on_page_change.run(page + 1);
                    }
                }
                disabled=move || current_page.get() + 1 >= total_pages.get()
                title="Следующая страница"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let total = total_pages.get();
                    if total > 0 {
                        on_page_change.run(total - 1);
                    }
                }
                disabled=move || current_page.get() + 1 >= total_pages.get()
                title="Последняя страница"
            >
                {icon("chevrons-right")}
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    if let Ok(size) = event_target_value(&ev).parse::<usize>() {
                        on_page_size_change.run(size);
                    }
                }
                prop:value=move || page_size.get().to_string()
            >
                {move || choices().into_iter().map(|size| {
                    view! {
                        <option value=size.to_string() selected=move || page_size.get() == size>
                            {size.to_string()}
                        </option>
                    }
                }).collect_view()}
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_size_is_always_offered() {
        assert_eq!(page_size_choices(&[], 10), vec![5, 10, 20, 50]);
        assert_eq!(page_size_choices(&[], 7), vec![5, 7, 10, 20, 50]);
        assert_eq!(page_size_choices(&[25, 0, 100], 25), vec![25, 100]);
    }
}
