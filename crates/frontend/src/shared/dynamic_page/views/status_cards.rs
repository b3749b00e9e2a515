use crate::shared::dynamic_page::formatter::format_money;
use crate::shared::dynamic_page::page_store::PageStore;
use crate::shared::dynamic_page::status_summary::summarize;
use contracts::shared::page_config::StatusSummary;
use leptos::prelude::*;

/// Карточки сводки по статусам; клик по карточке фильтрует таблицу
#[component]
pub fn StatusCards(store: RwSignal<PageStore>, summary: StatusSummary) -> impl IntoView {
    let show_amount = summary.amount_key.is_some();
    let summary = StoredValue::new(summary);
    let cards = Memo::new(move |_| {
        store.with(|s| summary.with_value(|sum| summarize(&s.rows, sum)))
    });
    let active = Memo::new(move |_| store.with(|s| s.state.status_filter.clone()));

    view! {
        <div class="status-cards">
            {move || cards.get().into_iter().map(|card| {
                let key = card.key.clone();
                let key_for_active = card.key.clone();
                let color_class = format!(
                    "status-card status-card--{}",
                    card.color.clone().unwrap_or_else(|| "informative".to_string())
                );
                view! {
                    <div
                        class=color_class
                        class:status-card--active=move || active.get().as_deref() == Some(key_for_active.as_str())
                        class:status-card--alert=card.over_threshold
                        on:click=move |_| store.update(|s| s.state.toggle_status(&key))
                    >
                        <div class="status-card__label">{card.label.clone()}</div>
                        <div class="status-card__count">{card.count}</div>
                        {show_amount.then(|| view! {
                            <div class="status-card__amount">{format_money(card.total_amount)}</div>
                        })}
                    </div>
                }
            }).collect_view()}
        </div>
    }
}
