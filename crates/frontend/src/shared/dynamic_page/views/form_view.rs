//! Форма создания и редактирования записи.
//!
//! Режим редактирования включается, если в адресе есть id существующей
//! строки. Проверка полей выполняется только при отправке.

use super::PageHandle;
use crate::shared::components::ui::{Input, Select, Textarea};
use crate::shared::dynamic_page::api;
use crate::shared::dynamic_page::form::{
    build_record, grid_columns, initial_values, validate_submission, values_from_row, FormValues,
};
use crate::shared::dynamic_page::navigation::PageRoute;
use crate::shared::icons::icon;
use contracts::shared::page_config::{FieldSpec, FieldType, ValidationErrors};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Куда перейти после успешного сохранения
#[derive(Debug, Clone, PartialEq)]
pub enum AfterSave {
    Navigate(String),
    /// Остаться на форме с начальными значениями
    Reset,
}

pub fn after_save(module: &str, available_views: &[String], id: &str, open_record: bool) -> AfterSave {
    let has = |view: &str| available_views.iter().any(|v| v == view);
    if open_record && has("view") {
        AfterSave::Navigate(PageRoute::new(module, "view", Some(id)).to_path())
    } else if has("list") {
        AfterSave::Navigate(PageRoute::new(module, "list", None).to_path())
    } else {
        AfterSave::Reset
    }
}

fn field_input(
    field: &FieldSpec,
    values: RwSignal<FormValues>,
    errors: RwSignal<Option<ValidationErrors>>,
) -> AnyView {
    let key = field.key.clone();
    let id = format!("field-{}", field.key);
    let label = field.display_label().to_string();
    let placeholder = field.placeholder.clone().unwrap_or_default();
    let required = field.required;

    let key_for_value = key.clone();
    let value = Signal::derive(move || {
        values.with(|v| v.get(&key_for_value).cloned().unwrap_or_default())
    });
    let key_for_input = key.clone();
    let on_input = Callback::new(move |text: String| {
        values.update(|v| {
            v.insert(key_for_input.clone(), text);
        });
    });
    let key_for_invalid = key.clone();
    let invalid = Signal::derive(move || {
        errors.with(|e| e.as_ref().is_some_and(|e| e.for_key(&key_for_invalid).is_some()))
    });

    let control = match field.field_type {
        FieldType::Select => {
            let options = field
                .options
                .iter()
                .map(|o| (o.value.clone(), o.label.clone()))
                .collect::<Vec<_>>();
            view! {
                <Select
                    label=label
                    value=value
                    on_change=on_input
                    options=options
                    required=required
                    id=id
                    invalid=invalid
                />
            }
            .into_any()
        }
        FieldType::Textarea => view! {
            <Textarea
                label=label
                value=value
                on_input=on_input
                placeholder=placeholder
                required=required
                max_length=field.validation.max_length
                id=id
                invalid=invalid
            />
        }
        .into_any(),
        FieldType::Text | FieldType::Number | FieldType::Date => {
            let input_type = match field.field_type {
                FieldType::Number => "number",
                FieldType::Date => "date",
                _ => "text",
            };
            view! {
                <Input
                    label=label
                    value=value
                    on_input=on_input
                    placeholder=placeholder
                    input_type=input_type.to_string()
                    required=required
                    id=id
                    invalid=invalid
                />
            }
            .into_any()
        }
    };

    let span = field.span.unwrap_or(1).max(1);
    view! {
        <div class="form__cell" style=format!("grid-column: span {};", span)>
            {control}
            {move || errors.with(|e| {
                e.as_ref()
                    .and_then(|e| e.for_key(&key))
                    .map(|issue| view! { <div class="form__error">{issue.to_string()}</div> })
            })}
        </div>
    }
    .into_any()
}

#[component]
pub fn FormView(page: PageHandle) -> impl IntoView {
    let fields = page.view.config.fields.clone();
    let columns = grid_columns(page.view.config.form_columns);
    let existing = page
        .record_id
        .as_deref()
        .and_then(|id| page.store.with_untracked(|s| s.row(id).cloned()));

    if page.record_id.is_some() && existing.is_none() {
        let id = page.record_id.clone().unwrap_or_default();
        let back = page.list_path();
        let nav = page.nav;
        return view! {
            <div class="page-state page-state--error">
                <h3>{format!("Запись '{}' не найдена", id)}</h3>
                <button class="btn-primary" on:click=move |_| nav.navigate(&back)>"Назад"</button>
            </div>
        }
        .into_any();
    }

    let editing = existing.is_some();
    let initial = match &existing {
        Some(row) => values_from_row(&fields, row),
        None => initial_values(&fields, chrono::Local::now().date_naive()),
    };
    let values = RwSignal::new(initial.clone());
    let errors = RwSignal::new(None::<ValidationErrors>);
    let saving = RwSignal::new(false);

    let controls = fields
        .iter()
        .map(|field| field_input(field, values, errors))
        .collect_view();

    let can_open_record = !editing && page.has_view("view");
    let cancel_path = page.list_path();
    let nav = page.nav;
    let page = StoredValue::new(page);
    let fields = StoredValue::new(fields);
    let existing = StoredValue::new(existing);
    let initial = StoredValue::new(initial);

    let submit = move |open_record: bool| {
        if saving.get_untracked() {
            return;
        }
        let p = page.get_value();
        let checked = fields.with_value(|f| values.with_untracked(|v| validate_submission(f, v)));
        let submitted = match checked {
            Ok(row) => row,
            Err(e) => {
                p.toasts.error(e.to_string());
                errors.set(Some(e));
                return;
            }
        };
        errors.set(None);

        let record = fields.with_value(|f| {
            existing.with_value(|e| build_record(f, e.as_ref(), submitted, &p.config.row_key))
        });
        let id = record.id(&p.config.row_key).unwrap_or_default();
        saving.set(true);

        spawn_local(async move {
            let saved = if !p.is_api() {
                Ok(record)
            } else if editing {
                api::update_row(&p.config.model, &id, &record).await
            } else {
                api::create_row(&p.config.model, &record).await
            };
            let _ = saving.try_set(false);

            match saved {
                Ok(row) => {
                    let id = row.id(&p.config.row_key).unwrap_or(id);
                    let _ = p.store.try_update(|s| s.upsert(row));
                    p.toasts
                        .success(if editing { "Запись сохранена" } else { "Запись создана" });
                    match after_save(&p.config.module, &p.view.available_views, &id, open_record) {
                        AfterSave::Navigate(path) => p.nav.navigate(&path),
                        AfterSave::Reset => {
                            let _ = values.try_set(initial.get_value());
                        }
                    }
                }
                Err(e) => p.toasts.error(format!("Не удалось сохранить запись: {}", e)),
            }
        });
    };

    view! {
        <form
            class="form"
            on:submit=move |ev: leptos::ev::SubmitEvent| {
                ev.prevent_default();
                submit(false);
            }
        >
            <div
                class="form__grid"
                style=format!("display: grid; grid-template-columns: repeat({}, minmax(0, 1fr)); gap: 12px;", columns)
            >
                {controls}
            </div>
            <div class="form__actions">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| nav.navigate(&cancel_path)>
                    "Отмена"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    button_type=ButtonType::Submit
                    disabled=saving
                >
                    {icon("save")}
                    "Сохранить"
                </Button>
                {can_open_record.then(|| view! {
                    <Button
                        appearance=ButtonAppearance::Secondary
                        disabled=saving
                        on_click=move |_| submit(true)
                    >
                        "Сохранить и открыть"
                    </Button>
                })}
            </div>
        </form>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn views(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn save_and_view_opens_the_new_record() {
        let available = views(&["list", "create", "view"]);
        assert_eq!(
            after_save("sales_order", &available, "SO-9", true),
            AfterSave::Navigate("/sales_order/view/SO-9".to_string())
        );
        assert_eq!(
            after_save("sales_order", &available, "SO-9", false),
            AfterSave::Navigate("/sales_order/list".to_string())
        );
    }

    #[test]
    fn form_without_list_resets_in_place() {
        assert_eq!(after_save("notes", &views(&["create"]), "n1", true), AfterSave::Reset);
    }
}
