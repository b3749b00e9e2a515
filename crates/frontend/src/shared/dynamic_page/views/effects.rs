//! Исполнение эффектов действий на загруженной странице

use super::{lock, PageHandle};
use crate::shared::dynamic_page::actions::{dispatch, Effect};
use crate::shared::dynamic_page::api;
use crate::shared::dynamic_page::importer::parse_import;
use crate::shared::dynamic_page::page_store::PageStore;
use crate::shared::export::export_rows;
use contracts::shared::data_api::ImportRowsResponse;
use contracts::shared::data_row::{DataRow, MergeReport};
use contracts::shared::page_config::{ActionSpec, ExportFormat};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen_futures::JsFuture;

fn confirm_dialog(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Действие конфигурации для записи `record_id` (или для страницы)
pub fn run_action(page: &PageHandle, action: &ActionSpec, record_id: Option<&str>) {
    let effect = page.with_action_context(record_id, |ctx| dispatch(action, ctx));
    run_effect(page, effect);
}

pub fn run_effect(page: &PageHandle, effect: Effect) {
    match effect {
        Effect::Navigate(path) => page.nav.navigate(&path),
        Effect::Delete { id, confirm } => {
            if let Some(message) = confirm {
                if !confirm_dialog(&message) {
                    return;
                }
            }
            delete_record(page.clone(), id);
        }
        Effect::Import => {
            if let Some(input) = page.import_input.get_untracked() {
                input.click();
            }
        }
        Effect::Export(format) => export_filtered(page, format),
        Effect::BeginInlineEdit(id) => {
            page.store.update(|s| s.state.editing_row = Some(id));
        }
        Effect::Custom(id) => {
            leptos::logging::log!("custom action: {}", id);
            page.toasts.info(format!("Действие '{}' выполнено", id));
        }
        Effect::Rejected(reason) => page.toasts.warning(reason),
    }
}

fn delete_record(page: PageHandle, id: String) {
    if !page.is_api() {
        apply_delete(&page, &id);
        return;
    }
    spawn_local(async move {
        match api::delete_row(&page.config.model, &id).await {
            Ok(()) => apply_delete(&page, &id),
            Err(e) => page.toasts.error(format!("Не удалось удалить запись: {}", e)),
        }
    });
}

fn apply_delete(page: &PageHandle, id: &str) {
    let removed = page.store.try_update(|s| s.delete(id)).flatten();
    if removed.is_none() {
        return;
    }
    page.toasts.success("Запись удалена");
    // карточка удалённой записи больше не существует
    if page.record_id.as_deref() == Some(id) {
        page.nav.navigate(&page.list_path());
    }
}

/// Удаление всех отмеченных строк после одного подтверждения
pub fn delete_selected(page: &PageHandle) {
    let ids = page.store.with_untracked(|s| s.state.selected_ids());
    if ids.is_empty() {
        return;
    }
    if !confirm_dialog(&format!("Удалить выбранные записи ({})?", ids.len())) {
        return;
    }

    let page = page.clone();
    spawn_local(async move {
        let mut confirmed = Vec::with_capacity(ids.len());
        for id in ids {
            if page.is_api() {
                if let Err(e) = api::delete_row(&page.config.model, &id).await {
                    log::warn!("bulk delete of {} failed: {}", id, e);
                    page.toasts.error(format!("Не удалось удалить {}: {}", id, e));
                    continue;
                }
            }
            confirmed.push(id);
        }
        if let Some(removed) = page.store.try_update(|s| s.delete_ids(&confirmed)) {
            page.toasts.success(format!("Удалено записей: {}", removed.len()));
        }
    });
}

fn export_filtered(page: &PageHandle, format: ExportFormat) {
    let (rows, columns) = page.store.with_untracked(|s| {
        (s.engine().filtered_rows(&s.state), s.columns().to_vec())
    });
    match export_rows(&rows, &columns, format, &page.config.model) {
        Ok(()) => page
            .toasts
            .success(format!("Экспортировано записей: {}", rows.len())),
        Err(e) => page.toasts.warning(e),
    }
}

/// Перечитывает строки страницы с сервера
pub fn reload_rows(page: &PageHandle) {
    if !page.is_api() {
        return;
    }
    let page = page.clone();
    spawn_local(async move {
        match api::list_rows(&page.config.model).await {
            Ok(rows) => {
                let count = rows.len();
                let _ = page.store.try_update(|s| s.replace_rows(rows));
                page.toasts.info(format!("Загружено записей: {}", count));
            }
            Err(e) => page.toasts.error(format!("Не удалось обновить данные: {}", e)),
        }
    });
}

/// Сохраняет инлайн-правки строки и выходит из режима редактирования
pub fn finish_inline_edit(page: &PageHandle) {
    let Some(id) = page
        .store
        .try_update(|s| s.state.editing_row.take())
        .flatten()
    else {
        return;
    };
    if !page.is_api() {
        page.toasts.success("Изменения сохранены");
        return;
    }
    let Some(row) = page.store.with_untracked(|s| s.row(&id).cloned()) else {
        return;
    };
    let page = page.clone();
    spawn_local(async move {
        match api::update_row(&page.config.model, &id, &row).await {
            Ok(saved) => {
                let _ = page.store.try_update(|s| s.upsert(saved));
                page.toasts.success("Изменения сохранены");
            }
            Err(e) => page.toasts.error(format!("Не удалось сохранить запись: {}", e)),
        }
    });
}

fn apply_import(page: &PageHandle, rows: Vec<DataRow>) {
    if let Some(report) = page.store.try_update(|s| s.merge_import(rows)) {
        page.toasts.success(format!(
            "Импортировано записей: {} (пропущено дубликатов: {})",
            report.added, report.skipped
        ));
    }
}

/// Отказ сервера оставляет строки страницы без изменений
fn merge_accepted(
    store: &mut PageStore,
    rows: Vec<DataRow>,
    outcome: Result<ImportRowsResponse, String>,
) -> Result<MergeReport, String> {
    let response = outcome?;
    store.merge_import(rows);
    Ok(response.report)
}

/// Строки API-страницы попадают в таблицу только после того, как их принял сервер
async fn import_batch(page: &PageHandle, rows: Vec<DataRow>) {
    if !page.is_api() {
        apply_import(page, rows);
        return;
    }
    let outcome = api::import_rows(&page.config.model, rows.clone()).await;
    match page.store.try_update(|s| merge_accepted(s, rows, outcome)) {
        Some(Ok(report)) => page.toasts.success(format!(
            "Импортировано записей: {} (пропущено дубликатов: {})",
            report.added, report.skipped
        )),
        Some(Err(e)) => page.toasts.error(format!("Сервер не принял импорт: {}", e)),
        None => {}
    }
}

async fn read_text(file: &web_sys::File) -> Result<String, String> {
    let value = JsFuture::from(file.text())
        .await
        .map_err(|e| format!("{:?}", e))?;
    value
        .as_string()
        .ok_or_else(|| "файл не является текстом".to_string())
}

fn start_import(page: PageHandle, file: web_sys::File) {
    let ticket = lock(&page.imports).issue();
    let file_name = file.name();
    spawn_local(async move {
        let parsed = match read_text(&file).await {
            Ok(text) => parse_import(&file_name, &text, &page.config.row_key).map_err(|e| e.to_string()),
            Err(e) => Err(e),
        };
        let ready = match parsed {
            Ok(rows) => lock(&page.imports).complete(ticket, rows),
            Err(e) => {
                page.toasts.error(format!("Ошибка импорта {}: {}", file_name, e));
                lock(&page.imports).skip(ticket)
            }
        };
        for rows in ready {
            import_batch(&page, rows).await;
        }
    });
}

/// Скрытое поле выбора файла для действия импорта
#[component]
pub fn ImportInput(page: PageHandle) -> impl IntoView {
    let input_ref = page.import_input;
    let on_change = move |_| {
        let Some(input) = input_ref.get_untracked() else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // повторный выбор того же файла снова вызовет change
        input.set_value("");
        start_import(page.clone(), file);
    };

    view! {
        <input
            type="file"
            accept=".json,.csv"
            style="display: none;"
            node_ref=input_ref
            on:change=on_change
        />
    }
}
