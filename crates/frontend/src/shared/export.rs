/// Выгрузка строк страницы в CSV или JSON и скачивание файла браузером
use contracts::shared::data_row::DataRow;
use contracts::shared::page_config::{ColumnSpec, ColumnType, ExportFormat};
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Ключи колонок выгрузки: колонки представления без колонок-действий,
/// а при их отсутствии все ключи строк в порядке первого появления.
pub fn export_keys(rows: &[DataRow], columns: &[ColumnSpec]) -> Vec<String> {
    let configured: Vec<String> = columns
        .iter()
        .filter(|c| c.column_type != ColumnType::Action)
        .map(|c| c.key.clone())
        .collect();
    if !configured.is_empty() {
        return configured;
    }

    let mut keys: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    keys
}

/// CSV: первая строка это ключи колонок, разделитель запятая
pub fn rows_to_csv(rows: &[DataRow], keys: &[String]) -> String {
    let mut csv_content = String::new();
    csv_content.push_str(
        &keys
            .iter()
            .map(|k| escape_csv_cell(k))
            .collect::<Vec<_>>()
            .join(","),
    );
    csv_content.push('\n');

    for row in rows {
        let cells: Vec<String> = keys
            .iter()
            .map(|key| {
                row.get(key)
                    .map(|v| escape_csv_cell(&v.as_plain_string()))
                    .unwrap_or_default()
            })
            .collect();
        csv_content.push_str(&cells.join(","));
        csv_content.push('\n');
    }
    csv_content
}

/// JSON: массив объектов строк
pub fn rows_to_json(rows: &[DataRow]) -> Result<String, String> {
    serde_json::to_string_pretty(rows).map_err(|e| format!("Ошибка сериализации: {}", e))
}

pub fn export_file_name(base_name: &str, format: ExportFormat) -> String {
    format!("{}.{}", base_name, format.extension())
}

/// Экспортирует строки и инициирует скачивание
pub fn export_rows(
    rows: &[DataRow],
    columns: &[ColumnSpec],
    format: ExportFormat,
    base_name: &str,
) -> Result<(), String> {
    if rows.is_empty() {
        return Err("Нет данных для экспорта".to_string());
    }

    let content = match format {
        ExportFormat::Csv => rows_to_csv(rows, &export_keys(rows, columns)),
        ExportFormat::Json => rows_to_json(rows)?,
    };

    let blob = create_blob(&content, format.mime_type())?;
    download_blob(&blob, &export_file_name(base_name, format))
}

/// Экранирует CSV ячейку если необходимо
fn escape_csv_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        let escaped = cell.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        cell.to_string()
    }
}

fn create_blob(content: &str, mime_type: &str) -> Result<Blob, String> {
    let array = js_sys::Array::new();
    array.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type(mime_type);

    Blob::new_with_str_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

/// Инициирует скачивание Blob через браузер
fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    let body = document.body().ok_or("No body element")?;
    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::data_row::CellValue;

    fn columns() -> Vec<ColumnSpec> {
        serde_json::from_value(serde_json::json!([
            { "key": "id" },
            { "key": "vendor" },
            { "key": "amount", "type": "currency" },
            { "key": "actions", "type": "action" }
        ]))
        .unwrap()
    }

    fn rows() -> Vec<DataRow> {
        vec![
            DataRow::from_pairs([
                ("id", CellValue::from("1")),
                ("vendor", CellValue::from("Acme, Inc.")),
                ("amount", CellValue::from(100.0)),
            ]),
            DataRow::from_pairs([("id", CellValue::from("2")), ("vendor", CellValue::from("Say \"hi\""))]),
        ]
    }

    #[test]
    fn csv_header_is_column_keys_without_actions() {
        let rows = rows();
        let csv = rows_to_csv(&rows, &export_keys(&rows, &columns()));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,vendor,amount");
        assert_eq!(lines[1], "1,\"Acme, Inc.\",100");
        assert_eq!(lines[2], "2,\"Say \"\"hi\"\"\",");
    }

    #[test]
    fn keys_fall_back_to_row_keys_in_first_seen_order() {
        let rows = vec![
            DataRow::from_pairs([("b", "1"), ("a", "2")]),
            DataRow::from_pairs([("c", "3")]),
        ];
        assert_eq!(export_keys(&rows, &[]), vec!["a", "b", "c"]);
    }

    #[test]
    fn json_export_is_array_of_objects() {
        let json = rows_to_json(&rows()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(2));
        assert_eq!(value[0]["amount"], serde_json::json!(100.0));
    }

    #[test]
    fn file_name_uses_format_extension() {
        assert_eq!(export_file_name("sales_order", ExportFormat::Csv), "sales_order.csv");
        assert_eq!(export_file_name("sales_order", ExportFormat::Json), "sales_order.json");
    }
}
