//! Разбор импортируемых файлов: JSON (массив плоских объектов)
//! и CSV (строка заголовков, значения через запятую, без кавычек).
//!
//! Импорт атомарен: файл либо целиком превращается в строки, либо даёт ошибку.

use contracts::shared::data_row::{CellValue, DataRow};
use contracts::shared::page_config::ImportError;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

pub fn detect_format(file_name: &str) -> Result<ImportFormat, ImportError> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".json") {
        Ok(ImportFormat::Json)
    } else if lower.ends_with(".csv") {
        Ok(ImportFormat::Csv)
    } else {
        Err(ImportError::UnsupportedFileType(file_name.to_string()))
    }
}

/// Строки из содержимого файла; строкам без идентификатора назначается UUID
pub fn parse_import(file_name: &str, content: &str, row_key: &str) -> Result<Vec<DataRow>, ImportError> {
    let mut rows = match detect_format(file_name)? {
        ImportFormat::Json => parse_json(content)?,
        ImportFormat::Csv => parse_csv(content)?,
    };
    if rows.is_empty() {
        return Err(ImportError::Empty);
    }
    ensure_ids(&mut rows, row_key);
    Ok(rows)
}

pub fn parse_json(content: &str) -> Result<Vec<DataRow>, ImportError> {
    if content.trim().is_empty() {
        return Err(ImportError::Empty);
    }
    let value: Value =
        serde_json::from_str(content).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(ImportError::InvalidJson("ожидался массив объектов".to_string()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => DataRow::try_from(map)
                .map_err(|reason| ImportError::MalformedRow { index: index + 1, reason }),
            _ => Err(ImportError::MalformedRow {
                index: index + 1,
                reason: "ожидался объект".to_string(),
            }),
        })
        .collect()
}

pub fn parse_csv(content: &str) -> Result<Vec<DataRow>, ImportError> {
    let content = content.trim_start_matches('\u{FEFF}');
    if content.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let mut lines = content.split('\n').map(|line| line.trim_end_matches('\r'));
    let header_line = lines.next().unwrap_or_default();
    if header_line.trim().is_empty() {
        return Err(ImportError::MissingHeader);
    }
    let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();
    if headers.iter().any(|h| h.is_empty()) {
        return Err(ImportError::MissingHeader);
    }

    let mut rows = Vec::new();
    for (offset, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let values: Vec<&str> = line.split(',').collect();
        if values.len() > headers.len() {
            return Err(ImportError::MalformedRow {
                // первая строка данных имеет номер 2
                index: offset + 2,
                reason: format!(
                    "значений {} при {} заголовках",
                    values.len(),
                    headers.len()
                ),
            });
        }
        let row = DataRow::from_pairs(
            headers
                .iter()
                .zip(values)
                .map(|(header, value)| (*header, CellValue::from_import_text(value))),
        );
        rows.push(row);
    }
    Ok(rows)
}

fn ensure_ids(rows: &mut [DataRow], row_key: &str) {
    for row in rows.iter_mut() {
        if row.id(row_key).is_none() {
            row.insert(row_key, uuid::Uuid::new_v4().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::data_row::merge_rows;

    #[test]
    fn csv_line_becomes_typed_row() {
        let csv = "id,vendor,amount,date,status\n9,Acme,100,2024-01-01,Pending\n";
        let rows = parse_import("orders.csv", csv, "id").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("vendor"), Some(&CellValue::from("Acme")));
        assert_eq!(rows[0].get("amount"), Some(&CellValue::Number(100.0)));
        assert_eq!(rows[0].get("date"), Some(&CellValue::from("2024-01-01")));
    }

    #[test]
    fn csv_with_empty_first_line_is_rejected_and_rows_unchanged() {
        let mut existing = vec![DataRow::from_pairs([("id", "1")])];
        let before = existing.clone();
        let result = parse_import("orders.csv", "\n9,Acme,100,2024-01-01,Pending", "id");
        assert_eq!(result, Err(ImportError::MissingHeader));
        if let Ok(rows) = result {
            merge_rows(&mut existing, rows, "id");
        }
        assert_eq!(existing, before);
    }

    #[test]
    fn csv_header_only_is_empty() {
        assert_eq!(parse_import("a.csv", "id,vendor\n\n", "id"), Err(ImportError::Empty));
        assert_eq!(parse_import("a.csv", "   ", "id"), Err(ImportError::Empty));
    }

    #[test]
    fn csv_rows_with_extra_values_are_malformed() {
        let err = parse_import("a.csv", "id,vendor\n1,Acme\n2,Globex,extra", "id").unwrap_err();
        assert!(matches!(err, ImportError::MalformedRow { index: 3, .. }));
    }

    #[test]
    fn csv_handles_crlf_and_bom() {
        let rows = parse_csv("\u{FEFF}id,paid\r\n1,true\r\n").unwrap();
        assert_eq!(rows[0].get("paid"), Some(&CellValue::Bool(true)));
        assert_eq!(rows[0].get("id"), Some(&CellValue::Number(1.0)));
    }

    #[test]
    fn json_array_of_objects() {
        let rows = parse_import("a.json", r#"[{"id": "A", "amount": 5}, {"vendor": "NoId"}]"#, "id").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("id"), "A");
        assert!(rows[1].id("id").is_some());
    }

    #[test]
    fn json_errors_are_specific() {
        assert!(matches!(parse_import("a.json", "{", "id"), Err(ImportError::InvalidJson(_))));
        assert!(matches!(parse_import("a.json", r#"{"id": 1}"#, "id"), Err(ImportError::InvalidJson(_))));
        assert_eq!(parse_import("a.json", "[]", "id"), Err(ImportError::Empty));
        assert!(matches!(
            parse_import("a.json", r#"[{"id": 1}, 5]"#, "id"),
            Err(ImportError::MalformedRow { index: 2, .. })
        ));
    }

    #[test]
    fn unsupported_extension() {
        assert_eq!(
            parse_import("report.xlsx", "", "id"),
            Err(ImportError::UnsupportedFileType("report.xlsx".into()))
        );
    }
}
