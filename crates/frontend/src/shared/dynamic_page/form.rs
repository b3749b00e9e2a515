//! Значения формы и проверка при отправке.
//!
//! Обязательность полей проверяется только при отправке, а не на каждый ввод.
//! Ошибка содержит все проблемные поля сразу.

use chrono::NaiveDate;
use contracts::shared::data_row::{CellValue, DataRow};
use contracts::shared::page_config::{FieldIssue, FieldSpec, FieldType, IssueKind, ValidationErrors};
use std::collections::BTreeMap;

/// Значение по умолчанию для поля даты, означающее текущую дату
pub const TODAY: &str = "today";

pub type FormValues = BTreeMap<String, String>;

pub fn initial_values(fields: &[FieldSpec], today: NaiveDate) -> FormValues {
    fields
        .iter()
        .map(|field| {
            let value = match &field.default_value {
                Some(CellValue::Text(t)) if field.field_type == FieldType::Date && t == TODAY => {
                    today.format("%Y-%m-%d").to_string()
                }
                Some(v) => v.as_plain_string(),
                None => String::new(),
            };
            (field.key.clone(), value)
        })
        .collect()
}

/// Значения для редактирования существующей строки
pub fn values_from_row(fields: &[FieldSpec], row: &DataRow) -> FormValues {
    fields
        .iter()
        .map(|field| (field.key.clone(), row.text(&field.key)))
        .collect()
}

pub fn validate_submission(fields: &[FieldSpec], values: &FormValues) -> Result<DataRow, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut row = DataRow::new();

    for field in fields {
        let raw = values.get(&field.key).map(|v| v.trim()).unwrap_or("");
        let issue = |kind: IssueKind| FieldIssue {
            key: field.key.clone(),
            label: field.display_label().to_string(),
            kind,
        };

        if raw.is_empty() {
            if field.required {
                errors.push(issue(IssueKind::Missing));
            }
            continue;
        }

        match field.field_type {
            FieldType::Number => match raw.parse::<f64>() {
                Ok(number) if number.is_finite() => {
                    if let Some(min) = field.validation.min.filter(|min| number < *min) {
                        errors.push(issue(IssueKind::BelowMin(min)));
                    } else if let Some(max) = field.validation.max.filter(|max| number > *max) {
                        errors.push(issue(IssueKind::AboveMax(max)));
                    } else {
                        row.insert(field.key.clone(), number);
                    }
                }
                _ => errors.push(issue(IssueKind::NotANumber)),
            },
            FieldType::Select => {
                if field.options.iter().any(|o| o.value == raw) {
                    row.insert(field.key.clone(), raw);
                } else {
                    errors.push(issue(IssueKind::NotAnOption));
                }
            }
            FieldType::Text | FieldType::Textarea | FieldType::Date => {
                let length = raw.chars().count();
                if let Some(min) = field.validation.min_length.filter(|min| length < *min) {
                    errors.push(issue(IssueKind::TooShort(min)));
                } else if let Some(max) = field.validation.max_length.filter(|max| length > *max) {
                    errors.push(issue(IssueKind::TooLong(max)));
                } else {
                    row.insert(field.key.clone(), raw);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(row)
    } else {
        Err(errors)
    }
}

/// Запись для сохранения: поля формы поверх существующей строки.
/// Очищенные в форме поля удаляются; новая запись без id получает UUID.
pub fn build_record(fields: &[FieldSpec], existing: Option<&DataRow>, submitted: DataRow, row_key: &str) -> DataRow {
    let mut record = existing.cloned().unwrap_or_default();
    for field in fields {
        if !submitted.contains_key(&field.key) {
            record.remove(&field.key);
        }
    }
    for (key, value) in submitted.iter() {
        record.insert(key.clone(), value.clone());
    }
    if record.id(row_key).is_none() {
        record.insert(row_key, uuid::Uuid::new_v4().to_string());
    }
    record
}

/// Число колонок сетки формы
pub fn grid_columns(form_columns: Option<u8>) -> u8 {
    form_columns.unwrap_or(1).clamp(1, 4)
}
