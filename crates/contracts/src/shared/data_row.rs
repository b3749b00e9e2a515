//! Строка данных документа: плоское отображение ключ → скалярное значение.
//!
//! Строки приходят из образцов конфигурации, импортированных файлов
//! или REST API. Ядро не валидирует их, кроме ключей, на которые
//! ссылается конфигурация.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Скалярное значение ячейки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Строковое представление для поиска, экспорта и подстановок.
    /// Целые числа выводятся без дробной части (`100`, а не `100.0`).
    pub fn as_plain_string(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_plain_number(*n),
        }
    }

    /// Числовое значение; текст парсится, если похож на число
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CellValue::Bool(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.trim().is_empty())
    }

    /// Типизация ячейки импортированного CSV:
    /// конечные числа, `true`/`false`, иначе строка как есть (обрезанная).
    pub fn from_import_text(raw: &str) -> CellValue {
        let text = raw.trim();
        match text {
            "true" => return CellValue::Bool(true),
            "false" => return CellValue::Bool(false),
            _ => {}
        }
        if !text.is_empty() {
            if let Ok(n) = text.parse::<f64>() {
                if n.is_finite() {
                    return CellValue::Number(n);
                }
            }
        }
        CellValue::Text(text.to_string())
    }

    /// Преобразование JSON-значения; `null` даёт `None`, вложенные структуры не допускаются
    pub fn from_json(value: &Value) -> Result<Option<CellValue>, String> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(CellValue::Bool(*b))),
            Value::Number(n) => n
                .as_f64()
                .map(|f| Some(CellValue::Number(f)))
                .ok_or_else(|| format!("число {} не представимо", n)),
            Value::String(s) => Ok(Some(CellValue::Text(s.clone()))),
            Value::Array(_) | Value::Object(_) => {
                Err("ожидалось скалярное значение (строка, число или логическое)".to_string())
            }
        }
    }

    /// Порядок сортировки: числа по значению, строки без учёта регистра,
    /// числа раньше строк.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self.sort_number(), other.sort_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .as_plain_string()
                .to_lowercase()
                .cmp(&other.as_plain_string().to_lowercase()),
        }
    }

    fn sort_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

fn format_plain_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Одна запись бизнес-объекта
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct DataRow(BTreeMap<String, CellValue>);

impl TryFrom<Map<String, Value>> for DataRow {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut cells = BTreeMap::new();
        for (key, value) in map {
            let cell = CellValue::from_json(&value).map_err(|e| format!("поле '{}': {}", key, e))?;
            if let Some(cell) = cell {
                cells.insert(key, cell);
            }
        }
        Ok(DataRow(cells))
    }
}

impl DataRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<CellValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        DataRow(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<CellValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CellValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Строковое значение поля; пустая строка, если поля нет
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(|v| v.as_plain_string()).unwrap_or_default()
    }

    /// Идентификатор строки по ключу `row_key`
    pub fn id(&self, row_key: &str) -> Option<String> {
        self.get(row_key)
            .map(|v| v.as_plain_string())
            .filter(|s| !s.is_empty())
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    CellValue::Bool(b) => Value::Bool(*b),
                    CellValue::Number(n) => serde_json::Number::from_f64(*n)
                        .map(Value::Number)
                        .unwrap_or(Value::Null),
                    CellValue::Text(s) => Value::String(s.clone()),
                };
                (k.clone(), value)
            })
            .collect();
        Value::Object(map)
    }
}

/// Итог слияния строк
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeReport {
    pub added: usize,
    pub skipped: usize,
}

/// Добавляет входящие строки к существующим с дедупликацией по идентификатору.
///
/// Существующая строка всегда побеждает, внутри входящего набора
/// побеждает первое вхождение. Поля дубликатов не сливаются.
/// Строки без идентификатора добавляются как есть.
pub fn merge_rows(existing: &mut Vec<DataRow>, incoming: Vec<DataRow>, row_key: &str) -> MergeReport {
    let mut seen: std::collections::HashSet<String> =
        existing.iter().filter_map(|r| r.id(row_key)).collect();
    let mut report = MergeReport::default();

    for row in incoming {
        match row.id(row_key) {
            Some(id) if seen.contains(&id) => report.skipped += 1,
            Some(id) => {
                seen.insert(id);
                existing.push(row);
                report.added += 1;
            }
            None => {
                existing.push(row);
                report.added += 1;
            }
        }
    }

    report
}

/// Удаляет ровно одну строку с указанным идентификатором
pub fn remove_row(rows: &mut Vec<DataRow>, row_key: &str, id: &str) -> Option<DataRow> {
    let index = rows.iter().position(|r| r.id(row_key).as_deref() == Some(id))?;
    Some(rows.remove(index))
}

/// Перенумеровывает порядковое поле (например, `no`) подряд начиная с 1
pub fn renumber(rows: &mut [DataRow], sequence_key: &str) {
    for (index, row) in rows.iter_mut().enumerate() {
        row.insert(sequence_key, CellValue::Number((index + 1) as f64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, vendor: &str) -> DataRow {
        DataRow::from_pairs([("id", CellValue::from(id)), ("vendor", CellValue::from(vendor))])
    }

    #[test]
    fn integral_numbers_stringify_without_fraction() {
        assert_eq!(CellValue::Number(100.0).as_plain_string(), "100");
        assert_eq!(CellValue::Number(12.5).as_plain_string(), "12.5");
        assert_eq!(CellValue::Bool(true).as_plain_string(), "true");
    }

    #[test]
    fn import_text_is_typed() {
        assert_eq!(CellValue::from_import_text("100"), CellValue::Number(100.0));
        assert_eq!(CellValue::from_import_text(" false "), CellValue::Bool(false));
        assert_eq!(
            CellValue::from_import_text("2024-01-01"),
            CellValue::Text("2024-01-01".to_string())
        );
        assert_eq!(CellValue::from_import_text("NaN"), CellValue::Text("NaN".to_string()));
    }

    #[test]
    fn row_deserializes_from_flat_object_and_drops_nulls() {
        let row: DataRow =
            serde_json::from_str(r#"{"id": 7, "vendor": "Acme", "paid": true, "note": null}"#)
                .unwrap();
        assert_eq!(row.get("id"), Some(&CellValue::Number(7.0)));
        assert_eq!(row.id("id").as_deref(), Some("7"));
        assert!(!row.contains_key("note"));
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn nested_values_are_rejected() {
        let parsed: Result<DataRow, _> = serde_json::from_str(r#"{"id": 1, "items": [1, 2]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn merge_keeps_existing_row_on_duplicate_id() {
        let mut rows = vec![row("1", "Existing")];
        let report = merge_rows(
            &mut rows,
            vec![row("1", "Imported"), row("2", "New"), row("2", "Second copy")],
            "id",
        );
        assert_eq!(report, MergeReport { added: 1, skipped: 2 });
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("vendor"), "Existing");
        assert_eq!(rows[1].text("vendor"), "New");
    }

    #[test]
    fn remove_row_removes_exactly_one_and_renumber_is_contiguous() {
        let mut rows: Vec<DataRow> = (1..=4).map(|i| row(&i.to_string(), "v")).collect();
        renumber(&mut rows, "no");
        let removed = remove_row(&mut rows, "id", "2");
        assert!(removed.is_some());
        assert_eq!(rows.len(), 3);
        renumber(&mut rows, "no");
        let numbers: Vec<String> = rows.iter().map(|r| r.text("no")).collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
        assert!(remove_row(&mut rows, "id", "missing").is_none());
    }

    #[test]
    fn compare_orders_numbers_before_text() {
        let a = CellValue::Number(2.0);
        let b = CellValue::Number(10.0);
        let c = CellValue::Text("apple".into());
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(b.compare(&c), Ordering::Less);
        assert_eq!(
            CellValue::Text("Banana".into()).compare(&CellValue::Text("apple".into())),
            Ordering::Greater
        );
    }
}
