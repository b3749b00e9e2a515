use contracts::shared::data_row::DataRow;
use contracts::shared::page_config::KanbanConfig;

/// Ключ служебной колонки для строк вне настроенных групп
pub const OTHER_COLUMN_KEY: &str = "__other__";

#[derive(Debug, Clone, PartialEq)]
pub struct KanbanColumn {
    pub key: String,
    pub label: String,
    pub color: Option<String>,
    pub rows: Vec<DataRow>,
}

impl KanbanColumn {
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_other(&self) -> bool {
        self.key == OTHER_COLUMN_KEY
    }
}

/// Раскладывает строки по колонкам в порядке конфигурации.
///
/// Группировка пересчитывается на каждый вызов. Строки с неизвестным
/// или пустым значением группы попадают в последнюю колонку "Other",
/// которая появляется только если не пуста.
pub fn group_rows(rows: &[DataRow], config: &KanbanConfig) -> Vec<KanbanColumn> {
    let mut columns: Vec<KanbanColumn> = config
        .columns
        .iter()
        .map(|group| KanbanColumn {
            key: group.key.clone(),
            label: group.display_label().to_string(),
            color: group.color.clone(),
            rows: Vec::new(),
        })
        .collect();
    let mut other = Vec::new();

    for row in rows {
        let group = row.text(&config.group_key);
        match columns.iter_mut().find(|c| c.key == group) {
            Some(column) => column.rows.push(row.clone()),
            None => other.push(row.clone()),
        }
    }

    if !other.is_empty() {
        columns.push(KanbanColumn {
            key: OTHER_COLUMN_KEY.to_string(),
            label: "Other".to_string(),
            color: None,
            rows: other,
        });
    }
    columns
}

/// Заголовок карточки: поле `titleKey` или id строки
pub fn card_title(row: &DataRow, config: &KanbanConfig, row_key: &str) -> String {
    config
        .title_key
        .as_deref()
        .map(|key| row.text(key))
        .filter(|t| !t.is_empty())
        .or_else(|| row.id(row_key))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::data_row::{remove_row, CellValue};

    fn config() -> KanbanConfig {
        serde_json::from_value(serde_json::json!({
            "groupKey": "status",
            "titleKey": "customer",
            "columns": [
                { "key": "Open", "label": "Open" },
                { "key": "In Process", "label": "In Process" },
                { "key": "Completed", "label": "Completed" }
            ]
        }))
        .unwrap()
    }

    fn row(id: &str, status: &str) -> DataRow {
        DataRow::from_pairs([("id", CellValue::from(id)), ("status", CellValue::from(status))])
    }

    #[test]
    fn one_card_per_group_and_no_row_lost() {
        let rows = vec![row("1", "Open"), row("2", "In Process"), row("3", "Completed")];
        let columns = group_rows(&rows, &config());
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(|c| c.count() == 1));
        let total: usize = columns.iter().map(|c| c.count()).sum();
        assert_eq!(total, rows.len());
        assert_eq!(
            columns.iter().map(|c| c.key.as_str()).collect::<Vec<_>>(),
            vec!["Open", "In Process", "Completed"]
        );
    }

    #[test]
    fn unknown_groups_go_to_trailing_other_column() {
        let rows = vec![row("1", "Open"), row("2", "Archived"), DataRow::from_pairs([("id", "3")])];
        let columns = group_rows(&rows, &config());
        let last = columns.last().unwrap();
        assert!(last.is_other());
        assert_eq!(last.count(), 2);
        let total: usize = columns.iter().map(|c| c.count()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn regrouping_after_delete_reflects_removal() {
        let mut rows = vec![row("1", "Open"), row("2", "Open"), row("3", "Completed")];
        remove_row(&mut rows, "id", "1");
        let columns = group_rows(&rows, &config());
        assert_eq!(columns[0].count(), 1);
        assert_eq!(columns[2].count(), 1);
    }

    #[test]
    fn card_title_falls_back_to_id() {
        let mut r = row("SO-1", "Open");
        assert_eq!(card_title(&r, &config(), "id"), "SO-1");
        r.insert("customer", "Acme");
        assert_eq!(card_title(&r, &config(), "id"), "Acme");
    }
}
