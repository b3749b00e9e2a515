//! Строки страницы вместе с её [`ViewState`].
//!
//! Страница владеет коллекцией единолично. Каждое изменение
//! (удаление, импорт, сохранение) выполняется одним вызовом и сразу
//! пересчитывает зависимое состояние: порядковые номера, выбор, номер страницы.

use super::table_engine::TableEngine;
use super::view_state::ViewState;
use contracts::shared::data_row::{merge_rows, remove_row, renumber, CellValue, DataRow, MergeReport};
use contracts::shared::page_config::{ColumnSpec, ComponentKind, ViewConfiguration};

#[derive(Debug, Clone, PartialEq)]
pub struct PageStore {
    pub rows: Vec<DataRow>,
    pub state: ViewState,
    row_key: String,
    sequence_key: Option<String>,
    group_key: Option<String>,
    columns: Vec<ColumnSpec>,
}

impl PageStore {
    pub fn new(rows: Vec<DataRow>, row_key: &str, view_name: &str, view: &ViewConfiguration) -> Self {
        let mut store = Self {
            rows,
            state: ViewState::new(view_name, view),
            row_key: row_key.to_string(),
            sequence_key: view.sequence_key.clone(),
            group_key: view
                .status_summary
                .as_ref()
                .map(|s| s.group_key.clone())
                .or_else(|| view.kanban_config.as_ref().map(|k| k.group_key.clone())),
            columns: view.columns.clone(),
        };
        store.renumber();
        store
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn engine(&self) -> TableEngine<'_> {
        TableEngine::new(&self.rows, &self.columns, &self.row_key)
            .with_group_key(self.group_key.as_deref())
    }

    /// Отметка строк текущей страницы таблицы
    pub fn select_all_visible(&mut self, checked: bool) {
        TableEngine::new(&self.rows, &self.columns, &self.row_key)
            .with_group_key(self.group_key.as_deref())
            .select_all_visible(&mut self.state, checked);
    }

    /// Отметка всех строк, прошедших фильтры
    pub fn select_all_filtered(&mut self, checked: bool) {
        TableEngine::new(&self.rows, &self.columns, &self.row_key)
            .with_group_key(self.group_key.as_deref())
            .select_all_filtered(&mut self.state, checked);
    }

    pub fn row(&self, id: &str) -> Option<&DataRow> {
        self.rows.iter().find(|r| r.id(&self.row_key).as_deref() == Some(id))
    }

    fn renumber(&mut self) {
        if let Some(key) = &self.sequence_key {
            renumber(&mut self.rows, key);
        }
    }

    fn settle(&mut self, removed: &[String]) {
        self.renumber();
        self.state.forget_rows(removed);
        let filtered = self.engine().filtered_count(&self.state);
        self.state.clamp_page(filtered);
    }

    /// Удаляет ровно одну строку по id
    pub fn delete(&mut self, id: &str) -> Option<DataRow> {
        let removed = remove_row(&mut self.rows, &self.row_key, id)?;
        self.settle(&[id.to_string()]);
        Some(removed)
    }

    /// Удаляет строки из заранее собранного списка id.
    /// Выбор, сделанный после сбора списка, не затрагивается.
    pub fn delete_ids(&mut self, ids: &[String]) -> Vec<String> {
        let mut removed = Vec::new();
        for id in ids {
            if remove_row(&mut self.rows, &self.row_key, id).is_some() {
                removed.push(id.clone());
            }
        }
        self.settle(&removed);
        removed
    }

    /// Существующие строки побеждают дубликаты импорта
    pub fn merge_import(&mut self, incoming: Vec<DataRow>) -> MergeReport {
        let report = merge_rows(&mut self.rows, incoming, &self.row_key);
        self.renumber();
        report
    }

    /// Замена строки с тем же id или добавление новой
    pub fn upsert(&mut self, row: DataRow) {
        let id = row.id(&self.row_key);
        let position = id
            .as_deref()
            .and_then(|id| self.rows.iter().position(|r| r.id(&self.row_key).as_deref() == Some(id)));
        match position {
            Some(index) => self.rows[index] = row,
            None => self.rows.push(row),
        }
        self.renumber();
    }

    pub fn update_cell(&mut self, id: &str, key: &str, value: CellValue) -> bool {
        let row_key = self.row_key.clone();
        match self.rows.iter_mut().find(|r| r.id(&row_key).as_deref() == Some(id)) {
            Some(row) => {
                row.insert(key, value);
                true
            }
            None => false,
        }
    }

    pub fn replace_rows(&mut self, rows: Vec<DataRow>) {
        self.rows = rows;
        self.renumber();
        let ids: Vec<String> = self
            .state
            .selection
            .keys()
            .filter(|id| self.row(id).is_none())
            .cloned()
            .collect();
        self.settle(&ids);
    }
}

/// Пустая страница до первой загрузки
impl Default for PageStore {
    fn default() -> Self {
        Self::new(
            Vec::new(),
            "id",
            "",
            &ViewConfiguration::new(ComponentKind::ListView),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::page_config::{parse_page_configuration, PageConfiguration};

    fn config() -> PageConfiguration {
        parse_page_configuration(
            "items",
            r#"{ "views": { "list": {
                "component": "TableView",
                "pageSize": 2,
                "sequenceKey": "no",
                "columns": [ { "key": "no" }, { "key": "name" }, { "key": "status" } ],
                "statusSummary": { "groupKey": "status", "cards": [ { "key": "Open" } ] }
            } } }"#,
        )
        .unwrap()
    }

    fn store(count: usize) -> PageStore {
        let rows = (1..=count)
            .map(|i| {
                DataRow::from_pairs([
                    ("id", CellValue::from(format!("r{}", i))),
                    ("name", CellValue::from(format!("Item {}", i))),
                    ("status", CellValue::from(if i % 2 == 0 { "Open" } else { "Done" })),
                ])
            })
            .collect();
        let config = config();
        PageStore::new(rows, "id", "list", config.view("list").unwrap())
    }

    fn numbers(store: &PageStore) -> Vec<String> {
        store.rows.iter().map(|r| r.text("no")).collect()
    }

    #[test]
    fn delete_removes_exactly_one_row_and_renumbers() {
        let mut s = store(4);
        assert_eq!(numbers(&s), vec!["1", "2", "3", "4"]);
        let removed = s.delete("r2").unwrap();
        assert_eq!(removed.text("name"), "Item 2");
        assert_eq!(s.rows.len(), 3);
        assert_eq!(numbers(&s), vec!["1", "2", "3"]);
        assert!(s.delete("r2").is_none());
        assert_eq!(s.rows.len(), 3);
    }

    #[test]
    fn delete_clamps_page_and_forgets_selection() {
        let mut s = store(3);
        s.state.set_page(1);
        s.state.set_selected("r3", true);
        s.delete("r3");
        assert_eq!(s.state.page, 0);
        assert!(s.state.selected_ids().is_empty());
    }

    #[test]
    fn status_counts_follow_deletion() {
        let mut s = store(4);
        s.state.toggle_status("Open");
        assert_eq!(s.engine().filtered_count(&s.state), 2);
        s.delete("r4");
        assert_eq!(s.engine().filtered_count(&s.state), 1);
    }

    #[test]
    fn bulk_delete_removes_selected_rows() {
        let mut s = store(5);
        s.state.set_selected("r1", true);
        s.state.set_selected("r5", true);
        s.state.set_selected("r3", false);
        let mut removed = s.delete_ids(&s.state.selected_ids());
        removed.sort();
        assert_eq!(removed, vec!["r1", "r5"]);
        assert_eq!(numbers(&s), vec!["1", "2", "3"]);
        assert!(s.state.selected_ids().is_empty());
    }

    #[test]
    fn bulk_delete_ignores_rows_selected_after_confirmation() {
        let mut s = store(4);
        s.state.set_selected("r1", true);
        let confirmed = s.state.selected_ids();
        s.state.set_selected("r3", true);

        let removed = s.delete_ids(&confirmed);
        assert_eq!(removed, vec!["r1"]);
        assert_eq!(s.rows.len(), 3);
        assert!(s.row("r3").is_some());
        assert_eq!(s.state.selected_ids(), vec!["r3"]);
    }

    #[test]
    fn import_keeps_existing_rows_and_extends_sequence() {
        let mut s = store(2);
        let report = s.merge_import(vec![
            DataRow::from_pairs([("id", "r1"), ("name", "Duplicate")]),
            DataRow::from_pairs([("id", "r9"), ("name", "Imported")]),
        ]);
        assert_eq!((report.added, report.skipped), (1, 1));
        assert_eq!(s.row("r1").unwrap().text("name"), "Item 1");
        assert_eq!(numbers(&s), vec!["1", "2", "3"]);
    }

    #[test]
    fn upsert_and_inline_cell_update() {
        let mut s = store(2);
        s.upsert(DataRow::from_pairs([("id", "r2"), ("name", "Renamed")]));
        assert_eq!(s.rows.len(), 2);
        assert_eq!(s.row("r2").unwrap().text("name"), "Renamed");
        s.upsert(DataRow::from_pairs([("id", "r3"), ("name", "New")]));
        assert_eq!(s.rows.len(), 3);
        assert!(s.update_cell("r1", "name", CellValue::from("Edited")));
        assert_eq!(s.row("r1").unwrap().text("name"), "Edited");
        assert!(!s.update_cell("missing", "name", CellValue::from("x")));
    }

    #[test]
    fn select_all_visible_versus_all_filtered() {
        let mut s = store(5);
        s.select_all_visible(true);
        assert_eq!(s.state.selected_ids(), vec!["r1", "r2"]);
        s.select_all_filtered(true);
        assert_eq!(s.state.selected_ids().len(), 5);
        s.select_all_visible(false);
        assert_eq!(s.state.selected_ids(), vec!["r3", "r4", "r5"]);
    }
}
