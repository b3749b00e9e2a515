//! Движок таблицы: фильтр, фильтр по группе статуса, сортировка,
//! пагинация и выбор строк поверх строк и колонок конфигурации.
//!
//! Движок не владеет состоянием: он читает и меняет переданный [`ViewState`].

use super::view_state::{page_count, SortDirection, ViewState};
use contracts::shared::data_row::DataRow;
use contracts::shared::page_config::ColumnSpec;
use std::cmp::Ordering;

/// Видимая страница таблицы
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub rows: Vec<DataRow>,
    pub filtered_count: usize,
    pub page: usize,
    pub total_pages: usize,
}

pub struct TableEngine<'a> {
    rows: &'a [DataRow],
    columns: &'a [ColumnSpec],
    row_key: &'a str,
    group_key: Option<&'a str>,
}

impl<'a> TableEngine<'a> {
    pub fn new(rows: &'a [DataRow], columns: &'a [ColumnSpec], row_key: &'a str) -> Self {
        Self {
            rows,
            columns,
            row_key,
            group_key: None,
        }
    }

    /// Ключ группировки для фильтра по статусу
    pub fn with_group_key(mut self, group_key: Option<&'a str>) -> Self {
        self.group_key = group_key;
        self
    }

    /// Подстрока без учёта регистра в строковом виде любой ячейки
    /// из колонок конфигурации. Пустой фильтр пропускает всё.
    pub fn matches_filter(&self, row: &DataRow, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |value: &contracts::shared::data_row::CellValue| {
            value.as_plain_string().to_lowercase().contains(&needle)
        };
        if self.columns.is_empty() {
            row.iter().any(|(_, value)| contains(value))
        } else {
            self.columns
                .iter()
                .filter_map(|c| row.get(&c.key))
                .any(contains)
        }
    }

    fn matches_status(&self, row: &DataRow, state: &ViewState) -> bool {
        match (&state.status_filter, self.group_key) {
            (Some(group), Some(key)) => row.text(key) == *group,
            _ => true,
        }
    }

    /// Индексы строк после фильтров и сортировки
    pub fn ordered_indices(&self, state: &ViewState) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.matches_filter(row, &state.filter))
            .filter(|(_, row)| self.matches_status(row, state))
            .map(|(i, _)| i)
            .collect();

        if let Some(sort) = &state.sort {
            // sort_by стабилен: равные ключи сохраняют исходный порядок
            indices.sort_by(|&a, &b| {
                compare_rows(&self.rows[a], &self.rows[b], &sort.key, sort.direction)
            });
        }
        indices
    }

    pub fn filtered_rows(&self, state: &ViewState) -> Vec<DataRow> {
        self.ordered_indices(state)
            .into_iter()
            .map(|i| self.rows[i].clone())
            .collect()
    }

    pub fn filtered_count(&self, state: &ViewState) -> usize {
        self.ordered_indices(state).len()
    }

    pub fn page(&self, state: &ViewState) -> TablePage {
        let indices = self.ordered_indices(state);
        let filtered_count = indices.len();
        let total_pages = page_count(filtered_count, state.page_size);
        let start = state.page.saturating_mul(state.page_size);
        let rows = indices
            .into_iter()
            .skip(start)
            .take(state.page_size)
            .map(|i| self.rows[i].clone())
            .collect();
        TablePage {
            rows,
            filtered_count,
            page: state.page,
            total_pages,
        }
    }

    /// id строк текущей страницы
    pub fn visible_ids(&self, state: &ViewState) -> Vec<String> {
        self.page(state)
            .rows
            .iter()
            .filter_map(|r| r.id(self.row_key))
            .collect()
    }

    /// "Выбрать все" затрагивает только строки текущей страницы
    pub fn select_all_visible(&self, state: &mut ViewState, checked: bool) {
        for id in self.visible_ids(state) {
            state.set_selected(&id, checked);
        }
    }

    /// Явный выбор всего отфильтрованного набора
    pub fn select_all_filtered(&self, state: &mut ViewState, checked: bool) {
        let ids: Vec<String> = self
            .ordered_indices(state)
            .into_iter()
            .filter_map(|i| self.rows[i].id(self.row_key))
            .collect();
        for id in ids {
            state.set_selected(&id, checked);
        }
    }

    pub fn all_visible_selected(&self, state: &ViewState) -> bool {
        let ids = self.visible_ids(state);
        !ids.is_empty() && ids.iter().all(|id| state.is_selected(id))
    }

    pub fn any_visible_selected(&self, state: &ViewState) -> bool {
        self.visible_ids(state).iter().any(|id| state.is_selected(id))
    }
}

/// Отсутствующие значения всегда в конце, направление переворачивает
/// только сравнение присутствующих значений.
fn compare_rows(a: &DataRow, b: &DataRow, key: &str, direction: SortDirection) -> Ordering {
    match (a.get(key), b.get(key)) {
        (Some(x), Some(y)) => {
            let ordering = x.compare(y);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::data_row::CellValue;
    use contracts::shared::page_config::{ComponentKind, ViewConfiguration};

    fn column(key: &str) -> ColumnSpec {
        serde_json::from_value(serde_json::json!({ "key": key })).unwrap()
    }

    fn columns() -> Vec<ColumnSpec> {
        vec![column("id"), column("vendor"), column("amount"), column("status")]
    }

    fn row(id: usize, vendor: &str, amount: f64, status: &str) -> DataRow {
        DataRow::from_pairs([
            ("id", CellValue::from(id.to_string())),
            ("vendor", CellValue::from(vendor)),
            ("amount", CellValue::from(amount)),
            ("status", CellValue::from(status)),
        ])
    }

    fn state(page_size: usize) -> ViewState {
        let mut config = ViewConfiguration::new(ComponentKind::ListView);
        config.page_size = Some(page_size);
        ViewState::new("list", &config)
    }

    fn sample() -> Vec<DataRow> {
        vec![
            row(1, "Acme", 100.0, "Open"),
            row(2, "Globex", 250.5, "In Process"),
            row(3, "acme supplies", 75.0, "Completed"),
            row(4, "Initech", 100.0, "Open"),
        ]
    }

    fn ids(rows: &[DataRow]) -> Vec<String> {
        rows.iter().map(|r| r.text("id")).collect()
    }

    #[test]
    fn empty_filter_keeps_order_and_cardinality() {
        let rows = sample();
        let cols = columns();
        let engine = TableEngine::new(&rows, &cols, "id");
        let s = state(10);
        assert_eq!(engine.filtered_rows(&s), rows);
    }

    #[test]
    fn filter_is_case_insensitive_substring_over_columns() {
        let rows = sample();
        let cols = columns();
        let engine = TableEngine::new(&rows, &cols, "id");
        let mut s = state(10);
        s.set_filter("ACME".into());
        assert_eq!(ids(&engine.filtered_rows(&s)), vec!["1", "3"]);
        s.set_filter("250.5".into());
        assert_eq!(ids(&engine.filtered_rows(&s)), vec!["2"]);
        s.set_filter("100".into());
        assert_eq!(ids(&engine.filtered_rows(&s)), vec!["1", "4"]);
    }

    #[test]
    fn filter_whitespace_is_part_of_the_needle() {
        let rows = vec![row(1, "Acme", 10.0, "Open"), row(2, "Acme Corp", 20.0, "Open")];
        let cols = columns();
        let engine = TableEngine::new(&rows, &cols, "id");
        let mut s = state(10);
        s.set_filter("acme ".into());
        assert_eq!(ids(&engine.filtered_rows(&s)), vec!["2"]);
        s.set_filter("   ".into());
        assert!(engine.filtered_rows(&s).is_empty());
    }

    #[test]
    fn filter_ignores_cells_outside_configured_columns() {
        let mut rows = sample();
        rows[0].insert("secret", "needle");
        let cols = columns();
        let engine = TableEngine::new(&rows, &cols, "id");
        let mut s = state(10);
        s.set_filter("needle".into());
        assert!(engine.filtered_rows(&s).is_empty());
    }

    #[test]
    fn sort_is_stable_and_idempotent() {
        let rows = sample();
        let cols = columns();
        let engine = TableEngine::new(&rows, &cols, "id");
        let mut s = state(10);
        s.set_sort("amount", SortDirection::Ascending);
        let once = engine.filtered_rows(&s);
        assert_eq!(ids(&once), vec!["3", "1", "4", "2"]);

        let engine_again = TableEngine::new(&once, &cols, "id");
        let twice = engine_again.filtered_rows(&s);
        assert_eq!(once, twice);
    }

    #[test]
    fn descending_sort_keeps_missing_values_last() {
        let mut rows = sample();
        rows[1].remove("amount");
        let cols = columns();
        let engine = TableEngine::new(&rows, &cols, "id");
        let mut s = state(10);
        s.set_sort("amount", SortDirection::Descending);
        assert_eq!(ids(&engine.filtered_rows(&s)), vec!["1", "4", "3", "2"]);
    }

    #[test]
    fn select_all_touches_only_current_page() {
        let rows: Vec<DataRow> = (1..=12).map(|i| row(i, "v", i as f64, "Open")).collect();
        let cols = columns();
        let engine = TableEngine::new(&rows, &cols, "id");
        let mut s = state(5);
        s.set_page(1);
        engine.select_all_visible(&mut s, true);

        let selected = s.selected_ids();
        let mut expected: Vec<String> = (6..=10).map(|i| i.to_string()).collect();
        expected.sort();
        assert_eq!(selected, expected);
        assert!(!s.is_selected("5"));
        assert!(!s.is_selected("11"));
        assert!(engine.all_visible_selected(&s));

        s.set_page(0);
        assert!(!engine.any_visible_selected(&s));
    }

    #[test]
    fn select_all_filtered_covers_every_page() {
        let rows: Vec<DataRow> = (1..=12).map(|i| row(i, "v", i as f64, "Open")).collect();
        let cols = columns();
        let engine = TableEngine::new(&rows, &cols, "id");
        let mut s = state(5);
        engine.select_all_filtered(&mut s, true);
        assert_eq!(s.selected_ids().len(), 12);
    }

    #[test]
    fn pagination_splits_filtered_rows() {
        let rows: Vec<DataRow> = (1..=12).map(|i| row(i, "v", i as f64, "Open")).collect();
        let cols = columns();
        let engine = TableEngine::new(&rows, &cols, "id");
        let mut s = state(5);
        let page = engine.page(&s);
        assert_eq!((page.filtered_count, page.total_pages, page.rows.len()), (12, 3, 5));
        s.set_page(2);
        assert_eq!(ids(&engine.page(&s).rows), vec!["11", "12"]);
    }

    #[test]
    fn status_filter_restricts_to_one_group() {
        let rows = sample();
        let cols = columns();
        let engine = TableEngine::new(&rows, &cols, "id").with_group_key(Some("status"));
        let mut s = state(10);
        s.toggle_status("Open");
        assert_eq!(ids(&engine.filtered_rows(&s)), vec!["1", "4"]);
        s.toggle_status("Completed");
        assert_eq!(ids(&engine.filtered_rows(&s)), vec!["3"]);
        s.toggle_status("Completed");
        assert_eq!(engine.filtered_count(&s), 4);
    }
}
