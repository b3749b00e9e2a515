use contracts::shared::page_config::{DisplayMode, ViewConfiguration};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

/// Состояние одной отрисованной страницы.
///
/// Создаётся при монтировании страницы и выбрасывается при уходе с модели,
/// поэтому фильтры не переносятся между несвязанными записями.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub active_view: String,
    pub filter: String,
    pub sort: Option<SortState>,
    /// id строки → отмечена
    pub selection: BTreeMap<String, bool>,
    pub page: usize,
    pub page_size: usize,
    pub status_filter: Option<String>,
    pub display_mode: DisplayMode,
    /// Строка в режиме инлайн-редактирования
    pub editing_row: Option<String>,
}

impl ViewState {
    pub fn new(active_view: &str, config: &ViewConfiguration) -> Self {
        Self {
            active_view: active_view.to_string(),
            filter: String::new(),
            sort: None,
            selection: BTreeMap::new(),
            page: 0,
            page_size: config.effective_page_size(),
            status_filter: None,
            display_mode: config.default_display,
            editing_row: None,
        }
    }

    pub fn set_filter(&mut self, filter: String) {
        if self.filter != filter {
            self.filter = filter;
            self.page = 0;
        }
    }

    /// Повторный клик по той же колонке меняет направление,
    /// клик по другой колонке заменяет сортировку.
    pub fn toggle_sort(&mut self, key: &str) {
        self.sort = Some(match self.sort.take() {
            Some(current) if current.key == key => SortState {
                key: current.key,
                direction: match current.direction {
                    SortDirection::Ascending => SortDirection::Descending,
                    SortDirection::Descending => SortDirection::Ascending,
                },
            },
            _ => SortState {
                key: key.to_string(),
                direction: SortDirection::Ascending,
            },
        });
        self.page = 0;
    }

    pub fn set_sort(&mut self, key: &str, direction: SortDirection) {
        self.sort = Some(SortState {
            key: key.to_string(),
            direction,
        });
        self.page = 0;
    }

    /// Выбор уже активной группы сбрасывает фильтр, другая группа его заменяет
    pub fn toggle_status(&mut self, group: &str) {
        if self.status_filter.as_deref() == Some(group) {
            self.status_filter = None;
        } else {
            self.status_filter = Some(group.to_string());
        }
        self.page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size > 0 {
            self.page_size = page_size;
            self.page = 0;
        }
    }

    /// После удаления номер страницы не должен выходить за последнюю страницу
    pub fn clamp_page(&mut self, filtered_count: usize) {
        let pages = page_count(filtered_count, self.page_size);
        if pages == 0 {
            self.page = 0;
        } else if self.page >= pages {
            self.page = pages - 1;
        }
    }

    pub fn set_selected(&mut self, id: &str, checked: bool) {
        self.selection.insert(id.to_string(), checked);
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.get(id).copied().unwrap_or(false)
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selection
            .iter()
            .filter(|(_, checked)| **checked)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Удалённые строки не должны оставаться в выборе
    pub fn forget_rows(&mut self, ids: &[String]) {
        for id in ids {
            self.selection.remove(id);
        }
        if self
            .editing_row
            .as_ref()
            .map(|e| ids.contains(e))
            .unwrap_or(false)
        {
            self.editing_row = None;
        }
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
    }
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::page_config::ComponentKind;

    fn state() -> ViewState {
        let mut config = ViewConfiguration::new(ComponentKind::ListView);
        config.page_size = Some(5);
        ViewState::new("list", &config)
    }

    #[test]
    fn toggling_same_status_clears_filter() {
        let mut s = state();
        s.toggle_status("Open");
        assert_eq!(s.status_filter.as_deref(), Some("Open"));
        s.toggle_status("Open");
        assert_eq!(s.status_filter, None);
    }

    #[test]
    fn toggling_other_status_replaces_filter() {
        let mut s = state();
        s.toggle_status("Open");
        s.toggle_status("Completed");
        assert_eq!(s.status_filter.as_deref(), Some("Completed"));
    }

    #[test]
    fn sort_toggles_direction_and_replaces_column() {
        let mut s = state();
        s.toggle_sort("amount");
        assert_eq!(s.sort.as_ref().unwrap().direction, SortDirection::Ascending);
        s.toggle_sort("amount");
        assert_eq!(s.sort.as_ref().unwrap().direction, SortDirection::Descending);
        s.toggle_sort("vendor");
        let sort = s.sort.as_ref().unwrap();
        assert_eq!(sort.key, "vendor");
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn filter_sort_status_and_page_size_reset_page() {
        let mut s = state();
        s.set_page(3);
        s.set_filter("acme".into());
        assert_eq!(s.page, 0);
        s.set_page(2);
        s.toggle_sort("vendor");
        assert_eq!(s.page, 0);
        s.set_page(2);
        s.toggle_status("Open");
        assert_eq!(s.page, 0);
        s.set_page(2);
        s.set_page_size(20);
        assert_eq!((s.page, s.page_size), (0, 20));
    }

    #[test]
    fn clamp_page_after_shrink() {
        let mut s = state();
        s.set_page(2);
        s.clamp_page(10);
        assert_eq!(s.page, 1);
        s.clamp_page(0);
        assert_eq!(s.page, 0);
    }

    #[test]
    fn default_page_size_is_explicit() {
        let config = ViewConfiguration::new(ComponentKind::TableView);
        let s = ViewState::new("list", &config);
        assert_eq!(s.page_size, contracts::shared::page_config::DEFAULT_PAGE_SIZE);
    }
}
