//! Схема конфигурации страницы (JSON, ключи в camelCase).

use crate::shared::data_row::{CellValue, DataRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Размер страницы таблицы, если конфигурация его не задаёт
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Тег обобщённого компонента представления
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    ListView,
    FormView,
    DetailView,
    KanbanView,
    TableView,
    /// Неизвестный тег: отображается как ошибка "компонент не зарегистрирован"
    Unregistered(String),
}

impl ComponentKind {
    pub fn as_str(&self) -> &str {
        match self {
            ComponentKind::ListView => "ListView",
            ComponentKind::FormView => "FormView",
            ComponentKind::DetailView => "DetailView",
            ComponentKind::KanbanView => "KanbanView",
            ComponentKind::TableView => "TableView",
            ComponentKind::Unregistered(tag) => tag,
        }
    }

    pub fn is_registered(&self) -> bool {
        !matches!(self, ComponentKind::Unregistered(_))
    }

    /// Табличные компоненты работают через движок таблицы
    pub fn is_tabular(&self) -> bool {
        matches!(self, ComponentKind::ListView | ComponentKind::TableView)
    }
}

impl From<String> for ComponentKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "ListView" => ComponentKind::ListView,
            "FormView" => ComponentKind::FormView,
            "DetailView" => ComponentKind::DetailView,
            "KanbanView" => ComponentKind::KanbanView,
            "TableView" => ComponentKind::TableView,
            _ => ComponentKind::Unregistered(tag),
        }
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Currency,
    #[serde(alias = "status")]
    Badge,
    Select,
    Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub span: Option<u32>,
    #[serde(default)]
    pub editable: bool,
    #[serde(default = "default_true")]
    pub sortable: bool,
    /// Варианты для колонок типа select (инлайн-редактирование)
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

impl ColumnSpec {
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Date,
    Select,
    Textarea,
}

/// Вариант выбора: строка или объект `{ value, label }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawOption")]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Plain(String),
    Labeled { value: String, label: Option<String> },
}

impl From<RawOption> for FieldOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Plain(value) => FieldOption {
                label: value.clone(),
                value,
            },
            RawOption::Labeled { value, label } => FieldOption {
                label: label.unwrap_or_else(|| value.clone()),
                value,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    #[serde(alias = "name")]
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// `"today"` для поля даты означает текущую дату
    #[serde(default)]
    pub default_value: Option<CellValue>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub options: Vec<FieldOption>,
    #[serde(default)]
    pub validation: FieldValidation,
    #[serde(default)]
    pub span: Option<u32>,
}

impl FieldSpec {
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionEffect {
    Navigate,
    Delete,
    Import,
    Export,
    Edit,
    Custom,
}

/// Область действия: заголовок страницы или строка/карточка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionScope {
    Page,
    #[default]
    Row,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json;charset=utf-8",
        }
    }
}

/// Подтверждение: `true` или `{ "enabled": true, "message": "..." }`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawConfirm")]
pub struct ConfirmSpec {
    pub enabled: bool,
    pub message: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawConfirm {
    Flag(bool),
    Detailed {
        #[serde(default = "default_true")]
        enabled: bool,
        message: Option<String>,
    },
}

impl From<RawConfirm> for ConfirmSpec {
    fn from(raw: RawConfirm) -> Self {
        match raw {
            RawConfirm::Flag(enabled) => ConfirmSpec {
                enabled,
                message: None,
            },
            RawConfirm::Detailed { enabled, message } => ConfirmSpec { enabled, message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSpec {
    #[serde(alias = "key")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(alias = "action")]
    pub effect: ActionEffect,
    /// Шаблон маршрута с подстановками `{{module}}`, `{{id}}` и т.п.
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub confirm: Option<ConfirmSpec>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub scope: ActionScope,
    #[serde(default)]
    pub format: Option<ExportFormat>,
    #[serde(default)]
    pub tooltip: Option<String>,
    /// Вариант кнопки: primary, secondary, danger
    #[serde(default)]
    pub variant: Option<String>,
}

impl ActionSpec {
    /// Импорт и экспорт всегда относятся к странице целиком
    pub fn is_page_level(&self) -> bool {
        self.scope == ActionScope::Page
            || matches!(self.effect, ActionEffect::Import | ActionEffect::Export)
    }

    pub fn needs_confirmation(&self) -> bool {
        self.confirm.as_ref().map(|c| c.enabled).unwrap_or(false)
    }
}

/// Группа статуса: колонка канбана или карточка сводки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSpec {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub threshold: Option<usize>,
}

impl GroupSpec {
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    #[serde(default)]
    pub group_key: String,
    #[serde(default)]
    pub amount_key: Option<String>,
    #[serde(alias = "groups", default)]
    pub cards: Vec<GroupSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanConfig {
    #[serde(default)]
    pub group_key: String,
    #[serde(default)]
    pub columns: Vec<GroupSpec>,
    #[serde(default)]
    pub title_key: Option<String>,
    #[serde(default)]
    pub card_fields: Vec<ColumnSpec>,
    #[serde(default)]
    pub card_actions: Vec<ActionSpec>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyState {
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub kanban: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    #[default]
    Route,
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Table,
    Kanban,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Local,
    Api,
}

/// Одно отображаемое представление модели
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfiguration {
    pub component: ComponentKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
    #[serde(default)]
    pub status_summary: Option<StatusSummary>,
    #[serde(default)]
    pub kanban_config: Option<KanbanConfig>,
    /// Статус → цвет для колонок типа badge
    #[serde(default)]
    pub status_colors: BTreeMap<String, String>,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub page_size_options: Vec<usize>,
    #[serde(default)]
    pub row_selection: bool,
    /// Порядковое поле, перенумеровываемое после удаления
    #[serde(default)]
    pub sequence_key: Option<String>,
    #[serde(default)]
    pub edit_mode: EditMode,
    #[serde(default)]
    pub default_display: DisplayMode,
    #[serde(default)]
    pub form_columns: Option<u8>,
    #[serde(default)]
    pub empty_state: EmptyState,
    #[serde(default)]
    pub search_placeholder: Option<String>,
}

impl ViewConfiguration {
    pub fn new(component: ComponentKind) -> Self {
        Self {
            component,
            title: None,
            columns: Vec::new(),
            fields: Vec::new(),
            actions: Vec::new(),
            status_summary: None,
            kanban_config: None,
            status_colors: BTreeMap::new(),
            page_size: None,
            page_size_options: Vec::new(),
            row_selection: false,
            sequence_key: None,
            edit_mode: EditMode::default(),
            default_display: DisplayMode::default(),
            form_columns: None,
            empty_state: EmptyState::default(),
            search_placeholder: None,
        }
    }

    pub fn effective_page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn page_actions(&self) -> impl Iterator<Item = &ActionSpec> {
        self.actions.iter().filter(|a| a.is_page_level())
    }

    pub fn row_actions(&self) -> impl Iterator<Item = &ActionSpec> {
        self.actions.iter().filter(|a| !a.is_page_level())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedView {
    pub name: String,
    pub config: ViewConfiguration,
}

/// Нормализованная конфигурация модели: всегда многопредставленческая форма.
/// Загружается один раз, не изменяется, заменяется целиком при перезагрузке.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfiguration {
    pub model: String,
    /// Сегмент маршрута для шаблонов `{{module}}`
    pub module: String,
    pub title: String,
    pub row_key: String,
    pub data_source: DataSourceKind,
    pub sample_data: Vec<DataRow>,
    pub views: Vec<NamedView>,
    /// Документ был в старой плоской форме
    pub legacy: bool,
}

impl PageConfiguration {
    pub fn view(&self, name: &str) -> Option<&ViewConfiguration> {
        self.views.iter().find(|v| v.name == name).map(|v| &v.config)
    }

    /// Имена представлений в порядке документа
    pub fn view_names(&self) -> Vec<String> {
        self.views.iter().map(|v| v.name.clone()).collect()
    }

    pub fn has_view(&self, name: &str) -> bool {
        self.views.iter().any(|v| v.name == name)
    }

    /// Первое представление, с которого начинается навигация по модели
    pub fn entry_view(&self) -> Option<&str> {
        self.views.first().map(|v| v.name.as_str())
    }
}

fn default_true() -> bool {
    true
}
