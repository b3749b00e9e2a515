//! Разбор JSON-документа конфигурации и приведение к нормализованной форме.
//!
//! Документ бывает двух видов:
//! - многопредставленческий: ключ `views` с отображением имя → представление;
//! - старый плоский: маркер `pageConfig`, весь документ описывает одно
//!   представление с именем `create`.
//!
//! Дальше адаптера система видит только [`PageConfiguration`].
//! Ошибки схемы обнаруживаются здесь, а не во время отрисовки.

use super::error::PageError;
use super::schema::{
    ActionSpec, ColumnSpec, ComponentKind, DataSourceKind, DisplayMode, EmptyState, FieldSpec,
    FieldType, KanbanConfig, NamedView, PageConfiguration, StatusSummary, ViewConfiguration,
};
use crate::shared::data_row::DataRow;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Имя единственного представления плоского документа
pub const LEGACY_VIEW_NAME: &str = "create";

const DEFAULT_ROW_KEY: &str = "id";

/// Документ до нормализации
#[derive(Debug, Clone)]
pub enum PageDocument {
    MultiView {
        header: DocumentHeader,
        views: Map<String, Value>,
    },
    Legacy {
        header: DocumentHeader,
        body: Map<String, Value>,
    },
}

/// Общие для обеих форм поля верхнего уровня
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHeader {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub row_key: Option<String>,
    #[serde(default)]
    pub data_source: DataSourceKind,
    #[serde(default)]
    pub sample_data: Vec<DataRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPageConfig {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    component: Option<String>,
    #[serde(default)]
    page_size: Option<usize>,
    #[serde(default)]
    default_view: DisplayMode,
    #[serde(default)]
    search_placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyToggle {
    #[serde(default)]
    enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyRowActions {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    items: Vec<ActionSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyTableConfig {
    #[serde(default)]
    columns: Vec<ColumnSpec>,
    #[serde(default)]
    row_selection: LegacyToggle,
    #[serde(default)]
    actions: LegacyRowActions,
    #[serde(default)]
    sequence_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyHeaderActions {
    #[serde(default)]
    primary: Vec<ActionSpec>,
    #[serde(default)]
    secondary: Vec<ActionSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyBody {
    #[serde(default)]
    page_config: LegacyPageConfig,
    #[serde(default)]
    table_config: LegacyTableConfig,
    #[serde(default)]
    header_actions: LegacyHeaderActions,
    #[serde(default)]
    status_summary: Option<StatusSummary>,
    #[serde(default)]
    kanban_config: Option<KanbanConfig>,
    #[serde(default)]
    fields: Vec<FieldSpec>,
    #[serde(default)]
    empty_state: EmptyState,
    #[serde(default)]
    status_colors: BTreeMap<String, String>,
}

impl PageDocument {
    pub fn from_json_str(model: &str, text: &str) -> Result<PageDocument, PageError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| PageError::malformed(model, "$", format!("невалидный JSON: {}", e)))?;
        PageDocument::from_value(model, value)
    }

    /// Определяет форму документа по наличию `views` или `pageConfig`
    pub fn from_value(model: &str, value: Value) -> Result<PageDocument, PageError> {
        let Value::Object(mut map) = value else {
            return Err(PageError::malformed(model, "$", "документ должен быть объектом"));
        };

        let views = map.remove("views");
        let is_legacy = map.contains_key("pageConfig");
        let header: DocumentHeader = parse_part(model, "$", Value::Object(map.clone()))?;

        match views {
            Some(Value::Object(views)) => Ok(PageDocument::MultiView { header, views }),
            Some(_) => Err(PageError::malformed(model, "views", "ожидался объект представлений")),
            None if is_legacy => Ok(PageDocument::Legacy { header, body: map }),
            None => Err(PageError::malformed(
                model,
                "views",
                "документ не содержит ни 'views', ни 'pageConfig'",
            )),
        }
    }

    /// Приведение к многопредставленческой форме с проверкой схемы
    pub fn normalize(self, model: &str) -> Result<PageConfiguration, PageError> {
        let config = match self {
            PageDocument::MultiView { header, views } => {
                let mut named = Vec::with_capacity(views.len());
                for (name, raw) in views {
                    named.push(NamedView {
                        config: parse_view(model, &name, raw)?,
                        name,
                    });
                }
                assemble(model, header, named, false, None)
            }
            PageDocument::Legacy { header, body } => {
                let legacy: LegacyBody = parse_part(model, "$", Value::Object(body))?;
                let title = legacy.page_config.title.clone();
                let view = legacy_view(legacy);
                assemble(
                    model,
                    header,
                    vec![NamedView {
                        name: LEGACY_VIEW_NAME.to_string(),
                        config: view,
                    }],
                    true,
                    title,
                )
            }
        };
        validate(&config)?;
        Ok(config)
    }
}

/// Разбор и нормализация одним вызовом
pub fn parse_page_configuration(model: &str, text: &str) -> Result<PageConfiguration, PageError> {
    PageDocument::from_json_str(model, text)?.normalize(model)
}

fn parse_part<T: DeserializeOwned>(model: &str, key: &str, value: Value) -> Result<T, PageError> {
    serde_json::from_value(value).map_err(|e| PageError::malformed(model, key, e.to_string()))
}

fn parse_view(model: &str, name: &str, raw: Value) -> Result<ViewConfiguration, PageError> {
    let key = format!("views.{}", name);
    let Value::Object(map) = &raw else {
        return Err(PageError::malformed(model, key, "представление должно быть объектом"));
    };
    match map.get("component") {
        Some(Value::String(_)) => {}
        Some(_) => {
            return Err(PageError::malformed(
                model,
                format!("{}.component", key),
                "тег компонента должен быть строкой",
            ))
        }
        None => {
            return Err(PageError::malformed(
                model,
                format!("{}.component", key),
                "отсутствует тег компонента",
            ))
        }
    }
    parse_part(model, &key, raw)
}

fn legacy_view(legacy: LegacyBody) -> ViewConfiguration {
    let component = legacy
        .page_config
        .component
        .map(ComponentKind::from)
        .unwrap_or(ComponentKind::FormView);

    let mut actions: Vec<ActionSpec> = Vec::new();
    for mut action in legacy
        .header_actions
        .primary
        .into_iter()
        .chain(legacy.header_actions.secondary)
    {
        action.scope = super::schema::ActionScope::Page;
        actions.push(action);
    }
    if legacy.table_config.actions.enabled {
        actions.extend(legacy.table_config.actions.items);
    }

    let mut view = ViewConfiguration::new(component);
    view.title = legacy.page_config.title;
    view.columns = legacy.table_config.columns;
    view.fields = legacy.fields;
    view.actions = actions;
    view.status_summary = legacy.status_summary;
    view.kanban_config = legacy.kanban_config;
    view.status_colors = legacy.status_colors;
    view.page_size = legacy.page_config.page_size;
    view.row_selection = legacy.table_config.row_selection.enabled;
    view.sequence_key = legacy.table_config.sequence_key;
    view.default_display = legacy.page_config.default_view;
    view.empty_state = legacy.empty_state;
    view.search_placeholder = legacy.page_config.search_placeholder;
    view
}

fn assemble(
    model: &str,
    header: DocumentHeader,
    views: Vec<NamedView>,
    legacy: bool,
    fallback_title: Option<String>,
) -> PageConfiguration {
    let model_id = header.model.unwrap_or_else(|| model.to_string());
    PageConfiguration {
        module: header.module.unwrap_or_else(|| model_id.clone()),
        title: header
            .title
            .or(fallback_title)
            .unwrap_or_else(|| model_id.clone()),
        model: model_id,
        row_key: header.row_key.unwrap_or_else(|| DEFAULT_ROW_KEY.to_string()),
        data_source: header.data_source,
        sample_data: header.sample_data,
        views,
        legacy,
    }
}

/// Проверка схемы во время разрешения конфигурации
pub fn validate(config: &PageConfiguration) -> Result<(), PageError> {
    let model = config.model.as_str();
    if config.views.is_empty() {
        return Err(PageError::malformed(model, "views", "список представлений пуст"));
    }
    if config.row_key.trim().is_empty() {
        return Err(PageError::malformed(model, "rowKey", "ключ строки не может быть пустым"));
    }

    for named in &config.views {
        let path = format!("views.{}", named.name);
        let view = &named.config;

        for (i, column) in view.columns.iter().enumerate() {
            if column.key.trim().is_empty() {
                return Err(PageError::malformed(
                    model,
                    format!("{}.columns[{}].key", path, i),
                    "пустой ключ колонки",
                ));
            }
        }
        for (i, field) in view.fields.iter().enumerate() {
            if field.key.trim().is_empty() {
                return Err(PageError::malformed(
                    model,
                    format!("{}.fields[{}].key", path, i),
                    "пустой ключ поля",
                ));
            }
            if field.field_type == FieldType::Select && field.options.is_empty() {
                return Err(PageError::malformed(
                    model,
                    format!("{}.fields[{}].options", path, i),
                    format!("поле выбора '{}' без вариантов", field.key),
                ));
            }
        }
        if view.page_size == Some(0) {
            return Err(PageError::malformed(
                model,
                format!("{}.pageSize", path),
                "размер страницы должен быть больше нуля",
            ));
        }
        if view.component == ComponentKind::KanbanView && view.kanban_config.is_none() {
            return Err(PageError::malformed(
                model,
                format!("{}.kanbanConfig", path),
                "KanbanView требует kanbanConfig",
            ));
        }
        if let Some(kanban) = &view.kanban_config {
            if kanban.group_key.trim().is_empty() {
                return Err(PageError::malformed(
                    model,
                    format!("{}.kanbanConfig.groupKey", path),
                    "не указан ключ группировки",
                ));
            }
        }
        if let Some(summary) = &view.status_summary {
            if summary.group_key.trim().is_empty() {
                return Err(PageError::malformed(
                    model,
                    format!("{}.statusSummary.groupKey", path),
                    "не указан ключ группировки",
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTI: &str = r#"{
        "model": "orders",
        "title": "Orders",
        "views": {
            "list": { "component": "ListView", "columns": [ { "key": "id", "label": "ID" } ] },
            "create": { "component": "FormView", "fields": [ { "key": "vendor", "label": "Vendor", "required": true } ] },
            "view": { "component": "DetailView" }
        }
    }"#;

    fn malformed_key(err: PageError) -> String {
        match err {
            PageError::MalformedConfiguration { key, .. } => key,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn multi_view_keeps_document_order() {
        let config = parse_page_configuration("orders", MULTI).unwrap();
        assert_eq!(config.view_names(), vec!["list", "create", "view"]);
        assert_eq!(config.row_key, "id");
        assert_eq!(config.module, "orders");
        assert!(!config.legacy);
    }

    #[test]
    fn legacy_document_becomes_single_create_view() {
        let text = r#"{
            "pageConfig": { "title": "Purchases", "component": "ListView", "pageSize": 5 },
            "tableConfig": {
                "columns": [ { "key": "vendor", "label": "Vendor" } ],
                "rowSelection": { "enabled": true },
                "actions": { "enabled": true, "items": [ { "key": "edit", "label": "Edit", "action": "navigate" } ] }
            },
            "headerActions": { "primary": [ { "key": "import", "label": "Import", "action": "import" } ] }
        }"#;
        let config = parse_page_configuration("purchase_list", text).unwrap();
        assert!(config.legacy);
        assert_eq!(config.view_names(), vec![LEGACY_VIEW_NAME]);
        let view = config.view(LEGACY_VIEW_NAME).unwrap();
        assert_eq!(view.component, ComponentKind::ListView);
        assert_eq!(view.page_size, Some(5));
        assert!(view.row_selection);
        assert_eq!(view.page_actions().count(), 1);
        assert_eq!(view.row_actions().count(), 1);
        assert_eq!(config.title, "Purchases");
    }

    #[test]
    fn legacy_document_without_component_is_a_form() {
        let text = r#"{ "pageConfig": { "title": "New" }, "fields": [ { "name": "vendor" } ] }"#;
        let config = parse_page_configuration("sale", text).unwrap();
        let view = config.view(LEGACY_VIEW_NAME).unwrap();
        assert_eq!(view.component, ComponentKind::FormView);
        assert_eq!(view.fields[0].key, "vendor");
    }

    #[test]
    fn empty_views_is_malformed() {
        let err = parse_page_configuration("orders", r#"{ "views": {} }"#).unwrap_err();
        assert_eq!(malformed_key(err), "views");
    }

    #[test]
    fn missing_component_is_malformed_at_resolve_time() {
        let err = parse_page_configuration("orders", r#"{ "views": { "list": { "columns": [] } } }"#)
            .unwrap_err();
        assert_eq!(malformed_key(err), "views.list.component");
    }

    #[test]
    fn unknown_component_is_unregistered_not_malformed() {
        let config =
            parse_page_configuration("orders", r#"{ "views": { "chart": { "component": "PieChart" } } }"#)
                .unwrap();
        assert_eq!(
            config.view("chart").unwrap().component,
            ComponentKind::Unregistered("PieChart".to_string())
        );
    }

    #[test]
    fn unknown_column_type_is_malformed() {
        let text = r#"{ "views": { "list": { "component": "ListView", "columns": [ { "key": "a", "type": "sparkline" } ] } } }"#;
        let err = parse_page_configuration("orders", text).unwrap_err();
        assert_eq!(malformed_key(err), "views.list");
    }

    #[test]
    fn kanban_view_requires_group_key() {
        let text = r#"{ "views": { "board": { "component": "KanbanView" } } }"#;
        assert_eq!(
            malformed_key(parse_page_configuration("orders", text).unwrap_err()),
            "views.board.kanbanConfig"
        );
        let text = r#"{ "views": { "board": { "component": "KanbanView", "kanbanConfig": { "columns": [] } } } }"#;
        assert_eq!(
            malformed_key(parse_page_configuration("orders", text).unwrap_err()),
            "views.board.kanbanConfig.groupKey"
        );
    }

    #[test]
    fn zero_page_size_and_select_without_options_are_malformed() {
        let text = r#"{ "views": { "list": { "component": "ListView", "pageSize": 0 } } }"#;
        assert_eq!(
            malformed_key(parse_page_configuration("orders", text).unwrap_err()),
            "views.list.pageSize"
        );
        let text = r#"{ "views": { "create": { "component": "FormView", "fields": [ { "key": "status", "type": "select" } ] } } }"#;
        assert_eq!(
            malformed_key(parse_page_configuration("orders", text).unwrap_err()),
            "views.create.fields[0].options"
        );
    }

    #[test]
    fn document_without_views_or_marker_is_malformed() {
        let err = parse_page_configuration("orders", r#"{ "title": "x" }"#).unwrap_err();
        assert_eq!(malformed_key(err), "views");
        let err = parse_page_configuration("orders", "[1, 2]").unwrap_err();
        assert_eq!(malformed_key(err), "$");
    }
}
