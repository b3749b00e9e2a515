//! Диспетчер действий конфигурации.
//!
//! Действие превращается в [`Effect`], который исполняет страница:
//! переход, удаление (с подтверждением), импорт, экспорт или начало
//! инлайн-редактирования. Все побочные эффекты собраны здесь.

use super::navigation::AppRoute;
use contracts::shared::page_config::{ActionEffect, ActionSpec, EditMode, ExportFormat};
use contracts::system::auth::has_access;

/// Сообщение подтверждения, если конфигурация его не задаёт
pub const DEFAULT_CONFIRM_MESSAGE: &str = "Are you sure?";

/// Контекст вызова действия
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub module: &'a str,
    pub model: &'a str,
    pub page_title: &'a str,
    pub view: &'a str,
    pub record_id: Option<&'a str>,
    pub edit_mode: EditMode,
    pub user_role: Option<&'a str>,
    pub available_views: &'a [String],
}

impl<'a> ActionContext<'a> {
    pub fn for_record(self, record_id: &'a str) -> Self {
        Self {
            record_id: Some(record_id),
            ..self
        }
    }

    fn has_view(&self, view: &str) -> bool {
        self.available_views.iter().any(|v| v == view)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Navigate(String),
    /// Удаление строки; `confirm` содержит текст вопроса, если нужно подтверждение
    Delete { id: String, confirm: Option<String> },
    Import,
    Export(ExportFormat),
    BeginInlineEdit(String),
    Custom(String),
    /// Действие неприменимо в этом контексте
    Rejected(String),
}

fn fill(template: &str, ctx: &ActionContext, id: &str) -> String {
    template
        .replace("{{module}}", ctx.module)
        .replace("{{model}}", ctx.model)
        .replace("{{pageTitle}}", ctx.page_title)
        .replace("{{view}}", ctx.view)
        .replace("{{id}}", id)
}

/// Подстановка `{{module}}`, `{{model}}`, `{{pageTitle}}`, `{{view}}`, `{{id}}`
pub fn substitute(template: &str, ctx: &ActionContext) -> String {
    fill(template, ctx, ctx.record_id.unwrap_or_default())
}

/// Как [`substitute`], но id записи кодируется как сегмент пути
pub fn substitute_route(template: &str, ctx: &ActionContext) -> String {
    let id = urlencoding::encode(ctx.record_id.unwrap_or_default());
    fill(template, ctx, &id)
}

pub fn label(action: &ActionSpec, ctx: &ActionContext) -> String {
    let text = if action.label.is_empty() {
        &action.id
    } else {
        &action.label
    };
    substitute(text, ctx)
}

fn navigate_path(action: &ActionSpec, ctx: &ActionContext) -> String {
    match &action.route {
        Some(route) => substitute_route(route, ctx),
        None => match ctx.record_id {
            Some(id) => format!(
                "/{}/{}/{}",
                ctx.module,
                action.id,
                urlencoding::encode(id)
            ),
            None => format!("/{}/{}", ctx.module, action.id),
        },
    }
}

/// Представление этой же модели, на которое ведёт действие
pub fn target_view(action: &ActionSpec, ctx: &ActionContext) -> Option<String> {
    match action.effect {
        ActionEffect::Navigate => match AppRoute::parse(&navigate_path(action, ctx)) {
            AppRoute::Page(page) if page.model == ctx.module => Some(page.view),
            _ => None,
        },
        ActionEffect::Edit if ctx.edit_mode == EditMode::Route => Some("edit".to_string()),
        _ => None,
    }
}

/// Действие не отображается, если роль пользователя не подходит или
/// целевое представление модели отсутствует в конфигурации.
pub fn is_visible(action: &ActionSpec, ctx: &ActionContext) -> bool {
    if !has_access(&action.roles, ctx.user_role) {
        return false;
    }
    match target_view(action, ctx) {
        Some(view) => ctx.has_view(&view),
        None => true,
    }
}

pub fn dispatch(action: &ActionSpec, ctx: &ActionContext) -> Effect {
    if !has_access(&action.roles, ctx.user_role) {
        return Effect::Rejected(format!("Недостаточно прав для действия '{}'", action.id));
    }

    let effect = match action.effect {
        ActionEffect::Navigate => Effect::Navigate(navigate_path(action, ctx)),
        ActionEffect::Delete => match ctx.record_id {
            Some(id) => Effect::Delete {
                id: id.to_string(),
                confirm: action.confirm.as_ref().filter(|c| c.enabled).map(|c| {
                    c.message
                        .as_deref()
                        .map(|m| substitute(m, ctx))
                        .unwrap_or_else(|| DEFAULT_CONFIRM_MESSAGE.to_string())
                }),
            },
            None => Effect::Rejected("Не выбрана запись для удаления".to_string()),
        },
        ActionEffect::Edit => match (ctx.record_id, ctx.edit_mode) {
            (Some(id), EditMode::Route) => Effect::Navigate(format!(
                "/{}/edit/{}",
                ctx.module,
                urlencoding::encode(id)
            )),
            (Some(id), EditMode::Inline) => Effect::BeginInlineEdit(id.to_string()),
            (None, _) => Effect::Rejected("Не выбрана запись для редактирования".to_string()),
        },
        ActionEffect::Import => Effect::Import,
        ActionEffect::Export => Effect::Export(action.format.unwrap_or_default()),
        ActionEffect::Custom => Effect::Custom(action.id.clone()),
    };
    log::debug!("dispatch {} ({:?}) -> {:?}", action.id, action.effect, effect);
    effect
}

/// Стандартные кнопки карточки записи
#[derive(Debug, Clone, PartialEq)]
pub enum DetailAction {
    Back(String),
    Edit(String),
}

/// "Назад" есть только при наличии представления `list`, "Изменить" только при `edit`
pub fn detail_actions(ctx: &ActionContext) -> Vec<DetailAction> {
    let mut actions = Vec::new();
    if ctx.has_view("list") {
        actions.push(DetailAction::Back(format!("/{}/list", ctx.module)));
    }
    if let Some(id) = ctx.record_id {
        if ctx.has_view("edit") {
            actions.push(DetailAction::Edit(format!(
                "/{}/edit/{}",
                ctx.module,
                urlencoding::encode(id)
            )));
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::dynamic_page::navigation::PageRoute;

    fn action(json: serde_json::Value) -> ActionSpec {
        serde_json::from_value(json).unwrap()
    }

    fn views(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn ctx<'a>(available: &'a [String], role: Option<&'a str>) -> ActionContext<'a> {
        ActionContext {
            module: "sales_order",
            model: "sales_order",
            page_title: "Sales Orders",
            view: "list",
            record_id: None,
            edit_mode: EditMode::Route,
            user_role: role,
            available_views: available,
        }
    }

    #[test]
    fn navigate_substitutes_placeholders() {
        let available = views(&["list", "create"]);
        let a = action(serde_json::json!({
            "id": "create", "label": "New {{pageTitle}}", "effect": "navigate", "route": "/{{module}}/create"
        }));
        let c = ctx(&available, Some("admin"));
        assert_eq!(dispatch(&a, &c), Effect::Navigate("/sales_order/create".into()));
        assert_eq!(label(&a, &c), "New Sales Orders");
    }

    #[test]
    fn row_navigate_defaults_to_module_action_id() {
        let available = views(&["list", "view"]);
        let a = action(serde_json::json!({ "id": "view", "effect": "navigate" }));
        let c = ctx(&available, None).for_record("SO-1");
        assert_eq!(dispatch(&a, &c), Effect::Navigate("/sales_order/view/SO-1".into()));
    }

    #[test]
    fn route_template_encodes_record_id() {
        let available = views(&["list", "view"]);
        let a = action(serde_json::json!({
            "id": "open", "label": "Open {{id}}", "effect": "navigate", "route": "/{{module}}/view/{{id}}"
        }));
        let c = ctx(&available, None).for_record("SO/2024 1");
        let Effect::Navigate(path) = dispatch(&a, &c) else {
            panic!("navigate effect expected");
        };
        assert_eq!(path, "/sales_order/view/SO%2F2024%201");
        assert_eq!(
            AppRoute::parse(&path),
            AppRoute::Page(PageRoute::new("sales_order", "view", Some("SO/2024 1")))
        );
        assert_eq!(label(&a, &c), "Open SO/2024 1");
        assert!(is_visible(&a, &c));
    }

    #[test]
    fn delete_uses_configured_or_default_confirmation() {
        let available = views(&["list"]);
        let c = ctx(&available, Some("admin")).for_record("7");
        let with_message = action(serde_json::json!({
            "id": "delete", "effect": "delete", "confirm": { "enabled": true, "message": "Delete {{id}}?" }
        }));
        assert_eq!(
            dispatch(&with_message, &c),
            Effect::Delete { id: "7".into(), confirm: Some("Delete 7?".into()) }
        );
        let flag_only = action(serde_json::json!({ "id": "delete", "effect": "delete", "confirm": true }));
        assert_eq!(
            dispatch(&flag_only, &c),
            Effect::Delete { id: "7".into(), confirm: Some(DEFAULT_CONFIRM_MESSAGE.into()) }
        );
        let no_confirm = action(serde_json::json!({ "id": "delete", "effect": "delete" }));
        assert_eq!(dispatch(&no_confirm, &c), Effect::Delete { id: "7".into(), confirm: None });
    }

    #[test]
    fn edit_strategy_follows_configuration() {
        let available = views(&["list", "edit"]);
        let a = action(serde_json::json!({ "id": "edit", "effect": "edit" }));
        let route_ctx = ctx(&available, None).for_record("3");
        assert_eq!(dispatch(&a, &route_ctx), Effect::Navigate("/sales_order/edit/3".into()));
        let inline_ctx = ActionContext { edit_mode: EditMode::Inline, ..route_ctx };
        assert_eq!(dispatch(&a, &inline_ctx), Effect::BeginInlineEdit("3".into()));
    }

    #[test]
    fn role_gated_action_is_hidden_and_rejected() {
        let available = views(&["list"]);
        let a = action(serde_json::json!({ "id": "delete", "effect": "delete", "roles": ["admin"] }));
        let sales = ctx(&available, Some("sales")).for_record("1");
        assert!(!is_visible(&a, &sales));
        assert!(matches!(dispatch(&a, &sales), Effect::Rejected(_)));
        assert!(!is_visible(&a, &ctx(&available, None)));
        assert!(is_visible(&a, &ctx(&available, Some("admin"))));
    }

    #[test]
    fn actions_targeting_missing_views_are_not_rendered() {
        let available = views(&["list", "view"]);
        let c = ctx(&available, None);
        let create = action(serde_json::json!({ "id": "create", "effect": "navigate", "route": "/{{module}}/create" }));
        let view = action(serde_json::json!({ "id": "view", "effect": "navigate" }));
        let edit = action(serde_json::json!({ "id": "edit", "effect": "edit" }));
        let export = action(serde_json::json!({ "id": "export", "effect": "export", "format": "json" }));
        assert!(!is_visible(&create, &c));
        assert!(is_visible(&view, &c));
        assert!(!is_visible(&edit, &c));
        assert!(is_visible(&export, &c));
        assert_eq!(dispatch(&export, &c), Effect::Export(ExportFormat::Json));
    }

    #[test]
    fn detail_actions_depend_on_available_views() {
        let all = views(&["list", "edit", "view"]);
        let c = ctx(&all, None).for_record("9");
        assert_eq!(
            detail_actions(&c),
            vec![
                DetailAction::Back("/sales_order/list".into()),
                DetailAction::Edit("/sales_order/edit/9".into())
            ]
        );
        let only_view = views(&["view"]);
        assert!(detail_actions(&ctx(&only_view, None).for_record("9")).is_empty());
    }

    #[test]
    fn delete_without_record_is_rejected() {
        let available = views(&["list"]);
        let a = action(serde_json::json!({ "id": "delete", "effect": "delete" }));
        assert!(matches!(dispatch(&a, &ctx(&available, None)), Effect::Rejected(_)));
    }
}
