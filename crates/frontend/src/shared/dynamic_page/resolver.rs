use contracts::shared::page_config::{PageConfiguration, PageError, ViewConfiguration};

/// Выбранное представление и все представления модели в порядке документа
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedView {
    pub name: String,
    pub config: ViewConfiguration,
    pub available_views: Vec<String>,
}

/// Ищет запрошенное представление. Отсутствие представления это ошибка,
/// подмена на представление по умолчанию не выполняется.
pub fn resolve_view(config: &PageConfiguration, requested_view: &str) -> Result<ResolvedView, PageError> {
    match config.view(requested_view) {
        Some(view) => Ok(ResolvedView {
            name: requested_view.to_string(),
            config: view.clone(),
            available_views: config.view_names(),
        }),
        None => Err(PageError::ViewNotFound {
            model: config.model.clone(),
            view: requested_view.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::page_config::{parse_page_configuration, ComponentKind, LEGACY_VIEW_NAME};

    fn config() -> PageConfiguration {
        parse_page_configuration(
            "orders",
            r#"{ "views": {
                "list": { "component": "ListView" },
                "create": { "component": "FormView" },
                "view": { "component": "DetailView" }
            } }"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_iff_view_is_a_key() {
        let config = config();
        for name in ["list", "create", "view"] {
            let resolved = resolve_view(&config, name).unwrap();
            assert_eq!(resolved.name, name);
            assert_eq!(resolved.available_views, vec!["list", "create", "view"]);
        }
        for name in ["edit", "board", "", "LIST"] {
            assert_eq!(
                resolve_view(&config, name),
                Err(PageError::ViewNotFound { model: "orders".into(), view: name.into() })
            );
        }
    }

    #[test]
    fn removed_view_is_not_found_after_reload() {
        let mut config = config();
        assert!(resolve_view(&config, "view").is_ok());
        config.views.retain(|v| v.name != "view");
        assert!(matches!(resolve_view(&config, "view"), Err(PageError::ViewNotFound { .. })));
    }

    #[test]
    fn legacy_shape_exposes_single_create_view() {
        let config =
            parse_page_configuration("sale", r#"{ "pageConfig": { "title": "New sale" } }"#).unwrap();
        let resolved = resolve_view(&config, LEGACY_VIEW_NAME).unwrap();
        assert_eq!(resolved.config.component, ComponentKind::FormView);
        assert_eq!(resolved.available_views, vec![LEGACY_VIEW_NAME]);
        assert!(resolve_view(&config, "list").is_err());
    }
}
