//! Встроенные документы конфигурации (`crates/contracts/pages/*.json`)

/// Модель → исходный JSON документа
pub const BUILTIN_DOCUMENTS: &[(&str, &str)] = &[
    ("sales_order", include_str!("../../../pages/sales_order.json")),
    ("purchase_order", include_str!("../../../pages/purchase_order.json")),
    ("purchase_list", include_str!("../../../pages/purchase_list.json")),
];

pub fn builtin_document(model: &str) -> Option<&'static str> {
    BUILTIN_DOCUMENTS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, text)| *text)
}

pub fn builtin_models() -> impl Iterator<Item = &'static str> {
    BUILTIN_DOCUMENTS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::page_config::{parse_page_configuration, ComponentKind};

    #[test]
    fn every_builtin_document_normalizes() {
        for (model, text) in BUILTIN_DOCUMENTS {
            let config = parse_page_configuration(model, text)
                .unwrap_or_else(|e| panic!("{}: {}", model, e));
            assert_eq!(config.model, *model);
            assert!(!config.views.is_empty());
            assert!(config.views.iter().all(|v| v.config.component.is_registered()));
        }
    }

    #[test]
    fn sales_order_exposes_crud_views_in_order() {
        let config = parse_page_configuration("sales_order", builtin_document("sales_order").unwrap())
            .unwrap();
        assert_eq!(config.view_names(), vec!["list", "board", "create", "edit", "view"]);
        assert_eq!(config.view("board").unwrap().component, ComponentKind::KanbanView);
        assert!(!config.sample_data.is_empty());
    }

    #[test]
    fn unknown_model_has_no_document() {
        assert!(builtin_document("purchage_order").is_none());
        assert_eq!(builtin_models().count(), BUILTIN_DOCUMENTS.len());
    }
}
