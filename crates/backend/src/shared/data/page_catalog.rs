//! Каталог документов конфигурации страниц.
//!
//! Встроенные документы загружаются всегда, файлы из `[pages] dir`
//! добавляют новые модели или заменяют встроенные целиком.
//! Документ отдаётся клиенту исходным текстом, но в каталог попадает
//! только после успешной нормализации и проверки схемы.

use contracts::shared::data_api::ModelInfo;
use contracts::shared::page_config::builtin::BUILTIN_DOCUMENTS;
use contracts::shared::page_config::document::validate;
use contracts::shared::page_config::{parse_page_configuration, PageConfiguration, PageError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    Builtin,
    File(PathBuf),
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    text: String,
    config: PageConfiguration,
    source: DocumentSource,
}

#[derive(Debug, Clone, Default)]
pub struct PageCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl PageCatalog {
    pub fn builtin() -> Result<Self, PageError> {
        let mut catalog = Self::default();
        for (model, text) in BUILTIN_DOCUMENTS {
            catalog.add_document(model, text, DocumentSource::Builtin)?;
        }
        Ok(catalog)
    }

    /// Встроенные документы плюс файлы каталога.
    /// Некорректный файл пропускается с предупреждением.
    pub fn load(dir: Option<&Path>) -> anyhow::Result<Self> {
        let mut catalog = Self::builtin()?;
        let Some(dir) = dir else {
            return Ok(catalog);
        };
        if !dir.is_dir() {
            tracing::warn!("Pages directory not found: {}", dir.display());
            return Ok(catalog);
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let Some(model) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Cannot read page document {}: {}", path.display(), e);
                    continue;
                }
            };
            let replaced = catalog.contains(&model);
            match catalog.add_document(&model, &text, DocumentSource::File(path.clone())) {
                Ok(()) if replaced => tracing::info!("Page document '{}' overridden by {}", model, path.display()),
                Ok(()) => tracing::info!("Page document '{}' loaded from {}", model, path.display()),
                Err(e) => tracing::warn!("Skipping page document {}: {}", path.display(), e),
            }
        }

        Ok(catalog)
    }

    pub fn add_document(&mut self, model: &str, text: &str, source: DocumentSource) -> Result<(), PageError> {
        let config = parse_page_configuration(model, text)?;
        validate(&config)?;
        self.entries.insert(
            model.to_string(),
            CatalogEntry {
                text: text.to_string(),
                config,
                source,
            },
        );
        Ok(())
    }

    pub fn contains(&self, model: &str) -> bool {
        self.entries.contains_key(model)
    }

    pub fn document(&self, model: &str) -> Option<&str> {
        self.entries.get(model).map(|e| e.text.as_str())
    }

    pub fn config(&self, model: &str) -> Option<&PageConfiguration> {
        self.entries.get(model).map(|e| &e.config)
    }

    pub fn source(&self, model: &str) -> Option<&DocumentSource> {
        self.entries.get(model).map(|e| &e.source)
    }

    /// Пары (модель каталога, конфигурация)
    pub fn configs(&self) -> impl Iterator<Item = (&str, &PageConfiguration)> {
        self.entries.iter().map(|(model, e)| (model.as_str(), &e.config))
    }

    pub fn models(&self) -> Vec<ModelInfo> {
        self.entries
            .iter()
            .map(|(model, e)| ModelInfo {
                model: model.clone(),
                title: e.config.title.clone(),
                entry_view: e.config.entry_view().map(str::to_string),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_lists_every_model() {
        let catalog = PageCatalog::builtin().unwrap();
        let models: Vec<String> = catalog.models().into_iter().map(|m| m.model).collect();
        assert_eq!(models, vec!["purchase_list", "purchase_order", "sales_order"]);
        assert_eq!(catalog.source("sales_order"), Some(&DocumentSource::Builtin));
        assert!(catalog.document("purchage_order").is_none());
    }

    #[test]
    fn file_document_replaces_builtin() {
        let mut catalog = PageCatalog::builtin().unwrap();
        let text = r#"{ "title": "Orders v2", "views": { "list": { "component": "ListView" } } }"#;
        catalog
            .add_document("sales_order", text, DocumentSource::File(PathBuf::from("sales_order.json")))
            .unwrap();
        assert_eq!(catalog.document("sales_order"), Some(text));
        assert_eq!(catalog.config("sales_order").unwrap().view_names(), vec!["list"]);
    }

    #[test]
    fn malformed_document_keeps_previous_entry() {
        let mut catalog = PageCatalog::builtin().unwrap();
        let before = catalog.document("purchase_order").map(str::to_string);
        let err = catalog
            .add_document("purchase_order", r#"{ "views": {} }"#, DocumentSource::Builtin)
            .unwrap_err();
        assert!(matches!(err, PageError::MalformedConfiguration { .. }));
        assert_eq!(catalog.document("purchase_order").map(str::to_string), before);
    }

    #[test]
    fn missing_directory_falls_back_to_builtins() {
        let catalog = PageCatalog::load(Some(Path::new("/nonexistent/pages-dir"))).unwrap();
        assert_eq!(catalog.models().len(), BUILTIN_DOCUMENTS.len());
    }
}
