//! Реестр конфигураций: модель → нормализованная конфигурация страницы.
//!
//! Источник либо встроенные документы, либо сервис конфигурации.
//! Конфигурация загружается один раз за сессию, не изменяется
//! и заменяется целиком при перезагрузке. Ошибки схемы обнаруживаются
//! при разрешении, а не при отрисовке.

use super::api;
use contracts::shared::data_api::ModelInfo;
use contracts::shared::page_config::builtin::{builtin_document, builtin_models};
use contracts::shared::page_config::{parse_page_configuration, PageConfiguration, PageError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrySource {
    /// Статический поиск во встроенных документах
    Embedded,
    /// `GET /api/page-config/{model}`
    Remote,
}

#[derive(Clone)]
pub struct ConfigRegistry {
    source: RegistrySource,
    cache: Arc<RwLock<HashMap<String, Arc<PageConfiguration>>>>,
}

impl ConfigRegistry {
    pub fn new(source: RegistrySource) -> Self {
        Self {
            source,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn cached(&self, model: &str) -> Option<Arc<PageConfiguration>> {
        match self.cache.read() {
            Ok(cache) => cache.get(model).cloned(),
            Err(poisoned) => poisoned.into_inner().get(model).cloned(),
        }
    }

    fn store(&self, config: PageConfiguration, model: &str) -> Arc<PageConfiguration> {
        let config = Arc::new(config);
        let mut cache = match self.cache.write() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.insert(model.to_string(), config.clone());
        config
    }

    /// Сбрасывает закэшированную конфигурацию; следующий `resolve` загрузит её заново
    pub fn invalidate(&self, model: &str) {
        let mut cache = match self.cache.write() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.remove(model);
    }

    /// Синхронный поиск во встроенных документах
    pub fn resolve_embedded(&self, model: &str) -> Result<Arc<PageConfiguration>, PageError> {
        if let Some(config) = self.cached(model) {
            return Ok(config);
        }
        let text = lookup_model(model)?;
        let config = parse_page_configuration(model, text)?;
        Ok(self.store(config, model))
    }

    pub async fn resolve(&self, model: &str) -> Result<Arc<PageConfiguration>, PageError> {
        match self.source {
            RegistrySource::Embedded => self.resolve_embedded(model),
            RegistrySource::Remote => {
                if let Some(config) = self.cached(model) {
                    return Ok(config);
                }
                if model.trim().is_empty() {
                    return Err(not_found(model));
                }
                let text = api::fetch_page_document(model)
                    .await
                    .map_err(PageError::Transport)?
                    .ok_or_else(|| not_found(model))?;
                let config = parse_page_configuration(model, &text)?;
                Ok(self.store(config, model))
            }
        }
    }

    /// Модели для главной страницы
    pub async fn models(&self) -> Result<Vec<ModelInfo>, PageError> {
        match self.source {
            RegistrySource::Embedded => Ok(builtin_models()
                .filter_map(|model| self.resolve_embedded(model).ok())
                .map(|config| model_info(&config))
                .collect()),
            RegistrySource::Remote => api::fetch_models()
                .await
                .map(|r| r.models)
                .map_err(PageError::Transport),
        }
    }
}

pub fn model_info(config: &PageConfiguration) -> ModelInfo {
    ModelInfo {
        model: config.model.clone(),
        title: config.title.clone(),
        entry_view: config.entry_view().map(str::to_string),
    }
}

fn not_found(model: &str) -> PageError {
    PageError::ConfigurationNotFound {
        model: model.to_string(),
    }
}

fn lookup_model(model: &str) -> Result<&'static str, PageError> {
    if model.trim().is_empty() {
        return Err(not_found(model));
    }
    builtin_document(model).ok_or_else(|| not_found(model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_model_resolves_and_is_cached() {
        let registry = ConfigRegistry::new(RegistrySource::Embedded);
        let first = registry.resolve_embedded("sales_order").unwrap();
        let second = registry.resolve_embedded("sales_order").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.model, "sales_order");
    }

    #[test]
    fn unknown_model_is_not_found_signal() {
        let registry = ConfigRegistry::new(RegistrySource::Embedded);
        assert_eq!(
            registry.resolve_embedded("purchage_order").unwrap_err(),
            PageError::ConfigurationNotFound { model: "purchage_order".into() }
        );
        assert!(registry.resolve_embedded("").unwrap_err().is_not_found());
    }

    #[test]
    fn invalidate_replaces_configuration_wholesale() {
        let registry = ConfigRegistry::new(RegistrySource::Embedded);
        let first = registry.resolve_embedded("purchase_order").unwrap();
        registry.invalidate("purchase_order");
        assert!(registry.cached("purchase_order").is_none());
        let second = registry.resolve_embedded("purchase_order").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn legacy_document_is_normalized_on_resolve() {
        let registry = ConfigRegistry::new(RegistrySource::Embedded);
        let config = registry.resolve_embedded("purchase_list").unwrap();
        assert!(config.legacy);
        assert_eq!(config.view_names(), vec!["create"]);
        assert_eq!(model_info(&config).entry_view.as_deref(), Some("create"));
    }
}
