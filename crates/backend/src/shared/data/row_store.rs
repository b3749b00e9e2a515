//! Хранилище строк в памяти процесса.
//!
//! Для каждой модели каталога создаётся таблица, заполненная `sampleData`
//! документа. Идентификатор строки берётся из `rowKey` модели.

use contracts::shared::data_row::{merge_rows, remove_row, CellValue, DataRow, MergeReport};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use super::page_catalog::PageCatalog;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Модель '{0}' не найдена")]
    UnknownModel(String),

    #[error("Запись '{id}' модели '{model}' не найдена")]
    NotFound { model: String, id: String },

    #[error("Запись '{id}' модели '{model}' уже существует")]
    Duplicate { model: String, id: String },
}

#[derive(Debug, Clone)]
struct Table {
    row_key: String,
    rows: Vec<DataRow>,
}

impl Table {
    fn ensure_id(&self, row: &mut DataRow) -> String {
        match row.id(&self.row_key) {
            Some(id) => id,
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                row.insert(self.row_key.clone(), CellValue::Text(id.clone()));
                id
            }
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.id(&self.row_key).as_deref() == Some(id))
    }
}

#[derive(Debug, Default)]
pub struct RowStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl RowStore {
    pub fn seeded(catalog: &PageCatalog) -> Self {
        let tables = catalog
            .configs()
            .map(|(model, config)| {
                (
                    model.to_string(),
                    Table {
                        row_key: config.row_key.clone(),
                        rows: config.sample_data.clone(),
                    },
                )
            })
            .collect();
        Self {
            tables: RwLock::new(tables),
        }
    }

    pub async fn list(&self, model: &str) -> Result<Vec<DataRow>, StoreError> {
        let tables = self.tables.read().await;
        let table = tables
            .get(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;
        Ok(table.rows.clone())
    }

    pub async fn get(&self, model: &str, id: &str) -> Result<DataRow, StoreError> {
        let tables = self.tables.read().await;
        let table = tables
            .get(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;
        table
            .position(id)
            .map(|index| table.rows[index].clone())
            .ok_or_else(|| StoreError::NotFound {
                model: model.to_string(),
                id: id.to_string(),
            })
    }

    /// Добавляет строку в конец таблицы; без идентификатора получает UUID
    pub async fn create(&self, model: &str, mut row: DataRow) -> Result<DataRow, StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;

        let id = table.ensure_id(&mut row);
        if table.position(&id).is_some() {
            return Err(StoreError::Duplicate {
                model: model.to_string(),
                id,
            });
        }
        table.rows.push(row.clone());
        Ok(row)
    }

    /// Заменяет строку целиком, сохраняя её место и идентификатор из адреса
    pub async fn update(&self, model: &str, id: &str, mut row: DataRow) -> Result<DataRow, StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;

        let index = table.position(id).ok_or_else(|| StoreError::NotFound {
            model: model.to_string(),
            id: id.to_string(),
        })?;
        let id_cell = table.rows[index]
            .get(&table.row_key)
            .cloned()
            .unwrap_or_else(|| CellValue::Text(id.to_string()));
        row.insert(table.row_key.clone(), id_cell);
        table.rows[index] = row.clone();
        Ok(row)
    }

    pub async fn delete(&self, model: &str, id: &str) -> Result<DataRow, StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;

        let row_key = table.row_key.clone();
        remove_row(&mut table.rows, &row_key, id).ok_or_else(|| StoreError::NotFound {
            model: model.to_string(),
            id: id.to_string(),
        })
    }

    /// Слияние импортированных строк: существующая строка побеждает.
    /// Возвращает итог слияния и новый размер таблицы.
    pub async fn import(&self, model: &str, rows: Vec<DataRow>) -> Result<(MergeReport, usize), StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;

        let incoming: Vec<DataRow> = rows
            .into_iter()
            .map(|mut row| {
                table.ensure_id(&mut row);
                row
            })
            .collect();
        let row_key = table.row_key.clone();
        let report = merge_rows(&mut table.rows, incoming, &row_key);
        Ok((report, table.rows.len()))
    }
}
