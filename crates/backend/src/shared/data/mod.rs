pub mod page_catalog;
pub mod row_store;
