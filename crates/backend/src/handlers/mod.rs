pub mod data;
pub mod page_config;
