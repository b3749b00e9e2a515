pub mod data_api;
pub mod data_row;
pub mod page_config;
