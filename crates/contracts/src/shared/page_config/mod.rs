//! Конфигурация динамических страниц: схема документа, адаптер
//! старой плоской формы, проверка схемы и таксономия ошибок.

pub mod builtin;
pub mod document;
pub mod error;
pub mod schema;

pub use document::{parse_page_configuration, PageDocument, LEGACY_VIEW_NAME};
pub use error::{FieldIssue, ImportError, IssueKind, PageError, ValidationErrors};
pub use schema::*;
