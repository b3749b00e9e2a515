use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Ошибки разрешения и отображения динамической страницы.
/// Все варианты восстанавливаются на границе страницы.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    #[error("Конфигурация для модели '{model}' не найдена")]
    ConfigurationNotFound { model: String },

    #[error("Представление '{view}' не найдено в конфигурации модели '{model}'")]
    ViewNotFound { model: String, view: String },

    #[error("Некорректная конфигурация модели '{model}' ({key}): {reason}")]
    MalformedConfiguration {
        model: String,
        key: String,
        reason: String,
    },

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Import(#[from] ImportError),

    #[error("Ошибка обращения к серверу: {0}")]
    Transport(String),
}

impl PageError {
    pub fn malformed(model: &str, key: impl Into<String>, reason: impl Into<String>) -> Self {
        PageError::MalformedConfiguration {
            model: model.to_string(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Терминальные для прохода отрисовки ошибки "не найдено"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PageError::ConfigurationNotFound { .. } | PageError::ViewNotFound { .. }
        )
    }

    /// Короткий тег для логов
    pub fn kind(&self) -> &'static str {
        match self {
            PageError::ConfigurationNotFound { .. } => "configuration_not_found",
            PageError::ViewNotFound { .. } => "view_not_found",
            PageError::MalformedConfiguration { .. } => "malformed_configuration",
            PageError::Validation(_) => "validation",
            PageError::Import(_) => "import",
            PageError::Transport(_) => "transport",
        }
    }
}

/// Ошибки импорта файла. Импорт атомарен: при ошибке строки не меняются.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Поддерживаются только файлы JSON или CSV (получен '{0}')")]
    UnsupportedFileType(String),

    #[error("В файле не найдено данных для импорта")]
    Empty,

    #[error("Первая строка CSV должна содержать заголовки")]
    MissingHeader,

    #[error("Некорректный JSON: {0}")]
    InvalidJson(String),

    #[error("Строка {index}: {reason}")]
    MalformedRow { index: usize, reason: String },
}

/// Причина ошибки конкретного поля формы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IssueKind {
    Missing,
    NotANumber,
    BelowMin(f64),
    AboveMax(f64),
    TooShort(usize),
    TooLong(usize),
    NotAnOption,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub key: String,
    pub label: String,
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Missing => write!(f, "{} не может быть пустым", self.label),
            IssueKind::NotANumber => write!(f, "{} должно быть числом", self.label),
            IssueKind::BelowMin(min) => write!(f, "{} должно быть не меньше {}", self.label, min),
            IssueKind::AboveMax(max) => write!(f, "{} должно быть не больше {}", self.label, max),
            IssueKind::TooShort(min) => {
                write!(f, "{} должен содержать минимум {} символов", self.label, min)
            }
            IssueKind::TooLong(max) => {
                write!(f, "{} должен содержать максимум {} символов", self.label, max)
            }
            IssueKind::NotAnOption => write!(f, "{}: недопустимое значение", self.label),
        }
    }
}

/// Совокупность ошибок отправки формы. Сообщение называет каждое поле.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn push(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }

    pub fn missing_labels(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter(|i| i.kind == IssueKind::Missing)
            .map(|i| i.label.as_str())
            .collect()
    }

    pub fn for_key(&self, key: &str) -> Option<&FieldIssue> {
        self.issues.iter().find(|i| i.key == key)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let missing = self.missing_labels();
        if !missing.is_empty() {
            parts.push(format!("Заполните обязательные поля: {}", missing.join(", ")));
        }
        parts.extend(
            self.issues
                .iter()
                .filter(|i| i.kind != IssueKind::Missing)
                .map(|i| i.to_string()),
        );
        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_every_missing_field() {
        let errors = ValidationErrors {
            issues: vec![
                FieldIssue {
                    key: "vendor".into(),
                    label: "Vendor".into(),
                    kind: IssueKind::Missing,
                },
                FieldIssue {
                    key: "date".into(),
                    label: "Date".into(),
                    kind: IssueKind::Missing,
                },
                FieldIssue {
                    key: "amount".into(),
                    label: "Amount".into(),
                    kind: IssueKind::BelowMin(0.0),
                },
            ],
        };
        let message = errors.to_string();
        assert!(message.starts_with("Заполните обязательные поля: Vendor, Date"));
        assert!(message.contains("Amount должно быть не меньше 0"));
    }

    #[test]
    fn not_found_kinds() {
        let a = PageError::ConfigurationNotFound { model: "x".into() };
        let b = PageError::ViewNotFound {
            model: "x".into(),
            view: "y".into(),
        };
        assert!(a.is_not_found() && b.is_not_found());
        assert_ne!(a.kind(), b.kind());
        assert!(!PageError::Transport("timeout".into()).is_not_found());
    }
}
