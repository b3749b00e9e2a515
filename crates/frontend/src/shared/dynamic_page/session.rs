//! Жизненный цикл экземпляра страницы:
//! `Idle → Loading → Ready(view) ⇄ Ready(otherView)`, `Loading/Ready → Error`.
//!
//! Ошибка терминальна, пока пользователь не перейдёт на другую пару
//! модель/представление. Асинхронные завершения проверяются по [`LoadToken`]:
//! ответ устаревшей загрузки или размонтированной страницы отбрасывается.

use contracts::shared::page_config::PageError;

#[derive(Debug, Clone, PartialEq)]
pub enum PagePhase {
    Idle,
    Loading { model: String, view: String },
    Ready { model: String, view: String },
    Error { model: String, view: String, error: PageError },
}

/// Поколение загрузки, выданное при её начале
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSession {
    phase: PagePhase,
    generation: u64,
    mounted: bool,
}

impl Default for PageSession {
    fn default() -> Self {
        Self {
            phase: PagePhase::Idle,
            generation: 0,
            mounted: true,
        }
    }
}

impl PageSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &PagePhase {
        &self.phase
    }

    /// Начало разрешения пары модель/представление.
    /// `None`, если эта же пара уже в ошибке или уже загружается.
    pub fn begin(&mut self, model: &str, view: &str) -> Option<LoadToken> {
        match &self.phase {
            PagePhase::Error { model: m, view: v, .. } | PagePhase::Loading { model: m, view: v }
                if m == model && v == view =>
            {
                return None;
            }
            _ => {}
        }
        self.generation += 1;
        self.phase = PagePhase::Loading {
            model: model.to_string(),
            view: view.to_string(),
        };
        Some(LoadToken {
            generation: self.generation,
        })
    }

    pub fn accepts(&self, token: LoadToken) -> bool {
        self.mounted && token.generation == self.generation
    }

    /// Применяет результат загрузки; `false`, если результат устарел
    pub fn complete(&mut self, token: LoadToken, result: Result<(), PageError>) -> bool {
        if !self.accepts(token) {
            log::debug!("dropping stale page load (generation {})", token.generation);
            return false;
        }
        let (model, view) = match &self.phase {
            PagePhase::Loading { model, view } => (model.clone(), view.clone()),
            _ => return false,
        };
        self.phase = match result {
            Ok(()) => PagePhase::Ready { model, view },
            Err(error) => {
                match &error {
                    PageError::ConfigurationNotFound { .. } => {
                        log::warn!("configuration not found: model '{}'", model)
                    }
                    PageError::ViewNotFound { .. } => {
                        log::warn!("view not found: '{}' in model '{}' (stale link?)", view, model)
                    }
                    other => log::error!("page {}/{} failed: {}", model, view, other),
                }
                PagePhase::Error { model, view, error }
            }
        };
        true
    }

    /// Уход со страницы: все незавершённые загрузки становятся устаревшими
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
    }

    pub fn error(&self) -> Option<&PageError> {
        match &self.phase {
            PagePhase::Error { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_loading_ready() {
        let mut session = PageSession::new();
        assert_eq!(session.phase(), &PagePhase::Idle);
        let token = session.begin("orders", "list").unwrap();
        assert!(session.complete(token, Ok(())));
        assert_eq!(
            session.phase(),
            &PagePhase::Ready { model: "orders".into(), view: "list".into() }
        );
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut session = PageSession::new();
        let first = session.begin("orders", "list").unwrap();
        let second = session.begin("invoices", "list").unwrap();
        assert!(!session.complete(first, Ok(())));
        assert!(session.complete(second, Ok(())));
        assert!(matches!(session.phase(), PagePhase::Ready { model, .. } if model == "invoices"));
    }

    #[test]
    fn unmount_cancels_pending_load() {
        let mut session = PageSession::new();
        let token = session.begin("orders", "list").unwrap();
        session.unmount();
        assert!(!session.complete(token, Ok(())));
        assert!(matches!(session.phase(), PagePhase::Loading { .. }));
    }

    #[test]
    fn error_is_terminal_until_route_changes() {
        let mut session = PageSession::new();
        let token = session.begin("orders", "missing").unwrap();
        session.complete(
            token,
            Err(PageError::ViewNotFound { model: "orders".into(), view: "missing".into() }),
        );
        assert!(session.error().is_some());
        assert!(session.begin("orders", "missing").is_none());
        assert!(session.begin("orders", "list").is_some());
    }
}
