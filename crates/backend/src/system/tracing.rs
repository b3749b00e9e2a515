use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Каталог логов: рядом с исполняемым файлом, иначе `target/logs`
fn log_dir_candidates() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.join("logs"));
        }
    }
    dirs.push(Path::new("target").join("logs"));
    dirs
}

fn open_log_file() -> anyhow::Result<(std::fs::File, PathBuf)> {
    let mut last_error = None;
    for dir in log_dir_candidates() {
        let path = dir.join("backend.log");
        let opened = std::fs::create_dir_all(&dir).and_then(|_| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        });
        match opened {
            Ok(file) => return Ok((file, path)),
            Err(e) => {
                println!("✗ Cannot use log file {}: {}", path.display(), e);
                last_error = Some(e);
            }
        }
    }
    Err(anyhow::anyhow!(
        "Cannot open log file: {}",
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Инициализация системы трассировки (tracing)
///
/// Логи пишутся в:
/// - stdout (с цветами)
/// - logs/backend.log рядом с исполняемым файлом (без цветов)
pub fn initialize() -> anyhow::Result<()> {
    let (log_file, log_path) = open_log_file()?;
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_level))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    tracing::info!("Logging to {} (level: {})", log_path.display(), log_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_logs_is_the_last_resort() {
        let dirs = log_dir_candidates();
        assert_eq!(dirs.last(), Some(&Path::new("target").join("logs")));
    }
}
