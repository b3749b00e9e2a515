use axum::body::to_bytes;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_size;

/// Middleware для журнала HTTP запросов
///
/// Пишет через tracing (консоль и файл):
/// - Метод и путь
/// - Статус код
/// - Длительность (ms)
/// - Размер ответа
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Тело читается целиком, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                target: "http",
                method = %method,
                path = %path,
                status = parts.status.as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "response body error: {}",
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let status = parts.status.as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;
    let size = format_size(bytes.len());
    if parts.status.is_success() {
        tracing::info!(target: "http", "{} {} {} | {}ms | {}", status, method, path, duration_ms, size);
    } else {
        tracing::warn!(target: "http", "{} {} {} | {}ms | {}", status, method, path, duration_ms, size);
    }

    Response::from_parts(parts, Body::from(bytes))
}
