use crate::server::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::error;

/// Content type by file extension, text/html for anything unknown
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "text/html",
    }
}

/// Map a request path to a file under the public root.
///
/// `/` resolves to the index document. Returns None for any path that
/// would escape the root, which the caller treats as a missing file.
pub fn resolve_path(public_root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    let relative = if relative.is_empty() {
        "index.html"
    } else {
        relative
    };

    let relative = Path::new(relative);
    if relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_)))
    {
        return None;
    }
    Some(public_root.join(relative))
}

/// Fallback handler: everything that is not the relay endpoint is an asset
pub async fn serve_asset(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(file_path) = resolve_path(&state.public_root, uri.path()) else {
        return not_found();
    };

    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let content_type = content_type_for(&file_path);
            ([(header::CONTENT_TYPE, content_type)], content).into_response()
        }
        Err(e) if e.kind() == ErrorKind::NotFound => not_found(),
        Err(e) => {
            error!("Failed to read {}: {}", file_path.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server error: {}", e.kind()),
            )
                .into_response()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}
