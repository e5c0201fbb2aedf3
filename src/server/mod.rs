use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::data::store::FileStore;

pub mod api;
pub mod routes;

use routes::HttpResponse;

/// Shared by every request.
#[derive(Debug)]
pub struct AppState {
    pub store: FileStore,
}

impl AppState {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            store: FileStore::new(data_dir),
        }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Hands every request to [`routes::route_request`] on a blocking thread (it does file I/O).
async fn dispatch(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let method = method.as_str().to_string();
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    match tokio::task::spawn_blocking(move || routes::route_request(&state, &method, &path, &body))
        .await
    {
        Ok(response) => response.into_response(),
        Err(err) => {
            tracing::error!(error = %err, "request handler panicked");
            routes::error_response(500, "request handler failed").into_response()
        }
    }
}

pub fn run_server(config: &AppConfig) -> std::io::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(config))
}

pub async fn serve(config: &AppConfig) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(&config.data_dir));
    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    tracing::info!(
        addr = %config.bind_addr,
        data_dir = %config.data_dir.display(),
        "bullpen server listening"
    );
    axum::serve(listener, router(state)).await
}
