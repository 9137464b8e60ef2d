//! Development server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::JsonRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::broadcast::error::RecvError;

use proto_blocks_core::{AttributeBag, BlockRegistry, RenderContext, Sanitizer};
use proto_blocks_pattern::render_pattern;
use proto_blocks_static::{Asset, AssetPipeline, BuildConfig, BuildError, StaticBuilder};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{hmr_client_script, HmrHub, HmrMessage};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Directory containing pattern documents
    pub patterns_dir: PathBuf,

    /// Extra stylesheets to serve and watch
    pub styles: Vec<String>,

    /// Site title
    pub title: String,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            patterns_dir: PathBuf::from("patterns"),
            styles: vec![],
            title: "Block Patterns".to_string(),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// Shared server state.
pub struct ServerState {
    config: DevServerConfig,
    registry: Arc<BlockRegistry>,
    builder: StaticBuilder,
    hmr: HmrHub,
}

impl ServerState {
    pub fn new(config: DevServerConfig, registry: Arc<BlockRegistry>) -> Self {
        let builder = StaticBuilder::with_registry(
            BuildConfig {
                patterns_dir: config.patterns_dir.clone(),
                minify: false,
                preview: true,
                base_url: "/".to_string(),
                title: config.title.clone(),
                styles: config.styles.clone(),
                ..Default::default()
            },
            Arc::clone(&registry),
        );

        Self {
            config,
            registry,
            builder,
            hmr: HmrHub::new(),
        }
    }

    pub fn hmr(&self) -> &HmrHub {
        &self.hmr
    }
}

type SharedState = Arc<ServerState>;

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
    registry: Arc<BlockRegistry>,
}

impl DevServer {
    /// Create a new development server with the built-in blocks.
    pub fn new(config: DevServerConfig) -> Self {
        Self {
            config,
            registry: Arc::new(BlockRegistry::with_builtin_blocks()),
        }
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr_str = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|_| ServerError::InvalidAddress(addr_str.clone()))?;

        let state = Arc::new(ServerState::new(self.config.clone(), self.registry));

        let mut watch_paths = vec![self.config.patterns_dir.clone()];
        watch_paths.extend(self.config.styles.iter().map(PathBuf::from));

        let (watcher, mut rx) =
            FileWatcher::new(&watch_paths).map_err(|e| ServerError::WatchError(e.to_string()))?;

        let watch_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&watch_state, event);
            }
            drop(watcher);
        });

        let app = router(state);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!("Dev server running at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Could not open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Build the dev server router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/patterns/", get(index_handler))
        .route("/patterns/{*path}", get(pattern_handler))
        .route(
            "/api/block-renderer/{namespace}/{name}",
            get(render_block_get).post(render_block_post),
        )
        .route("/api/blocks", get(list_blocks))
        .route("/assets/{file}", get(asset_handler))
        .route("/__hmr", get(ws_handler))
        .route("/__hmr.js", get(hmr_script_handler))
        .fallback(fallback_handler)
        .with_state(state)
}

/// React to a file change.
pub fn handle_watch_event(state: &ServerState, event: WatchEvent) {
    match event {
        WatchEvent::PatternModified(path) => {
            tracing::info!("Pattern modified: {}", path.display());

            match rerender(state, &path) {
                Some((url, html)) => state.hmr.send(HmrMessage::UpdateContent { path: url, html }),
                None => state.hmr.send(HmrMessage::Reload),
            }
        }

        WatchEvent::StyleModified(path) => {
            tracing::info!("Stylesheet modified: {}", path.display());
            state.hmr.send(HmrMessage::ReloadStyles);
        }

        WatchEvent::Created(path) | WatchEvent::Deleted(path) | WatchEvent::Modified(path) => {
            tracing::debug!("Changed: {}", path.display());
            state.hmr.send(HmrMessage::Reload);
        }
    }
}

/// Re-render the body of the page built from `path`.
fn rerender(state: &ServerState, path: &std::path::Path) -> Option<(String, String)> {
    let pages = match state.builder.discover_pages() {
        Ok(pages) => pages,
        Err(e) => {
            tracing::warn!("{}", e);
            return None;
        }
    };

    let canonical = path.canonicalize().ok();
    let page = pages.into_iter().find(|p| {
        p.source_path == path
            || (canonical.is_some() && p.source_path.canonicalize().ok() == canonical)
    })?;

    let rendered = render_pattern(&page.doc, &state.registry, true);
    Some((page.url, rendered.html))
}

async fn index_handler(State(state): State<SharedState>) -> Response {
    page_response(&state, "/")
}

async fn pattern_handler(State(state): State<SharedState>, Path(path): Path<String>) -> Response {
    page_response(&state, &path)
}

async fn fallback_handler(State(state): State<SharedState>, uri: Uri) -> Response {
    page_response(&state, uri.path())
}

/// Normalize a request path to a page URL: leading and trailing slash.
fn page_url(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Render the pattern page at `path` with the live reload client.
fn page_response(state: &ServerState, path: &str) -> Response {
    let url = page_url(path);

    let pages = match state.builder.discover_pages() {
        Ok(pages) => pages,
        Err(BuildError::ReadError(_)) if url == "/" => {
            return Html(welcome_page(state)).into_response();
        }
        Err(e) => return error_page(state, StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    };

    let Some(page) = pages.iter().find(|p| p.url == url) else {
        if url == "/" && pages.is_empty() {
            return Html(welcome_page(state)).into_response();
        }
        return error_page(state, StatusCode::NOT_FOUND, &format!("No pattern at {}", url));
    };

    let nav = state.builder.build_navigation(&pages);
    match state.builder.render_page(page, &nav, true) {
        Ok(rendered) => Html(rendered.html).into_response(),
        Err(e) => error_page(state, StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn welcome_page(state: &ServerState) -> String {
    let s = state.registry.sanitizer();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
  <h1>{title}</h1>
  <p>Create {dir}/index.md to get started.</p>
  <script src="/__hmr.js"></script>
</body>
</html>"#,
        title = s.escape_html(&state.config.title),
        dir = s.escape_html(&state.config.patterns_dir.display().to_string()),
    )
}

fn error_page(state: &ServerState, status: StatusCode, message: &str) -> Response {
    let body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{code}</title></head>
<body>
  <h1>{code}</h1>
  <pre>{message}</pre>
  <script src="/__hmr.js"></script>
</body>
</html>"#,
        code = status,
        message = state.registry.sanitizer().escape_html(message),
    );
    (status, Html(body)).into_response()
}

/// Body of a block render request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(default)]
    pub attributes: Value,

    #[serde(default)]
    pub inner_content: String,

    /// `edit` renders the editor placeholder
    #[serde(default)]
    pub context: Option<String>,
}

/// Query string of a block render request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderQuery {
    /// JSON-encoded attribute object
    pub attributes: Option<String>,
    pub inner_content: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
struct BlockInfo {
    name: &'static str,
    title: &'static str,
}

fn api_error(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({ "code": code, "message": message.into() })),
    )
        .into_response()
}

async fn render_block_get(
    State(state): State<SharedState>,
    Path((namespace, name)): Path<(String, String)>,
    Query(query): Query<RenderQuery>,
) -> Response {
    let attributes = match query.attributes.as_deref().map(serde_json::from_str::<Value>) {
        None => Value::Null,
        Some(Ok(value)) => value,
        Some(Err(e)) => {
            return api_error(
                StatusCode::BAD_REQUEST,
                "invalid_json",
                format!("Attributes are not valid JSON: {}", e),
            )
        }
    };

    let request = RenderRequest {
        attributes,
        inner_content: query.inner_content.unwrap_or_default(),
        context: query.context,
    };
    render_block(&state, &namespace, &name, request)
}

async fn render_block_post(
    State(state): State<SharedState>,
    Path((namespace, name)): Path<(String, String)>,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(request)) => render_block(&state, &namespace, &name, request),
        Err(rejection) => api_error(
            StatusCode::BAD_REQUEST,
            "invalid_json",
            rejection.body_text(),
        ),
    }
}

/// Render one block for the editor.
fn render_block(state: &ServerState, namespace: &str, name: &str, request: RenderRequest) -> Response {
    let block_name = format!("{}/{}", namespace, name);

    if !state.registry.contains(&block_name) {
        return api_error(
            StatusCode::NOT_FOUND,
            "block_invalid",
            format!("Unknown block: {}", block_name),
        );
    }

    let bag = match request.attributes {
        Value::Null => AttributeBag::new(),
        value @ Value::Object(_) => AttributeBag::from_value(value),
        _ => {
            return api_error(
                StatusCode::BAD_REQUEST,
                "invalid_attributes",
                "Attributes must be a JSON object",
            )
        }
    };

    let ctx = RenderContext::new(&bag)
        .with_inner_content(&request.inner_content)
        .with_preview(request.context.as_deref() == Some("edit"));

    match state.registry.render(&block_name, &ctx) {
        Ok(rendered) => Json(json!({ "rendered": rendered })).into_response(),
        Err(e) => api_error(StatusCode::NOT_FOUND, "block_invalid", e.to_string()),
    }
}

async fn list_blocks(State(state): State<SharedState>) -> Json<Vec<BlockInfo>> {
    Json(
        state
            .registry
            .blocks()
            .map(|b| BlockInfo {
                name: b.name(),
                title: b.title(),
            })
            .collect(),
    )
}

/// Serve a generated asset or a configured stylesheet.
async fn asset_handler(State(state): State<SharedState>, Path(file): Path<String>) -> Response {
    if let Some(asset) = Asset::from_file_name(&file) {
        return (
            [(header::CONTENT_TYPE, asset.content_type())],
            AssetPipeline::generate(asset, false),
        )
            .into_response();
    }

    let style = state.config.styles.iter().map(PathBuf::from).find(|p| {
        p.file_name().and_then(|f| f.to_str()) == Some(file.as_str())
    });

    match style.map(std::fs::read_to_string) {
        Some(Ok(css)) => ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response(),
        Some(Err(e)) => {
            tracing::warn!("Failed to read stylesheet {}: {}", file, e);
            StatusCode::NOT_FOUND.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Handler for the HMR WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = state.hmr.subscribe();

    if send_message(&mut socket, &HmrMessage::Connected).await.is_err() {
        return;
    }

    loop {
        match rx.recv().await {
            Ok(msg) => {
                if send_message(&mut socket, &msg).await.is_err() {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!("Live reload client lagged by {} messages", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

async fn hmr_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        hmr_client_script(),
    )
}
