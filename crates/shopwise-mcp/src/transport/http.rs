//! HTTP transport: storefront routes, bearer-protected `/mcp`, and `/health`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use shopwise::{clamp_top_n, SigninRecord, SignupRecord, DEFAULT_TOP_N, TRENDING_LIMIT};

use crate::protocol::ProtocolHandler;
use crate::tools::product_recommend::recommend_json;
use crate::types::{McpError, McpResult};

/// Shared state passed to every route.
pub struct ServerState {
    pub token: Option<String>,
    pub handler: Arc<ProtocolHandler>,
}

/// HTTP server for browsers and web-based MCP clients.
pub struct HttpTransport {
    state: Arc<ServerState>,
}

impl HttpTransport {
    pub fn new(handler: ProtocolHandler, token: Option<String>) -> Self {
        Self {
            state: Arc::new(ServerState {
                token,
                handler: Arc::new(handler),
            }),
        }
    }

    /// All routes, ready to serve.
    pub fn router(&self) -> Router {
        let state = self.state.clone();

        let mcp = Router::new()
            .route("/mcp", post(handle_mcp))
            .layer(middleware::from_fn_with_state(state.clone(), auth_layer));

        Router::new()
            .route("/", get(handle_index))
            .route("/index", get(handle_index))
            .route("/main", get(handle_main))
            .route("/signup", get(handle_index).post(handle_signup))
            .route("/signin", get(handle_index).post(handle_signin))
            .route("/recommendations", post(handle_recommendations))
            .route("/health", get(handle_health))
            .merge(mcp)
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Bind and serve until the process exits.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("HTTP transport listening on {addr}");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        Ok(())
    }
}

fn error_response(status: StatusCode, err: &McpError) -> Response {
    (
        status,
        AxumJson(json!({
            "error": {
                "code": err.code(),
                "message": err.to_string(),
            }
        })),
    )
        .into_response()
}

/// Checks the bearer token when one is configured.
async fn auth_layer(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: middleware::Next,
) -> Response {
    if let Some(expected) = &state.token {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected);

        if !authorized {
            return (
                StatusCode::UNAUTHORIZED,
                AxumJson(McpError::Unauthorized.to_reply(None)),
            )
                .into_response();
        }
    }

    next.run(request).await
}

async fn landing(state: &ServerState) -> Value {
    let session = state.handler.session().lock().await;
    json!({ "trending": session.trending_listing(TRENDING_LIMIT) })
}

async fn handle_index(State(state): State<Arc<ServerState>>) -> AxumJson<Value> {
    AxumJson(landing(&state).await)
}

async fn handle_main() -> AxumJson<Value> {
    AxumJson(json!({ "total": 0, "recommendations": [] }))
}

#[derive(Debug, Deserialize)]
struct SignupForm {
    username: String,
    email: String,
    password: String,
}

async fn handle_signup(
    State(state): State<Arc<ServerState>>,
    Form(form): Form<SignupForm>,
) -> Response {
    let record = SignupRecord {
        username: form.username,
        email: form.email,
        password: form.password,
    };

    let result = state.handler.session().lock().await.signup(&record);
    match result {
        Ok(_) => AxumJson(landing(&state).await).into_response(),
        Err(e) => error_response(status_for(&e), &e),
    }
}

#[derive(Debug, Deserialize)]
struct SigninForm {
    #[serde(rename = "signinUsername")]
    username: String,
    #[serde(rename = "signinPassword")]
    password: String,
}

async fn handle_signin(
    State(state): State<Arc<ServerState>>,
    Form(form): Form<SigninForm>,
) -> Response {
    let record = SigninRecord {
        username: form.username,
        password: form.password,
    };

    let result = state.handler.session().lock().await.signin(&record);
    match result {
        Ok(_) => AxumJson(landing(&state).await).into_response(),
        Err(e) => error_response(status_for(&e), &e),
    }
}

#[derive(Debug, Deserialize)]
struct RecommendForm {
    #[serde(default)]
    prod: String,
    #[serde(default)]
    nbr: Option<String>,
}

async fn handle_recommendations(
    State(state): State<Arc<ServerState>>,
    Form(form): Form<RecommendForm>,
) -> Response {
    let top_n = match form.nbr.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_TOP_N,
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) => clamp_top_n(n),
            Err(_) => {
                let err = McpError::InvalidParams(format!("'nbr' must be an integer, got '{raw}'"));
                return error_response(StatusCode::BAD_REQUEST, &err);
            }
        },
    };

    let recommender = state.handler.session().lock().await.recommender();
    match recommend_json(recommender, form.prod, top_n).await {
        Ok(body) => AxumJson(body).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e),
    }
}

/// Handle JSON-RPC requests.
async fn handle_mcp(
    State(state): State<Arc<ServerState>>,
    AxumJson(body): AxumJson<Value>,
) -> Response {
    let msg: crate::types::JsonRpcMessage = match serde_json::from_value(body) {
        Ok(msg) => msg,
        Err(e) => {
            let err = McpError::ParseError(e.to_string());
            return (StatusCode::BAD_REQUEST, AxumJson(err.to_reply(None))).into_response();
        }
    };

    match state.handler.handle_message(msg).await {
        Some(response) => AxumJson(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// No auth required.
async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<Value> {
    let session = state.handler.session().lock().await;
    AxumJson(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog_products": session.catalog().len(),
    }))
}

fn status_for(err: &McpError) -> StatusCode {
    match err {
        McpError::InvalidParams(_) | McpError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        McpError::ProductNotFound(_) | McpError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
