//! Main request dispatcher: receives JSON-RPC messages, routes to handlers.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resources::ResourceRegistry;
use crate::session::ShopSession;
use crate::tools::ToolRegistry;
use crate::types::*;

use super::negotiation::NegotiatedCapabilities;
use super::validator::validate_request;

#[derive(Deserialize)]
struct ToolCall {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Deserialize)]
struct ResourceRead {
    uri: String,
}

/// Dispatches incoming JSON-RPC messages against a shared shop session.
pub struct ProtocolHandler {
    session: Arc<Mutex<ShopSession>>,
    capabilities: Arc<Mutex<NegotiatedCapabilities>>,
}

impl ProtocolHandler {
    pub fn new(session: Arc<Mutex<ShopSession>>) -> Self {
        Self {
            session,
            capabilities: Arc::new(Mutex::new(NegotiatedCapabilities::default())),
        }
    }

    pub fn session(&self) -> &Arc<Mutex<ShopSession>> {
        &self.session
    }

    /// Handle one message. Notifications and stray responses produce no reply.
    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<Value> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req).await),
            JsonRpcMessage::Notification { method, .. } => {
                self.handle_notification(&method).await;
                None
            }
            JsonRpcMessage::Reply => {
                tracing::warn!("Ignoring reply sent by client");
                None
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Value {
        if let Err(e) = validate_request(&request) {
            return e.to_reply(Some(request.id)).into_value();
        }

        let id = request.id.clone();
        match self.dispatch_request(&request).await {
            Ok(value) => JsonRpcReply::result(id, value).into_value(),
            Err(e) => {
                tracing::debug!("Request {id} ({}) failed: {e}", request.method);
                e.to_reply(Some(id)).into_value()
            }
        }
    }

    async fn dispatch_request(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params.clone()).await,
            "shutdown" => {
                tracing::info!("Shutdown requested");
                Ok(empty_object())
            }
            "ping" => Ok(empty_object()),

            "tools/list" => listing("tools", ToolRegistry::list_tools()),
            "tools/call" => {
                let params: ToolCall = required_params(request.params.clone(), "Tool call")?;
                let result =
                    ToolRegistry::call(&params.name, params.arguments, &self.session).await?;
                to_value(result)
            }

            "resources/list" => listing("resources", ResourceRegistry::list_resources()),
            "resources/templates/list" => {
                listing("resourceTemplates", ResourceRegistry::list_templates())
            }
            "resources/read" => {
                let params: ResourceRead =
                    required_params(request.params.clone(), "Resource read")?;
                to_value(ResourceRegistry::read(&params.uri, &self.session).await?)
            }

            _ => Err(McpError::MethodNotFound(request.method.clone())),
        }
    }

    async fn handle_notification(&self, method: &str) {
        match method {
            "initialized" | "notifications/initialized" => {
                self.capabilities.lock().await.mark_initialized();
            }
            "notifications/cancelled" | "$/cancelRequest" => {
                tracing::info!("Received cancellation notification");
            }
            _ => {
                tracing::debug!("Unknown notification: {method}");
            }
        }
    }

    async fn handle_initialize(&self, params: Option<Value>) -> McpResult<Value> {
        let init_params: InitializeParams = required_params(params, "Initialize")?;
        let result = self.capabilities.lock().await.negotiate(init_params)?;
        to_value(result)
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

fn to_value(value: impl Serialize) -> McpResult<Value> {
    serde_json::to_value(value).map_err(|e| McpError::InternalError(e.to_string()))
}

/// `{ key: items }`; the lists are complete, so no cursor is sent.
fn listing(key: &str, items: impl Serialize) -> McpResult<Value> {
    let mut map = serde_json::Map::new();
    map.insert(key.to_string(), to_value(items)?);
    Ok(Value::Object(map))
}

fn required_params<T: DeserializeOwned>(params: Option<Value>, what: &str) -> McpResult<T> {
    params
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))?
        .ok_or_else(|| McpError::InvalidParams(format!("{what} params required")))
}
