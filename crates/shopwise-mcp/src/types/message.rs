//! JSON-RPC 2.0 messages as the shop server reads and writes them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier, echoed back in the reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A call that expects a reply.
#[derive(Debug, Clone)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    pub params: Option<Value>,
}

/// An inbound message, classified by which of `id`, `method`, `result` and
/// `error` it carries. A null or missing `id` makes a call a notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Envelope")]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Notification { method: String, params: Option<Value> },
    /// A reply sent by the client; the server never issues calls, so these are dropped.
    Reply,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    jsonrpc: String,
    #[serde(default)]
    id: Option<RequestId>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl TryFrom<Envelope> for JsonRpcMessage {
    type Error = String;

    fn try_from(env: Envelope) -> Result<Self, Self::Error> {
        match (env.method, env.id) {
            (Some(method), Some(id)) => Ok(JsonRpcMessage::Request(JsonRpcRequest {
                jsonrpc: env.jsonrpc,
                id,
                method,
                params: env.params,
            })),
            (Some(method), None) => Ok(JsonRpcMessage::Notification {
                method,
                params: env.params,
            }),
            (None, _) if env.result.is_some() || env.error.is_some() => Ok(JsonRpcMessage::Reply),
            (None, _) => Err("message has no method, result, or error".to_string()),
        }
    }
}

/// Outbound reply carrying either a result or an error.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcReply {
    jsonrpc: &'static str,
    id: Option<RequestId>,
    #[serde(flatten)]
    outcome: ReplyOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum ReplyOutcome {
    Result(Value),
    Error { code: i32, message: String },
}

impl JsonRpcReply {
    pub fn result(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: Some(id),
            outcome: ReplyOutcome::Result(result),
        }
    }

    /// `id` is `None` when the request could not be read far enough to find one.
    pub fn error(id: Option<RequestId>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: ReplyOutcome::Error {
                code,
                message: message.into(),
            },
        }
    }

    pub fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
