//! The `initialize` handshake.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MCP_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "shopwise-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const INSTRUCTIONS: &str = "Shopwise serves a product catalog. \
    Use product_recommend to find products similar to a named product, \
    product_trending for the landing listing, and the user_* tools to \
    record signups and signins.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

/// What the server reads from `initialize`. Client capabilities are accepted
/// and ignored: the server never calls back into the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    #[serde(default)]
    pub client_info: Option<Implementation>,
}

/// Server feature flags. Tool and resource lists are fixed for the life of
/// the process and resources have no subscriptions.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    pub logging: Map<String, Value>,
    pub resources: ListFlags,
    pub tools: ListFlags,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFlags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<bool>,
    pub list_changed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: &'static str,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,
    pub instructions: &'static str,
}

impl InitializeResult {
    /// The handshake reply this build of the server sends.
    pub fn current() -> Self {
        Self {
            protocol_version: MCP_VERSION,
            capabilities: ServerCapabilities {
                logging: Map::new(),
                resources: ListFlags {
                    subscribe: Some(false),
                    list_changed: false,
                },
                tools: ListFlags::default(),
            },
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            instructions: INSTRUCTIONS,
        }
    }
}
