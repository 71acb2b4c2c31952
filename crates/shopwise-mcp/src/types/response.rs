//! Tool and resource payloads returned to MCP clients.
//!
//! Everything the shop serves is JSON text, so tool output is a list of text
//! blocks and every resource carries `application/json`.

use serde::Serialize;
use serde_json::Value;

pub const JSON_MIME: &str = "application/json";

/// A listed tool with its argument schema.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    #[serde(rename = "type")]
    kind: &'static str,
    pub text: String,
}

impl TextBlock {
    pub fn new(text: String) -> Self {
        Self { kind: "text", text }
    }
}

/// Output of `tools/call`. Failures the caller can act on set `isError`
/// instead of becoming JSON-RPC errors.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResult {
    pub content: Vec<TextBlock>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// `value` pretty-printed as a single text block.
    pub fn json(value: &impl Serialize) -> Self {
        let text = serde_json::to_string_pretty(value).unwrap_or_else(|e| e.to_string());
        Self {
            content: vec![TextBlock::new(text)],
            is_error: false,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            content: vec![TextBlock::new(message)],
            is_error: true,
        }
    }
}

/// A fixed resource (`uri`) or a URI template (`uriTemplate`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_template: Option<&'static str>,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

impl ResourceEntry {
    pub const fn fixed(uri: &'static str, name: &'static str, description: &'static str) -> Self {
        Self {
            uri: Some(uri),
            uri_template: None,
            name,
            description,
            mime_type: JSON_MIME,
        }
    }

    pub const fn template(
        uri_template: &'static str,
        name: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            uri: None,
            uri_template: Some(uri_template),
            name,
            description,
            mime_type: JSON_MIME,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub uri: String,
    pub mime_type: &'static str,
    pub text: String,
}

/// Output of `resources/read`.
#[derive(Debug, Clone, Serialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContent>,
}

impl ReadResourceResult {
    /// One JSON document at `uri`.
    pub fn json(uri: impl Into<String>, value: &impl Serialize) -> Self {
        Self {
            contents: vec![ResourceContent {
                uri: uri.into(),
                mime_type: JSON_MIME,
                text: serde_json::to_string_pretty(value).unwrap_or_default(),
            }],
        }
    }
}
