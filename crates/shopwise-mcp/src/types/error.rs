//! Server errors and their JSON-RPC codes.

use super::message::{JsonRpcReply, RequestId};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Server-specific error codes.
pub mod shop_error_codes {
    pub const RESOURCE_NOT_FOUND: i32 = -32802;
    pub const TOOL_NOT_FOUND: i32 = -32803;
    pub const PRODUCT_NOT_FOUND: i32 = -32850;
    pub const STORE_ERROR: i32 = -32851;
    pub const SHOP_ERROR: i32 = -32852;

    /// Missing or invalid bearer token.
    pub const UNAUTHORIZED: i32 = -32900;
}

#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Shop error: {0}")]
    ShopError(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unauthorized")]
    Unauthorized,
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use shop_error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::InternalError(_) => INTERNAL_ERROR,
            McpError::ResourceNotFound(_) => RESOURCE_NOT_FOUND,
            McpError::ToolNotFound(_) => TOOL_NOT_FOUND,
            McpError::ProductNotFound(_) => PRODUCT_NOT_FOUND,
            McpError::StoreError(_) => STORE_ERROR,
            McpError::ShopError(_) => SHOP_ERROR,
            McpError::Transport(_) | McpError::Io(_) => INTERNAL_ERROR,
            McpError::Json(_) => PARSE_ERROR,
            McpError::Unauthorized => UNAUTHORIZED,
        }
    }

    pub fn to_reply(&self, id: Option<RequestId>) -> JsonRpcReply {
        JsonRpcReply::error(id, self.code(), self.to_string())
    }
}

impl From<shopwise::ShopError> for McpError {
    fn from(e: shopwise::ShopError) -> Self {
        match e {
            shopwise::ShopError::InvalidInput(msg) => McpError::InvalidParams(msg),
            shopwise::ShopError::Store(e) => McpError::StoreError(e.to_string()),
            other => McpError::ShopError(other.to_string()),
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;
