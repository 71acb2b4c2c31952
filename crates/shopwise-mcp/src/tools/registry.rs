//! Tool registration and dispatch.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::Value;

use crate::session::ShopSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{product_lookup, product_recommend, product_trending, user_signin, user_signup};

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![
            product_recommend::definition(),
            product_trending::definition(),
            product_lookup::definition(),
            user_signup::definition(),
            user_signin::definition(),
        ]
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        session: &Arc<Mutex<ShopSession>>,
    ) -> McpResult<ToolCallResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            "product_recommend" => product_recommend::execute(args, session).await,
            "product_trending" => product_trending::execute(args, session).await,
            "product_lookup" => product_lookup::execute(args, session).await,
            "user_signup" => user_signup::execute(args, session).await,
            "user_signin" => user_signin::execute(args, session).await,
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}
