//! Tool: user_signin: Record a signin submission.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::{json, Value};

use shopwise::SigninRecord;

use crate::session::ShopSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "user_signin",
        description: "Record a user signin attempt",
        input_schema: json!({
            "type": "object",
            "properties": {
                "username": { "type": "string" },
                "password": { "type": "string" }
            },
            "required": ["username", "password"]
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<ShopSession>>,
) -> McpResult<ToolCallResult> {
    let record: SigninRecord =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let id = session.lock().await.signin(&record)?;

    Ok(ToolCallResult::json(&json!({
        "id": id,
        "username": record.username,
        "status": "recorded",
    })))
}
