//! Tool: user_signup: Record a signup submission.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::{json, Value};

use shopwise::SignupRecord;

use crate::session::ShopSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "user_signup",
        description: "Record a user signup",
        input_schema: json!({
            "type": "object",
            "properties": {
                "username": { "type": "string" },
                "email": { "type": "string" },
                "password": { "type": "string" }
            },
            "required": ["username", "email", "password"]
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<ShopSession>>,
) -> McpResult<ToolCallResult> {
    let record: SignupRecord =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let id = session.lock().await.signup(&record)?;

    Ok(ToolCallResult::json(&json!({
        "id": id,
        "username": record.username,
        "status": "recorded",
    })))
}
