//! Tool: product_trending: The landing page listing.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use shopwise::TRENDING_LIMIT;

use crate::session::ShopSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct TrendingParams {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    TRENDING_LIMIT
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "product_trending",
        description: "List trending products with display image and page price",
        input_schema: json!({
            "type": "object",
            "properties": {
                "limit": { "type": "integer", "default": 8, "minimum": 0 }
            }
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<ShopSession>>,
) -> McpResult<ToolCallResult> {
    let params: TrendingParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let listing = session.lock().await.trending_listing(params.limit);
    Ok(ToolCallResult::json(&listing))
}
