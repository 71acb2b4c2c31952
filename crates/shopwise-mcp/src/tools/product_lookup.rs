//! Tool: product_lookup: Catalog row by exact name.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::ShopSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct LookupParams {
    product_name: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "product_lookup",
        description: "Show a catalog product and its tags",
        input_schema: json!({
            "type": "object",
            "properties": {
                "product_name": { "type": "string" }
            },
            "required": ["product_name"]
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<ShopSession>>,
) -> McpResult<ToolCallResult> {
    let params: LookupParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let catalog = session.lock().await.catalog().clone();
    let Some((index, item)) = catalog
        .position(&params.product_name)
        .and_then(|i| catalog.get(i).map(|item| (i, item)))
    else {
        return Ok(ToolCallResult::error(format!(
            "Product not found: {}",
            params.product_name
        )));
    };

    Ok(ToolCallResult::json(&json!({
        "index": index,
        "name": item.name,
        "brand": item.brand,
        "review_count": item.review_count,
        "rating": item.rating,
        "image_url": item.image_url,
        "tags": item.tags,
    })))
}
