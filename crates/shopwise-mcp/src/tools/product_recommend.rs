//! Tool: product_recommend: Products with the most similar tags.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use shopwise::{clamp_top_n, RecommendOutcome, RecommendedItem, Recommender, DEFAULT_TOP_N};

use crate::session::{ShopSession, NO_RECOMMENDATIONS_MESSAGE};
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct RecommendParams {
    product_name: String,
    #[serde(default = "default_top_n")]
    top_n: i64,
}

fn default_top_n() -> i64 {
    DEFAULT_TOP_N as i64
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "product_recommend",
        description: "Recommend catalog products whose tags are most similar to a named product",
        input_schema: json!({
            "type": "object",
            "properties": {
                "product_name": { "type": "string", "description": "Exact catalog product name" },
                "top_n": { "type": "integer", "default": 10, "minimum": 0 }
            },
            "required": ["product_name"]
        }),
    }
}

/// JSON view of a recommended product.
pub fn item_json(item: &RecommendedItem) -> Value {
    json!({
        "name": item.name,
        "review_count": item.review_count,
        "brand": item.brand,
        "image_url": item.image_url,
        "rating": item.rating,
        "similarity": item.similarity,
    })
}

/// JSON body for a recommendation query, including the empty-result message.
pub fn recommendations_json(
    product_name: &str,
    outcome: RecommendOutcome,
    items: &[RecommendedItem],
) -> Value {
    let mut body = json!({
        "product_name": product_name,
        "outcome": outcome,
        "total": items.len(),
        "recommendations": items.iter().map(item_json).collect::<Vec<_>>(),
    });
    if items.is_empty() {
        body["message"] = json!(NO_RECOMMENDATIONS_MESSAGE);
    }
    body
}

/// Rank on the blocking pool and build the JSON body. The model is rebuilt
/// from the whole catalog on every call.
pub async fn recommend_json(
    recommender: Recommender,
    product_name: String,
    top_n: usize,
) -> McpResult<Value> {
    tokio::task::spawn_blocking(move || {
        let items = recommender.recommend(&product_name, top_n);
        recommendations_json(&product_name, recommender.outcome(&product_name), &items)
    })
    .await
    .map_err(|e| McpError::InternalError(format!("Recommendation task failed: {e}")))
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<ShopSession>>,
) -> McpResult<ToolCallResult> {
    let params: RecommendParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let recommender = session.lock().await.recommender();
    let body = recommend_json(recommender, params.product_name, clamp_top_n(params.top_n)).await?;

    Ok(ToolCallResult::json(&body))
}
