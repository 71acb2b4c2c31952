//! Resource: shop://product/{name} and shop://recommendations/{name}

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::json;

use shopwise::DEFAULT_TOP_N;

use crate::session::ShopSession;
use crate::tools::product_recommend::recommend_json;
use crate::types::{McpResult, ReadResourceResult};

pub async fn read_product(
    name: &str,
    session: &Arc<Mutex<ShopSession>>,
) -> McpResult<ReadResourceResult> {
    let session = session.lock().await;
    let item = session.lookup(name)?;

    let content = json!({
        "name": item.name,
        "brand": item.brand,
        "review_count": item.review_count,
        "rating": item.rating,
        "image_url": item.image_url,
        "tags": item.tags,
    });

    Ok(ReadResourceResult::json(format!("shop://product/{name}"), &content))
}

pub async fn read_recommendations(
    name: &str,
    session: &Arc<Mutex<ShopSession>>,
) -> McpResult<ReadResourceResult> {
    let recommender = session.lock().await.recommender();
    let content = recommend_json(recommender, name.to_string(), DEFAULT_TOP_N).await?;

    Ok(ReadResourceResult::json(format!("shop://recommendations/{name}"), &content))
}
