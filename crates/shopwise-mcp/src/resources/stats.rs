//! Resource: shop://stats and shop://trending

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::json;

use shopwise::TRENDING_LIMIT;

use crate::session::ShopSession;
use crate::types::{McpResult, ReadResourceResult};

pub async fn read_stats(session: &Arc<Mutex<ShopSession>>) -> McpResult<ReadResourceResult> {
    let session = session.lock().await;
    let stats = session.stats()?;
    let recent: Vec<_> = session
        .users()
        .recent_signups(5)?
        .into_iter()
        .map(|s| json!({ "username": s.username, "created_at": s.created_at }))
        .collect();

    let content = json!({
        "stats": stats,
        "recent_signups": recent,
    });

    Ok(ReadResourceResult::json("shop://stats", &content))
}

pub async fn read_trending(session: &Arc<Mutex<ShopSession>>) -> McpResult<ReadResourceResult> {
    let listing = session.lock().await.trending_listing(TRENDING_LIMIT);

    Ok(ReadResourceResult::json("shop://trending", &listing))
}
