//! Resource registration and dispatch.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::session::ShopSession;
use crate::types::{McpError, McpResult, ReadResourceResult, ResourceEntry};

use super::{product, stats, templates};

pub struct ResourceRegistry;

impl ResourceRegistry {
    pub fn list_templates() -> Vec<ResourceEntry> {
        templates::list_templates()
    }

    pub fn list_resources() -> Vec<ResourceEntry> {
        templates::list_resources()
    }

    pub async fn read(
        uri: &str,
        session: &Arc<Mutex<ShopSession>>,
    ) -> McpResult<ReadResourceResult> {
        if let Some(name) = uri.strip_prefix("shop://product/") {
            product::read_product(&decode_name(name)?, session).await
        } else if let Some(name) = uri.strip_prefix("shop://recommendations/") {
            product::read_recommendations(&decode_name(name)?, session).await
        } else if uri == "shop://stats" {
            stats::read_stats(session).await
        } else if uri == "shop://trending" {
            stats::read_trending(session).await
        } else {
            Err(McpError::ResourceNotFound(uri.to_string()))
        }
    }
}

/// Undo percent-encoding in the name segment of a resource URI.
fn decode_name(raw: &str) -> McpResult<String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = raw
                .get(i + 1..i + 3)
                .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| McpError::InvalidParams(format!("Invalid escape in: {raw}")))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    let name = String::from_utf8(out)
        .map_err(|_| McpError::InvalidParams(format!("Name is not UTF-8: {raw}")))?;
    if name.is_empty() {
        return Err(McpError::InvalidParams("Product name is empty".to_string()));
    }
    Ok(name)
}
