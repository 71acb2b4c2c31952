//! Edge case integration tests for shopwise-mcp.
//!
//! Drives the protocol handler the way an MCP client would.

use std::io::Write;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::Mutex;

use shopwise::{
    Catalog, CatalogItem, FixedImageProvider, FixedPriceProvider, MemoryUserStore,
};
use shopwise_mcp::protocol::ProtocolHandler;
use shopwise_mcp::session::{ShopSession, NO_RECOMMENDATIONS_MESSAGE};
use shopwise_mcp::transport::framing;
use shopwise_mcp::types::*;

// ─────────────────────── helpers ───────────────────────

const CSV_HEADER: &str = "Name,ReviewCount,Brand,ImageURL,Rating,Tags";

fn abc_catalog() -> Catalog {
    Catalog::new(vec![
        CatalogItem::new("A", "red shoe running"),
        CatalogItem::new("B", "red shoe running"),
        CatalogItem::new("C", "blue hat winter"),
    ])
}

fn trending_catalog(n: usize) -> Catalog {
    Catalog::new(
        (0..n)
            .map(|i| CatalogItem::new(format!("Trending Product Number {i}"), "tag"))
            .collect(),
    )
}

/// Session over in-memory parts with deterministic display providers.
fn session_with(catalog: Catalog, trending: Catalog) -> Arc<Mutex<ShopSession>> {
    let session = ShopSession::new(catalog, trending, Box::new(MemoryUserStore::new()))
        .with_providers(
            Box::new(FixedImageProvider("static/img_1.png".to_string())),
            Box::new(FixedPriceProvider(40)),
        );
    Arc::new(Mutex::new(session))
}

fn abc_handler() -> ProtocolHandler {
    ProtocolHandler::new(session_with(abc_catalog(), trending_catalog(10)))
}

/// Write a catalog CSV into `dir`.
fn write_csv(dir: &tempfile::TempDir, file: &str, rows: &[&str]) -> String {
    let path = dir.path().join(file);
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "{CSV_HEADER}").unwrap();
    for row in rows {
        writeln!(f, "{row}").unwrap();
    }
    path.to_str().unwrap().to_string()
}

/// Build an MCP JSON-RPC request.
fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

fn init_request() -> Value {
    mcp_request(
        0,
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }),
    )
}

async fn send(handler: &ProtocolHandler, msg: Value) -> Option<Value> {
    let parsed: JsonRpcMessage = serde_json::from_value(msg).unwrap();
    handler.handle_message(parsed).await
}

async fn send_unwrap(handler: &ProtocolHandler, msg: Value) -> Value {
    send(handler, msg).await.expect("expected response")
}

async fn call_tool(handler: &ProtocolHandler, name: &str, arguments: Value) -> Value {
    send_unwrap(
        handler,
        mcp_request(10, "tools/call", json!({ "name": name, "arguments": arguments })),
    )
    .await
}

/// The JSON payload inside a tool result's first text block.
fn tool_payload(resp: &Value) -> Value {
    let text = resp["result"]["content"][0]["text"]
        .as_str()
        .unwrap_or_else(|| panic!("no text content in {resp}"));
    serde_json::from_str(text).unwrap()
}

async fn read_resource(handler: &ProtocolHandler, uri: &str) -> Value {
    send_unwrap(handler, mcp_request(20, "resources/read", json!({ "uri": uri }))).await
}

fn resource_payload(resp: &Value) -> Value {
    let text = resp["result"]["contents"][0]["text"]
        .as_str()
        .unwrap_or_else(|| panic!("no resource text in {resp}"));
    serde_json::from_str(text).unwrap()
}

fn rec_names(payload: &Value) -> Vec<String> {
    payload["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

// ═══════════════════════════════════════════════════════
// PROTOCOL
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_initialize_reports_server() {
    let handler = abc_handler();
    let resp = send_unwrap(&handler, init_request()).await;

    assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(resp["result"]["serverInfo"]["name"], "shopwise-mcp");
    assert!(resp["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_initialized_notification_has_no_reply() {
    let handler = abc_handler();
    send_unwrap(&handler, init_request()).await;

    let notif = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    assert!(send(&handler, notif).await.is_none());
}

#[tokio::test]
async fn test_tools_list() {
    let handler = abc_handler();
    let resp = send_unwrap(&handler, mcp_request(1, "tools/list", json!({}))).await;

    let names: Vec<&str> = resp["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    for expected in [
        "product_recommend",
        "product_trending",
        "product_lookup",
        "user_signup",
        "user_signin",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }
}

#[tokio::test]
async fn test_wrong_jsonrpc_version() {
    let handler = abc_handler();
    let msg = json!({ "jsonrpc": "1.0", "id": 3, "method": "ping" });
    let resp = send_unwrap(&handler, msg).await;
    assert_eq!(resp["error"]["code"], error_codes::INVALID_REQUEST);
}

#[tokio::test]
async fn test_unknown_method() {
    let handler = abc_handler();
    let resp = send_unwrap(&handler, mcp_request(4, "prompts/list", json!({}))).await;
    assert_eq!(resp["error"]["code"], error_codes::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_client_reply_is_ignored() {
    let handler = abc_handler();
    let reply = json!({ "jsonrpc": "2.0", "id": 9, "result": {} });
    assert!(send(&handler, reply).await.is_none());
}

#[tokio::test]
async fn test_lists_are_complete() {
    let handler = abc_handler();

    let resp = send_unwrap(&handler, mcp_request(5, "resources/list", json!({}))).await;
    let uris: Vec<&str> = resp["result"]["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["uri"].as_str().unwrap())
        .collect();
    assert_eq!(uris, vec!["shop://stats", "shop://trending"]);
    assert!(resp["result"].get("nextCursor").is_none());

    let resp = send_unwrap(&handler, mcp_request(6, "resources/templates/list", json!({}))).await;
    let templates = resp["result"]["resourceTemplates"].as_array().unwrap();
    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0]["uriTemplate"], "shop://product/{name}");
    assert_eq!(templates[0]["mimeType"], "application/json");

    let resp = send_unwrap(&handler, mcp_request(7, "tools/list", json!({}))).await;
    assert!(resp["result"].get("nextCursor").is_none());
    assert!(resp["result"]["tools"][0]["inputSchema"].is_object());
}

#[tokio::test]
async fn test_malformed_json() {
    let err = framing::parse_message(r#"{"broken":"#).unwrap_err();
    assert_eq!(err.code(), error_codes::PARSE_ERROR);
    assert!(framing::parse_message("").is_err());
}

// ═══════════════════════════════════════════════════════
// RECOMMENDATIONS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_recommend_ranks_identical_tags_first() {
    let handler = abc_handler();
    let resp = call_tool(
        &handler,
        "product_recommend",
        json!({ "product_name": "A", "top_n": 2 }),
    )
    .await;

    let payload = tool_payload(&resp);
    assert_eq!(rec_names(&payload), vec!["B", "C"]);
    assert_eq!(payload["outcome"], "found");
    assert_eq!(payload["total"], 2);
    assert!((payload["recommendations"][0]["similarity"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    assert!(payload.get("message").is_none());
}

#[tokio::test]
async fn test_recommend_default_top_n_covers_small_catalog() {
    let handler = abc_handler();
    let resp = call_tool(&handler, "product_recommend", json!({ "product_name": "C" })).await;

    let names = rec_names(&tool_payload(&resp));
    assert_eq!(names.len(), 2);
    assert!(!names.contains(&"C".to_string()));
}

#[tokio::test]
async fn test_recommend_unknown_product() {
    let handler = abc_handler();
    let resp = call_tool(
        &handler,
        "product_recommend",
        json!({ "product_name": "Nope" }),
    )
    .await;

    let payload = tool_payload(&resp);
    assert_eq!(payload["outcome"], "item_not_found");
    assert_eq!(payload["total"], 0);
    assert_eq!(payload["message"], NO_RECOMMENDATIONS_MESSAGE);
}

#[tokio::test]
async fn test_recommend_negative_top_n_is_empty() {
    let handler = abc_handler();
    let resp = call_tool(
        &handler,
        "product_recommend",
        json!({ "product_name": "A", "top_n": -3 }),
    )
    .await;

    let payload = tool_payload(&resp);
    assert_eq!(payload["total"], 0);
    assert_eq!(payload["outcome"], "found");
}

#[tokio::test]
async fn test_recommend_empty_catalog() {
    let handler = ProtocolHandler::new(session_with(Catalog::default(), Catalog::default()));
    let resp = call_tool(&handler, "product_recommend", json!({ "product_name": "A" })).await;
    assert_eq!(tool_payload(&resp)["outcome"], "empty_catalog");
}

#[tokio::test]
async fn test_recommend_missing_name_is_invalid_params() {
    let handler = abc_handler();
    let resp = call_tool(&handler, "product_recommend", json!({})).await;
    assert_eq!(resp["error"]["code"], error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_recommend_from_csv_session() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_csv(
        &dir,
        "clean_data.csv",
        &[
            "Matte Lipstick,120,Glow,http://img/1.jpg,4.5,lipstick matte red",
            "Gloss Lipstick,80,Glow,http://img/2.jpg,4.1,lipstick gloss red",
            "Nail Polish,15,Shine,http://img/3.jpg,,nail polish blue",
        ],
    );
    let db = dir.path().join("users.db");
    let missing_trending = dir.path().join("none.csv");

    let session = ShopSession::open(
        &catalog,
        missing_trending.to_str().unwrap(),
        db.to_str().unwrap(),
    )
    .unwrap();
    assert!(session.trending().is_empty());

    let handler = ProtocolHandler::new(Arc::new(Mutex::new(session)));
    let resp = call_tool(
        &handler,
        "product_recommend",
        json!({ "product_name": "Matte Lipstick", "top_n": 1 }),
    )
    .await;

    let payload = tool_payload(&resp);
    assert_eq!(rec_names(&payload), vec!["Gloss Lipstick"]);
    let first = &payload["recommendations"][0];
    assert_eq!(first["brand"], "Glow");
    assert_eq!(first["review_count"], 80.0);
    assert_eq!(first["image_url"], "http://img/2.jpg");
}

#[tokio::test]
async fn test_recommend_large_catalog() {
    let catalog = Catalog::new(
        (0..3000)
            .map(|i| CatalogItem::new(format!("P{i}"), format!("tag{i}a tag{i}b tag{i}c shared")))
            .collect(),
    );
    let handler = ProtocolHandler::new(session_with(catalog, Catalog::default()));
    let resp = call_tool(
        &handler,
        "product_recommend",
        json!({ "product_name": "P0", "top_n": 2 }),
    )
    .await;

    let payload = tool_payload(&resp);
    assert_eq!(rec_names(&payload), vec!["P1", "P2"]);
    assert_eq!(payload["total"], 2);
}

#[tokio::test]
async fn test_concurrent_recommendations() {
    let handler = Arc::new(abc_handler());
    let mut tasks = Vec::new();
    for _ in 0..8 {
        let h = handler.clone();
        tasks.push(tokio::spawn(async move {
            let resp = call_tool(&h, "product_recommend", json!({ "product_name": "A" })).await;
            rec_names(&tool_payload(&resp))
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), vec!["B", "C"]);
    }
}

// ═══════════════════════════════════════════════════════
// CATALOG & TRENDING
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_trending_listing_is_limited() {
    let handler = abc_handler();
    let resp = call_tool(&handler, "product_trending", json!({})).await;

    let payload = tool_payload(&resp);
    let products = payload["products"].as_array().unwrap();
    assert_eq!(products.len(), 8);
    assert_eq!(products[0]["short_name"], "Trending Pro...");
    assert_eq!(products[0]["image_url"], "static/img_1.png");
    assert_eq!(payload["price"], 40);
}

#[tokio::test]
async fn test_lookup_unknown_is_tool_error() {
    let handler = abc_handler();
    let resp = call_tool(&handler, "product_lookup", json!({ "product_name": "Zed" })).await;
    assert_eq!(resp["result"]["isError"], true);
}

#[tokio::test]
async fn test_lookup_known_product() {
    let handler = abc_handler();
    let resp = call_tool(&handler, "product_lookup", json!({ "product_name": "C" })).await;
    let payload = tool_payload(&resp);
    assert_eq!(payload["index"], 2);
    assert_eq!(payload["tags"], "blue hat winter");
}

#[tokio::test]
async fn test_unknown_tool() {
    let handler = abc_handler();
    let resp = call_tool(&handler, "order_checkout", json!({})).await;
    assert_eq!(resp["error"]["code"], shop_error_codes::TOOL_NOT_FOUND);
}

// ═══════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_resource_product_percent_encoded() {
    let handler = ProtocolHandler::new(session_with(
        Catalog::new(vec![
            CatalogItem::new("Red Shoe", "red shoe"),
            CatalogItem::new("Blue Shoe", "blue shoe"),
        ]),
        Catalog::default(),
    ));

    let resp = read_resource(&handler, "shop://product/Red%20Shoe").await;
    assert_eq!(resource_payload(&resp)["name"], "Red Shoe");

    let resp = read_resource(&handler, "shop://recommendations/Red%20Shoe").await;
    assert_eq!(rec_names(&resource_payload(&resp)), vec!["Blue Shoe"]);
}

#[tokio::test]
async fn test_resource_product_not_found() {
    let handler = abc_handler();
    let resp = read_resource(&handler, "shop://product/Zed").await;
    assert_eq!(resp["error"]["code"], shop_error_codes::PRODUCT_NOT_FOUND);
}

#[tokio::test]
async fn test_resource_malformed_escape() {
    let handler = abc_handler();
    for uri in ["shop://product/Hat%+9", "shop://recommendations/%-1"] {
        let resp = read_resource(&handler, uri).await;
        assert_eq!(resp["error"]["code"], error_codes::INVALID_PARAMS, "{uri}");
    }
}

#[tokio::test]
async fn test_resource_unknown_uri() {
    let handler = abc_handler();
    let resp = read_resource(&handler, "shop://nothing").await;
    assert_eq!(resp["error"]["code"], shop_error_codes::RESOURCE_NOT_FOUND);
}

#[tokio::test]
async fn test_resource_stats_counts_users() {
    let handler = abc_handler();
    call_tool(
        &handler,
        "user_signup",
        json!({ "username": "ana", "email": "ana@example.com", "password": "pw" }),
    )
    .await;
    call_tool(
        &handler,
        "user_signin",
        json!({ "username": "ana", "password": "pw" }),
    )
    .await;

    let payload = resource_payload(&read_resource(&handler, "shop://stats").await);
    assert_eq!(payload["stats"]["catalog_products"], 3);
    assert_eq!(payload["stats"]["trending_products"], 10);
    assert_eq!(payload["stats"]["signups"], 1);
    assert_eq!(payload["stats"]["signins"], 1);
    assert_eq!(payload["recent_signups"][0]["username"], "ana");
}

// ═══════════════════════════════════════════════════════
// USERS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_signup_blank_field_rejected() {
    let handler = abc_handler();
    let resp = call_tool(
        &handler,
        "user_signup",
        json!({ "username": "  ", "email": "x@example.com", "password": "pw" }),
    )
    .await;
    assert_eq!(resp["error"]["code"], error_codes::INVALID_PARAMS);

    let payload = resource_payload(&read_resource(&handler, "shop://stats").await);
    assert_eq!(payload["stats"]["signups"], 0);
}

#[tokio::test]
async fn test_signup_returns_id() {
    let handler = abc_handler();
    let resp = call_tool(
        &handler,
        "user_signup",
        json!({ "username": "bo", "email": "bo@example.com", "password": "pw" }),
    )
    .await;
    let payload = tool_payload(&resp);
    assert_eq!(payload["status"], "recorded");
    assert_eq!(payload["username"], "bo");
}
