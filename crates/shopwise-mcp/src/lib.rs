//! Shopwise MCP server: product recommendations, trending listings, and user signups over stdio and HTTP.

pub mod config;
pub mod protocol;
pub mod repl;
pub mod resources;
pub mod session;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{resolve_catalog_path, resolve_db_path, resolve_trending_path};
pub use protocol::ProtocolHandler;
pub use session::ShopSession;
pub use transport::StdioTransport;
