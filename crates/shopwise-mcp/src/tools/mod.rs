//! MCP tool implementations.

pub mod product_lookup;
pub mod product_recommend;
pub mod product_trending;
pub mod registry;
pub mod user_signin;
pub mod user_signup;

pub use registry::ToolRegistry;
