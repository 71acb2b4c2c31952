//! MCP resource implementations.

pub mod product;
pub mod registry;
pub mod stats;
pub mod templates;

pub use registry::ResourceRegistry;
