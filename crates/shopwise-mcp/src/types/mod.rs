//! JSON-RPC and MCP data types used by the server.

pub mod capabilities;
pub mod error;
pub mod message;
pub mod response;

pub use capabilities::*;
pub use error::*;
pub use message::*;
pub use response::*;
