//! Storefront session state shared by all transports.

pub mod manager;

pub use manager::{ShopSession, ShopStats, NO_RECOMMENDATIONS_MESSAGE};
