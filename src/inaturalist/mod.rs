//! iNaturalist API integration
//!
//! - Wire types for the v1 `observations` and `taxa` endpoints
//! - Rate-limited client implementing observation fetch and genus lookup

pub mod client;
pub mod types;

pub use client::INatClient;
pub use types::*;
