//! pi-node-ranking: umbrella crate for the ranking workspace
//!
//! - [`core`]: data model, loader, lookup and pagination
//! - [`server`]: HTML page and cached JSON API
//! - [`client`]: terminal client over the JSON API

pub use ranking_client as client;
pub use ranking_core as core;
pub use ranking_server as server;
