//! Fleet integration tests.
//!
//! - Consistency scenarios driven through the services and envelope builder
//! - Full axum HTTP roundtrips with a reqwest client

mod support;
mod scenarios;
#[cfg(feature = "http")]
mod http;
