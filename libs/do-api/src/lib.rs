//! Wire models for the DigitalOcean App Platform deployments API
//!
//! Shared between the proxy route handlers and the gateway client so both
//! sides of the proxy agree on the shapes that cross it.

pub mod models;
