//! Redeploy control library
//!
//! Lets a host studio trigger a site redeployment and watch it settle
//! through toast-style notifications, backed by a small proxy for the
//! platform's deployments API.

pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod notify;
pub mod options;
pub mod server;
pub mod settings;
pub mod utils;
pub mod watch;
