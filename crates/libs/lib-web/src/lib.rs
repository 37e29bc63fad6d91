//! # Web Library
//!
//! HTTP handlers, middleware, the worker dispatch client, and server setup.

pub mod dispatch;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{start_server, AppState, ServerConfig};
