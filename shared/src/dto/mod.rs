//! # Data Transfer Objects
//!
//! Wire types shared between the backend and the polling client.

pub mod admin;
pub mod auth;
pub mod chat;
pub mod message;

pub use admin::*;
pub use auth::*;
pub use chat::*;
pub use message::*;
