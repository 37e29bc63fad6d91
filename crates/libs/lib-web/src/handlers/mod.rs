//! # HTTP Handlers
//!
//! Request handlers for authentication, admin user management, chat session
//! CRUD, message dispatch, status lookup, and the worker callback.

pub mod admin;
pub mod auth;
pub mod chat;
pub mod message;

#[cfg(test)]
pub(crate) mod test_support;
