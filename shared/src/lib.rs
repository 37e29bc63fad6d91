//! # Shared Data Transfer Objects Library
//!
//! This library defines the wire contract between the polling client and the
//! backend API. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto::auth`]**: Login/logout DTOs
//! - **[`dto::admin`]**: Admin user management DTOs
//! - **[`dto::chat`]**: Chat session DTOs
//! - **[`dto::message`]**: Message dispatch, status lookup, and worker callback DTOs
//!
//! ## Wire Format
//!
//! All DTOs serialize to JSON with the default `serde` behavior:
//! - Field names use **snake_case** in Rust and on the wire
//! - Optional fields are omitted from JSON when `None`
//!   (`#[serde(skip_serializing_if = "Option::is_none")]`)
//! - Enumerated fields (`sender`, `status`) serialize as lowercase strings
//!
//! There is exactly one shape per message; the client performs no duck-typed
//! field fallbacks when reading responses.

pub mod dto;

// Re-export commonly used types for convenience
pub use dto::*;
