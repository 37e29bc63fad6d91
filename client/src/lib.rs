//! # Chat Client
//!
//! Typed client for the chat backend: authenticated API calls plus the
//! polling state machine that waits for asynchronous AI replies.

pub mod api;
pub mod poll;

// Re-export commonly used types
pub use api::{ApiClient, ClientError, SessionContext};
pub use poll::{poll_reply, submit_and_await, PollConfig, PollState, StatusSource};
