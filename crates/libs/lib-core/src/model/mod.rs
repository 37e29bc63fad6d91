//! # Data Model
//!
//! Database entities and repositories.

pub mod store;
