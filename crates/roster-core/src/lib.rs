//! Core types and trait definitions for the Roster contacts browser.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store, sync and CLI crates all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod contact;
pub mod error;
pub mod list;
pub mod search;
pub mod store;

pub use error::{Error, Result, SyncFailure};
