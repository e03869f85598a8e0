//! LopCafe Core - Shared domain types.
//!
//! This crate provides the types shared by every LopCafe component:
//! - `client` - Session store, authorization policy and REST API client
//! - `cli` - Command-line front end for browsing recipes and managing orders
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! The server owns every entity; these are read-through value snapshots.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, order statuses, roles and entity snapshots

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
