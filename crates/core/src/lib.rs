//! Welcome Home Core - Shared domain types.
//!
//! This crate provides the types shared by all Welcome Home components:
//! - `server` - Public site API and admin endpoints
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and the validation schema - no I/O,
//! no database access, no HTTP clients. This keeps it lightweight and
//! allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and statuses
//! - [`quote`] - The `QuoteRequest`/`User` data model and validation schema

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod quote;
pub mod types;

pub use quote::*;
pub use types::*;
