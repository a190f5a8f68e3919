//! Botica Core - Shared types library.
//!
//! This crate provides common types used across all Botica components:
//! - `storefront` - Public-facing pharmacy shop
//! - `admin` - Internal administration panel
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! session handling. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
