//! Veda CRM Core - Shared types library.
//!
//! This crate provides the common types used by the Veda CRM server:
//! entity structs, create/update payloads, and newtype IDs.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and the customer, follow-up, and product types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
