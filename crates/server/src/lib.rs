//! Veda CRM server library.
//!
//! This crate provides the backend functionality as a library, allowing it
//! to be tested and reused. The binary entry point is `main.rs`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
