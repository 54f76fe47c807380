//! Portfolio Core - Shared types library.
//!
//! This crate provides the domain types used across the portfolio components:
//! - `site` - Public-facing portfolio website
//! - `cli` - Command-line tools for inspecting and managing the persisted store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Theme, preference bundle, contact form/message, validation,
//!   email pattern and project records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
