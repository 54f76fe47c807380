//! Personal portfolio site library.
//!
//! The site is a small axum application around two long-lived services:
//! the theme service (light/dark mode and the preference bundle) and the
//! contact service (validated, simulated, persisted submissions). Both sit
//! on a namespaced JSON store adapter over a pluggable key-value backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod projects;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
