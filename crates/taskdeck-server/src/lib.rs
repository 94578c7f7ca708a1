//! taskdeck server library entry.
//!
//! This crate wires the config, store, task API, request instrumentation and
//! ops endpoints into an axum application. It is intended to be consumed by
//! the binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod shutdown;
pub mod store;
