//! Core types shared across nestbean facilities
//!
//! This crate provides the canonical field keys and event names used by
//! the logging macros and the error facility in `nestbean-core`.

pub mod schema;
