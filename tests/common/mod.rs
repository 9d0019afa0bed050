//! Common test utilities and fixtures for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: Mock upstream response builders
//! - `logger`: Structured test logging infrastructure

pub mod fixtures;
pub mod logger;
