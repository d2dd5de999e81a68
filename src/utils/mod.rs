//! Utility functions and helpers for polytrans.
//!
//! This module provides cross-cutting concerns like structured logging and
//! credential sanitization.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and log redaction of API keys.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
