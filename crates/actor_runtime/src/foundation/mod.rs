//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the runtime:
//! - Math types and pose helpers
//! - Frame timing
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
