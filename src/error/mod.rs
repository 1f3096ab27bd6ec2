//! Error Handling Module
//!
//! This module provides error handling for the OpenRouter adapter, including:
//! - The surfaced error type (`LlmError`)
//! - The duck-typed upstream error record (`UpstreamError`)
//! - Translation of upstream failures into readable messages
//!
//! # Example
//!
//! ```rust,ignore
//! use siumai_openrouter::error::{UpstreamError, readable_message};
//!
//! let err = UpstreamError::with_code(500, "boom");
//! assert_eq!(readable_message(&err), "OpenRouter API Error: boom");
//! ```

// Module declarations
mod conversions;
pub mod readable;
pub mod types;

// Re-exports for public API
pub use readable::*;
pub use types::*;
