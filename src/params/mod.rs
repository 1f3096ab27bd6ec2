//! Parameter Management Module
//!
//! Derives per-request generation parameters from the model registry and
//! user overrides.

pub mod resolver;

pub use resolver::{is_reasoning_family, resolve};
