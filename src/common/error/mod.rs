//! Unified error types for Slidegraft.
//!
//! This module provides a unified error type that encompasses errors from the
//! OPC package layer and the PresentationML document layer, presenting a
//! consistent API to users.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
