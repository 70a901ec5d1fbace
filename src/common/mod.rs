//! Common types and utilities shared across the crate.
//!
//! This module provides the unified error type, the integer geometry model used
//! for shape placement, and the owned XML element tree that slide parts are
//! parsed into.

// Submodule declarations
pub mod error;
pub mod geometry;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use geometry::{BoundingBox, Extent, GroupTransform, PartialTransform, Point, Transform};
pub use xml::{XmlDocument, XmlElement, XmlNode};
