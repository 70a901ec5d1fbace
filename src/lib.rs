//! Slidegraft - move slide content into a PowerPoint template
//!
//! This library transplants the visual content of one presentation (the
//! "content" deck) into the slide layout of another (the "template" deck).
//! Shapes keep their geometry, pictures are re-embedded in the target package,
//! and the transplanted content is centered on the template's slide canvas.
//!
//! # Features
//!
//! - **Shape-tree engine**: ungroup nested groups, transplant shapes across
//!   packages, and re-center content through a synthetic group
//! - **OPC layer**: read and write `.pptx` packages (parts, relationships,
//!   content types)
//! - **Non-fatal processing**: malformed shapes are skipped, logged, and
//!   reported instead of aborting a whole deck
//!
//! # Example - Transfer a deck into a template
//!
//! ```no_run
//! use slidegraft::{transfer_files, TransferOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = transfer_files(
//!     "content.pptx",
//!     "template.pptx",
//!     "Processed_Presentation.pptx",
//!     &TransferOptions::default(),
//! )?;
//! println!("Transferred {} slides", report.slides.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Working with a single slide
//!
//! ```no_run
//! use slidegraft::ooxml::pptx::Package;
//! use slidegraft::transfer::{recenter, ungroup};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pkg = Package::open("deck.pptx")?;
//! let canvas = pkg.slide_size()?;
//!
//! let slide = pkg.slide_mut(0)?;
//! let report = ungroup(slide);
//! println!("Dissolved {} groups", report.dissolved);
//! recenter(slide, canvas.cx, canvas.cy);
//!
//! pkg.save("deck-centered.pptx")?;
//! # Ok(())
//! # }
//! ```

/// Shared building blocks: error types, geometry, and the XML element tree.
pub mod common;

/// OOXML (Office Open XML) packages and PresentationML documents.
///
/// This module provides the OPC package layer and the `.pptx` document model
/// the transfer engine operates on.
pub mod ooxml;

/// The shape-tree transformation engine and the transfer pipeline.
pub mod transfer;

pub use common::{Error, Result};
pub use ooxml::pptx::{Package, Slide};
pub use transfer::{
    TransferOptions, TransferReport, Transferred, recenter, transfer, transfer_files, transplant,
    ungroup,
};
