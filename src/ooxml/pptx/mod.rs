//! PowerPoint (.pptx) presentation support.
//!
//! This module provides parsing and manipulation of Microsoft PowerPoint
//! presentations in the Office Open XML (OOXML) format (.pptx files):
//!
//! - `Package`: the overall .pptx package, its slides, layouts and images
//! - `Slide`: an individual slide and its shape tree
//! - `shapes`: the shape-tree adapter and typed shape wrappers
//! - `parts`: presentation, slide master and slide layout parts
//!
//! # Example
//!
//! ```rust,no_run
//! use slidegraft::ooxml::pptx::Package;
//!
//! let pkg = Package::open("presentation.pptx")?;
//! let size = pkg.slide_size()?;
//! println!("{} slides of {}x{} EMU", pkg.slide_count(), size.cx, size.cy);
//!
//! for slide in pkg.slides() {
//!     for shape in slide.shapes() {
//!         println!("  {}", shape.label());
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod media;
pub mod package;
pub mod parts;
pub mod shapes;
pub mod slide;

#[cfg(test)]
pub(crate) mod testing;

pub use media::Asset;
pub use package::Package;
pub use shapes::{ShapeKind, ShapeNode, ShapeTree};
pub use slide::Slide;
