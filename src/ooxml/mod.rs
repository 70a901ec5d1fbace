//! Office Open XML (OOXML) support for PowerPoint presentations.
//!
//! The implementation is based on the Open Packaging Conventions (OPC) and
//! follows the structure of the python-pptx library, adapted for Rust.
//!
//! # Architecture
//!
//! 1. **OPC Layer** (`opc`): package handling (ZIP, parts, relationships)
//! 2. **DrawingML** (`drawings`): transforms and image references shared by shapes
//! 3. **PresentationML** (`pptx`): presentation, slides and the shape tree
//!
//! # Example
//!
//! ```rust,no_run
//! use slidegraft::ooxml::pptx::Package;
//!
//! let mut pkg = Package::open("deck.pptx")?;
//! println!("{} slides", pkg.slide_count());
//! let slide = pkg.slide_mut(0)?;
//! println!("{} shapes on the first slide", slide.shape_tree().len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod drawings;
pub mod error;
pub mod opc;
pub mod pptx;

pub use error::{OoxmlError, Result};
pub use opc::{OpcPackage, PackURI};
