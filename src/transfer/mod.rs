//! Shape-tree transformations and the content-into-template pipeline.
//!
//! Three operations work on parsed slides:
//!
//! - [`ungroup`] flattens group shapes into the slide's top level, mapping
//!   child coordinates into slide space
//! - [`transplant`] copies the shapes of a slide into a slide of another
//!   presentation, re-embedding pictures
//! - [`recenter`] wraps the positioned shapes in a new group and centers it on
//!   the canvas
//!
//! [`transfer`] chains them for every slide of a content presentation on top
//! of a template presentation.
//!
//! None of the operations fails because of a single bad shape. Such shapes are
//! skipped, logged with [`log::warn!`], and listed in the returned reports.
//!
//! # Example
//!
//! ```no_run
//! use slidegraft::ooxml::pptx::Package;
//! use slidegraft::transfer::{transfer, TransferOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut content = Package::open("content.pptx")?;
//! let template = Package::open("template.pptx")?;
//!
//! let options = TransferOptions::new().with_recenter(false);
//! let mut transferred = transfer(&mut content, template, &options)?;
//! for slide in &transferred.report.slides {
//!     println!("slide {}: {} shapes", slide.index + 1, slide.transplant.copied);
//! }
//! transferred.package.save("out.pptx")?;
//! # Ok(())
//! # }
//! ```

pub mod options;
mod orchestrator;
pub mod outcome;
mod recenter;
mod transplant;
mod ungroup;

pub use options::TransferOptions;
pub use orchestrator::{Transferred, transfer, transfer_files};
pub use outcome::{
    RecenterOutcome, SkippedNode, SlideReport, StructuralAnomaly, TransferReport,
    TransplantReport, UngroupReport,
};
pub use recenter::recenter;
pub use transplant::{transplant, transplant_with};
pub use ungroup::ungroup;
