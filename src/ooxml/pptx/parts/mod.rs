/// Parts for PowerPoint presentation documents.
///
/// This module contains wrapper types for the XML parts of a .pptx package
/// that are read or edited as a whole, following the structure of the
/// python-pptx library. Slides themselves are [`crate::ooxml::pptx::Slide`].
pub mod presentation;
pub mod slide;

pub use presentation::{PresentationPart, SlideId};
pub use slide::{SlideLayoutPart, SlideMasterPart};
