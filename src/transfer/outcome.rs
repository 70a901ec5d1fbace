//! Typed outcomes of the shape-tree operations.
//!
//! Problems with individual shapes never abort a slide: they are logged and
//! recorded here so callers can inspect what was left out.

use crate::common::geometry::{BoundingBox, Point};
use crate::ooxml::pptx::ShapeKind;
use thiserror::Error;

/// Why a single shape could not be processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralAnomaly {
    /// The shape's transform has missing or non-integer components
    #[error("malformed transform: {0}")]
    MalformedTransform(String),

    /// A picture whose image cannot be read from the source or stored in the
    /// target
    #[error("unresolved image: {0}")]
    UnresolvedImage(String),
}

/// A shape left out of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNode {
    /// Position in the slide's shape sequence where the node was
    pub position: usize,
    pub kind: ShapeKind,
    /// Shape name, empty when the shape has none
    pub name: String,
    pub anomaly: StructuralAnomaly,
}

/// Result of [`ungroup`](crate::transfer::ungroup).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UngroupReport {
    /// Scans over the top level that found at least one group
    pub passes: usize,
    /// Groups removed
    pub dissolved: usize,
    /// Children moved up a level (counted once per level)
    pub promoted: usize,
    pub skipped: Vec<SkippedNode>,
}

/// Result of [`transplant`](crate::transfer::transplant).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransplantReport {
    /// Shapes appended to the target slide
    pub copied: usize,
    /// Of which pictures whose image was re-embedded
    pub pictures: usize,
    /// Relationship ids inside copied payloads that still refer to the source
    pub unresolved_references: usize,
    pub skipped: Vec<SkippedNode>,
}

/// Result of [`recenter`](crate::transfer::recenter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecenterOutcome {
    /// No positioned shapes; the slide was not touched
    Unchanged,
    Centered {
        /// Union of the grouped shapes before moving
        bounds: BoundingBox,
        /// New offset of the wrapping group
        offset: Point,
        /// Number of shapes moved into the group
        grouped: usize,
    },
}

/// What happened to one content slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideReport {
    /// Index of the slide in both the content and the output presentation
    pub index: usize,
    pub ungroup: Option<UngroupReport>,
    pub transplant: TransplantReport,
    pub recenter: Option<RecenterOutcome>,
}

/// Per-slide results of a transfer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    pub slides: Vec<SlideReport>,
}

impl TransferReport {
    /// Shapes copied over all slides.
    pub fn copied(&self) -> usize {
        self.slides.iter().map(|s| s.transplant.copied).sum()
    }

    /// Shapes skipped while ungrouping or transplanting.
    pub fn skipped(&self) -> usize {
        self.slides
            .iter()
            .map(|s| {
                s.transplant.skipped.len() + s.ungroup.as_ref().map_or(0, |u| u.skipped.len())
            })
            .sum()
    }

    pub fn unresolved_references(&self) -> usize {
        self.slides
            .iter()
            .map(|s| s.transplant.unresolved_references)
            .sum()
    }
}
