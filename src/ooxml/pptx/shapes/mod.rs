/// Shapes module for PowerPoint presentations.
///
/// This module provides types for working with the shapes on a slide:
/// - The shape tree adapter, an ordered and mutable view of a slide's shapes
/// - Pictures (images)
/// - Groups and their child coordinate space
/// - Layout placeholders
///
/// Every node of a shape tree is classified as a [`Picture`], a
/// [`GroupShape`] or a generic shape whose payload is carried verbatim.
///
/// The design follows the python-pptx library structure.
pub mod base;
pub mod group;
pub mod picture;
pub mod placeholder;
pub mod tree;

pub use base::{BaseShape, ShapeIds, ShapeType};
pub use group::GroupShape;
pub use picture::Picture;
pub use tree::{ShapeTree, TERMINAL_MARKER};

use crate::common::geometry::PartialTransform;
use crate::common::xml::XmlElement;
use crate::ooxml::error::Result;

/// Kind tag of a [`ShapeNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Picture,
    Group,
    Generic,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeKind::Picture => write!(f, "picture"),
            ShapeKind::Group => write!(f, "group"),
            ShapeKind::Generic => write!(f, "shape"),
        }
    }
}

/// A node of a shape tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeNode {
    Picture(Picture),
    Group(GroupShape),
    /// Any other shape: autoshapes, connectors, graphic frames, content parts
    /// and markup-compatibility wrappers.
    Generic(BaseShape),
}

impl ShapeNode {
    pub fn from_element(element: XmlElement) -> Self {
        match ShapeType::from_name(element.name()) {
            ShapeType::Picture => ShapeNode::Picture(Picture::new(element)),
            ShapeType::GroupShape => ShapeNode::Group(GroupShape::new(element)),
            _ => ShapeNode::Generic(BaseShape::new(element)),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeNode::Picture(_) => ShapeKind::Picture,
            ShapeNode::Group(_) => ShapeKind::Group,
            ShapeNode::Generic(_) => ShapeKind::Generic,
        }
    }

    pub fn base(&self) -> &BaseShape {
        match self {
            ShapeNode::Picture(p) => p.base(),
            ShapeNode::Group(g) => g.base(),
            ShapeNode::Generic(b) => b,
        }
    }

    pub fn transform(&self) -> Result<PartialTransform> {
        self.base().transform()
    }

    /// Display label for logs: the shape name, else its kind.
    pub fn label(&self) -> String {
        match self.base().name() {
            Some(name) if !name.is_empty() => format!("{} '{}'", self.kind(), name),
            _ => self.kind().to_string(),
        }
    }

    pub fn into_element(self) -> XmlElement {
        match self {
            ShapeNode::Picture(p) => p.into_element(),
            ShapeNode::Group(g) => g.into_element(),
            ShapeNode::Generic(b) => b.into_element(),
        }
    }
}

impl From<XmlElement> for ShapeNode {
    fn from(element: XmlElement) -> Self {
        ShapeNode::from_element(element)
    }
}
