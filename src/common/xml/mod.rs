//! XML helpers shared by the package layer and the shape-tree engine.
//!
//! Slide parts are parsed into an owned [`XmlDocument`] so that shapes can be
//! moved between trees, re-parented, and rewritten before serialization.

pub mod element;
pub mod escape;

pub use element::{XmlDocument, XmlElement, XmlNode};
pub use escape::{escape_attr, escape_xml, unescape_xml};
