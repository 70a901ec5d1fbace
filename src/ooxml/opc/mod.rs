/// Open Packaging Conventions (OPC) implementation.
///
/// The container layer of a `.pptx` file:
///
/// - Package structure (parts, relationships)
/// - Content type management
/// - ZIP-based physical packaging
///
/// Parsing uses `quick-xml` for `[Content_Types].xml` and `.rels` parts and
/// `atoi_simd` for rId and partname indices.
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use error::OpcError;
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, PartFactory, XmlPart};
pub use rel::{Relationship, Relationships};
