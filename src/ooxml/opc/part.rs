//! Open Packaging Convention (OPC) objects related to package parts.
//!
//! Every part has a unique partname, a content type, a blob and its own
//! relationships. XML parts additionally parse into an owned element tree.

use crate::common::xml::XmlDocument;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;
use std::fmt::Debug;

/// A part in an OPC package.
pub trait Part: Debug {
    fn partname(&self) -> &PackURI;

    fn content_type(&self) -> &str;

    /// Serialized content.
    fn blob(&self) -> &[u8];

    /// Replace the serialized content.
    fn set_blob(&mut self, blob: Vec<u8>);

    fn rels(&self) -> &Relationships;

    fn rels_mut(&mut self) -> &mut Relationships;

    /// rId of a relationship to `target_partname`, added if missing.
    fn relate_to(&mut self, target_partname: &PackURI, reltype: &str) -> String {
        let target_ref = target_partname.relative_ref(self.partname().base_uri());
        self.rels_mut().get_or_add(reltype, &target_ref)
    }

    /// Partname targeted by an internal relationship.
    fn related_partname(&self, r_id: &str) -> Result<PackURI> {
        self.rels()
            .get(r_id)
            .ok_or_else(|| {
                OpcError::RelationshipNotFound(format!("{} in {}", r_id, self.partname()))
            })?
            .target_partname()
    }
}

/// A binary part such as an image.
#[derive(Debug)]
pub struct BlobPart {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
}

impl BlobPart {
    pub fn new(partname: PackURI, content_type: String, blob: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type,
            blob,
            rels,
        }
    }
}

impl Part for BlobPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.blob
    }

    fn set_blob(&mut self, blob: Vec<u8>) {
        self.blob = blob;
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }
}

/// An XML part. The bytes are guaranteed to be valid UTF-8.
#[derive(Debug)]
pub struct XmlPart {
    partname: PackURI,
    content_type: String,
    xml_bytes: Vec<u8>,
    rels: Relationships,
}

impl XmlPart {
    pub fn new(partname: PackURI, content_type: String, xml_bytes: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type,
            xml_bytes,
            rels,
        }
    }

    /// Load an XML part, rejecting content that is not UTF-8.
    pub fn load(partname: PackURI, content_type: String, xml_bytes: Vec<u8>) -> Result<Self> {
        std::str::from_utf8(&xml_bytes).map_err(|e| {
            OpcError::XmlError(format!("Invalid UTF-8 in {}: {}", partname, e))
        })?;
        Ok(Self::new(partname, content_type, xml_bytes))
    }

    /// Create a part from an element tree.
    pub fn from_document(partname: PackURI, content_type: String, doc: &XmlDocument) -> Self {
        Self::new(partname, content_type, doc.to_bytes())
    }

    /// Parse the content into an owned element tree.
    pub fn document(&self) -> Result<XmlDocument> {
        XmlDocument::parse(&self.xml_bytes)
            .map_err(|e| OpcError::XmlError(format!("{}: {}", self.partname, e)))
    }

    pub fn set_document(&mut self, doc: &XmlDocument) {
        self.xml_bytes = doc.to_bytes();
    }
}

impl Part for XmlPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.xml_bytes
    }

    fn set_blob(&mut self, blob: Vec<u8>) {
        self.xml_bytes = blob;
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }
}

/// Creates the appropriate part type for a content type.
pub struct PartFactory;

impl PartFactory {
    pub fn load(partname: PackURI, content_type: String, blob: Vec<u8>) -> Result<Box<dyn Part>> {
        if Self::is_xml_content_type(&content_type) {
            Ok(Box::new(XmlPart::load(partname, content_type, blob)?))
        } else {
            Ok(Box::new(BlobPart::new(partname, content_type, blob)))
        }
    }

    #[inline]
    fn is_xml_content_type(content_type: &str) -> bool {
        content_type.ends_with("+xml") || content_type.ends_with("/xml")
    }
}
