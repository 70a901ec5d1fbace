//! Low-level, read-only view of a serialized OPC package.
//!
//! Parses `[Content_Types].xml`, reads the package relationships and walks the
//! relationship graph to collect every reachable part together with its own
//! relationships. Members no relationship reaches are ignored.

use crate::ooxml::opc::constants::target_mode;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use log::warn;
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Content type used when neither an override nor a default matches.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A part as loaded from the physical package.
#[derive(Debug)]
pub struct SerializedPart {
    pub partname: PackURI,
    pub content_type: String,
    /// Relationship type of the first relationship that reached this part
    pub reltype: String,
    pub blob: Vec<u8>,
    pub srels: SmallVec<[SerializedRelationship; 8]>,
}

/// A relationship as read from a `.rels` part.
#[derive(Debug, Clone)]
pub struct SerializedRelationship {
    /// Directory of the source part
    pub base_uri: String,
    pub r_id: String,
    pub reltype: String,
    pub target_ref: String,
    pub target_mode: String,
}

impl SerializedRelationship {
    #[inline]
    pub fn is_external(&self) -> bool {
        self.target_mode == target_mode::EXTERNAL
    }

    /// Absolute partname of an internal target.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external() {
            return Err(OpcError::InvalidRelationship(
                "Cannot get target_partname for external relationship".to_string(),
            ));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).map_err(OpcError::InvalidPackUri)
    }
}

/// Content type lookup built from `[Content_Types].xml`.
#[derive(Debug, Default)]
struct ContentTypeMap {
    /// Lowercased extension to content type
    defaults: HashMap<String, String>,
    /// Partname to content type
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self::default();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let is_default = match e.local_name().as_ref() {
                        b"Default" => Some(true),
                        b"Override" => Some(false),
                        _ => None,
                    };

                    if let Some(is_default) = is_default {
                        let key_attr: &[u8] = if is_default { b"Extension" } else { b"PartName" };
                        let mut key = None;
                        let mut content_type = None;
                        for attr in e.attributes() {
                            let attr = attr?;
                            if attr.key.as_ref() == key_attr {
                                key = Some(attr.unescape_value()?.to_string());
                            } else if attr.key.as_ref() == b"ContentType" {
                                content_type = Some(attr.unescape_value()?.to_string());
                            }
                        }

                        if let (Some(key), Some(ct)) = (key, content_type) {
                            if is_default {
                                map.defaults.insert(key.to_lowercase(), ct);
                            } else {
                                map.overrides.insert(key, ct);
                            }
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    /// Override first, then the extension default.
    fn get(&self, pack_uri: &PackURI) -> Option<&str> {
        if let Some(ct) = self.overrides.get(pack_uri.as_str()) {
            return Some(ct);
        }
        // Override partnames are compared case-insensitively by consumers.
        if let Some((_, ct)) = self
            .overrides
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(pack_uri.as_str()))
        {
            return Some(ct);
        }
        self.defaults
            .get(&pack_uri.ext().to_lowercase())
            .map(String::as_str)
    }
}

/// Parsed package: package relationships plus every reachable part.
pub struct PackageReader {
    pkg_srels: SmallVec<[SerializedRelationship; 8]>,
    sparts: Vec<SerializedPart>,
}

impl PackageReader {
    pub fn from_phys_reader(mut phys_reader: PhysPkgReader) -> Result<Self> {
        let content_types = ContentTypeMap::from_xml(phys_reader.content_types_xml()?)?;

        let package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        let pkg_srels = Self::load_rels(&phys_reader, &package_uri)?;

        let sparts = Self::load_parts(&mut phys_reader, &pkg_srels, &content_types)?;

        Ok(Self { pkg_srels, sparts })
    }

    fn load_rels(
        phys_reader: &PhysPkgReader,
        source_uri: &PackURI,
    ) -> Result<SmallVec<[SerializedRelationship; 8]>> {
        match phys_reader.rels_xml_for(source_uri)? {
            Some(xml) => Self::parse_rels_xml(xml, source_uri.base_uri()),
            None => Ok(SmallVec::new()),
        }
    }

    /// Parse a `.rels` part.
    pub(crate) fn parse_rels_xml(
        rels_xml: &[u8],
        base_uri: &str,
    ) -> Result<SmallVec<[SerializedRelationship; 8]>> {
        let mut srels = SmallVec::new();
        let mut reader = Reader::from_reader(rels_xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    if e.local_name().as_ref() == b"Relationship" {
                        let mut r_id = None;
                        let mut reltype = None;
                        let mut target_ref = None;
                        let mut target_mode = target_mode::INTERNAL.to_string();

                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"Id" => r_id = Some(attr.unescape_value()?.to_string()),
                                b"Type" => reltype = Some(attr.unescape_value()?.to_string()),
                                b"Target" => target_ref = Some(attr.unescape_value()?.to_string()),
                                b"TargetMode" => target_mode = attr.unescape_value()?.to_string(),
                                _ => {},
                            }
                        }

                        if let (Some(id), Some(rt), Some(tr)) = (r_id, reltype, target_ref) {
                            srels.push(SerializedRelationship {
                                base_uri: base_uri.to_string(),
                                r_id: id,
                                reltype: rt,
                                target_ref: tr,
                                target_mode,
                            });
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::XmlError(format!("Rels parse error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Ok(srels)
    }

    /// Depth-first walk of the relationship graph from the package rels.
    ///
    /// Dangling internal targets are logged and skipped.
    fn load_parts(
        phys_reader: &mut PhysPkgReader,
        pkg_srels: &[SerializedRelationship],
        content_types: &ContentTypeMap,
    ) -> Result<Vec<SerializedPart>> {
        let mut sparts = Vec::with_capacity(32);
        let mut visited: HashSet<PackURI> = HashSet::with_capacity(32);
        let mut work_queue: Vec<(PackURI, String)> = Vec::with_capacity(pkg_srels.len());

        for srel in pkg_srels {
            Self::enqueue(srel, &mut visited, &mut work_queue);
        }

        while let Some((partname, reltype)) = work_queue.pop() {
            if !phys_reader.contains(&partname) {
                warn!("Relationship target {} is missing from the package", partname);
                continue;
            }

            let part_srels = Self::load_rels(phys_reader, &partname)?;
            for child in &part_srels {
                Self::enqueue(child, &mut visited, &mut work_queue);
            }

            let blob = phys_reader.take_blob(&partname)?;
            let content_type = match content_types.get(&partname) {
                Some(ct) => ct.to_string(),
                None => {
                    warn!("No content type for {}, using {}", partname, FALLBACK_CONTENT_TYPE);
                    FALLBACK_CONTENT_TYPE.to_string()
                },
            };

            sparts.push(SerializedPart {
                partname,
                content_type,
                reltype,
                blob,
                srels: part_srels,
            });
        }

        Ok(sparts)
    }

    fn enqueue(
        srel: &SerializedRelationship,
        visited: &mut HashSet<PackURI>,
        queue: &mut Vec<(PackURI, String)>,
    ) {
        if srel.is_external() {
            return;
        }
        match srel.target_partname() {
            Ok(partname) => {
                if visited.insert(partname.clone()) {
                    queue.push((partname, srel.reltype.clone()));
                }
            },
            Err(e) => warn!("Ignoring relationship {}: {}", srel.r_id, e),
        }
    }

    pub fn iter_sparts(&self) -> impl Iterator<Item = &SerializedPart> {
        self.sparts.iter()
    }

    pub fn pkg_srels(&self) -> &[SerializedRelationship] {
        &self.pkg_srels
    }

    pub fn take_pkg_srels(&mut self) -> SmallVec<[SerializedRelationship; 8]> {
        std::mem::take(&mut self.pkg_srels)
    }

    pub fn take_sparts(&mut self) -> Vec<SerializedPart> {
        std::mem::take(&mut self.sparts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;

    #[test]
    fn test_content_type_map() {
        let xml = br#"<?xml version="1.0"?>
            <Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
                <Default Extension="xml" ContentType="application/xml"/>
                <Default Extension="PNG" ContentType="image/png"/>
                <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
            </Types>"#;

        let map = ContentTypeMap::from_xml(xml).unwrap();

        let uri = PackURI::new("/docProps/app.xml").unwrap();
        assert_eq!(map.get(&uri), Some(ct::XML));

        let uri = PackURI::new("/ppt/presentation.xml").unwrap();
        assert_eq!(map.get(&uri), Some(ct::PML_PRESENTATION_MAIN));

        let uri = PackURI::new("/ppt/media/image1.png").unwrap();
        assert_eq!(map.get(&uri), Some(ct::PNG));

        let uri = PackURI::new("/ppt/media/video.mp4").unwrap();
        assert_eq!(map.get(&uri), None);
    }

    #[test]
    fn test_parse_rels_xml() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/></Relationships>"#;

        let srels = PackageReader::parse_rels_xml(xml, "/ppt/slides").unwrap();
        assert_eq!(srels.len(), 2);
        assert_eq!(srels[0].target_partname().unwrap().as_str(), "/ppt/media/image1.png");
        assert!(srels[1].is_external());
        assert_eq!(srels[1].target_ref, "https://example.com/?a=1&b=2");
    }
}
