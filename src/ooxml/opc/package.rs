//! In-memory OPC package.
//!
//! Holds every part loaded from the physical package, keyed by partname, plus
//! the package-level relationships. Parts can be added, replaced and dropped
//! before the package is written back.

use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::{Part, PartFactory};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::pkgreader::PackageReader;
use crate::ooxml::opc::pkgwriter::PackageWriter;
use crate::ooxml::opc::rel::Relationships;
use std::collections::{HashMap, HashSet};
use std::io::{Read, Seek};
use std::path::Path;

/// Upper bound on the index tried by [`OpcPackage::next_partname`].
const MAX_PARTNAME_INDEX: u32 = 100_000;

#[derive(Debug)]
pub struct OpcPackage {
    rels: Relationships,
    parts: HashMap<String, Box<dyn Part>>,
}

impl OpcPackage {
    /// Create a new empty package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI.to_string()),
            parts: HashMap::new(),
        }
    }

    /// Open a package file.
    ///
    /// # Example
    /// ```no_run
    /// use slidegraft::ooxml::opc::OpcPackage;
    ///
    /// let pkg = OpcPackage::open("deck.pptx")?;
    /// println!("{} parts", pkg.part_count());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::unmarshal(PackageReader::from_phys_reader(PhysPkgReader::open(path)?)?)
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::unmarshal(PackageReader::from_phys_reader(PhysPkgReader::new(reader)?)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::unmarshal(PackageReader::from_phys_reader(PhysPkgReader::from_bytes(data)?)?)
    }

    /// Build the part graph from serialized parts and relationships.
    fn unmarshal(mut pkg_reader: PackageReader) -> Result<Self> {
        let mut package = Self::new();

        for srel in pkg_reader.take_pkg_srels() {
            let is_external = srel.is_external();
            package
                .rels
                .add_relationship(srel.reltype, srel.target_ref, srel.r_id, is_external);
        }

        for spart in pkg_reader.take_sparts() {
            let mut part = PartFactory::load(spart.partname, spart.content_type, spart.blob)?;
            for srel in spart.srels {
                let is_external = srel.is_external();
                part.rels_mut()
                    .add_relationship(srel.reltype, srel.target_ref, srel.r_id, is_external);
            }
            package.add_part(part);
        }

        Ok(package)
    }

    /// The part the `officeDocument` package relationship points to.
    pub fn main_document_part(&self) -> Result<&dyn Part> {
        self.part_by_reltype(relationship_type::OFFICE_DOCUMENT)
    }

    pub fn main_document_partname(&self) -> Result<PackURI> {
        self.rels
            .part_with_reltype(relationship_type::OFFICE_DOCUMENT)?
            .target_partname()
    }

    pub fn get_part(&self, partname: &PackURI) -> Result<&dyn Part> {
        self.parts
            .get(partname.as_str())
            .map(|b| &**b as &dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    pub fn get_part_mut(&mut self, partname: &PackURI) -> Result<&mut dyn Part> {
        match self.parts.get_mut(partname.as_str()) {
            Some(part) => Ok(part.as_mut()),
            None => Err(OpcError::PartNotFound(partname.to_string())),
        }
    }

    /// Part targeted by the single package relationship of `reltype`.
    pub fn part_by_reltype(&self, reltype: &str) -> Result<&dyn Part> {
        let partname = self.rels.part_with_reltype(reltype)?.target_partname()?;
        self.get_part(&partname)
    }

    /// Add a part, replacing any part with the same partname.
    pub fn add_part(&mut self, part: Box<dyn Part>) {
        let partname = part.partname().to_string();
        self.parts.insert(partname, part);
    }

    /// Remove a part. Relationships pointing at it are left to the caller.
    pub fn drop_part(&mut self, partname: &PackURI) -> Option<Box<dyn Part>> {
        self.parts.remove(partname.as_str())
    }

    pub fn iter_parts(&self) -> impl Iterator<Item = &dyn Part> {
        self.parts.values().map(|b| &**b as &dyn Part)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// rId of a package relationship to `partname`, added if missing.
    pub fn relate_to(&mut self, partname: &PackURI, reltype: &str) -> String {
        let target_ref = partname.relative_ref(PACKAGE_URI);
        self.rels.get_or_add(reltype, &target_ref)
    }

    /// First free partname for a template with a `%d` placeholder, e.g.
    /// `/ppt/media/image%d.png`.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        let mut buf = itoa::Buffer::new();
        for n in 1..=MAX_PARTNAME_INDEX {
            let candidate = template.replace("%d", buf.format(n));
            if !self.parts.contains_key(&candidate) {
                return PackURI::new(candidate).map_err(OpcError::InvalidPackUri);
            }
        }
        Err(OpcError::InvalidPackUri(format!(
            "No free partname for template '{}'",
            template
        )))
    }

    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname.as_str())
    }

    /// Partnames reachable from the package relationships, sorted.
    ///
    /// Relationships whose target part is absent are ignored.
    pub fn reachable_partnames(&self) -> Vec<PackURI> {
        let mut visited: HashSet<PackURI> = HashSet::new();
        let mut queue: Vec<PackURI> = self
            .rels
            .iter()
            .filter(|rel| !rel.is_external())
            .filter_map(|rel| rel.target_partname().ok())
            .collect();

        while let Some(partname) = queue.pop() {
            let Some(part) = self.parts.get(partname.as_str()) else {
                continue;
            };
            if !visited.insert(partname) {
                continue;
            }
            queue.extend(
                part.rels()
                    .iter()
                    .filter(|rel| !rel.is_external())
                    .filter_map(|rel| rel.target_partname().ok())
                    .filter(|p| !visited.contains(p)),
            );
        }

        let mut reachable: Vec<PackURI> = visited.into_iter().collect();
        reachable.sort();
        reachable
    }

    /// Write the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PackageWriter::write(path, self)
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(self)
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;
    use crate::ooxml::opc::part::{BlobPart, XmlPart};
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn minimal_pptx() -> Vec<u8> {
        let mut zip_data = Vec::new();
        {
            let mut writer = ZipWriter::new(Cursor::new(&mut zip_data));
            let options = SimpleFileOptions::default();

            writer.start_file("[Content_Types].xml", options).unwrap();
            writer.write_all(br#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Default Extension="png" ContentType="image/png"/>
    <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
</Types>"#).unwrap();

            writer.start_file("_rels/.rels", options).unwrap();
            writer.write_all(br#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
</Relationships>"#).unwrap();

            writer.start_file("ppt/presentation.xml", options).unwrap();
            writer.write_all(br#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#).unwrap();

            writer.start_file("ppt/_rels/presentation.xml.rels", options).unwrap();
            writer.write_all(br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/missing.png"/>
</Relationships>"#).unwrap();

            writer.start_file("ppt/media/image1.png", options).unwrap();
            writer.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

            writer.start_file("ppt/media/orphan.png", options).unwrap();
            writer.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

            writer.finish().unwrap();
        }
        zip_data
    }

    #[test]
    fn test_open_package() {
        let pkg = OpcPackage::from_reader(Cursor::new(minimal_pptx())).unwrap();

        // Orphan members and dangling targets are not loaded.
        assert_eq!(pkg.part_count(), 2);
        let main = pkg.main_document_part().unwrap();
        assert_eq!(main.content_type(), ct::PML_PRESENTATION_MAIN);
        assert_eq!(main.rels().len(), 2);
    }

    #[test]
    fn test_next_partname() {
        let pkg = OpcPackage::from_bytes(&minimal_pptx()).unwrap();
        assert_eq!(
            pkg.next_partname("/ppt/media/image%d.png").unwrap().as_str(),
            "/ppt/media/image2.png"
        );
    }

    #[test]
    fn test_unreachable_parts_are_not_written() {
        let mut pkg = OpcPackage::from_bytes(&minimal_pptx()).unwrap();
        let stray = PackURI::new("/ppt/media/image9.png").unwrap();
        pkg.add_part(Box::new(BlobPart::new(stray.clone(), ct::PNG.to_string(), vec![1])));
        assert!(pkg.contains_part(&stray));

        let reloaded = OpcPackage::from_bytes(&pkg.to_bytes().unwrap()).unwrap();
        assert!(!reloaded.contains_part(&stray));
        assert!(reloaded.contains_part(&PackURI::new("/ppt/media/image1.png").unwrap()));
    }

    #[test]
    fn test_added_part_round_trips() {
        let mut pkg = OpcPackage::from_bytes(&minimal_pptx()).unwrap();
        let main = pkg.main_document_partname().unwrap();
        let slide = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        pkg.add_part(Box::new(XmlPart::new(
            slide.clone(),
            ct::PML_SLIDE.to_string(),
            b"<p:sld/>".to_vec(),
        )));
        let r_id = pkg
            .get_part_mut(&main)
            .unwrap()
            .relate_to(&slide, relationship_type::SLIDE);
        assert_eq!(r_id, "rId3");

        let reloaded = OpcPackage::from_bytes(&pkg.to_bytes().unwrap()).unwrap();
        let part = reloaded.get_part(&slide).unwrap();
        assert_eq!(part.content_type(), ct::PML_SLIDE);
        assert_eq!(part.blob(), b"<p:sld/>");
    }

    #[test]
    fn test_drop_part() {
        let mut pkg = OpcPackage::from_bytes(&minimal_pptx()).unwrap();
        let image = PackURI::new("/ppt/media/image1.png").unwrap();
        assert!(pkg.drop_part(&image).is_some());
        assert!(pkg.get_part(&image).is_err());
        assert!(pkg.drop_part(&image).is_none());
    }
}
