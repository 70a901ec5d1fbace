/// Package implementation for PowerPoint presentations.
use crate::common::geometry::Extent;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::{BlobPart, Part, XmlPart};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::pptx::media::Asset;
use crate::ooxml::pptx::parts::{PresentationPart, SlideLayoutPart, SlideMasterPart};
use crate::ooxml::pptx::shapes::placeholder::clone_layout_placeholder;
use crate::ooxml::pptx::slide::Slide;
use log::debug;
use std::io::{Read, Seek};
use std::path::Path;

/// Main-part content types accepted as presentations.
const PRESENTATION_CONTENT_TYPES: [&str; 4] = [
    ct::PML_PRESENTATION_MAIN,
    ct::PML_PRES_MACRO_MAIN,
    ct::PML_TEMPLATE_MAIN,
    ct::PML_SLIDESHOW_MAIN,
];

/// A PowerPoint (.pptx) package.
///
/// This is the main entry point for working with PowerPoint presentations.
/// It wraps an OPC package, keeps the presentation part and every slide
/// parsed, and writes them back when the package is saved.
///
/// # Examples
///
/// ```rust,no_run
/// use slidegraft::ooxml::pptx::Package;
///
/// // Open an existing presentation
/// let mut pkg = Package::open("presentation.pptx")?;
/// println!("Presentation has {} slides", pkg.slide_count());
///
/// // Start over on the first slide's layout
/// let layout = pkg.slide_layout(0)?;
/// pkg.clear_slides()?;
/// pkg.add_slide(&layout, true)?;
/// pkg.save("fresh.pptx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Package {
    /// The underlying OPC package
    opc: OpcPackage,
    presentation: PresentationPart,
    slides: Vec<Slide>,
}

impl Package {
    /// Open a .pptx package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(OpcPackage::open(path)?)
    }

    /// Create a .pptx package from a reader.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use slidegraft::ooxml::pptx::Package;
    /// use std::io::Cursor;
    ///
    /// let data = std::fs::read("presentation.pptx")?;
    /// let pkg = Package::from_reader(Cursor::new(data))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::load(OpcPackage::from_reader(reader)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::load(OpcPackage::from_bytes(data)?)
    }

    fn load(opc: OpcPackage) -> Result<Self> {
        // Verify it's a PowerPoint presentation by checking the main part's content type
        let main_part = opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;

        let content_type = main_part.content_type();
        if !PRESENTATION_CONTENT_TYPES.iter().any(|t| *t == content_type) {
            return Err(OoxmlError::InvalidContentType {
                expected: format!("{} or {}", ct::PML_PRESENTATION_MAIN, ct::PML_PRES_MACRO_MAIN),
                got: content_type.to_string(),
            });
        }

        let presentation = PresentationPart::from_part(main_part)?;
        let mut slides = Vec::new();
        for sld in presentation.slide_ids() {
            let partname = main_part.related_partname(&sld.r_id)?;
            let part = opc.get_part(&partname)?;
            slides.push(Slide::parse(partname, part.blob())?);
        }
        debug!("Loaded presentation with {} slides", slides.len());

        Ok(Self {
            opc,
            presentation,
            slides,
        })
    }

    #[inline]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide(&self, index: usize) -> Result<&Slide> {
        self.slides.get(index).ok_or(OoxmlError::SlideNotFound(index))
    }

    pub fn slide_mut(&mut self, index: usize) -> Result<&mut Slide> {
        self.slides.get_mut(index).ok_or(OoxmlError::SlideNotFound(index))
    }

    /// Slides in presentation order.
    #[inline]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Slide canvas size in EMUs.
    pub fn slide_size(&self) -> Result<Extent> {
        self.presentation.slide_size()
    }

    fn slide_part(&self, index: usize) -> Result<&dyn Part> {
        let partname = self.slide(index)?.partname();
        Ok(self.opc.get_part(partname)?)
    }

    /// Copy of the image a slide relates to as `r_id`.
    pub fn image(&self, slide: usize, r_id: &str) -> Result<Asset> {
        let part = self.slide_part(slide)?;
        let rel = part.rels().get(r_id).ok_or_else(|| {
            OoxmlError::InvalidRelationship(format!("{} not found in {}", r_id, part.partname()))
        })?;
        if rel.reltype() != rt::IMAGE {
            return Err(OoxmlError::InvalidRelationship(format!(
                "{} in {} is not an image relationship",
                r_id,
                part.partname()
            )));
        }
        if rel.is_external() {
            return Err(OoxmlError::InvalidRelationship(format!(
                "{} in {} links to an external image",
                r_id,
                part.partname()
            )));
        }
        let partname = rel.target_partname()?;
        let media = self.opc.get_part(&partname)?;
        Ok(Asset::from_part(&partname, media.content_type(), media.blob()))
    }

    /// Media part already holding exactly these bytes.
    fn find_media(&self, asset: &Asset) -> Option<PackURI> {
        self.opc
            .iter_parts()
            .find(|p| {
                p.partname().as_str().starts_with("/ppt/media/")
                    && p.content_type() == asset.content_type()
                    && p.blob() == asset.blob()
            })
            .map(|p| p.partname().clone())
    }

    /// Store an image in this package and relate it to a slide.
    ///
    /// Returns the slide's relationship id for the image. Identical images
    /// share one media part.
    pub fn add_image(&mut self, slide: usize, asset: &Asset) -> Result<String> {
        let slide_partname = self.slide(slide)?.partname().clone();
        let media = match self.find_media(asset) {
            Some(partname) => partname,
            None => {
                let template = format!("/ppt/media/image%d.{}", asset.extension());
                let partname = self.opc.next_partname(&template)?;
                debug!("Adding media part {} ({} bytes)", partname, asset.len());
                self.opc.add_part(Box::new(BlobPart::new(
                    partname.clone(),
                    asset.content_type().to_string(),
                    asset.blob().to_vec(),
                )));
                partname
            },
        };
        Ok(self
            .opc
            .get_part_mut(&slide_partname)?
            .relate_to(&media, rt::IMAGE))
    }

    /// Partname of the layout a slide is based on.
    pub fn slide_layout(&self, slide: usize) -> Result<PackURI> {
        let part = self.slide_part(slide)?;
        Ok(part.rels().part_with_reltype(rt::SLIDE_LAYOUT)?.target_partname()?)
    }

    /// First layout of the first slide master.
    pub fn default_layout(&self) -> Result<PackURI> {
        let pres_part = self.opc.get_part(self.presentation.partname())?;
        let master_partname = match self.presentation.slide_master_rids().first() {
            Some(r_id) => pres_part.related_partname(r_id)?,
            None => pres_part
                .rels()
                .all_with_reltype(rt::SLIDE_MASTER)
                .first()
                .ok_or_else(|| OoxmlError::PartNotFound("slide master".to_string()))?
                .target_partname()?,
        };

        let master_part = self.opc.get_part(&master_partname)?;
        let master = SlideMasterPart::from_part(master_part)?;
        match master.layout_rids().first() {
            Some(r_id) => Ok(master_part.related_partname(r_id)?),
            None => Ok(master_part
                .rels()
                .all_with_reltype(rt::SLIDE_LAYOUT)
                .first()
                .ok_or_else(|| {
                    OoxmlError::PartNotFound(format!("slide layout of {}", master_partname))
                })?
                .target_partname()?),
        }
    }

    /// Remove every slide from the presentation.
    ///
    /// Slide parts and anything only they referred to (notes, media) are no
    /// longer reachable and are not written on save.
    pub fn clear_slides(&mut self) -> Result<()> {
        let pres_partname = self.presentation.partname().clone();
        let removed = self.presentation.clear_slide_ids();
        let pres_part = self.opc.get_part_mut(&pres_partname)?;
        let mut dropped = Vec::with_capacity(removed.len());
        for sld in &removed {
            if let Ok(partname) = pres_part.related_partname(&sld.r_id) {
                dropped.push(partname);
            }
            pres_part.rels_mut().remove(&sld.r_id);
        }
        for partname in &dropped {
            self.opc.drop_part(partname);
        }
        debug!("Removed {} slides", removed.len());
        self.slides.clear();
        Ok(())
    }

    /// Append an empty slide based on `layout`, returning its index.
    ///
    /// With `clone_placeholders` the layout's placeholders (except date,
    /// footer and slide number) are copied onto the slide as empty shapes
    /// that inherit position and formatting from the layout.
    pub fn add_slide(&mut self, layout: &PackURI, clone_placeholders: bool) -> Result<usize> {
        let layout_part = self.opc.get_part(layout)?;
        if layout_part.content_type() != ct::PML_SLIDE_LAYOUT {
            return Err(OoxmlError::InvalidContentType {
                expected: ct::PML_SLIDE_LAYOUT.to_string(),
                got: layout_part.content_type().to_string(),
            });
        }

        let partname = self.opc.next_partname("/ppt/slides/slide%d.xml")?;
        let mut slide = Slide::new(partname.clone())?;
        if clone_placeholders {
            let layout = SlideLayoutPart::from_part(layout_part)?;
            let mut tree = slide.shape_tree();
            for sp in layout.shapes() {
                if let Some(placeholder) = clone_layout_placeholder(sp, tree.next_shape_id()) {
                    tree.append(placeholder);
                }
            }
        }

        let mut part = XmlPart::new(partname.clone(), ct::PML_SLIDE.to_string(), slide.to_bytes());
        part.relate_to(layout, rt::SLIDE_LAYOUT);
        self.opc.add_part(Box::new(part));

        let r_id = self
            .opc
            .get_part_mut(self.presentation.partname())?
            .relate_to(&partname, rt::SLIDE);
        let id = self.presentation.add_slide_id(&r_id);
        debug!("Added slide {} (id {}, {}) on {}", partname, id, r_id, layout);

        self.slides.push(slide);
        Ok(self.slides.len() - 1)
    }

    /// Write the parsed slides and presentation back into their parts.
    fn flush(&mut self) -> Result<()> {
        for slide in &self.slides {
            self.opc
                .get_part_mut(slide.partname())?
                .set_blob(slide.to_bytes());
        }
        self.opc
            .get_part_mut(self.presentation.partname())?
            .set_blob(self.presentation.to_bytes());
        Ok(())
    }

    /// Save the presentation to a file.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.flush()?;
        self.opc.save(path)?;
        Ok(())
    }

    /// Serialize the presentation to bytes.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.flush()?;
        Ok(self.opc.to_bytes()?)
    }

    /// Get the underlying OPC package.
    ///
    /// This provides access to lower-level package operations.
    #[inline]
    pub fn opc_package(&self) -> &OpcPackage {
        &self.opc
    }

    /// Mutable access to the underlying OPC package. Parsed slides are
    /// written over their parts on save.
    #[inline]
    pub fn opc_package_mut(&mut self) -> &mut OpcPackage {
        &mut self.opc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::shapes::placeholder::placeholder_of;
    use crate::ooxml::pptx::testing::{DeckBuilder, PNG_BYTES, pic, sp};

    #[test]
    fn test_open_deck() {
        let pkg = DeckBuilder::new()
            .slide(&sp(2, "A", 0, 0, 10, 10))
            .slide("")
            .package();
        assert_eq!(pkg.slide_count(), 2);
        assert_eq!(pkg.slide(0).unwrap().shapes().len(), 1);
        assert!(pkg.slide(1).unwrap().shapes().is_empty());
        assert!(matches!(pkg.slide(2), Err(OoxmlError::SlideNotFound(2))));
        assert_eq!(pkg.slide_size().unwrap(), Extent::new(9_144_000, 6_858_000));
    }

    #[test]
    fn test_rejects_non_presentation() {
        let mut opc = OpcPackage::from_bytes(&DeckBuilder::new().build()).unwrap();
        let main = opc.main_document_partname().unwrap();
        let blob = opc.get_part(&main).unwrap().blob().to_vec();
        opc.add_part(Box::new(XmlPart::new(main, ct::XML.to_string(), blob)));
        let bytes = opc.to_bytes().unwrap();
        assert!(matches!(
            Package::from_bytes(&bytes),
            Err(OoxmlError::InvalidContentType { .. })
        ));
    }

    #[test]
    fn test_missing_slide_size() {
        let pkg = DeckBuilder::new().without_slide_size().package();
        assert!(pkg.slide_size().is_err());
    }

    #[test]
    fn test_image_and_add_image() {
        let mut pkg = DeckBuilder::new()
            .slide_with_images(&pic(2, "P", "rId2", 0, 0, 5, 5), &[("rId2", PNG_BYTES)])
            .slide("")
            .package();
        let asset = pkg.image(0, "rId2").unwrap();
        assert_eq!(asset.blob(), PNG_BYTES);
        assert_eq!(asset.content_type(), ct::PNG);
        assert!(pkg.image(0, "rId9").is_err());
        assert!(pkg.image(0, "rId1").is_err());

        // Same bytes reuse the existing media part.
        let r_id = pkg.add_image(1, &asset).unwrap();
        assert_eq!(pkg.image(1, &r_id).unwrap(), asset);
        let media_parts = pkg
            .opc_package()
            .iter_parts()
            .filter(|p| p.partname().as_str().starts_with("/ppt/media/"))
            .count();
        assert_eq!(media_parts, 1);

        let other = Asset::new(b"GIF89a-other".to_vec(), ct::GIF, "gif");
        let r_id = pkg.add_image(1, &other).unwrap();
        let slide_part = pkg.slide_part(1).unwrap();
        let target = slide_part.related_partname(&r_id).unwrap();
        assert_eq!(target.as_str(), "/ppt/media/image1.gif");
    }

    #[test]
    fn test_layouts() {
        let pkg = DeckBuilder::new()
            .slide_on_layout(2, "", &[])
            .package();
        assert_eq!(pkg.slide_layout(0).unwrap().as_str(), "/ppt/slideLayouts/slideLayout2.xml");
        assert_eq!(pkg.default_layout().unwrap().as_str(), "/ppt/slideLayouts/slideLayout1.xml");
    }

    #[test]
    fn test_clear_and_add_slides_round_trip() {
        let mut pkg = DeckBuilder::new()
            .slide(&sp(2, "Old", 0, 0, 10, 10))
            .slide(&sp(2, "Older", 0, 0, 10, 10))
            .package();
        let layout = pkg.slide_layout(0).unwrap();
        pkg.clear_slides().unwrap();
        assert_eq!(pkg.slide_count(), 0);

        let first = pkg.add_slide(&layout, false).unwrap();
        let second = pkg.add_slide(&layout, true).unwrap();
        assert_eq!((first, second), (0, 1));
        assert_eq!(pkg.slide(0).unwrap().partname().as_str(), "/ppt/slides/slide1.xml");

        let placeholders = pkg.slide(1).unwrap().shapes();
        assert_eq!(placeholders.len(), 1);
        let ph = placeholder_of(placeholders[0].base().element()).unwrap();
        assert_eq!(ph.attr("type"), Some("ctrTitle"));

        let reopened = Package::from_bytes(&pkg.to_bytes().unwrap()).unwrap();
        assert_eq!(reopened.slide_count(), 2);
        assert!(reopened.slide(0).unwrap().shapes().is_empty());
        assert_eq!(reopened.slide_layout(1).unwrap(), layout);
        assert_eq!(reopened.presentation.slide_ids()[0].id, 256);
    }

    #[test]
    fn test_add_slide_rejects_non_layout() {
        let mut pkg = DeckBuilder::new().slide("").package();
        let slide = pkg.slide(0).unwrap().partname().clone();
        assert!(pkg.add_slide(&slide, false).is_err());
        let missing = PackURI::new("/ppt/slideLayouts/slideLayout9.xml").unwrap();
        assert!(pkg.add_slide(&missing, false).is_err());
    }

    #[test]
    fn test_save_writes_slide_edits() {
        let mut pkg = DeckBuilder::new().slide("").package();
        pkg.slide_mut(0)
            .unwrap()
            .shape_tree()
            .append(crate::common::xml::XmlElement::parse(&sp(5, "New", 1, 2, 3, 4)).unwrap());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edited.pptx");
        pkg.save(&path).unwrap();

        let reopened = Package::open(&path).unwrap();
        let shapes = reopened.slide(0).unwrap().shapes();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].base().name(), Some("New"));
    }
}
