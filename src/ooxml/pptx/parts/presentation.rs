/// Presentation part - the main part in a .pptx package.
///
/// Corresponds to `/ppt/presentation.xml` in the package.
use crate::common::geometry::Extent;
use crate::common::xml::{XmlDocument, XmlElement};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;

/// Smallest slide id PowerPoint accepts.
const MIN_SLIDE_ID: u32 = 256;
/// Largest slide id PowerPoint accepts.
const MAX_SLIDE_ID: u32 = 2_147_483_647;

/// Children of `p:presentation` that precede `p:sldIdLst`, in schema order.
const BEFORE_SLD_ID_LST: [&str; 3] = ["p:sldMasterIdLst", "p:notesMasterIdLst", "p:handoutMasterIdLst"];

/// A `p:sldId` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideId {
    pub id: u32,
    pub r_id: String,
}

/// The main presentation part.
///
/// This part lists the slides (`p:sldIdLst`) and slide masters
/// (`p:sldMasterIdLst`) by relationship id and defines the slide size shared
/// by every slide.
///
/// # Example
///
/// ```rust
/// use slidegraft::ooxml::pptx::parts::PresentationPart;
/// use slidegraft::ooxml::opc::PackURI;
///
/// let xml = br#"<p:presentation><p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst>
///     <p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#;
/// let part = PresentationPart::parse(PackURI::new("/ppt/presentation.xml")?, xml)?;
/// assert_eq!(part.slide_ids().len(), 1);
/// assert_eq!(part.slide_size()?.cx, 9144000);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct PresentationPart {
    partname: PackURI,
    doc: XmlDocument,
}

impl PresentationPart {
    /// Create a PresentationPart from an OPC Part.
    pub fn from_part(part: &dyn Part) -> Result<Self> {
        Self::parse(part.partname().clone(), part.blob())
    }

    pub fn parse(partname: PackURI, xml: &[u8]) -> Result<Self> {
        let doc = XmlDocument::parse(xml)?;
        if doc.root.local_name() != "presentation" {
            return Err(OoxmlError::InvalidFormat(format!(
                "{} has root <{}>, expected <p:presentation>",
                partname,
                doc.root.name()
            )));
        }
        Ok(Self { partname, doc })
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Serialized part content.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.doc.to_bytes()
    }

    /// Slide ids in presentation order.
    pub fn slide_ids(&self) -> Vec<SlideId> {
        let Some(list) = self.doc.root.child("p:sldIdLst") else {
            return Vec::new();
        };
        list.child_elements()
            .filter(|e| e.is("p:sldId"))
            .filter_map(|e| {
                let id = u32::try_from(e.attr_i64("id")?).ok()?;
                let r_id = e.attr("r:id")?.to_string();
                Some(SlideId { id, r_id })
            })
            .collect()
    }

    /// Relationship ids of the slide masters, in order.
    pub fn slide_master_rids(&self) -> Vec<String> {
        self.doc
            .root
            .child("p:sldMasterIdLst")
            .map(|list| {
                list.child_elements()
                    .filter_map(|e| e.attr("r:id"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Slide size (`p:sldSz`) in EMUs.
    pub fn slide_size(&self) -> Result<Extent> {
        let sld_sz = self
            .doc
            .root
            .child("p:sldSz")
            .ok_or_else(|| OoxmlError::InvalidFormat("presentation has no <p:sldSz>".to_string()))?;
        match (sld_sz.attr_i64("cx"), sld_sz.attr_i64("cy")) {
            (Some(cx), Some(cy)) => Ok(Extent::new(cx, cy)),
            _ => Err(OoxmlError::InvalidFormat(
                "<p:sldSz> needs integer cx and cy attributes".to_string(),
            )),
        }
    }

    fn next_slide_id(&self) -> u32 {
        let used: Vec<u32> = self.slide_ids().iter().map(|s| s.id).collect();
        let max = used.iter().copied().max().unwrap_or(MIN_SLIDE_ID - 1);
        if max < MAX_SLIDE_ID {
            return (max + 1).max(MIN_SLIDE_ID);
        }
        (MIN_SLIDE_ID..=MAX_SLIDE_ID)
            .find(|id| !used.contains(id))
            .unwrap_or(MIN_SLIDE_ID)
    }

    fn sld_id_lst_mut(&mut self) -> &mut XmlElement {
        let root = &mut self.doc.root;
        if root.position_of("p:sldIdLst").is_none() {
            let idx = BEFORE_SLD_ID_LST
                .iter()
                .filter_map(|name| root.position_of(name))
                .max()
                .map_or(0, |i| i + 1);
            root.insert_child(idx, XmlElement::new("p:sldIdLst"));
        }
        root.get_or_insert_child("p:sldIdLst")
    }

    /// Register a slide related as `r_id`, returning its new slide id.
    pub fn add_slide_id(&mut self, r_id: &str) -> u32 {
        let id = self.next_slide_id();
        self.sld_id_lst_mut().push_child(
            XmlElement::new("p:sldId")
                .with_attr("id", id.to_string())
                .with_attr("r:id", r_id),
        );
        id
    }

    /// Remove every slide id, returning the removed entries.
    ///
    /// Custom shows and section lists only refer to slides, so they are
    /// emptied as well.
    pub fn clear_slide_ids(&mut self) -> Vec<SlideId> {
        let removed = self.slide_ids();
        let root = &mut self.doc.root;
        if let Some(list) = root.child_mut("p:sldIdLst") {
            list.children_mut().clear();
        }
        root.remove_children_named("p:custShowLst");
        if let Some(ext_lst) = root.child_mut("p:extLst") {
            ext_lst.visit_descendants_mut(&mut |e| {
                if e.local_name() == "sldIdLst" {
                    e.children_mut().clear();
                }
            });
        }
        removed
    }
}
