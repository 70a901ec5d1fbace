/// Slide layout and slide master parts.
///
/// Layouts and masters are only read: a new slide is related to a layout and
/// may copy the layout's placeholders, and the default layout is found
/// through the first master.
use crate::common::xml::{XmlDocument, XmlElement};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;
use crate::ooxml::pptx::shapes::base::is_shape_element;

fn parse_root(part: &dyn Part, expected: &str) -> Result<XmlDocument> {
    let doc = XmlDocument::parse(part.blob())?;
    if doc.root.local_name() != expected {
        return Err(OoxmlError::InvalidFormat(format!(
            "{} has root <{}>, expected <p:{}>",
            part.partname(),
            doc.root.name(),
            expected
        )));
    }
    Ok(doc)
}

/// A slide master part.
///
/// Corresponds to `/ppt/slideMasters/slideMasterN.xml` in the package.
#[derive(Debug, Clone)]
pub struct SlideMasterPart {
    partname: PackURI,
    doc: XmlDocument,
}

impl SlideMasterPart {
    pub fn from_part(part: &dyn Part) -> Result<Self> {
        Ok(Self {
            partname: part.partname().clone(),
            doc: parse_root(part, "sldMaster")?,
        })
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Relationship ids of the master's layouts, in `p:sldLayoutIdLst` order.
    pub fn layout_rids(&self) -> Vec<String> {
        self.doc
            .root
            .child("p:sldLayoutIdLst")
            .map(|list| {
                list.child_elements()
                    .filter_map(|e| e.attr("r:id"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A slide layout part.
///
/// Corresponds to `/ppt/slideLayouts/slideLayoutN.xml` in the package.
#[derive(Debug, Clone)]
pub struct SlideLayoutPart {
    partname: PackURI,
    doc: XmlDocument,
}

impl SlideLayoutPart {
    pub fn from_part(part: &dyn Part) -> Result<Self> {
        Ok(Self {
            partname: part.partname().clone(),
            doc: parse_root(part, "sldLayout")?,
        })
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Layout name from `p:cSld/@name`.
    pub fn name(&self) -> Option<&str> {
        self.doc.root.child("p:cSld").and_then(|c| c.attr("name"))
    }

    /// Top-level shapes of the layout's shape tree.
    pub fn shapes(&self) -> impl Iterator<Item = &XmlElement> {
        self.doc
            .root
            .path(&["p:cSld", "p:spTree"])
            .into_iter()
            .flat_map(|tree| tree.child_elements())
            .filter(|e| is_shape_element(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;
    use crate::ooxml::opc::part::XmlPart;

    fn xml_part(name: &str, xml: &str) -> XmlPart {
        XmlPart::new(PackURI::new(name).unwrap(), ct::XML.to_string(), xml.as_bytes().to_vec())
    }

    #[test]
    fn test_master_layout_rids() {
        let part = xml_part(
            "/ppt/slideMasters/slideMaster1.xml",
            r#"<p:sldMaster><p:cSld/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/><p:sldLayoutId id="2147483650" r:id="rId2"/></p:sldLayoutIdLst></p:sldMaster>"#,
        );
        let master = SlideMasterPart::from_part(&part).unwrap();
        assert_eq!(master.layout_rids(), vec!["rId1".to_string(), "rId2".to_string()]);
    }

    #[test]
    fn test_layout_shapes() {
        let part = xml_part(
            "/ppt/slideLayouts/slideLayout1.xml",
            r#"<p:sldLayout><p:cSld name="Title Slide"><p:spTree><p:nvGrpSpPr/><p:grpSpPr/><p:sp/><p:sp/></p:spTree></p:cSld></p:sldLayout>"#,
        );
        let layout = SlideLayoutPart::from_part(&part).unwrap();
        assert_eq!(layout.name(), Some("Title Slide"));
        assert_eq!(layout.shapes().count(), 2);
    }

    #[test]
    fn test_wrong_root() {
        let part = xml_part("/ppt/slideLayouts/slideLayout1.xml", "<p:sld/>");
        assert!(SlideLayoutPart::from_part(&part).is_err());
        assert!(SlideMasterPart::from_part(&part).is_err());
    }
}
