/// A slide and its shape tree.
use crate::common::xml::{XmlDocument, XmlElement};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::pptx::shapes::{ShapeNode, ShapeTree};
use log::warn;

/// Markup of a slide created from scratch, before any shape is added.
pub(crate) const NEW_SLIDE_XML: &str = concat!(
    r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    r#"<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
);

/// Prefixes shape lookups rely on, with the namespace each must be bound to.
const EXPECTED_PREFIXES: [(&str, &str); 2] = [("p", namespace::PML_MAIN), ("a", namespace::DML_MAIN)];

/// Expected prefixes that `root` leaves undeclared or binds elsewhere.
fn unexpected_prefixes(root: &XmlElement) -> Vec<&'static str> {
    EXPECTED_PREFIXES
        .iter()
        .filter(|(prefix, uri)| root.attr(&format!("xmlns:{}", prefix)) != Some(*uri))
        .map(|(prefix, _)| *prefix)
        .collect()
}

/// A slide in a presentation.
///
/// Owns the parsed slide part. The shape tree is held apart from the rest of
/// the document so it can be handed out as a [`ShapeTree`] without any
/// lookups that could fail; it is put back in place when the slide is
/// serialized.
///
/// # Examples
///
/// ```rust,no_run
/// use slidegraft::ooxml::pptx::Package;
///
/// let mut pkg = Package::open("presentation.pptx")?;
/// for slide in pkg.slides() {
///     println!("{}: {} shapes", slide.partname(), slide.shapes().len());
/// }
/// let tree = pkg.slide_mut(0)?.shape_tree();
/// println!("next free shape id: {}", tree.next_shape_id());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Slide {
    partname: PackURI,
    /// Slide document with `p:spTree` taken out
    doc: XmlDocument,
    /// Child index of `p:spTree` within `p:cSld`
    sp_tree_index: usize,
    sp_tree: XmlElement,
}

impl Slide {
    /// Build a slide from a parsed slide part.
    ///
    /// Fails when the document has no `p:cSld/p:spTree`.
    pub fn from_document(partname: PackURI, mut doc: XmlDocument) -> Result<Self> {
        let prefixes = unexpected_prefixes(&doc.root);
        if !prefixes.is_empty() {
            warn!(
                "{} does not bind prefix(es) {} to the PresentationML/DrawingML namespaces; shapes under other prefixes are not recognized",
                partname,
                prefixes.join(", ")
            );
        }
        let missing = || OoxmlError::InvalidFormat(format!("{} has no <p:cSld><p:spTree>", partname));
        let c_sld = doc.root.child_mut("p:cSld").ok_or_else(missing)?;
        let sp_tree_index = c_sld.position_of("p:spTree").ok_or_else(missing)?;
        let sp_tree = c_sld
            .remove_child(sp_tree_index)
            .and_then(|n| n.into_element())
            .ok_or_else(missing)?;
        Ok(Self {
            partname,
            doc,
            sp_tree_index,
            sp_tree,
        })
    }

    pub fn parse(partname: PackURI, xml: &[u8]) -> Result<Self> {
        let doc = XmlDocument::parse(xml)?;
        Self::from_document(partname, doc)
    }

    /// An empty slide.
    pub(crate) fn new(partname: PackURI) -> Result<Self> {
        Self::parse(partname, NEW_SLIDE_XML.as_bytes())
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Slide name from `p:cSld/@name`.
    pub fn name(&self) -> Option<&str> {
        self.doc.root.child("p:cSld").and_then(|c| c.attr("name"))
    }

    /// Mutable view of the slide's shapes.
    pub fn shape_tree(&mut self) -> ShapeTree<'_> {
        ShapeTree::new(&mut self.sp_tree)
    }

    /// The `p:spTree` element.
    pub fn sp_tree(&self) -> &XmlElement {
        &self.sp_tree
    }

    /// Deep copies of the top-level shapes.
    pub fn shapes(&self) -> Vec<ShapeNode> {
        self.sp_tree
            .child_elements()
            .filter(|e| crate::ooxml::pptx::shapes::base::is_shape_element(e))
            .cloned()
            .map(ShapeNode::from_element)
            .collect()
    }

    /// The complete slide document.
    pub fn to_document(&self) -> XmlDocument {
        let mut doc = self.doc.clone();
        if let Some(c_sld) = doc.root.child_mut("p:cSld") {
            c_sld.insert_child(self.sp_tree_index, self.sp_tree.clone());
        }
        doc
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_document().to_bytes()
    }

    /// Declare on this slide every namespace prefix `other` declares and this
    /// slide lacks, so markup copied from `other` stays well-formed.
    ///
    /// Returns the number of declarations added.
    pub fn adopt_namespaces(&mut self, other: &Slide) -> usize {
        let missing: Vec<(String, String)> = other
            .doc
            .root
            .attrs()
            .filter(|(key, _)| key.starts_with("xmlns:") && self.doc.root.attr(key).is_none())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let added = missing.len();
        for (key, value) in missing {
            self.doc.root.set_attr(key, value);
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::shapes::ShapeKind;

    fn partname() -> PackURI {
        PackURI::new("/ppt/slides/slide1.xml").unwrap()
    }

    #[test]
    fn test_adopt_namespaces() {
        let xml = br#"<p:sld xmlns:p="urn:p" xmlns:p14="urn:p14"><p:cSld><p:spTree/></p:cSld></p:sld>"#;
        let source = Slide::parse(partname(), xml).unwrap();
        let mut target = Slide::new(partname()).unwrap();

        assert_eq!(target.adopt_namespaces(&source), 1);
        assert_eq!(target.adopt_namespaces(&source), 0);
        let doc = target.to_document();
        assert_eq!(doc.root.attr("xmlns:p14"), Some("urn:p14"));
        assert_eq!(
            doc.root.attr("xmlns:p"),
            Some("http://schemas.openxmlformats.org/presentationml/2006/main")
        );
    }

    #[test]
    fn test_unexpected_prefixes() {
        let new = XmlElement::parse(NEW_SLIDE_XML).unwrap();
        assert!(unexpected_prefixes(&new).is_empty());

        let rebound = XmlElement::parse(
            r#"<pml:sld xmlns:pml="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="urn:other"/>"#,
        )
        .unwrap();
        assert_eq!(unexpected_prefixes(&rebound), ["p", "a"]);
    }

    #[test]
    fn test_new_slide_is_empty() {
        let mut slide = Slide::new(partname()).unwrap();
        assert!(slide.shapes().is_empty());
        assert_eq!(slide.shape_tree().next_shape_id(), 2);
    }

    #[test]
    fn test_round_trip_keeps_surrounding_markup() {
        let xml = br#"<p:sld><p:cSld name="Intro"><p:bg><p:bgRef idx="1001"/></p:bg><p:spTree><p:nvGrpSpPr/><p:grpSpPr/><p:pic/></p:spTree><p:extLst/></p:cSld><p:clrMapOvr/></p:sld>"#;
        let mut slide = Slide::parse(partname(), xml).unwrap();
        assert_eq!(slide.name(), Some("Intro"));
        assert_eq!(slide.shapes()[0].kind(), ShapeKind::Picture);

        slide.shape_tree().append(XmlElement::new("p:sp"));
        let doc = slide.to_document();
        let c_sld = doc.root.child("p:cSld").unwrap();
        let names: Vec<_> = c_sld.child_elements().map(|e| e.name().to_string()).collect();
        assert_eq!(names, ["p:bg", "p:spTree", "p:extLst"]);
        assert_eq!(c_sld.child("p:spTree").unwrap().child_elements().count(), 4);
    }

    #[test]
    fn test_missing_shape_tree() {
        assert!(Slide::parse(partname(), b"<p:sld><p:cSld/></p:sld>").is_err());
        assert!(Slide::parse(partname(), b"<p:sld/>").is_err());
    }
}
