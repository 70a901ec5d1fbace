//! Ordered view over a slide's shape tree (`p:spTree`).
//!
//! The shape tree element starts with the tree's own non-visual and group
//! properties and may end with an extension list:
//!
//! ```xml
//! <p:spTree>
//!   <p:nvGrpSpPr>...</p:nvGrpSpPr>
//!   <p:grpSpPr>...</p:grpSpPr>
//!   <p:sp>...</p:sp>          <!-- shape 0 -->
//!   <p:grpSp>...</p:grpSp>    <!-- shape 1 -->
//!   <p:extLst>...</p:extLst>  <!-- terminal marker -->
//! </p:spTree>
//! ```
//!
//! [`ShapeTree`] indexes only the shapes, so callers never see or disturb the
//! leading properties or the trailing marker.

use crate::common::xml::{XmlElement, XmlNode};
use crate::ooxml::pptx::shapes::ShapeNode;
use crate::ooxml::pptx::shapes::base::{P_GRP_SP, ShapeIds, is_shape_element, max_shape_id};

/// Element that must stay after every shape.
pub const TERMINAL_MARKER: &str = "p:extLst";

/// Mutable, index-based adapter over the shapes of a `p:spTree`.
#[derive(Debug)]
pub struct ShapeTree<'a> {
    sp_tree: &'a mut XmlElement,
}

impl<'a> ShapeTree<'a> {
    pub fn new(sp_tree: &'a mut XmlElement) -> Self {
        Self { sp_tree }
    }

    /// Raw child index of every shape, in z-order.
    fn raw_indices(&self) -> Vec<usize> {
        self.sp_tree
            .children()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.as_element().is_some_and(is_shape_element))
            .map(|(i, _)| i)
            .collect()
    }

    fn raw_index(&self, index: usize) -> Option<usize> {
        self.raw_indices().get(index).copied()
    }

    /// Raw index new shapes are appended at: before the terminal marker.
    fn append_index(&self) -> usize {
        self.sp_tree
            .position_of(TERMINAL_MARKER)
            .unwrap_or(self.sp_tree.children().len())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape elements in z-order.
    pub fn iter(&self) -> impl Iterator<Item = &XmlElement> {
        self.sp_tree.child_elements().filter(|e| is_shape_element(e))
    }

    pub fn get(&self, index: usize) -> Option<&XmlElement> {
        self.iter().nth(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        let raw = self.raw_index(index)?;
        self.sp_tree.children_mut()[raw].as_element_mut()
    }

    /// Deep copies of every shape, tagged by kind.
    pub fn nodes(&self) -> Vec<ShapeNode> {
        self.iter().cloned().map(ShapeNode::from_element).collect()
    }

    /// Positions of the group shapes.
    pub fn group_positions(&self) -> Vec<usize> {
        self.iter()
            .enumerate()
            .filter(|(_, e)| e.is(P_GRP_SP))
            .map(|(i, _)| i)
            .collect()
    }

    /// Remove the shape at `index`.
    pub fn remove(&mut self, index: usize) -> Option<XmlElement> {
        let raw = self.raw_index(index)?;
        self.sp_tree.remove_child(raw).and_then(XmlNode::into_element)
    }

    /// Insert a shape so that it ends up at position `index`. Indices past the
    /// end append.
    pub fn insert(&mut self, index: usize, shape: XmlElement) {
        let raw = self.raw_index(index).unwrap_or_else(|| self.append_index());
        self.sp_tree.insert_child(raw, shape);
    }

    /// Append a shape on top of the others, before the terminal marker.
    pub fn append(&mut self, shape: XmlElement) {
        let raw = self.append_index();
        self.sp_tree.insert_child(raw, shape);
    }

    /// Highest shape id in the tree, including the tree's own id.
    pub fn max_shape_id(&self) -> u32 {
        max_shape_id(&*self.sp_tree)
    }

    /// Id for a new shape, unique within the tree.
    pub fn next_shape_id(&self) -> u32 {
        self.shape_ids().allocate()
    }

    /// Allocator for several new shape ids, unique within the tree.
    pub fn shape_ids(&self) -> ShapeIds {
        ShapeIds::of(&*self.sp_tree)
    }

    /// The underlying `p:spTree` element.
    pub fn element(&self) -> &XmlElement {
        &*self.sp_tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::shapes::ShapeKind;

    fn tree_xml() -> XmlElement {
        XmlElement::parse(
            r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="A"/></p:nvSpPr></p:sp><p:grpSp><p:nvGrpSpPr><p:cNvPr id="7" name="G"/></p:nvGrpSpPr><p:grpSpPr/><p:pic><p:nvPicPr><p:cNvPr id="8" name="B"/></p:nvPicPr></p:pic></p:grpSp><p:extLst><p:ext uri="{x}"/></p:extLst></p:spTree>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_indexing_skips_tree_properties() {
        let mut sp_tree = tree_xml();
        let tree = ShapeTree::new(&mut sp_tree);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(0).unwrap().name(), "p:sp");
        assert_eq!(tree.get(1).unwrap().name(), "p:grpSp");
        assert!(tree.get(2).is_none());
        assert_eq!(tree.group_positions(), vec![1]);
        let kinds: Vec<_> = tree.nodes().iter().map(ShapeNode::kind).collect();
        assert_eq!(kinds, vec![ShapeKind::Generic, ShapeKind::Group]);
    }

    #[test]
    fn test_append_stays_before_marker() {
        let mut sp_tree = tree_xml();
        let mut tree = ShapeTree::new(&mut sp_tree);
        tree.append(XmlElement::new("p:cxnSp"));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(2).unwrap().name(), "p:cxnSp");
        let last = sp_tree.child_elements().last().unwrap();
        assert_eq!(last.name(), TERMINAL_MARKER);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut sp_tree = tree_xml();
        let mut tree = ShapeTree::new(&mut sp_tree);
        let group = tree.remove(1).unwrap();
        assert_eq!(group.name(), "p:grpSp");
        assert_eq!(tree.len(), 1);
        assert!(tree.remove(5).is_none());

        tree.insert(0, XmlElement::new("p:cxnSp"));
        tree.insert(99, XmlElement::new("p:graphicFrame"));
        let names: Vec<_> = tree.iter().map(|e| e.name().to_string()).collect();
        assert_eq!(names, ["p:cxnSp", "p:sp", "p:graphicFrame"]);

        let leading: Vec<_> = sp_tree.child_elements().take(2).map(|e| e.name().to_string()).collect();
        assert_eq!(leading, ["p:nvGrpSpPr", "p:grpSpPr"]);
    }

    #[test]
    fn test_next_shape_id_counts_nested_shapes() {
        let mut sp_tree = tree_xml();
        let tree = ShapeTree::new(&mut sp_tree);
        assert_eq!(tree.max_shape_id(), 8);
        assert_eq!(tree.next_shape_id(), 9);
    }

    #[test]
    fn test_next_shape_id_after_max_id() {
        let mut sp_tree = XmlElement::parse(&format!(
            r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="{}" name="A"/></p:nvSpPr></p:sp></p:spTree>"#,
            u32::MAX
        ))
        .unwrap();
        let tree = ShapeTree::new(&mut sp_tree);
        assert_eq!(tree.max_shape_id(), u32::MAX);
        assert_eq!(tree.next_shape_id(), 2);
    }

    #[test]
    fn test_get_mut() {
        let mut sp_tree = tree_xml();
        let mut tree = ShapeTree::new(&mut sp_tree);
        tree.get_mut(0).unwrap().set_attr("marked", "1");
        assert_eq!(tree.get(0).unwrap().attr("marked"), Some("1"));
        assert!(tree.get_mut(3).is_none());
    }
}
