/// Group shape implementation.
use crate::common::geometry::{GroupTransform, Point};
use crate::common::xml::{XmlElement, XmlNode};
use crate::ooxml::drawings::xfrm;
use crate::ooxml::error::Result;
use crate::ooxml::pptx::shapes::base::{BaseShape, P_C_NV_PR, P_GRP_SP, is_shape_element};

/// A group shape (`p:grpSp`).
///
/// A group owns an ordered sequence of child shapes positioned in the group's
/// child coordinate space, which `a:xfrm` maps onto the group's own frame.
///
/// ```xml
/// <p:grpSp>
///   <p:nvGrpSpPr>...</p:nvGrpSpPr>
///   <p:grpSpPr><a:xfrm>...</a:xfrm></p:grpSpPr>
///   <p:sp>...</p:sp>
///   <p:pic>...</p:pic>
/// </p:grpSp>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupShape {
    base: BaseShape,
}

impl GroupShape {
    pub fn new(element: XmlElement) -> Self {
        Self {
            base: BaseShape::new(element),
        }
    }

    /// Build an empty group carrying `mapping`.
    pub fn create(id: u32, name: &str, mapping: &GroupTransform) -> Self {
        let element = XmlElement::new(P_GRP_SP)
            .with_child(
                XmlElement::new("p:nvGrpSpPr")
                    .with_child(
                        XmlElement::new(P_C_NV_PR)
                            .with_attr("id", id.to_string())
                            .with_attr("name", name),
                    )
                    .with_child(XmlElement::new("p:cNvGrpSpPr"))
                    .with_child(XmlElement::new("p:nvPr")),
            )
            .with_child(XmlElement::new("p:grpSpPr").with_child(xfrm::new_group_xfrm(mapping)));
        Self::new(element)
    }

    #[inline]
    pub fn base(&self) -> &BaseShape {
        &self.base
    }

    #[inline]
    pub fn into_element(self) -> XmlElement {
        self.base.into_element()
    }

    /// Child-space mapping, `None` when the group has no transform.
    pub fn group_transform(&self) -> Result<Option<GroupTransform>> {
        self.base
            .element()
            .path(&["p:grpSpPr", "a:xfrm"])
            .map(xfrm::read_group)
            .transpose()
    }

    /// Child shapes in z-order.
    pub fn children(&self) -> impl Iterator<Item = &XmlElement> {
        self.base.element().child_elements().filter(|e| is_shape_element(e))
    }

    /// Take the child shapes out of the group, in z-order.
    pub fn into_children(self) -> Vec<XmlElement> {
        let mut element = self.base.into_element();
        std::mem::take(element.children_mut())
            .into_iter()
            .filter_map(XmlNode::into_element)
            .filter(is_shape_element)
            .collect()
    }

    /// Append a child shape after the existing ones.
    pub fn push_child(&mut self, child: XmlElement) {
        let el = self.base.element_mut();
        match el.position_of("p:extLst") {
            Some(idx) => el.insert_child(idx, child),
            None => el.push_child(child),
        }
    }

    /// Move the group frame without touching the child space.
    pub fn set_offset(&mut self, offset: Point) {
        if let Some(x) = self.base.element_mut().path_mut(&["p:grpSpPr", "a:xfrm"]) {
            xfrm::set_offset(x, offset);
        }
    }
}
