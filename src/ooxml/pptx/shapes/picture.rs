/// Picture (image) shape implementation.
use crate::common::geometry::Transform;
use crate::common::xml::XmlElement;
use crate::ooxml::drawings::{blip, xfrm};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::shapes::base::{BaseShape, P_C_NV_PR, P_PIC};

/// A picture (image) shape in a presentation.
///
/// The image itself lives in a media part of the package; the picture refers
/// to it through the slide relationship named by `a:blip/@r:embed`.
///
/// # Examples
///
/// ```rust
/// use slidegraft::common::geometry::Transform;
/// use slidegraft::ooxml::pptx::shapes::Picture;
///
/// let picture = Picture::create(5, "Logo", "", "rId2", &Transform::new(0, 0, 914400, 914400));
/// assert_eq!(picture.image_r_id()?, "rId2");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    /// Base shape properties
    base: BaseShape,
}

impl Picture {
    pub fn new(element: XmlElement) -> Self {
        Self {
            base: BaseShape::new(element),
        }
    }

    /// Build a new `p:pic` showing the image related as `r_id`, stretched over
    /// `transform`.
    pub fn create(id: u32, name: &str, descr: &str, r_id: &str, transform: &Transform) -> Self {
        let c_nv_pr = XmlElement::new(P_C_NV_PR)
            .with_attr("id", id.to_string())
            .with_attr("name", name)
            .with_attr("descr", descr);

        let element = XmlElement::new(P_PIC)
            .with_child(
                XmlElement::new("p:nvPicPr")
                    .with_child(c_nv_pr)
                    .with_child(
                        XmlElement::new("p:cNvPicPr").with_child(
                            XmlElement::new("a:picLocks").with_attr("noChangeAspect", "1"),
                        ),
                    )
                    .with_child(XmlElement::new("p:nvPr")),
            )
            .with_child(
                XmlElement::new("p:blipFill")
                    .with_child(blip::new_blip(r_id))
                    .with_child(XmlElement::new("a:stretch").with_child(XmlElement::new("a:fillRect"))),
            )
            .with_child(
                XmlElement::new("p:spPr")
                    .with_child(xfrm::new_xfrm("a:xfrm", transform))
                    .with_child(
                        XmlElement::new("a:prstGeom")
                            .with_attr("prst", "rect")
                            .with_child(XmlElement::new("a:avLst")),
                    ),
            );
        Self::new(element)
    }

    /// Get the base shape.
    #[inline]
    pub fn base(&self) -> &BaseShape {
        &self.base
    }

    #[inline]
    pub fn into_element(self) -> XmlElement {
        self.base.into_element()
    }

    /// Relationship ID of the embedded image.
    pub fn image_r_id(&self) -> Result<&str> {
        self.base
            .element()
            .child("p:blipFill")
            .and_then(blip::find_first_blip_embed)
            .ok_or_else(|| {
                OoxmlError::InvalidRelationship(format!(
                    "picture '{}' has no embedded image",
                    self.base.name().unwrap_or_default()
                ))
            })
    }

    /// Point the picture at another image relationship.
    pub fn set_image_r_id(&mut self, r_id: &str) -> Result<()> {
        let old = self.image_r_id()?.to_string();
        if let Some(fill) = self.base.element_mut().child_mut("p:blipFill") {
            blip::rewrite_blip_embed(fill, &old, r_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::shapes::base::read_transform;

    #[test]
    fn test_create_picture() {
        let t = Transform::new(10, 20, 30, 40);
        let picture = Picture::create(7, "Photo", "A lake", "rId3", &t);

        assert_eq!(picture.base().id(), Some(7));
        assert_eq!(picture.base().name(), Some("Photo"));
        assert_eq!(picture.base().descr(), Some("A lake"));
        assert_eq!(picture.image_r_id().unwrap(), "rId3");
        assert_eq!(read_transform(picture.base().element()).unwrap().complete(), Some(t));
    }

    #[test]
    fn test_set_image_r_id() {
        let mut picture = Picture::create(7, "Photo", "", "rId3", &Transform::default());
        picture.set_image_r_id("rId8").unwrap();
        assert_eq!(picture.image_r_id().unwrap(), "rId8");
    }

    #[test]
    fn test_missing_blip() {
        let mut picture = Picture::new(XmlElement::parse("<p:pic><p:blipFill/></p:pic>").unwrap());
        assert!(picture.image_r_id().is_err());
        assert!(picture.set_image_r_id("rId1").is_err());
    }
}
