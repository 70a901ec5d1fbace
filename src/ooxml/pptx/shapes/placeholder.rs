/// Placeholder shapes inherited from slide layouts.
use crate::common::xml::XmlElement;
use crate::ooxml::pptx::shapes::base::{P_C_NV_PR, P_SP};

/// Placeholder types PowerPoint does not copy onto new slides.
const SKIPPED_TYPES: [&str; 3] = ["dt", "ftr", "sldNum"];

/// Placeholder types that receive an empty text body.
const TEXT_TYPES: [&str; 5] = ["title", "ctrTitle", "subTitle", "body", "obj"];

/// The `p:ph` element of a layout shape, if it is a placeholder.
pub fn placeholder_of(sp: &XmlElement) -> Option<&XmlElement> {
    if !sp.is(P_SP) {
        return None;
    }
    sp.path(&["p:nvSpPr", "p:nvPr", "p:ph"])
}

/// Placeholder type; `obj` when the attribute is absent.
pub fn placeholder_type(ph: &XmlElement) -> &str {
    ph.attr("type").unwrap_or("obj")
}

/// An empty slide placeholder inheriting everything from `layout_sp`.
///
/// Returns `None` for shapes that are not placeholders or whose type is not
/// carried onto new slides (date, footer, slide number).
pub fn clone_layout_placeholder(layout_sp: &XmlElement, id: u32) -> Option<XmlElement> {
    let ph = placeholder_of(layout_sp)?;
    let ph_type = placeholder_type(ph);
    if SKIPPED_TYPES.iter().any(|t| *t == ph_type) {
        return None;
    }

    let name = layout_sp
        .path(&["p:nvSpPr", P_C_NV_PR])
        .and_then(|c| c.attr("name"))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Placeholder {}", id.saturating_sub(1)));

    let mut new_ph = XmlElement::new("p:ph");
    for (key, value) in ph.attrs() {
        new_ph.set_attr(key, value);
    }

    let mut sp = XmlElement::new(P_SP)
        .with_child(
            XmlElement::new("p:nvSpPr")
                .with_child(
                    XmlElement::new(P_C_NV_PR)
                        .with_attr("id", id.to_string())
                        .with_attr("name", name),
                )
                .with_child(
                    XmlElement::new("p:cNvSpPr")
                        .with_child(XmlElement::new("a:spLocks").with_attr("noGrp", "1")),
                )
                .with_child(XmlElement::new("p:nvPr").with_child(new_ph)),
        )
        .with_child(XmlElement::new("p:spPr"));

    if TEXT_TYPES.iter().any(|t| *t == ph_type) {
        sp.push_child(
            XmlElement::new("p:txBody")
                .with_child(XmlElement::new("a:bodyPr"))
                .with_child(XmlElement::new("a:lstStyle"))
                .with_child(XmlElement::new("a:p")),
        );
    }
    Some(sp)
}
