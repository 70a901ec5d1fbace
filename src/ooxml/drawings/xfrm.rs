//! Reading and writing DrawingML transforms (`a:xfrm`, `p:xfrm`).
//!
//! ```xml
//! <a:xfrm>
//!   <a:off x="914400" y="457200"/>
//!   <a:ext cx="1828800" cy="914400"/>
//!   <a:chOff x="0" y="0"/>        <!-- groups only -->
//!   <a:chExt cx="1828800" cy="914400"/>
//! </a:xfrm>
//! ```
//!
//! A missing `a:off` or `a:ext` leaves the corresponding components absent. A
//! present element with a missing or non-integer attribute is malformed.

use crate::common::geometry::{Extent, GroupTransform, PartialTransform, Point, Transform};
use crate::common::xml::XmlElement;
use crate::ooxml::error::{OoxmlError, Result};

pub const A_OFF: &str = "a:off";
pub const A_EXT: &str = "a:ext";
pub const A_CH_OFF: &str = "a:chOff";
pub const A_CH_EXT: &str = "a:chExt";

fn read_pair(xfrm: &XmlElement, child: &str, a: &str, b: &str) -> Result<Option<(i64, i64)>> {
    let Some(el) = xfrm.child(child) else {
        return Ok(None);
    };
    match (el.attr_i64(a), el.attr_i64(b)) {
        (Some(x), Some(y)) => Ok(Some((x, y))),
        _ => Err(OoxmlError::InvalidFormat(format!(
            "<{}> needs integer {} and {} attributes",
            child, a, b
        ))),
    }
}

/// Offset and extent of a transform element.
pub fn read_partial(xfrm: &XmlElement) -> Result<PartialTransform> {
    let off = read_pair(xfrm, A_OFF, "x", "y")?;
    let ext = read_pair(xfrm, A_EXT, "cx", "cy")?;
    Ok(PartialTransform {
        left: off.map(|(x, _)| x),
        top: off.map(|(_, y)| y),
        width: ext.map(|(cx, _)| cx),
        height: ext.map(|(_, cy)| cy),
    })
}

/// Child-space mapping of a group transform.
///
/// `a:off` and `a:ext` are required. A missing `a:chOff`/`a:chExt` means the
/// child space coincides with the group frame.
pub fn read_group(xfrm: &XmlElement) -> Result<GroupTransform> {
    let (x, y) = read_pair(xfrm, A_OFF, "x", "y")?
        .ok_or_else(|| OoxmlError::InvalidFormat("group transform without <a:off>".to_string()))?;
    let (cx, cy) = read_pair(xfrm, A_EXT, "cx", "cy")?
        .ok_or_else(|| OoxmlError::InvalidFormat("group transform without <a:ext>".to_string()))?;
    let (ch_x, ch_y) = read_pair(xfrm, A_CH_OFF, "x", "y")?.unwrap_or((x, y));
    let (ch_cx, ch_cy) = read_pair(xfrm, A_CH_EXT, "cx", "cy")?.unwrap_or((cx, cy));
    Ok(GroupTransform {
        offset: Point::new(x, y),
        extent: Extent::new(cx, cy),
        child_offset: Point::new(ch_x, ch_y),
        child_extent: Extent::new(ch_cx, ch_cy),
    })
}

fn pair_element(name: &str, a: &str, va: i64, b: &str, vb: i64) -> XmlElement {
    let mut el = XmlElement::new(name);
    el.set_attr_i64(a, va);
    el.set_attr_i64(b, vb);
    el
}

/// A transform element (`a:xfrm` or `p:xfrm`) with offset and extent.
pub fn new_xfrm(name: &str, t: &Transform) -> XmlElement {
    XmlElement::new(name)
        .with_child(pair_element(A_OFF, "x", t.left, "y", t.top))
        .with_child(pair_element(A_EXT, "cx", t.width, "cy", t.height))
}

/// An `a:xfrm` carrying a full group mapping.
pub fn new_group_xfrm(g: &GroupTransform) -> XmlElement {
    XmlElement::new("a:xfrm")
        .with_child(pair_element(A_OFF, "x", g.offset.x, "y", g.offset.y))
        .with_child(pair_element(A_EXT, "cx", g.extent.cx, "cy", g.extent.cy))
        .with_child(pair_element(A_CH_OFF, "x", g.child_offset.x, "y", g.child_offset.y))
        .with_child(pair_element(A_CH_EXT, "cx", g.child_extent.cx, "cy", g.child_extent.cy))
}

/// Overwrite the offset, creating `a:off` as the first child if needed.
pub fn set_offset(xfrm: &mut XmlElement, p: Point) {
    if xfrm.child(A_OFF).is_none() {
        xfrm.insert_child(0, XmlElement::new(A_OFF));
    }
    if let Some(off) = xfrm.child_mut(A_OFF) {
        off.set_attr_i64("x", p.x);
        off.set_attr_i64("y", p.y);
    }
}

/// Write whichever components are present into existing `a:off`/`a:ext`.
///
/// Components are only written where the element already exists, so a shape
/// that inherited part of its geometry keeps inheriting it.
pub fn write_partial(xfrm: &mut XmlElement, t: &PartialTransform) {
    if let Some(off) = xfrm.child_mut(A_OFF) {
        if let Some(x) = t.left {
            off.set_attr_i64("x", x);
        }
        if let Some(y) = t.top {
            off.set_attr_i64("y", y);
        }
    }
    if let Some(ext) = xfrm.child_mut(A_EXT) {
        if let Some(cx) = t.width {
            ext.set_attr_i64("cx", cx);
        }
        if let Some(cy) = t.height {
            ext.set_attr_i64("cy", cy);
        }
    }
}
