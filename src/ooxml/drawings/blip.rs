//! Image references (`a:blip`).

use crate::common::xml::XmlElement;

pub const A_BLIP: &str = "a:blip";
pub const R_EMBED: &str = "r:embed";

/// rId of the first embedded image below `el`.
pub fn find_first_blip_embed(el: &XmlElement) -> Option<&str> {
    if el.is(A_BLIP) {
        if let Some(r_id) = el.attr(R_EMBED) {
            return Some(r_id);
        }
    }
    el.child_elements().find_map(find_first_blip_embed)
}

/// Point every `a:blip` embedding `old` at `new`. Returns the number rewritten.
pub fn rewrite_blip_embed(el: &mut XmlElement, old: &str, new: &str) -> usize {
    let mut count = 0;
    if el.is(A_BLIP) && el.attr(R_EMBED) == Some(old) {
        el.set_attr(R_EMBED, new);
        count += 1;
    }
    el.visit_descendants_mut(&mut |e| {
        if e.is(A_BLIP) && e.attr(R_EMBED) == Some(old) {
            e.set_attr(R_EMBED, new);
            count += 1;
        }
    });
    count
}

/// `<a:blip r:embed="..."/>`
pub fn new_blip(r_id: &str) -> XmlElement {
    XmlElement::new(A_BLIP).with_attr(R_EMBED, r_id)
}
