/// Base shape types for PowerPoint presentations.
use crate::common::geometry::{GroupTransform, PartialTransform};
use crate::common::xml::XmlElement;
use crate::ooxml::drawings::xfrm;
use crate::ooxml::error::Result;
use std::collections::{HashMap, HashSet};

pub const P_SP: &str = "p:sp";
pub const P_PIC: &str = "p:pic";
pub const P_GRP_SP: &str = "p:grpSp";
pub const P_CXN_SP: &str = "p:cxnSp";
pub const P_GRAPHIC_FRAME: &str = "p:graphicFrame";
pub const P_CONTENT_PART: &str = "p:contentPart";
pub const MC_ALTERNATE_CONTENT: &str = "mc:AlternateContent";
pub const P_C_NV_PR: &str = "p:cNvPr";

/// Shape type enumeration.
///
/// Indicates which shape-tree element a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    /// An autoshape or text box (p:sp)
    Shape,
    /// A picture shape (p:pic)
    Picture,
    /// A graphic frame containing a table, chart or diagram (p:graphicFrame)
    GraphicFrame,
    /// A group shape (p:grpSp)
    GroupShape,
    /// A connector shape (p:cxnSp)
    Connector,
    /// Ink or other content part (p:contentPart)
    ContentPart,
    /// Markup-compatibility wrapper around alternative shapes
    AlternateContent,
    /// Unknown or unsupported element
    Unknown,
}

impl ShapeType {
    pub fn from_name(name: &str) -> Self {
        match name {
            P_SP => ShapeType::Shape,
            P_PIC => ShapeType::Picture,
            P_GRAPHIC_FRAME => ShapeType::GraphicFrame,
            P_GRP_SP => ShapeType::GroupShape,
            P_CXN_SP => ShapeType::Connector,
            P_CONTENT_PART => ShapeType::ContentPart,
            MC_ALTERNATE_CONTENT => ShapeType::AlternateContent,
            _ => ShapeType::Unknown,
        }
    }

    /// Child path from the shape element to its transform.
    fn xfrm_path(self) -> Option<&'static [&'static str]> {
        match self {
            ShapeType::Shape | ShapeType::Picture | ShapeType::Connector => {
                Some(&["p:spPr", "a:xfrm"])
            },
            ShapeType::GroupShape => Some(&["p:grpSpPr", "a:xfrm"]),
            ShapeType::GraphicFrame => Some(&["p:xfrm"]),
            ShapeType::ContentPart | ShapeType::AlternateContent | ShapeType::Unknown => None,
        }
    }
}

/// Whether a child of `p:spTree`/`p:grpSp` is a shape rather than the
/// container's own properties or extension list.
#[inline]
pub fn is_shape_element(el: &XmlElement) -> bool {
    !matches!(el.name(), "p:nvGrpSpPr" | "p:grpSpPr" | "p:extLst")
}

/// Shapes carried by an `mc:AlternateContent` wrapper, choices first.
fn alternate_shapes(el: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    el.child_elements()
        .filter(|branch| branch.is("mc:Choice") || branch.is("mc:Fallback"))
        .filter_map(|branch| branch.child_elements().next())
}

fn alternate_shapes_mut(el: &mut XmlElement) -> impl Iterator<Item = &mut XmlElement> {
    el.child_elements_mut()
        .filter(|branch| branch.is("mc:Choice") || branch.is("mc:Fallback"))
        .filter_map(|branch| branch.child_elements_mut().next())
}

/// Transform element of a shape, if it has one.
pub fn find_xfrm(el: &XmlElement) -> Option<&XmlElement> {
    el.path(ShapeType::from_name(el.name()).xfrm_path()?)
}

fn find_xfrm_mut(el: &mut XmlElement) -> Option<&mut XmlElement> {
    let path = ShapeType::from_name(el.name()).xfrm_path()?;
    el.path_mut(path)
}

/// Position and size of a shape as written in its own transform.
///
/// For `mc:AlternateContent` the fallback branch is authoritative, since that
/// is what consumers without the extension render.
pub fn read_transform(el: &XmlElement) -> Result<PartialTransform> {
    if ShapeType::from_name(el.name()) == ShapeType::AlternateContent {
        return match alternate_shapes(el).last() {
            Some(shape) => read_transform(shape),
            None => Ok(PartialTransform::default()),
        };
    }
    match find_xfrm(el) {
        Some(x) => xfrm::read_partial(x),
        None => Ok(PartialTransform::default()),
    }
}

/// Re-express a shape's transform through a group's child-space mapping.
///
/// Every transform is validated before any is written, so a malformed shape
/// is left untouched.
pub fn map_transform(el: &mut XmlElement, mapping: &GroupTransform) -> Result<()> {
    if ShapeType::from_name(el.name()) == ShapeType::AlternateContent {
        for shape in alternate_shapes(el) {
            read_transform(shape)?;
        }
        for shape in alternate_shapes_mut(el) {
            map_transform(shape, mapping)?;
        }
        return Ok(());
    }
    let Some(x) = find_xfrm_mut(el) else {
        return Ok(());
    };
    let mapped = mapping.map_partial(&xfrm::read_partial(x)?);
    xfrm::write_partial(x, &mapped);
    Ok(())
}

/// Non-visual properties (`p:cNvPr`) of a shape.
pub fn c_nv_pr(el: &XmlElement) -> Option<&XmlElement> {
    if ShapeType::from_name(el.name()) == ShapeType::AlternateContent {
        return alternate_shapes(el).last().and_then(c_nv_pr);
    }
    el.child_elements()
        .find(|c| c.name().starts_with("p:nv"))
        .and_then(|nv| nv.child(P_C_NV_PR))
}

/// Highest `p:cNvPr` id anywhere below (and including) `el`.
pub fn max_shape_id(el: &XmlElement) -> u32 {
    let mut max = 0;
    visit_shape_ids(el, |id| max = max.max(id));
    max
}

fn visit_shape_ids(el: &XmlElement, mut f: impl FnMut(u32)) {
    let mut visit = |e: &XmlElement| {
        if e.is(P_C_NV_PR) {
            if let Some(id) = e.attr_i64("id").and_then(|id| u32::try_from(id).ok()) {
                f(id);
            }
        }
    };
    visit(el);
    el.visit_descendants(&mut visit);
}

/// Hands out shape ids that are unused within an element.
///
/// Ids count up from the highest id in use. Once that reaches `u32::MAX`
/// the lowest unused ids are handed out instead.
#[derive(Debug, Clone)]
pub struct ShapeIds {
    used: HashSet<u32>,
    next: Option<u32>,
    lowest_free: u32,
}

impl ShapeIds {
    /// Track the ids used anywhere below (and including) `el`.
    pub fn of(el: &XmlElement) -> Self {
        let mut used = HashSet::new();
        visit_shape_ids(el, |id| {
            used.insert(id);
        });
        let max = used.iter().copied().max().unwrap_or(0);
        ShapeIds {
            used,
            next: max.checked_add(1),
            lowest_free: 1,
        }
    }

    /// Reserve and return an unused id.
    pub fn allocate(&mut self) -> u32 {
        let id = match self.next {
            Some(id) => {
                self.next = id.checked_add(1);
                id
            },
            None => {
                while self.used.contains(&self.lowest_free) && self.lowest_free < u32::MAX {
                    self.lowest_free += 1;
                }
                self.lowest_free
            },
        };
        self.used.insert(id);
        id
    }
}

/// Give every `p:cNvPr` below `el` a fresh id from `ids`, recording
/// old-to-new ids in `renumbered`.
pub fn renumber_shape_ids(el: &mut XmlElement, ids: &mut ShapeIds, renumbered: &mut HashMap<u32, u32>) {
    el.visit_descendants_mut(&mut |e| {
        if e.is(P_C_NV_PR) {
            let new_id = ids.allocate();
            if let Some(old) = e.attr_i64("id").and_then(|id| u32::try_from(id).ok()) {
                renumbered.entry(old).or_insert(new_id);
            }
            e.set_attr_i64("id", i64::from(new_id));
        }
    });
}

/// Point connector endpoints (`a:stCxn`, `a:endCxn`) at renumbered shapes.
pub fn remap_connections(el: &mut XmlElement, renumbered: &HashMap<u32, u32>) {
    el.visit_descendants_mut(&mut |e| {
        if e.is("a:stCxn") || e.is("a:endCxn") {
            let new_id = e
                .attr_i64("id")
                .and_then(|id| u32::try_from(id).ok())
                .and_then(|id| renumbered.get(&id));
            if let Some(&new_id) = new_id {
                e.set_attr_i64("id", i64::from(new_id));
            }
        }
    });
}

/// Distinct relationship ids (`r:*` attributes) used below and including `el`.
pub fn relationship_references(el: &XmlElement) -> Vec<String> {
    let mut refs: Vec<String> = Vec::new();
    let mut visit = |e: &XmlElement| {
        for (key, value) in e.attrs() {
            if key.starts_with("r:") && !value.is_empty() && !refs.iter().any(|r| r == value) {
                refs.push(value.to_string());
            }
        }
    };
    visit(el);
    el.visit_descendants(&mut visit);
    refs
}

/// Base shape containing common properties.
///
/// Owns the shape's element subtree and provides access to position, size,
/// name and id, which every kind of shape has.
///
/// # Examples
///
/// ```rust
/// use slidegraft::common::xml::XmlElement;
/// use slidegraft::ooxml::pptx::shapes::BaseShape;
///
/// let el = XmlElement::parse(
///     r#"<p:sp><p:nvSpPr><p:cNvPr id="4" name="Title"/></p:nvSpPr>
///        <p:spPr><a:xfrm><a:off x="1" y="2"/><a:ext cx="3" cy="4"/></a:xfrm></p:spPr></p:sp>"#,
/// )?;
/// let shape = BaseShape::new(el);
/// assert_eq!(shape.name(), Some("Title"));
/// assert_eq!(shape.transform()?.complete().map(|t| t.width), Some(3));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseShape {
    element: XmlElement,
    shape_type: ShapeType,
}

impl BaseShape {
    pub fn new(element: XmlElement) -> Self {
        let shape_type = ShapeType::from_name(element.name());
        Self {
            element,
            shape_type,
        }
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    #[inline]
    pub fn element(&self) -> &XmlElement {
        &self.element
    }

    #[inline]
    pub fn element_mut(&mut self) -> &mut XmlElement {
        &mut self.element
    }

    #[inline]
    pub fn into_element(self) -> XmlElement {
        self.element
    }

    pub fn transform(&self) -> Result<PartialTransform> {
        read_transform(&self.element)
    }

    pub fn id(&self) -> Option<u32> {
        c_nv_pr(&self.element)
            .and_then(|c| c.attr_i64("id"))
            .and_then(|id| u32::try_from(id).ok())
    }

    pub fn name(&self) -> Option<&str> {
        c_nv_pr(&self.element).and_then(|c| c.attr("name"))
    }

    /// Alternative text.
    pub fn descr(&self) -> Option<&str> {
        c_nv_pr(&self.element).and_then(|c| c.attr("descr"))
    }
}
