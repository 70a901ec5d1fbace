//! Center a slide's content on the canvas.

use crate::common::geometry::{BoundingBox, Extent, GroupTransform, Transform};
use crate::ooxml::pptx::Slide;
use crate::ooxml::pptx::shapes::GroupShape;
use crate::ooxml::pptx::shapes::base::{ShapeType, read_transform};
use crate::transfer::outcome::RecenterOutcome;
use log::debug;

/// Move the slide's positioned shapes into a new group centered on a canvas
/// of `canvas_width` x `canvas_height` EMUs.
///
/// Only top-level, non-group shapes with a complete transform take part. The
/// group's child space equals the union box of those shapes, so the shapes
/// keep their coordinates and only the group's offset moves. The group is
/// stacked above everything else and named `Group <id>`.
///
/// Nothing changes when no shape qualifies.
pub fn recenter(slide: &mut Slide, canvas_width: i64, canvas_height: i64) -> RecenterOutcome {
    let mut tree = slide.shape_tree();

    let eligible: Vec<(usize, Transform)> = tree
        .iter()
        .enumerate()
        .filter(|(_, el)| ShapeType::from_name(el.name()) != ShapeType::GroupShape)
        .filter_map(|(i, el)| Some((i, read_transform(el).ok()?.complete()?)))
        .collect();

    let Some(bounds) = BoundingBox::from_transforms(eligible.iter().map(|(_, t)| t)) else {
        return RecenterOutcome::Unchanged;
    };

    let id = tree.next_shape_id();
    let mapping = GroupTransform::identity(bounds.to_transform());
    let mut group = GroupShape::create(id, &format!("Group {}", id), &mapping);

    let mut members: Vec<_> = eligible
        .iter()
        .rev()
        .filter_map(|(i, _)| tree.remove(*i))
        .collect();
    members.reverse();
    let grouped = members.len();
    for member in members {
        group.push_child(member);
    }

    let offset = bounds.centered_offset(Extent::new(canvas_width, canvas_height));
    group.set_offset(offset);
    tree.append(group.into_element());

    debug!(
        "Grouped {} shapes as Group {}; box {}x{} moved from ({}, {}) to ({}, {})",
        grouped,
        id,
        bounds.width(),
        bounds.height(),
        bounds.min_left,
        bounds.min_top,
        offset.x,
        offset.y
    );
    RecenterOutcome::Centered {
        bounds,
        offset,
        grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::geometry::Point;
    use crate::ooxml::pptx::{ShapeKind, ShapeNode};
    use crate::ooxml::pptx::testing::{DeckBuilder, grp, sp, sp_unpositioned};

    fn only_group(slide: &Slide) -> GroupShape {
        let groups: Vec<_> = slide
            .shapes()
            .into_iter()
            .filter_map(|s| match s {
                ShapeNode::Group(g) => Some(g),
                _ => None,
            })
            .collect();
        assert_eq!(groups.len(), 1);
        groups.into_iter().next().unwrap()
    }

    #[test]
    fn test_centers_single_shape() {
        let mut pkg = DeckBuilder::new().slide(&sp(2, "A", 100, 100, 200, 100)).package();
        let slide = pkg.slide_mut(0).unwrap();

        let outcome = recenter(slide, 800, 600);

        assert_eq!(
            outcome,
            RecenterOutcome::Centered {
                bounds: BoundingBox::of(&Transform::new(100, 100, 200, 100)),
                offset: Point::new(300, 250),
                grouped: 1,
            }
        );
        let group = only_group(slide);
        assert_eq!(group.base().name(), Some("Group 3"));
        let mapping = group.group_transform().unwrap().unwrap();
        assert_eq!(mapping.offset, Point::new(300, 250));
        assert_eq!(mapping.child_offset, Point::new(100, 100));
        assert_eq!(mapping.extent, mapping.child_extent);

        let child = ShapeNode::from_element(group.children().next().unwrap().clone());
        assert_eq!(
            child.transform().unwrap().complete(),
            Some(Transform::new(100, 100, 200, 100))
        );
    }

    #[test]
    fn test_group_id_after_max_shape_id() {
        let mut pkg = DeckBuilder::new().slide(&sp(u32::MAX, "A", 0, 0, 10, 10)).package();
        let slide = pkg.slide_mut(0).unwrap();

        recenter(slide, 100, 100);

        let group = only_group(slide);
        assert_eq!(group.base().id(), Some(2));
        assert_eq!(group.base().name(), Some("Group 2"));
        let child = ShapeNode::from_element(group.children().next().unwrap().clone());
        assert_eq!(child.base().id(), Some(u32::MAX));
    }

    #[test]
    fn test_union_of_several_shapes() {
        let shapes = format!(
            "{}{}",
            sp(2, "A", 0, 0, 100, 100),
            sp(3, "B", 300, 200, 100, 100)
        );
        let mut pkg = DeckBuilder::new().slide(&shapes).package();
        let slide = pkg.slide_mut(0).unwrap();

        let outcome = recenter(slide, 1000, 1000);

        assert_eq!(
            outcome,
            RecenterOutcome::Centered {
                bounds: BoundingBox::of(&Transform::new(0, 0, 400, 300)),
                offset: Point::new(300, 350),
                grouped: 2,
            }
        );
        let group = only_group(slide);
        let names: Vec<_> = group
            .children()
            .map(|c| {
                let node = ShapeNode::from_element(c.clone());
                node.base().name().unwrap_or_default().to_string()
            })
            .collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_empty_slide_is_unchanged() {
        let mut pkg = DeckBuilder::new().slide("").package();
        let slide = pkg.slide_mut(0).unwrap();
        let before = slide.to_bytes();

        assert_eq!(recenter(slide, 800, 600), RecenterOutcome::Unchanged);
        assert_eq!(slide.to_bytes(), before);
    }

    #[test]
    fn test_unpositioned_shapes_stay_in_place() {
        let shapes = format!("{}{}", sp_unpositioned(2, "Body"), sp(3, "A", 0, 0, 10, 10));
        let mut pkg = DeckBuilder::new().slide(&shapes).package();
        let slide = pkg.slide_mut(0).unwrap();

        recenter(slide, 100, 100);

        let top: Vec<_> = slide.shapes().iter().map(|s| s.kind()).collect();
        assert_eq!(top, [ShapeKind::Generic, ShapeKind::Group]);
        assert_eq!(slide.shapes()[0].base().name(), Some("Body"));
    }

    #[test]
    fn test_only_unpositioned_shapes_is_unchanged() {
        let mut pkg = DeckBuilder::new().slide(&sp_unpositioned(2, "Body")).package();
        let slide = pkg.slide_mut(0).unwrap();
        assert_eq!(recenter(slide, 100, 100), RecenterOutcome::Unchanged);
    }

    #[test]
    fn test_existing_groups_are_left_alone() {
        let shapes = format!(
            "{}{}",
            grp(2, "Kept", (0, 0, 10, 10), (0, 0, 10, 10), &sp(3, "X", 0, 0, 10, 10)),
            sp(4, "A", 0, 0, 10, 10)
        );
        let mut pkg = DeckBuilder::new().slide(&shapes).package();
        let slide = pkg.slide_mut(0).unwrap();

        let outcome = recenter(slide, 100, 100);

        assert!(matches!(outcome, RecenterOutcome::Centered { grouped: 1, .. }));
        let names: Vec<_> = slide
            .shapes()
            .iter()
            .map(|s| s.base().name().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, ["Kept", "Group 5"]);
    }

    #[test]
    fn test_oversized_content_gets_negative_offset() {
        let mut pkg = DeckBuilder::new().slide(&sp(2, "Wide", 0, 0, 1001, 50)).package();
        let slide = pkg.slide_mut(0).unwrap();

        let outcome = recenter(slide, 800, 100);

        // (800 - 1001) / 2 truncates toward zero.
        assert!(matches!(
            outcome,
            RecenterOutcome::Centered { offset: Point { x: -100, y: 25 }, .. }
        ));
    }

    #[test]
    fn test_group_goes_before_extension_list() {
        let shapes = format!("{}<p:extLst/>", sp(2, "A", 0, 0, 10, 10));
        let mut pkg = DeckBuilder::new().slide(&shapes).package();
        let slide = pkg.slide_mut(0).unwrap();

        recenter(slide, 100, 100);

        let last = slide.sp_tree().child_elements().last().unwrap();
        assert_eq!(last.name(), "p:extLst");
        assert_eq!(slide.shapes().len(), 1);
    }
}
