//! Flatten a slide's group shapes into its top-level shape sequence.

use crate::common::geometry::GroupTransform;
use crate::common::xml::XmlElement;
use crate::ooxml::pptx::shapes::base::map_transform;
use crate::ooxml::pptx::shapes::{GroupShape, ShapeNode, ShapeTree};
use crate::ooxml::pptx::Slide;
use crate::transfer::outcome::{SkippedNode, StructuralAnomaly, UngroupReport};
use log::{debug, warn};

/// Dissolve every group on the slide, recursively.
///
/// Children of a group take the group's place in the shape sequence, in their
/// original order, with their transforms mapped from the group's child space
/// into slide space. Nested groups surface at the top level after one pass and
/// are dissolved by the next, until no group remains.
///
/// A child whose transform cannot be read is left out and recorded in the
/// report. A group whose own transform cannot be read is dissolved without
/// mapping its children.
pub fn ungroup(slide: &mut Slide) -> UngroupReport {
    let mut report = UngroupReport::default();
    let mut tree = slide.shape_tree();

    loop {
        let positions = tree.group_positions();
        if positions.is_empty() {
            break;
        }
        report.passes += 1;

        // Last to first, so positions still to be processed stay valid.
        for &position in positions.iter().rev() {
            let Some(element) = tree.remove(position) else {
                continue;
            };
            dissolve(&mut tree, position, GroupShape::new(element), &mut report);
        }
    }

    if report.dissolved > 0 {
        debug!(
            "Ungrouped {}: {} groups in {} passes, {} shapes promoted",
            slide.partname(),
            report.dissolved,
            report.passes,
            report.promoted
        );
    }
    report
}

fn dissolve(tree: &mut ShapeTree<'_>, position: usize, group: GroupShape, report: &mut UngroupReport) {
    let mapping = match group.group_transform() {
        Ok(mapping) => mapping,
        Err(e) => {
            warn!(
                "Group {} has a malformed transform ({}); keeping child positions",
                ShapeNode::Group(group.clone()).label(),
                e
            );
            None
        },
    };

    let mut inserted = 0;
    for mut child in group.into_children() {
        if let Some(mapping) = &mapping {
            if let Err(e) = promote(&mut child, mapping) {
                let node = ShapeNode::from_element(child);
                warn!("Skipping {} while ungrouping: {}", node.label(), e);
                report.skipped.push(SkippedNode {
                    position: position + inserted,
                    kind: node.kind(),
                    name: node.base().name().unwrap_or_default().to_string(),
                    anomaly: StructuralAnomaly::MalformedTransform(e.to_string()),
                });
                continue;
            }
        }
        tree.insert(position + inserted, child);
        inserted += 1;
    }

    report.dissolved += 1;
    report.promoted += inserted;
}

fn promote(child: &mut XmlElement, mapping: &GroupTransform) -> crate::ooxml::Result<()> {
    if mapping.is_identity() {
        return Ok(());
    }
    map_transform(child, mapping)
}
