//! Copy the shapes of one slide onto a slide of another presentation.

use crate::common::Result;
use crate::common::geometry::PartialTransform;
use crate::common::xml::XmlElement;
use crate::ooxml::pptx::Package;
use crate::ooxml::pptx::shapes::base::{relationship_references, remap_connections, renumber_shape_ids};
use crate::ooxml::pptx::shapes::{Picture, ShapeIds, ShapeNode};
use crate::transfer::options::TransferOptions;
use crate::transfer::outcome::{SkippedNode, StructuralAnomaly, TransplantReport};
use log::{debug, warn};
use std::collections::HashMap;

/// Append a copy of every shape of `source` slide `source_slide` to `target`
/// slide `target_slide`, with default options.
///
/// See [`transplant_with`].
pub fn transplant(
    source: &Package,
    source_slide: usize,
    target: &mut Package,
    target_slide: usize,
) -> Result<TransplantReport> {
    transplant_with(
        source,
        source_slide,
        target,
        target_slide,
        &TransferOptions::default(),
    )
}

/// Append a copy of every shape of a source slide to a target slide.
///
/// Pictures are re-embedded: their image is stored in `target` and a new
/// picture with the same position, size, name and description refers to it.
/// Every other shape is copied verbatim; relationship ids inside it still
/// name source relationships and are logged and counted as unresolved.
///
/// Shapes keep their source order and are stacked above the target slide's
/// existing shapes. A shape that cannot be copied is skipped and recorded.
///
/// Fails only when either slide index is out of range.
pub fn transplant_with(
    source: &Package,
    source_slide: usize,
    target: &mut Package,
    target_slide: usize,
    options: &TransferOptions,
) -> Result<TransplantReport> {
    let nodes = source.slide(source_slide)?.shapes();
    let mut fallback_ids = ShapeIds::of(target.slide(target_slide)?.sp_tree());
    let mut report = TransplantReport::default();
    let mut copies: Vec<XmlElement> = Vec::with_capacity(nodes.len());

    for (position, node) in nodes.into_iter().enumerate() {
        let transform = match node.transform() {
            Ok(t) => t,
            Err(e) => {
                warn!("Skipping {}: {}", node.label(), e);
                let anomaly = StructuralAnomaly::MalformedTransform(e.to_string());
                report.skipped.push(skipped(position, &node, anomaly));
                continue;
            },
        };

        let label = node.label();
        match node {
            ShapeNode::Picture(picture) => {
                let id = picture.base().id().unwrap_or_else(|| fallback_ids.allocate());
                let copied = copy_picture(
                    source,
                    source_slide,
                    target,
                    target_slide,
                    &picture,
                    id,
                    &transform,
                );
                match copied {
                    Ok((copy, unresolved)) => {
                        debug!("Re-embedded {}", label);
                        report.pictures += 1;
                        report.unresolved_references += unresolved;
                        copies.push(copy);
                    },
                    Err(anomaly) => {
                        warn!("Skipping {}: {}", label, anomaly);
                        let node = ShapeNode::Picture(picture);
                        report.skipped.push(skipped(position, &node, anomaly));
                    },
                }
            },
            other => {
                let refs = relationship_references(other.base().element());
                if !refs.is_empty() {
                    warn!(
                        "{} refers to source relationships {} that are not carried over",
                        label,
                        refs.join(", ")
                    );
                    report.unresolved_references += refs.len();
                }
                debug!("Copied {}", label);
                copies.push(other.into_element());
            },
        }
    }

    let source_slide = source.slide(source_slide)?;
    let slide = target.slide_mut(target_slide)?;
    slide.adopt_namespaces(source_slide);
    let mut tree = slide.shape_tree();

    if options.renumber_shape_ids {
        let mut ids = tree.shape_ids();
        let mut renumbered = HashMap::new();
        for copy in &mut copies {
            renumber_shape_ids(copy, &mut ids, &mut renumbered);
        }
        for copy in &mut copies {
            remap_connections(copy, &renumbered);
        }
    }

    report.copied = copies.len();
    for copy in copies {
        tree.append(copy);
    }
    Ok(report)
}

/// Store the picture's image in `target` and build the target-side picture.
///
/// Returns the picture and the number of relationship ids in it other than
/// its image that still refer to the source.
fn copy_picture(
    source: &Package,
    source_slide: usize,
    target: &mut Package,
    target_slide: usize,
    picture: &Picture,
    id: u32,
    transform: &PartialTransform,
) -> std::result::Result<(XmlElement, usize), StructuralAnomaly> {
    let unresolved = |e: crate::ooxml::OoxmlError| StructuralAnomaly::UnresolvedImage(e.to_string());

    let old_r_id = picture.image_r_id().map_err(unresolved)?;
    let asset = source.image(source_slide, old_r_id).map_err(unresolved)?;
    let r_id = target.add_image(target_slide, &asset).map_err(unresolved)?;

    if let Some(t) = transform.complete() {
        let base = picture.base();
        let created = Picture::create(
            id,
            base.name().unwrap_or_default(),
            base.descr().unwrap_or_default(),
            &r_id,
            &t,
        );
        return Ok((created.into_element(), 0));
    }

    // Inherited geometry: keep everything, swap the image.
    let mut copy = picture.clone();
    copy.set_image_r_id(&r_id).map_err(unresolved)?;
    let element = copy.into_element();
    let others = relationship_references(&element)
        .iter()
        .filter(|r| **r != r_id)
        .count();
    Ok((element, others))
}

fn skipped(position: usize, node: &ShapeNode, anomaly: StructuralAnomaly) -> SkippedNode {
    SkippedNode {
        position,
        kind: node.kind(),
        name: node.base().name().unwrap_or_default().to_string(),
        anomaly,
    }
}
