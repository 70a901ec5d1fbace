//! The content-into-template pipeline.

use crate::common::Result;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::pptx::Package;
use crate::transfer::options::TransferOptions;
use crate::transfer::outcome::{SlideReport, TransferReport};
use crate::transfer::{recenter, transplant_with, ungroup};
use log::{info, warn};
use std::path::Path;

/// A template carrying the transferred content, and what happened per slide.
#[derive(Debug)]
pub struct Transferred {
    pub package: Package,
    pub report: TransferReport,
}

/// Rebuild `template` with the content of every slide of `content`.
///
/// The template's own slides are removed. Each content slide becomes a new
/// slide on the layout of the template's first slide (or the template's first
/// layout when it has no slides) holding a copy of the content's shapes,
/// ungrouped and centered on the template canvas as `options` ask.
///
/// `content` is ungrouped in place when ungrouping is enabled.
pub fn transfer(
    content: &mut Package,
    mut template: Package,
    options: &TransferOptions,
) -> Result<Transferred> {
    let layout = template_layout(&template)?;
    let canvas = template.slide_size()?;
    info!(
        "Transferring {} slides onto {} ({}x{} EMU)",
        content.slide_count(),
        layout,
        canvas.cx,
        canvas.cy
    );

    template.clear_slides()?;

    let mut report = TransferReport::default();
    for index in 0..content.slide_count() {
        let ungrouped = if options.ungroup {
            Some(ungroup(content.slide_mut(index)?))
        } else {
            None
        };

        let target = template.add_slide(&layout, options.clone_layout_placeholders)?;
        let transplanted = transplant_with(content, index, &mut template, target, options)?;

        let centered = if options.recenter {
            Some(recenter(template.slide_mut(target)?, canvas.cx, canvas.cy))
        } else {
            None
        };

        info!(
            "Slide {}: {} shapes copied, {} skipped",
            index + 1,
            transplanted.copied,
            transplanted.skipped.len() + ungrouped.as_ref().map_or(0, |u| u.skipped.len())
        );
        report.slides.push(SlideReport {
            index,
            ungroup: ungrouped,
            transplant: transplanted,
            recenter: centered,
        });
    }

    Ok(Transferred {
        package: template,
        report,
    })
}

/// [`transfer`] between files: read `content` and `template`, write the
/// result to `output`.
pub fn transfer_files<P, Q, R>(
    content: P,
    template: Q,
    output: R,
    options: &TransferOptions,
) -> Result<TransferReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let mut content = Package::open(content)?;
    let template = Package::open(template)?;

    let Transferred {
        mut package,
        report,
    } = transfer(&mut content, template, options)?;

    package.save(output.as_ref())?;
    info!("Saved {}", output.as_ref().display());
    Ok(report)
}

fn template_layout(template: &Package) -> Result<PackURI> {
    if template.slide_count() > 0 {
        match template.slide_layout(0) {
            Ok(layout) => return Ok(layout),
            Err(e) => warn!("First template slide has no usable layout ({}), using the default", e),
        }
    }
    Ok(template.default_layout()?)
}
