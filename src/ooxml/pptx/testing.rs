//! In-memory `.pptx` fixtures for unit tests.

use crate::ooxml::pptx::Package;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Smallest byte string recognised as PNG.
pub(crate) const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR fixture";

const NS: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

const RT_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const RT_LAYOUT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const RT_MASTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const RT_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

pub(crate) fn sp(id: u32, name: &str, x: i64, y: i64, cx: i64, cy: i64) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr/><a:p><a:r><a:t>{name}</a:t></a:r></a:p></p:txBody></p:sp>"#
    )
}

/// A shape without any transform of its own.
pub(crate) fn sp_unpositioned(id: u32, name: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp>"#
    )
}

pub(crate) fn pic(id: u32, name: &str, r_id: &str, x: i64, y: i64, cx: i64, cy: i64) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="{name}" descr="{name} description"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{r_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
    )
}

/// A group whose frame is `frame` and child space `child`, each
/// `(x, y, cx, cy)`.
pub(crate) fn grp(id: u32, name: &str, frame: (i64, i64, i64, i64), child: (i64, i64, i64, i64), children: &str) -> String {
    let (x, y, cx, cy) = frame;
    let (chx, chy, chcx, chcy) = child;
    format!(
        r#"<p:grpSp><p:nvGrpSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/><a:chOff x="{chx}" y="{chy}"/><a:chExt cx="{chcx}" cy="{chcy}"/></a:xfrm></p:grpSpPr>{children}</p:grpSp>"#
    )
}

struct FixtureSlide {
    layout: usize,
    shapes: String,
    images: Vec<(String, Vec<u8>)>,
}

/// Builder for a small but complete presentation: one master, two layouts
/// ("Title Slide" with title and date placeholders, and "Blank"), and the
/// requested slides.
pub(crate) struct DeckBuilder {
    slide_size: Option<(i64, i64)>,
    slides: Vec<FixtureSlide>,
}

impl DeckBuilder {
    pub(crate) fn new() -> Self {
        Self {
            slide_size: Some((9_144_000, 6_858_000)),
            slides: Vec::new(),
        }
    }

    pub(crate) fn slide_size(mut self, cx: i64, cy: i64) -> Self {
        self.slide_size = Some((cx, cy));
        self
    }

    pub(crate) fn without_slide_size(mut self) -> Self {
        self.slide_size = None;
        self
    }

    /// A slide on layout 1 holding `shapes` (raw shape-tree markup).
    pub(crate) fn slide(self, shapes: &str) -> Self {
        self.slide_on_layout(1, shapes, &[])
    }

    /// A slide whose pictures embed `images` under the given rIds.
    pub(crate) fn slide_with_images(self, shapes: &str, images: &[(&str, &[u8])]) -> Self {
        self.slide_on_layout(1, shapes, images)
    }

    pub(crate) fn slide_on_layout(mut self, layout: usize, shapes: &str, images: &[(&str, &[u8])]) -> Self {
        self.slides.push(FixtureSlide {
            layout,
            shapes: shapes.to_string(),
            images: images
                .iter()
                .map(|(r_id, blob)| (r_id.to_string(), blob.to_vec()))
                .collect(),
        });
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        let mut zip = ZipWriter::new(Cursor::new(&mut data));
        let options = SimpleFileOptions::default();
        let mut put = |name: &str, content: &[u8]| {
            zip.start_file(name, options).unwrap();
            zip.write_all(content).unwrap();
        };

        let mut overrides = String::new();
        overrides.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
        overrides.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
        for n in 1..=2 {
            overrides.push_str(&format!(r#"<Override PartName="/ppt/slideLayouts/slideLayout{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#));
        }
        for n in 1..=self.slides.len() {
            overrides.push_str(&format!(r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#));
        }
        put(
            "[Content_Types].xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/>{overrides}</Types>"#
            )
            .as_bytes(),
        );

        put(
            "_rels/.rels",
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#,
        );

        // Presentation: rId1 is the master, slides start at rId2.
        let mut sld_ids = String::new();
        let mut pres_rels = format!(r#"<Relationship Id="rId1" Type="{RT_MASTER}" Target="slideMasters/slideMaster1.xml"/>"#);
        for n in 1..=self.slides.len() {
            sld_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n + 1));
            pres_rels.push_str(&format!(r#"<Relationship Id="rId{}" Type="{RT_SLIDE}" Target="slides/slide{n}.xml"/>"#, n + 1));
        }
        let sld_sz = self
            .slide_size
            .map(|(cx, cy)| format!(r#"<p:sldSz cx="{cx}" cy="{cy}"/>"#))
            .unwrap_or_default();
        put(
            "ppt/presentation.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {NS}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{sld_ids}</p:sldIdLst>{sld_sz}<p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
            )
            .as_bytes(),
        );
        put("ppt/_rels/presentation.xml.rels", rels(&pres_rels).as_bytes());

        put(
            "ppt/slideMasters/slideMaster1.xml",
            format!(
                r#"<p:sldMaster {NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/><p:sldLayoutId id="2147483650" r:id="rId2"/></p:sldLayoutIdLst></p:sldMaster>"#
            )
            .as_bytes(),
        );
        put(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            rels(&format!(
                r#"<Relationship Id="rId1" Type="{RT_LAYOUT}" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="{RT_LAYOUT}" Target="../slideLayouts/slideLayout2.xml"/>"#
            ))
            .as_bytes(),
        );

        let title_layout = format!(
            r#"<p:sldLayout {NS} type="title"><p:cSld name="Title Slide"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Date Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph type="dt" sz="half" idx="10"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp></p:spTree></p:cSld></p:sldLayout>"#
        );
        let blank_layout = format!(
            r#"<p:sldLayout {NS} type="blank"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld></p:sldLayout>"#
        );
        let layout_rels = rels(&format!(
            r#"<Relationship Id="rId1" Type="{RT_MASTER}" Target="../slideMasters/slideMaster1.xml"/>"#
        ));
        put("ppt/slideLayouts/slideLayout1.xml", title_layout.as_bytes());
        put("ppt/slideLayouts/_rels/slideLayout1.xml.rels", layout_rels.as_bytes());
        put("ppt/slideLayouts/slideLayout2.xml", blank_layout.as_bytes());
        put("ppt/slideLayouts/_rels/slideLayout2.xml.rels", layout_rels.as_bytes());

        let mut media_index = 0;
        for (i, slide) in self.slides.iter().enumerate() {
            let n = i + 1;
            put(
                &format!("ppt/slides/slide{n}.xml"),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
                    slide.shapes
                )
                .as_bytes(),
            );
            let mut slide_rels = format!(
                r#"<Relationship Id="rId1" Type="{RT_LAYOUT}" Target="../slideLayouts/slideLayout{}.xml"/>"#,
                slide.layout
            );
            for (r_id, blob) in &slide.images {
                media_index += 1;
                put(&format!("ppt/media/image{media_index}.png"), blob);
                slide_rels.push_str(&format!(
                    r#"<Relationship Id="{r_id}" Type="{RT_IMAGE}" Target="../media/image{media_index}.png"/>"#
                ));
            }
            put(&format!("ppt/slides/_rels/slide{n}.xml.rels"), rels(&slide_rels).as_bytes());
        }

        zip.finish().unwrap();
        data
    }

    pub(crate) fn package(&self) -> Package {
        Package::from_bytes(&self.build()).unwrap()
    }
}

fn rels(inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{inner}</Relationships>"#
    )
}
