//! Constant values for content types, relationship types and namespaces used in
//! PresentationML packages.

/// Content type URIs (like MIME-types) that specify a part's format.
pub mod content_type {
    // Image content types
    pub const BMP: &str = "image/bmp";
    pub const GIF: &str = "image/gif";
    pub const JPEG: &str = "image/jpeg";
    pub const PNG: &str = "image/png";
    pub const TIFF: &str = "image/tiff";
    pub const SVG: &str = "image/svg+xml";
    pub const X_EMF: &str = "image/x-emf";
    pub const X_WMF: &str = "image/x-wmf";

    // Package content types
    pub const OPC_CORE_PROPERTIES: &str =
        "application/vnd.openxmlformats-package.core-properties+xml";
    pub const OPC_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";

    // PresentationML content types
    pub const PML_PRESENTATION_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const PML_PRES_MACRO_MAIN: &str =
        "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml";
    pub const PML_TEMPLATE_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml";
    pub const PML_SLIDESHOW_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml";
    pub const PML_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const PML_SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const PML_SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";

    // Generic XML
    pub const XML: &str = "application/xml";
}

/// Namespace URIs.
pub mod namespace {
    pub const OPC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";
    pub const OPC_CONTENT_TYPES: &str =
        "http://schemas.openxmlformats.org/package/2006/content-types";
    pub const DML_MAIN: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
    pub const PML_MAIN: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
    pub const OFC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
}

/// Target mode values for relationships.
pub mod target_mode {
    pub const INTERNAL: &str = "Internal";
    pub const EXTERNAL: &str = "External";
}

/// Relationship type URIs.
pub mod relationship_type {
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
}

/// Content type for an image file extension, if it is one PowerPoint embeds.
pub fn image_content_type(ext: &str) -> Option<&'static str> {
    let ct = match ext.to_ascii_lowercase().as_str() {
        "png" => content_type::PNG,
        "jpg" | "jpeg" | "jpe" => content_type::JPEG,
        "gif" => content_type::GIF,
        "bmp" => content_type::BMP,
        "tif" | "tiff" => content_type::TIFF,
        "svg" => content_type::SVG,
        "emf" => content_type::X_EMF,
        "wmf" => content_type::X_WMF,
        _ => return None,
    };
    Some(ct)
}

/// Preferred file extension for an image content type.
pub fn image_extension(ct: &str) -> Option<&'static str> {
    let ext = match ct {
        content_type::PNG => "png",
        content_type::JPEG => "jpeg",
        content_type::GIF => "gif",
        content_type::BMP => "bmp",
        content_type::TIFF => "tiff",
        content_type::SVG => "svg",
        content_type::X_EMF => "emf",
        content_type::X_WMF => "wmf",
        _ => return None,
    };
    Some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_content_types() {
        assert_eq!(image_content_type("PNG"), Some(content_type::PNG));
        assert_eq!(image_content_type("jpg"), Some(content_type::JPEG));
        assert_eq!(image_content_type("xml"), None);
        assert_eq!(image_extension(content_type::X_EMF), Some("emf"));
        assert_eq!(image_extension("application/octet-stream"), None);
    }
}
