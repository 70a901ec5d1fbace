//! Image assets embedded in presentations.
//!
//! An [`Asset`] is an owned copy of a media part's bytes together with the
//! content type and file extension needed to register it in another package.

use crate::ooxml::opc::constants::{content_type as ct, image_content_type, image_extension};
use crate::ooxml::opc::packuri::PackURI;

/// Image format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Emf,
    Wmf,
    /// Unknown format
    Unknown,
}

impl ImageFormat {
    /// Detect format from file bytes (magic number detection).
    pub fn detect_from_bytes(data: &[u8]) -> Self {
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            return ImageFormat::Png;
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return ImageFormat::Jpeg;
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return ImageFormat::Gif;
        }
        if data.starts_with(b"BM") {
            return ImageFormat::Bmp;
        }
        if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
            return ImageFormat::Tiff;
        }
        // EMR_HEADER record type followed by the " EMF" signature at offset 40
        if data.len() >= 44 && data[0..4] == [0x01, 0x00, 0x00, 0x00] && &data[40..44] == b" EMF" {
            return ImageFormat::Emf;
        }
        // Placeable WMF key
        if data.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A]) {
            return ImageFormat::Wmf;
        }
        ImageFormat::Unknown
    }

    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            ImageFormat::Png => Some(ct::PNG),
            ImageFormat::Jpeg => Some(ct::JPEG),
            ImageFormat::Gif => Some(ct::GIF),
            ImageFormat::Bmp => Some(ct::BMP),
            ImageFormat::Tiff => Some(ct::TIFF),
            ImageFormat::Emf => Some(ct::X_EMF),
            ImageFormat::Wmf => Some(ct::X_WMF),
            ImageFormat::Unknown => None,
        }
    }
}

/// Owned image bytes with their content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    blob: Vec<u8>,
    content_type: String,
    extension: String,
}

impl Asset {
    pub fn new(blob: Vec<u8>, content_type: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            blob,
            content_type: content_type.into(),
            extension: extension.into(),
        }
    }

    /// Copy a media part.
    ///
    /// Parts stored under a generic content type are identified by their
    /// extension, then by their leading bytes.
    pub fn from_part(partname: &PackURI, content_type: &str, blob: &[u8]) -> Self {
        let part_ext = partname.ext().to_ascii_lowercase();
        let content_type = if content_type.starts_with("image/") {
            content_type.to_string()
        } else {
            image_content_type(&part_ext)
                .or_else(|| ImageFormat::detect_from_bytes(blob).mime_type())
                .unwrap_or(content_type)
                .to_string()
        };
        let extension = match image_extension(&content_type) {
            Some(ext) if image_content_type(&part_ext) != Some(content_type.as_str()) => ext.to_string(),
            _ if !part_ext.is_empty() => part_ext,
            _ => "bin".to_string(),
        };
        Self::new(blob.to_vec(), content_type, extension)
    }

    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// File extension used for the media partname, without the dot.
    #[inline]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blob.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blob.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_detect_from_bytes() {
        assert_eq!(ImageFormat::detect_from_bytes(PNG_BYTES), ImageFormat::Png);
        assert_eq!(ImageFormat::detect_from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::detect_from_bytes(b"GIF89a..."), ImageFormat::Gif);
        assert_eq!(ImageFormat::detect_from_bytes(b"hello"), ImageFormat::Unknown);
    }

    #[test]
    fn test_from_part_keeps_partname_extension() {
        let name = PackURI::new("/ppt/media/image3.jpg").unwrap();
        let asset = Asset::from_part(&name, ct::JPEG, &[0xFF, 0xD8, 0xFF]);
        assert_eq!(asset.content_type(), ct::JPEG);
        assert_eq!(asset.extension(), "jpg");
        assert_eq!(asset.len(), 3);
    }

    #[test]
    fn test_from_part_identifies_generic_content() {
        let name = PackURI::new("/ppt/media/image1.bin").unwrap();
        let asset = Asset::from_part(&name, "application/octet-stream", PNG_BYTES);
        assert_eq!(asset.content_type(), ct::PNG);
        assert_eq!(asset.extension(), "png");

        let asset = Asset::from_part(&name, "application/octet-stream", b"????");
        assert_eq!(asset.content_type(), "application/octet-stream");
        assert_eq!(asset.extension(), "bin");
    }
}
