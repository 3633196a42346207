//! Image support for emitted drawings
//!
//! Images are embedded as inline `<w:drawing>` runs:
//!
//! ```xml
//! <w:drawing>
//!   <wp:inline>
//!     <wp:extent cx="..." cy="..."/>               <!-- Dimensions in EMUs -->
//!     <wp:docPr id="..." name="..."/>
//!     <a:graphic>
//!       <a:graphicData uri="...picture">
//!         <pic:pic>
//!           <pic:blipFill>
//!             <a:blip r:embed="docxflow_img1"/>   <!-- Relationship ID -->
//!           </pic:blipFill>
//!         </pic:pic>
//!       </a:graphicData>
//!     </a:graphic>
//!   </wp:inline>
//! </w:drawing>
//! ```
//!
//! # Unit Conversions
//!
//! OOXML uses EMUs (English Metric Units) for dimensions:
//! - 914400 EMUs = 1 inch
//! - 9525 EMUs = 1 pixel (at 96 DPI)

use std::collections::HashMap;
use std::io::Cursor;

use image::ImageReader;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::Result;
use crate::relationships::Relationships;

/// EMUs per inch (914400)
pub const EMU_PER_INCH: i64 = 914400;

/// EMUs per pixel at 96 DPI (9525)
pub const EMU_PER_PIXEL: i64 = 9525;

/// Prefix of image relationship ids
pub const IMAGE_ID_PREFIX: &str = "docxflow_img";

/// Convert a pixel length to EMUs
pub fn pixels_to_emu(pixels: f32) -> i64 {
    (pixels as f64 * EMU_PER_PIXEL as f64).round() as i64
}

/// Measure the pixel size of encoded image bytes
pub fn measure(bytes: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// Raw image bytes plus the size they should be displayed at
#[derive(Debug, Clone)]
pub struct ImageProvider {
    bytes: Vec<u8>,
    mime_type: String,
    intrinsic: Option<(u32, u32)>,
    width: Option<f32>,
    height: Option<f32>,
}

impl ImageProvider {
    /// Wrap image bytes, measuring their intrinsic size
    ///
    /// The content type is sniffed from the bytes; `declared_mime_type` is
    /// only used when sniffing fails. Bytes that cannot be measured still make
    /// a valid provider, but need explicit dimensions to be embedded.
    pub fn new(bytes: Vec<u8>, declared_mime_type: Option<&str>) -> Self {
        let mime_type = match image::guess_format(&bytes) {
            Ok(format) => format.to_mime_type().to_string(),
            Err(_) => declared_mime_type
                .unwrap_or("application/octet-stream")
                .to_string(),
        };

        let intrinsic = match measure(&bytes) {
            Ok(size) => Some(size),
            Err(e) => {
                debug!(error = %e, "could not measure image");
                None
            }
        };

        Self {
            bytes,
            mime_type,
            intrinsic,
            width: None,
            height: None,
        }
    }

    /// Override the display width, in pixels
    pub fn set_width(&mut self, pixels: f32) {
        self.width = Some(pixels);
    }

    /// Override the display height, in pixels
    pub fn set_height(&mut self, pixels: f32) {
        self.height = Some(pixels);
    }

    /// Display width: the override if set, else the intrinsic width
    pub fn width(&self) -> Option<f32> {
        self.width.or(self.intrinsic.map(|(w, _)| w as f32))
    }

    /// Display height: the override if set, else the intrinsic height
    pub fn height(&self) -> Option<f32> {
        self.height.or(self.intrinsic.map(|(_, h)| h as f32))
    }

    pub fn intrinsic_size(&self) -> Option<(u32, u32)> {
        self.intrinsic
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// File extension for the media part
    pub fn extension(&self) -> &'static str {
        extension_for_content_type(&self.mime_type)
    }
}

/// Media file extension for a content type
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpeg",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "bin",
    }
}

/// Identifiers for one embedded image occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Relationship id referenced by `a:blip r:embed`
    pub rel_id: String,
    /// Numeric id for `wp:docPr` and `pic:cNvPr`
    pub drawing_id: u32,
}

/// A media file to be stored in the package
#[derive(Debug, Clone)]
pub struct MediaPart {
    pub rel_id: String,
    /// Path relative to `word/`, e.g. `media/docxflow_img1.png`
    pub part_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MediaPart {
    /// File name without the `media/` directory
    pub fn filename(&self) -> &str {
        self.part_name.rsplit('/').next().unwrap_or(&self.part_name)
    }
}

/// Image registry for one render session
///
/// Identical bytes share one media part and relationship id. Every
/// registration gets its own drawing id, starting above the configured
/// offset so ids never collide with those already in a template.
#[derive(Debug, Clone)]
pub struct ImageRegistry {
    relationships: Relationships,
    drawing_id_offset: u32,
    registrations: u32,
    by_digest: HashMap<String, String>,
    media: Vec<MediaPart>,
}

impl ImageRegistry {
    pub fn new(drawing_id_offset: u32) -> Self {
        Self {
            relationships: Relationships::new(IMAGE_ID_PREFIX),
            drawing_id_offset,
            registrations: 0,
            by_digest: HashMap::new(),
            media: Vec::new(),
        }
    }

    /// Register an image occurrence
    pub fn register_image(&mut self, provider: &ImageProvider) -> ImageInfo {
        self.registrations += 1;
        let drawing_id = self.drawing_id_offset + self.registrations;

        let digest = content_digest(provider.bytes());
        if let Some(rel_id) = self.by_digest.get(&digest) {
            debug!(rel_id = %rel_id, drawing_id, "reused image relationship");
            return ImageInfo {
                rel_id: rel_id.clone(),
                drawing_id,
            };
        }

        let rel_id = self.relationships.peek_next_id();
        let part_name = format!("media/{}.{}", rel_id, provider.extension());
        self.relationships
            .add(part_name.clone(), Relationships::TYPE_IMAGE);
        self.media.push(MediaPart {
            rel_id: rel_id.clone(),
            part_name,
            content_type: provider.mime_type().to_string(),
            data: provider.bytes().to_vec(),
        });
        self.by_digest.insert(digest, rel_id.clone());
        debug!(rel_id = %rel_id, drawing_id, "registered image");

        ImageInfo { rel_id, drawing_id }
    }

    /// Convert a pixel length to the EMU string written in `cx`/`cy`
    pub fn size_to_emu(&self, pixels: f32) -> String {
        pixels_to_emu(pixels).to_string()
    }

    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    /// Media parts in registration order
    pub fn media(&self) -> &[MediaPart] {
        &self.media
    }

    /// Number of registrations, duplicates included
    pub fn registrations(&self) -> u32 {
        self.registrations
    }
}

fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::new(width, height);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_emu_conversion() {
        assert_eq!(pixels_to_emu(1.0), EMU_PER_PIXEL);
        assert_eq!(pixels_to_emu(96.0), EMU_PER_INCH);
        assert_eq!(pixels_to_emu(0.5), 4763);
    }

    #[test]
    fn test_measure_png() {
        assert_eq!(measure(&png(12, 7)).unwrap(), (12, 7));
        assert!(measure(b"not an image").is_err());
    }

    #[test]
    fn test_provider_uses_intrinsic_size() {
        let provider = ImageProvider::new(png(40, 20), None);
        assert_eq!(provider.mime_type(), "image/png");
        assert_eq!(provider.extension(), "png");
        assert_eq!(provider.width(), Some(40.0));
        assert_eq!(provider.height(), Some(20.0));
    }

    #[test]
    fn test_provider_overrides_win() {
        let mut provider = ImageProvider::new(png(40, 20), None);
        provider.set_width(100.0);
        assert_eq!(provider.width(), Some(100.0));
        assert_eq!(provider.height(), Some(20.0));
    }

    #[test]
    fn test_unmeasurable_provider() {
        let provider = ImageProvider::new(b"<svg/>".to_vec(), Some("image/svg+xml"));
        assert_eq!(provider.intrinsic_size(), None);
        assert_eq!(provider.width(), None);
        assert_eq!(provider.mime_type(), "image/svg+xml");
        assert_eq!(provider.extension(), "svg");
    }

    #[test]
    fn test_registry_dedupes_media_but_not_drawing_ids() {
        let mut registry = ImageRegistry::new(5000);
        let a = ImageProvider::new(png(2, 2), None);
        let b = ImageProvider::new(png(3, 3), None);

        let first = registry.register_image(&a);
        let again = registry.register_image(&a);
        let other = registry.register_image(&b);

        assert_eq!(first.rel_id, "docxflow_img1");
        assert_eq!(first.drawing_id, 5001);
        assert_eq!(again.rel_id, first.rel_id);
        assert_eq!(again.drawing_id, 5002);
        assert_eq!(other.rel_id, "docxflow_img2");
        assert_eq!(other.drawing_id, 5003);

        assert_eq!(registry.media().len(), 2);
        assert_eq!(registry.media()[0].part_name, "media/docxflow_img1.png");
        assert_eq!(registry.media()[0].filename(), "docxflow_img1.png");
        assert_eq!(registry.relationships().len(), 2);
        assert_eq!(registry.registrations(), 3);
    }

    #[test]
    fn test_size_to_emu() {
        let registry = ImageRegistry::new(0);
        assert_eq!(registry.size_to_emu(10.0), "95250");
    }
}
