// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image content — decoded pixels in the one colour model Bildpress works in
// (three 8-bit channels), plus the canonical lossless re-encoding used for
// fingerprinting.

use std::io::Cursor;

use bildpress_core::error::{BildpressError, Result};
use bildpress_core::types::DocumentType;
use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::{debug, info, instrument, warn};

/// Decoded photo pixels, always RGB8 regardless of the upload's encoding.
///
/// Equality compares pixels only; two uploads of the same picture in
/// different formats are equal.
#[derive(Debug, Clone)]
pub struct ImageContent {
    /// Canonical pixel data.
    pixels: RgbImage,
    /// Encoding detected at the input boundary, if any.
    source_format: Option<DocumentType>,
}

impl ImageContent {
    // -- Construction ---------------------------------------------------------

    /// Decode raw encoded bytes (PNG, JPEG, etc.) from an upload or camera.
    ///
    /// Formats the `image` crate recognises but Bildpress does not accept
    /// (PNM, TGA, ICO, ...) fail with [`BildpressError::UnsupportedImage`].
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn decode(data: &[u8]) -> Result<Self> {
        let source_format = match image::guess_format(data) {
            Ok(format) => match document_type_of(format) {
                Some(kind) => Some(kind),
                None => {
                    warn!(?format, "Rejected unsupported image format");
                    return Err(BildpressError::UnsupportedImage(format!("{:?}", format)));
                }
            },
            Err(_) => None,
        };

        let decoded = image::load_from_memory(data).map_err(|err| {
            BildpressError::ImageError(format!("failed to decode image: {}", err))
        })?;

        debug!(
            width = decoded.width(),
            height = decoded.height(),
            format = ?source_format,
            "Image decoded from bytes"
        );

        Ok(Self {
            pixels: decoded.to_rgb8(),
            source_format,
        })
    }

    /// Load an image from a file path. The extension must name an image type.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !DocumentType::from_extension(&extension).is_some_and(|kind| kind.is_image()) {
            warn!(%extension, "Rejected file by extension");
            let kind = if extension.is_empty() { "no extension".to_owned() } else { extension };
            return Err(BildpressError::UnsupportedImage(kind));
        }

        let data = std::fs::read(path)?;
        let content = Self::decode(&data).map_err(|err| match err {
            BildpressError::ImageError(detail) => {
                BildpressError::ImageError(format!("{}: {}", path.display(), detail))
            }
            other => other,
        })?;
        info!(
            width = content.width(),
            height = content.height(),
            "Image loaded"
        );
        Ok(content)
    }

    /// Wrap already-decoded RGB8 pixels.
    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self {
            pixels,
            source_format: None,
        }
    }

    /// Wrap an already-decoded `DynamicImage`, dropping any alpha channel.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::from_rgb(image.to_rgb8())
    }

    // -- Accessors ------------------------------------------------------------

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Encoding the pixels arrived in, when known.
    pub fn source_format(&self) -> Option<DocumentType> {
        self.source_format
    }

    /// Borrow the pixel buffer.
    pub fn as_rgb(&self) -> &RgbImage {
        &self.pixels
    }

    /// Downscaled copy whose longer edge is at most `max_edge` pixels.
    /// Images already that small are returned unchanged.
    pub fn thumbnail(&self, max_edge: u32) -> ImageContent {
        let (width, height) = self.pixels.dimensions();
        let max_edge = max_edge.max(1);
        if width <= max_edge && height <= max_edge {
            return self.clone();
        }

        let scale = max_edge as f64 / width.max(height) as f64;
        let scaled = |edge: u32| ((edge as f64 * scale).round() as u32).clamp(1, max_edge);
        let pixels = image::imageops::thumbnail(&self.pixels, scaled(width), scaled(height));
        Self {
            pixels,
            source_format: self.source_format,
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode as PNG. This is the canonical encoding: identical pixels always
    /// produce identical bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        self.encode_as(ImageFormat::Png)
    }

    /// Encode as JPEG with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        self.pixels.write_with_encoder(encoder).map_err(|err| {
            BildpressError::ImageError(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }

    /// Encode into any format the `image` crate can write.
    pub fn encode_as(&self, format: ImageFormat) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(|err| {
                BildpressError::ImageError(format!("image encoding failed: {}", err))
            })?;
        Ok(buffer)
    }
}

impl PartialEq for ImageContent {
    fn eq(&self, other: &Self) -> bool {
        self.pixels == other.pixels
    }
}

impl Eq for ImageContent {}

/// Map a detected `image` format onto the upload types Bildpress knows about.
fn document_type_of(format: ImageFormat) -> Option<DocumentType> {
    match format {
        ImageFormat::Png => Some(DocumentType::Png),
        ImageFormat::Jpeg => Some(DocumentType::Jpeg),
        ImageFormat::Tiff => Some(DocumentType::Tiff),
        ImageFormat::Bmp => Some(DocumentType::Bmp),
        ImageFormat::WebP => Some(DocumentType::WebP),
        ImageFormat::Gif => Some(DocumentType::Gif),
        _ => None,
    }
}
