// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Bildpress.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// File name offered for every exported document.
pub const EXPORT_FILE_NAME: &str = "converted.pdf";

/// Unique identifier for one user session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encodings accepted at the input boundary, plus the exported PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Jpeg,
    Png,
    Tiff,
    Bmp,
    WebP,
    Gif,
}

impl DocumentType {
    /// MIME type string, used for the download offer.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
            Self::Bmp => "image/bmp",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "bmp" => Some(Self::Bmp),
            "webp" => Some(Self::WebP),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Whether this type can enter the image registry.
    pub fn is_image(&self) -> bool {
        !matches!(self, Self::Pdf)
    }

    /// Extensions offered by the upload dialog.
    pub fn image_extensions() -> &'static [&'static str] {
        &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp", "gif"]
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// How each image is placed on its page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLayout {
    /// The page takes the image's own size at the configured DPI; the image
    /// fills it edge to edge.
    #[default]
    FitImage,
    /// Fixed paper size; the image is centred inside the margins and scaled
    /// down (never up) to fit.
    Paper { size: PaperSize },
}

/// A finished export, ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
    /// Number of pages in `bytes`.
    pub page_count: usize,
}

impl ExportArtifact {
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>, page_count: usize) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: DocumentType::Pdf.mime_type(),
            bytes,
            page_count,
        }
    }
}
