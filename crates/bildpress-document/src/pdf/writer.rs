// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF exporter — render an ordered sequence of images into one
// page-per-image PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. The saved bytes are passed through `lopdf` once more
// to drop wall-clock metadata.

use std::path::Path;

use bildpress_core::error::{BildpressError, Result};
use bildpress_core::types::{ExportArtifact, PageLayout};
use bildpress_core::ExportConfig;
use lopdf::{Document, Object};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::image::ImageContent;

const MM_PER_INCH: f32 = 25.4;
const PT_PER_INCH: f32 = 72.0;

/// Renders ordered image sequences into a single PDF.
pub struct PdfExporter {
    config: ExportConfig,
}

/// Where one image lands on its page, in PDF units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    page_w_mm: f32,
    page_h_mm: f32,
    x_pt: f32,
    y_pt: f32,
    scale: f32,
}

impl PdfExporter {
    /// Create an exporter for the given configuration.
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render `contents` in order, one page per image.
    ///
    /// The first image becomes the base page and every following image is
    /// appended after it. Fails with [`BildpressError::EmptyInput`] when there
    /// is nothing to render.
    #[instrument(skip_all, fields(pages = contents.len()))]
    pub fn export(&self, contents: &[&ImageContent]) -> Result<Vec<u8>> {
        let Some((base, rest)) = contents.split_first() else {
            warn!("Export requested with no images");
            return Err(BildpressError::EmptyInput);
        };

        info!(layout = ?self.config.layout, title = %self.config.title, "Creating image PDF");

        let mut doc = PdfDocument::new(&self.config.title);
        let mut pages = Vec::with_capacity(contents.len());
        pages.push(self.render_page(&mut doc, base));
        for content in rest {
            pages.push(self.render_page(&mut doc, content));
        }
        doc.with_pages(pages);

        // Pixels are embedded exactly as decoded: printpdf's default image
        // optimisation downsamples anything over 2MB and greys out grey-looking
        // photos.
        let options = PdfSaveOptions {
            image_optimization: None,
            ..PdfSaveOptions::default()
        };
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&options, &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf reported warnings");
        }

        let output = finish_document(&output)?;
        debug!(output_bytes = output.len(), "Export complete");
        Ok(output)
    }

    /// Render and wrap the result as a downloadable artifact.
    pub fn export_artifact(&self, contents: &[&ImageContent]) -> Result<ExportArtifact> {
        let bytes = self.export(contents)?;
        Ok(ExportArtifact::pdf(
            self.config.file_name.clone(),
            bytes,
            contents.len(),
        ))
    }

    /// Render and write the PDF directly to a file.
    pub fn write_to_file(&self, contents: &[&ImageContent], path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.export(contents)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote PDF to {}", path.as_ref().display());
        Ok(())
    }

    // -- Page rendering -------------------------------------------------------

    fn render_page(&self, doc: &mut PdfDocument, content: &ImageContent) -> PdfPage {
        let raw = RawImage {
            pixels: RawImageData::U8(content.as_rgb().as_raw().clone()),
            width: content.width() as usize,
            height: content.height() as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = doc.add_image(&raw);

        let placement = place_image(&self.config, content.width(), content.height());

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(placement.x_pt)),
                translate_y: Some(Pt(placement.y_pt)),
                scale_x: Some(placement.scale),
                scale_y: Some(placement.scale),
                dpi: Some(self.config.dpi),
                rotate: None,
            },
        }];

        debug!(?placement, "Image placed on page");
        PdfPage::new(Mm(placement.page_w_mm), Mm(placement.page_h_mm), ops)
    }
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

/// Compute page size and image transform for one image.
fn place_image(config: &ExportConfig, width_px: u32, height_px: u32) -> Placement {
    let dpi = config.dpi;
    let img_w_pt = width_px as f32 / dpi * PT_PER_INCH;
    let img_h_pt = height_px as f32 / dpi * PT_PER_INCH;

    match config.layout {
        PageLayout::FitImage => Placement {
            page_w_mm: width_px as f32 / dpi * MM_PER_INCH,
            page_h_mm: height_px as f32 / dpi * MM_PER_INCH,
            x_pt: 0.0,
            y_pt: 0.0,
            scale: 1.0,
        },
        PageLayout::Paper { size } => {
            let (w_mm, h_mm) = size.dimensions_mm();
            let (page_w_mm, page_h_mm) = (w_mm as f32, h_mm as f32);

            // Margins wider than the paper leave a 1pt target rather than a negative one.
            let margin_pt = Mm(config.margin_mm).into_pt().0;
            let usable_w_pt = (Mm(page_w_mm).into_pt().0 - 2.0 * margin_pt).max(1.0);
            let usable_h_pt = (Mm(page_h_mm).into_pt().0 - 2.0 * margin_pt).max(1.0);

            // Scale to fit while preserving aspect ratio; do not upscale.
            let scale = (usable_w_pt / img_w_pt).min(usable_h_pt / img_h_pt).min(1.0);

            let rendered_w_pt = img_w_pt * scale;
            let rendered_h_pt = img_h_pt * scale;

            Placement {
                page_w_mm,
                page_h_mm,
                x_pt: margin_pt + (usable_w_pt - rendered_w_pt) / 2.0,
                y_pt: margin_pt + (usable_h_pt - rendered_h_pt) / 2.0,
                scale,
            }
        }
    }
}

/// Flate-compress the raw image streams, then remove creation/modification
/// timestamps, the XMP packet, and the trailer `/ID` so identical inputs do
/// not differ by wall-clock data.
fn finish_document(pdf: &[u8]) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(pdf).map_err(|err| {
        BildpressError::PdfError(format!("failed to reload rendered PDF: {}", err))
    })?;

    doc.compress();
    doc.trailer.remove(b"ID");

    let info_id = doc.trailer.get(b"Info").and_then(Object::as_reference).ok();
    let info = match info_id {
        Some(id) => doc.get_object_mut(id).ok(),
        None => doc.trailer.get_mut(b"Info").ok(),
    };
    if let Some(Object::Dictionary(info)) = info {
        info.remove(b"CreationDate");
        info.remove(b"ModDate");
    }

    if let Ok(root_id) = doc.trailer.get(b"Root").and_then(Object::as_reference)
        && let Ok(Object::Dictionary(catalog)) = doc.get_object_mut(root_id)
    {
        catalog.remove(b"Metadata");
    }

    let mut output = Vec::new();
    doc.save_to(&mut output).map_err(|err| {
        BildpressError::PdfError(format!("failed to serialise PDF: {}", err))
    })?;
    Ok(output)
}
