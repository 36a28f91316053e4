// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildpress-document — Image intake and PDF output for Bildpress.
//
// Decodes uploaded or captured photos into one canonical RGB8 pixel model,
// renders an ordered list of them into a single page-per-image PDF, and
// inspects the result.

pub mod image;
pub mod pdf;

// Re-export the primary structs so callers can use `bildpress_document::PdfExporter` etc.
pub use crate::image::content::ImageContent;
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfExporter;
