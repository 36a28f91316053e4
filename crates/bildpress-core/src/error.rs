// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildpress.

use thiserror::Error;

/// Top-level error type for all Bildpress operations.
///
/// Duplicate images are deliberately absent: the registry reports them
/// through its return value, never as an error.
#[derive(Debug, Error)]
pub enum BildpressError {
    // -- Image errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("unsupported image type: {0}")]
    UnsupportedImage(String),

    // -- Registry errors --
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error("no image named {0}")]
    NotFound(String),

    // -- Export errors --
    #[error("nothing to export: at least one image is required")]
    EmptyInput,

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildpressError>;
