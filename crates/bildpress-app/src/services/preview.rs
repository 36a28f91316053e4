// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview thumbnails — small PNG data URLs the webview can show inline.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bildpress_core::error::Result;
use bildpress_document::ImageContent;

/// Longest edge of a preview, in pixels.
pub const PREVIEW_EDGE: u32 = 160;

/// Downscale `content` and wrap it as a `data:image/png;base64,...` URL.
pub fn data_url(content: &ImageContent) -> Result<String> {
    let png = content.thumbnail(PREVIEW_EDGE).to_png_bytes()?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}
