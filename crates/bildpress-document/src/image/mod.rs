// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding into the canonical pixel model and lossless re-encoding.

pub mod content;

pub use content::ImageContent;
