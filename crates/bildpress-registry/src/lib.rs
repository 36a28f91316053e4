// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! bildpress-registry — the session's photo collection.
//!
//! Every accepted photo is fingerprinted over its canonical PNG encoding so
//! that the same picture uploaded twice (as JPEG and PNG, or under another
//! file name) is kept once. Accepted photos get a stable `Image_<n>` name that
//! survives reordering and deletion of their neighbours.

pub mod fingerprint;
pub mod registry;

pub use fingerprint::{Fingerprint, compute_fingerprint, hash_bytes};
pub use registry::{AddOutcome, DisplayName, ImageItem, ImageRegistry};
