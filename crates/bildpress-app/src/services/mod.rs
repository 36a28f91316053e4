// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — concerns the UI should not know about: where the app's
// data lives, which export settings apply, and how photos are previewed.

pub mod config;
pub mod data_dir;
pub mod preview;
