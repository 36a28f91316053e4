// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image registry — the ordered, deduplicated photos of one session.
//
// Invariants:
//   * no two items share a fingerprint
//   * display names are unique and never reassigned
//   * order is insertion order or the last applied reorder, whichever is newer

use std::collections::{HashMap, HashSet};

use bildpress_core::error::{BildpressError, Result};
use bildpress_document::ImageContent;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::fingerprint::{Fingerprint, compute_fingerprint};

/// Prefix of every generated display name.
const NAME_PREFIX: &str = "Image_";

/// Stable, user-facing identity of an accepted photo: `Image_<ordinal>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayName(String);

impl DisplayName {
    fn for_ordinal(ordinal: u64) -> Self {
        Self(format!("{NAME_PREFIX}{ordinal}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The ordinal this name was minted with.
    pub fn ordinal(&self) -> Option<u64> {
        self.0.strip_prefix(NAME_PREFIX)?.parse().ok()
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for DisplayName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DisplayName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One accepted photo.
#[derive(Debug, Clone)]
pub struct ImageItem {
    display_name: DisplayName,
    content: ImageContent,
    fingerprint: Fingerprint,
    added_at: DateTime<Utc>,
}

impl ImageItem {
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    pub fn content(&self) -> &ImageContent {
        &self.content
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// When the photo was kept. Display only.
    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

/// Result of offering a photo to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended under a freshly minted name.
    Accepted(DisplayName),
    /// Same pixels are already held under `existing`; nothing changed.
    Duplicate { existing: DisplayName },
}

impl AddOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Name assigned to the new item; `None` for a duplicate.
    pub fn name(&self) -> Option<&DisplayName> {
        match self {
            Self::Accepted(name) => Some(name),
            Self::Duplicate { .. } => None,
        }
    }
}

/// Ordered, deduplicated collection of photos owned by one session.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    items: Vec<ImageItem>,
    /// Fingerprint of every held item, mapped to the name holding it.
    seen: HashMap<Fingerprint, DisplayName>,
    /// Successful adds so far; the next ordinal is this plus one.
    accepted: u64,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Commands -------------------------------------------------------------

    /// Offer a photo. Duplicates are reported in the outcome, not as errors.
    ///
    /// The only failure is being unable to canonically encode `content`.
    #[instrument(skip_all, fields(width = content.width(), height = content.height()))]
    pub fn add(&mut self, content: ImageContent) -> Result<AddOutcome> {
        let fingerprint = compute_fingerprint(&content)?;

        if let Some(existing) = self.seen.get(&fingerprint) {
            debug!(%existing, fingerprint = fingerprint.short(), "Duplicate image ignored");
            return Ok(AddOutcome::Duplicate {
                existing: existing.clone(),
            });
        }

        self.accepted += 1;
        let name = DisplayName::for_ordinal(self.accepted);
        self.seen.insert(fingerprint.clone(), name.clone());
        self.items.push(ImageItem {
            display_name: name.clone(),
            content,
            fingerprint,
            added_at: Utc::now(),
        });

        info!(%name, count = self.items.len(), "Image added");
        Ok(AddOutcome::Accepted(name))
    }

    /// Rearrange the items to match `new_order`.
    ///
    /// `new_order` must name every current item exactly once. Anything else
    /// (a repeated, unknown, or missing name) is rejected with
    /// [`BildpressError::InvalidOrder`] and the registry is left untouched.
    #[instrument(skip_all, fields(requested = new_order.len()))]
    pub fn reorder<S: AsRef<str>>(&mut self, new_order: &[S]) -> Result<()> {
        let positions: HashMap<&str, usize> = self
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.display_name.as_str(), idx))
            .collect();

        let mut picked = HashSet::with_capacity(new_order.len());
        let mut sequence = Vec::with_capacity(new_order.len());
        for name in new_order {
            let name = name.as_ref();
            let Some(&idx) = positions.get(name) else {
                warn!(name, "Reorder names an unknown image");
                return Err(BildpressError::InvalidOrder(format!("unknown image {name}")));
            };
            if !picked.insert(idx) {
                warn!(name, "Reorder repeats an image");
                return Err(BildpressError::InvalidOrder(format!("{name} appears more than once")));
            }
            sequence.push(idx);
        }

        if sequence.len() != self.items.len() {
            let missing: Vec<&str> = self
                .items
                .iter()
                .enumerate()
                .filter(|(idx, _)| !picked.contains(idx))
                .map(|(_, item)| item.display_name.as_str())
                .collect();
            warn!(?missing, "Reorder leaves images out");
            return Err(BildpressError::InvalidOrder(format!(
                "missing {}",
                missing.join(", ")
            )));
        }

        let mut slots: Vec<Option<ImageItem>> = std::mem::take(&mut self.items)
            .into_iter()
            .map(Some)
            .collect();
        self.items = sequence
            .into_iter()
            .filter_map(|idx| slots[idx].take())
            .collect();

        let order: Vec<&str> = self.names().map(DisplayName::as_str).collect();
        debug!(?order, "Images reordered");
        Ok(())
    }

    /// Move one item to `to_index` (clamped to the end), keeping the others in
    /// their relative order.
    pub fn move_item(&mut self, name: &str, to_index: usize) -> Result<()> {
        let from = self
            .position(name)
            .ok_or_else(|| BildpressError::NotFound(name.to_owned()))?;

        let mut order: Vec<String> = self.names().map(|n| n.as_str().to_owned()).collect();
        let moved = order.remove(from);
        order.insert(to_index.min(order.len()), moved);
        self.reorder(order.as_slice())
    }

    /// Remove the item called `name` and forget its fingerprint, so the same
    /// photo may be kept again later. Unknown names are a no-op.
    #[instrument(skip(self))]
    pub fn delete(&mut self, name: &str) -> Option<ImageItem> {
        let Some(idx) = self.position(name) else {
            debug!("Delete of unknown image ignored");
            return None;
        };

        let item = self.items.remove(idx);
        self.seen.remove(&item.fingerprint);
        info!(remaining = self.items.len(), "Image deleted");
        Some(item)
    }

    // -- Queries --------------------------------------------------------------

    /// Content in current order, for the exporter.
    pub fn export_order(&self) -> Vec<&ImageContent> {
        self.items.iter().map(|item| &item.content).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Display names in current order.
    pub fn names(&self) -> impl Iterator<Item = &DisplayName> {
        self.items.iter().map(|item| &item.display_name)
    }

    pub fn items(&self) -> &[ImageItem] {
        &self.items
    }

    pub fn get(&self, name: &str) -> Option<&ImageItem> {
        self.items.iter().find(|item| item.display_name == name)
    }

    /// Current index of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.display_name == name)
    }

    pub fn contains_fingerprint(&self, fingerprint: &Fingerprint) -> bool {
        self.seen.contains_key(fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn photo(shade: u8) -> ImageContent {
        ImageContent::from_rgb(RgbImage::from_fn(4, 3, |x, y| {
            Rgb([shade, (x * 30) as u8, (y * 60) as u8])
        }))
    }

    fn names(registry: &ImageRegistry) -> Vec<&str> {
        registry.names().map(DisplayName::as_str).collect()
    }

    #[test]
    fn first_add_is_image_1() {
        let mut registry = ImageRegistry::new();
        let outcome = registry.add(photo(1)).unwrap();
        assert!(outcome.is_accepted());
        assert_eq!(outcome.name().unwrap().as_str(), "Image_1");
        assert_eq!(outcome.name().unwrap().ordinal(), Some(1));
    }

    #[test]
    fn adding_twice_keeps_one() {
        let mut registry = ImageRegistry::new();
        registry.add(photo(7)).unwrap();
        let second = registry.add(photo(7)).unwrap();

        assert!(!second.is_accepted());
        assert_eq!(second.name(), None);
        assert_eq!(
            second,
            AddOutcome::Duplicate {
                existing: DisplayName::for_ordinal(1)
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_detected_across_upload_formats() {
        let mut registry = ImageRegistry::new();
        let original = photo(42);
        let png = original.to_png_bytes().unwrap();
        let bmp = original.encode_as(image::ImageFormat::Bmp).unwrap();

        registry.add(ImageContent::decode(&png).unwrap()).unwrap();
        let again = registry.add(ImageContent::decode(&bmp).unwrap()).unwrap();
        assert!(!again.is_accepted());
    }

    #[test]
    fn ordinals_are_never_reused() {
        let mut registry = ImageRegistry::new();
        registry.add(photo(1)).unwrap();
        registry.add(photo(2)).unwrap();
        registry.delete("Image_1");
        registry.delete("Image_2");

        let third = registry.add(photo(3)).unwrap();
        assert_eq!(third.name().unwrap().as_str(), "Image_3");

        registry.add(photo(4)).unwrap();
        registry.delete("Image_3");
        let fifth = registry.add(photo(5)).unwrap();
        assert_eq!(fifth.name().unwrap().as_str(), "Image_5");
        assert_eq!(names(&registry), vec!["Image_4", "Image_5"]);
    }

    #[test]
    fn duplicates_do_not_consume_ordinals() {
        let mut registry = ImageRegistry::new();
        registry.add(photo(1)).unwrap();
        registry.add(photo(1)).unwrap();
        let next = registry.add(photo(2)).unwrap();
        assert_eq!(next.name().unwrap().as_str(), "Image_2");
    }

    #[test]
    fn deleted_photo_can_be_kept_again() {
        let mut registry = ImageRegistry::new();
        registry.add(photo(9)).unwrap();
        let removed = registry.delete("Image_1").unwrap();
        assert!(!registry.contains_fingerprint(removed.fingerprint()));

        let again = registry.add(photo(9)).unwrap();
        assert_eq!(again.name().unwrap().as_str(), "Image_2");
    }

    #[test]
    fn delete_unknown_is_a_no_op() {
        let mut registry = ImageRegistry::new();
        registry.add(photo(1)).unwrap();
        assert!(registry.delete("Image_99").is_none());
        assert!(registry.delete("Image_1").is_some());
        assert!(registry.delete("Image_1").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn reorder_applies_permutation_and_keeps_content() {
        let mut registry = ImageRegistry::new();
        for shade in [10, 20, 30] {
            registry.add(photo(shade)).unwrap();
        }

        registry.reorder(&["Image_3", "Image_1", "Image_2"]).unwrap();
        assert_eq!(names(&registry), vec!["Image_3", "Image_1", "Image_2"]);

        let order = registry.export_order();
        assert_eq!(order[0], &photo(30));
        assert_eq!(order[1], &photo(10));
        assert_eq!(order[2], &photo(20));
    }

    #[test]
    fn reorder_rejects_repeated_names() {
        let mut registry = ImageRegistry::new();
        registry.add(photo(1)).unwrap();
        registry.add(photo(2)).unwrap();

        let err = registry.reorder(&["Image_2", "Image_2", "Image_1"]).unwrap_err();
        assert!(matches!(err, BildpressError::InvalidOrder(_)));
        assert_eq!(names(&registry), vec!["Image_1", "Image_2"]);
    }

    #[test]
    fn reorder_rejects_unknown_names() {
        let mut registry = ImageRegistry::new();
        registry.add(photo(1)).unwrap();

        let err = registry.reorder(&["Image_7"]).unwrap_err();
        assert!(matches!(err, BildpressError::InvalidOrder(_)));
        assert_eq!(names(&registry), vec!["Image_1"]);
    }

    #[test]
    fn reorder_rejects_missing_names() {
        let mut registry = ImageRegistry::new();
        registry.add(photo(1)).unwrap();
        registry.add(photo(2)).unwrap();

        let err = registry.reorder(&["Image_2"]).unwrap_err();
        match err {
            BildpressError::InvalidOrder(detail) => assert!(detail.contains("Image_1")),
            other => panic!("unexpected error variant: {other}"),
        }
        assert_eq!(names(&registry), vec!["Image_1", "Image_2"]);
    }

    #[test]
    fn reorder_of_empty_registry_accepts_empty_order() {
        let mut registry = ImageRegistry::new();
        let empty: [&str; 0] = [];
        registry.reorder(&empty).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn move_item_shifts_neighbours() {
        let mut registry = ImageRegistry::new();
        for shade in [1, 2, 3, 4] {
            registry.add(photo(shade)).unwrap();
        }

        registry.move_item("Image_4", 0).unwrap();
        assert_eq!(names(&registry), vec!["Image_4", "Image_1", "Image_2", "Image_3"]);

        registry.move_item("Image_4", 99).unwrap();
        assert_eq!(names(&registry), vec!["Image_1", "Image_2", "Image_3", "Image_4"]);

        let err = registry.move_item("Image_9", 0).unwrap_err();
        assert!(matches!(err, BildpressError::NotFound(_)));
    }

    #[test]
    fn delete_after_reorder_removes_the_named_item() {
        let mut registry = ImageRegistry::new();
        registry.add(photo(1)).unwrap();
        registry.add(photo(2)).unwrap();
        registry.reorder(&["Image_2", "Image_1"]).unwrap();

        let removed = registry.delete("Image_1").unwrap();
        assert_eq!(removed.content(), &photo(1));
        assert_eq!(names(&registry), vec!["Image_2"]);
    }

    #[test]
    fn get_and_position_follow_current_order() {
        let mut registry = ImageRegistry::new();
        registry.add(photo(1)).unwrap();
        registry.add(photo(2)).unwrap();
        registry.reorder(&["Image_2", "Image_1"]).unwrap();

        assert_eq!(registry.position("Image_1"), Some(1));
        assert_eq!(registry.get("Image_2").unwrap().content(), &photo(2));
        assert!(registry.get("Image_3").is_none());
        assert_eq!(registry.items()[0].display_name().as_str(), "Image_2");
    }

    #[test]
    fn walkthrough_add_dedup_reorder_delete() {
        let mut registry = ImageRegistry::new();
        let a = photo(100);
        let b = photo(200);

        assert!(registry.add(a.clone()).unwrap().is_accepted());
        assert!(!registry.add(a.clone()).unwrap().is_accepted());
        assert_eq!(names(&registry), vec!["Image_1"]);

        registry.add(b.clone()).unwrap();
        assert_eq!(names(&registry), vec!["Image_1", "Image_2"]);

        registry.reorder(&["Image_2", "Image_1"]).unwrap();
        assert_eq!(registry.export_order(), vec![&b, &a]);

        registry.delete("Image_1");
        assert_eq!(names(&registry), vec!["Image_2"]);
    }
}
