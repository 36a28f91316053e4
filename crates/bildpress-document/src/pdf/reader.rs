// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open exported documents and inspect their pages using the
// `lopdf` crate.

use std::path::Path;

use bildpress_core::error::{BildpressError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, instrument};

/// Reads back a PDF to check what was exported.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            BildpressError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            BildpressError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Pixel dimensions of the raster drawn on each page, in page order.
    ///
    /// Looks up the image XObject named by the first `Do` operator in each
    /// page's content stream.
    pub fn page_image_sizes(&self) -> Result<Vec<(u32, u32)>> {
        // lopdf pages are keyed by 1-indexed page number, in a BTreeMap.
        self.document
            .get_pages()
            .into_iter()
            .map(|(page_number, page_id)| {
                let image = self.page_image(page_number, page_id)?;
                let dimension = |key: &[u8]| -> Result<u32> {
                    image
                        .dict
                        .get(key)
                        .and_then(Object::as_i64)
                        .ok()
                        .and_then(|v| u32::try_from(v).ok())
                        .ok_or_else(|| pdf_err(page_number, "image without dimensions"))
                };
                Ok((dimension(b"Width")?, dimension(b"Height")?))
            })
            .collect()
    }

    /// Decoded sample bytes of the raster drawn on each page, in page order.
    ///
    /// Flate-compressed streams are inflated; unfiltered streams are returned
    /// as stored. Lossy filters such as `DCTDecode` are an error.
    pub fn page_image_data(&self) -> Result<Vec<Vec<u8>>> {
        self.document
            .get_pages()
            .into_iter()
            .map(|(page_number, page_id)| {
                let image = self.page_image(page_number, page_id)?;
                if image.dict.get(b"Filter").is_err() {
                    return Ok(image.content.clone());
                }
                image
                    .decompressed_content()
                    .map_err(|err| pdf_err(page_number, format!("undecodable image: {}", err)))
            })
            .collect()
    }

    // -- Helpers --------------------------------------------------------------

    /// The image XObject drawn by the page's first `Do` operator.
    fn page_image(&self, page_number: u32, page_id: ObjectId) -> Result<&Stream> {
        let content = self
            .document
            .get_and_decode_page_content(page_id)
            .map_err(|err| pdf_err(page_number, format!("unreadable content: {}", err)))?;

        let name = content
            .operations
            .iter()
            .find(|op| op.operator == "Do")
            .and_then(|op| op.operands.first())
            .and_then(|operand| operand.as_name().ok())
            .ok_or_else(|| pdf_err(page_number, "no image drawn"))?;

        let resources = self.inherited_dictionary(page_id, b"Resources", page_number)?;
        let xobjects = self
            .resolve(resources.get(b"XObject").map_err(|_| pdf_err(page_number, "no /XObject"))?)
            .and_then(|obj| obj.as_dict().map_err(|_| pdf_err(page_number, "bad /XObject")))?;
        self.resolve(
            xobjects
                .get(name)
                .map_err(|_| pdf_err(page_number, "drawn image missing from resources"))?,
        )?
        .as_stream()
        .map_err(|_| pdf_err(page_number, "image is not a stream"))
    }

    /// Look `key` up on the page, then on its ancestors (/Resources is inheritable).
    fn inherited_dictionary(
        &self,
        page_id: ObjectId,
        key: &[u8],
        page_number: u32,
    ) -> Result<&Dictionary> {
        let mut node_id = page_id;
        loop {
            let node = self
                .document
                .get_dictionary(node_id)
                .map_err(|err| pdf_err(page_number, format!("bad page tree: {}", err)))?;
            if let Ok(value) = node.get(key) {
                return self
                    .resolve(value)?
                    .as_dict()
                    .map_err(|_| pdf_err(page_number, "resources are not a dictionary"));
            }
            node_id = node
                .get(b"Parent")
                .and_then(Object::as_reference)
                .map_err(|_| pdf_err(page_number, "no /Resources"))?;
        }
    }

    /// Follow an indirect reference, if `object` is one.
    fn resolve<'a>(&'a self, object: &'a Object) -> Result<&'a Object> {
        match object {
            Object::Reference(id) => self.document.get_object(*id).map_err(|err| {
                BildpressError::PdfError(format!("dangling reference {:?}: {}", id, err))
            }),
            other => Ok(other),
        }
    }
}

fn pdf_err(page_number: u32, detail: impl std::fmt::Display) -> BildpressError {
    BildpressError::PdfError(format!("page {}: {}", page_number, detail))
}
