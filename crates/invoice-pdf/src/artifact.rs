//! Checks on rendered bytes
//!
//! Hosts that use the empty-on-failure API need a way to tell a real invoice
//! from a failed render; these helpers also read text back out for previews
//! and tests.

use lopdf::content::Content;
use lopdf::{Document, Object};
use serde::Serialize;

use crate::error::ArtifactError;
use crate::metrics::decode_win_ansi;

/// Smallest byte count a single-page PDF can plausibly have
pub const MIN_ARTIFACT_BYTES: usize = 64;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactInfo {
    pub page_count: u32,
    /// e.g. "1.7"
    pub version: String,
    pub size_bytes: usize,
    pub title: Option<String>,
}

impl ArtifactInfo {
    pub fn inspect(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let document = load(bytes)?;
        let page_count = document.get_pages().len() as u32;
        if page_count == 0 {
            return Err(ArtifactError::NoPages);
        }

        Ok(Self {
            page_count,
            version: document.version.clone(),
            size_bytes: bytes.len(),
            title: document_title(&document),
        })
    }
}

/// True when `bytes` is a parseable PDF with at least one page
pub fn is_usable(bytes: &[u8]) -> bool {
    ArtifactInfo::inspect(bytes).is_ok()
}

fn load(bytes: &[u8]) -> Result<Document, ArtifactError> {
    if bytes.is_empty() {
        return Err(ArtifactError::Empty);
    }
    if bytes.len() < MIN_ARTIFACT_BYTES {
        return Err(ArtifactError::TooSmall(bytes.len()));
    }
    if !bytes.starts_with(b"%PDF-") {
        return Err(ArtifactError::MissingHeader);
    }
    Document::load_mem(bytes).map_err(|e| ArtifactError::Parse(e.to_string()))
}

fn document_title(document: &Document) -> Option<String> {
    let info_id = document.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = document.get_dictionary(info_id).ok()?;
    let title = info.get(b"Title").ok()?.as_str().ok()?;
    Some(decode_win_ansi(title))
}

/// Text shown by each page, one string per text-showing operation
pub fn extract_text_runs(bytes: &[u8]) -> Result<Vec<Vec<String>>, ArtifactError> {
    let document = load(bytes)?;
    let mut pages = Vec::new();

    for (_, page_id) in document.get_pages() {
        let raw = document
            .get_page_content(page_id)
            .map_err(|e| ArtifactError::Parse(e.to_string()))?;
        let content = Content::decode(&raw).map_err(|e| ArtifactError::Parse(e.to_string()))?;

        let runs = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(text, _)) => Some(decode_win_ansi(text)),
                _ => None,
            })
            .collect();
        pages.push(runs);
    }

    Ok(pages)
}

/// URIs of every link annotation, in page order
pub fn link_targets(bytes: &[u8]) -> Result<Vec<String>, ArtifactError> {
    let document = load(bytes)?;
    let mut targets = Vec::new();

    for (_, page_id) in document.get_pages() {
        let Ok(page) = document.get_dictionary(page_id) else {
            continue;
        };
        let Ok(annots) = page.get(b"Annots").and_then(Object::as_array) else {
            continue;
        };
        for annot in annots {
            let Ok(annot_id) = annot.as_reference() else {
                continue;
            };
            let uri = document
                .get_dictionary(annot_id)
                .and_then(|a| a.get(b"A"))
                .and_then(Object::as_dict)
                .and_then(|action| action.get(b"URI"))
                .and_then(Object::as_str);
            if let Ok(uri) = uri {
                targets.push(String::from_utf8_lossy(uri).into_owned());
            }
        }
    }

    Ok(targets)
}
