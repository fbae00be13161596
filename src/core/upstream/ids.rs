//! Translate user-supplied web URLs into the bare identifiers REST APIs expect.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::error::{Error, Result};

/// Ordered URL patterns (first capture group is the identifier) plus the
/// shape a bare identifier must have.
pub struct IdExtractor {
    what: &'static str,
    patterns: Vec<Regex>,
    bare_id: Regex,
}

impl IdExtractor {
    fn new(what: &'static str, patterns: &[&str], bare_id: &str) -> Self {
        Self {
            what,
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("static identifier pattern"))
                .collect(),
            bare_id: Regex::new(bare_id).expect("static identifier pattern"),
        }
    }

    /// Try each URL pattern in order, then accept the input as a bare ID.
    pub fn extract(&self, input: &str) -> Result<String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::validation(format!("{} is required", self.what)));
        }

        for pattern in &self.patterns {
            if let Some(id) = pattern.captures(input).and_then(|c| c.get(1)) {
                return Ok(id.as_str().to_string());
            }
        }

        if self.bare_id.is_match(input) {
            return Ok(input.to_string());
        }

        Err(Error::not_found(format!(
            "Could not extract {} from: {}",
            self.what, input
        )))
    }
}

static FIGMA_FILE_KEY: LazyLock<IdExtractor> = LazyLock::new(|| {
    IdExtractor::new(
        "Figma file key",
        &[
            r"figma\.com/file/([a-zA-Z0-9]+)",
            r"figma\.com/design/([a-zA-Z0-9]+)",
            r"figma\.com/proto/([a-zA-Z0-9]+)",
        ],
        r"^[a-zA-Z0-9]+$",
    )
});

static GOOGLE_DOCUMENT_ID: LazyLock<IdExtractor> = LazyLock::new(|| {
    IdExtractor::new(
        "document ID",
        &[
            r"/document/d/([a-zA-Z0-9_-]+)",
            r"/spreadsheets/d/([a-zA-Z0-9_-]+)",
            r"/presentation/d/([a-zA-Z0-9_-]+)",
            r"id=([a-zA-Z0-9_-]+)",
        ],
        r"^[a-zA-Z0-9_-]{25,}$",
    )
});

/// Figma file key from a file/design/prototype URL or a bare key.
pub fn extract_file_key(input: &str) -> Result<String> {
    FIGMA_FILE_KEY.extract(input)
}

/// Google document ID from a Docs/Sheets/Slides URL or a bare ID.
pub fn extract_document_id(input: &str) -> Result<String> {
    GOOGLE_DOCUMENT_ID.extract(input)
}
