//! Roster PDF major lookup
//!
//! Recovers `identifier -> (name, major)` records from the text of a
//! photo-roster PDF. Rows are rendered as `<name tokens> <U-number> <major tokens>`
//! with header and banner lines mixed in, so extraction is a best-effort
//! heuristic:
//! 1. `line_filter` drops blank, header and banner lines
//! 2. `identifier` finds the U-number token in a line
//! 3. `record` splits the tokens around it into name and major
//! 4. `assembler` drives the above over every page and collects records
//!
//! Malformed rows are skipped, never reported. Only a failure of the
//! underlying PDF text extraction fails the whole upload.

pub mod assembler;
pub mod identifier;
pub mod line_filter;
pub mod pdf_extractor;
pub mod record;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub use assembler::assemble;

/// Placeholder major for rows with nothing after the identifier.
/// Records carrying it are never emitted.
pub const UNKNOWN_MAJOR: &str = "Unknown Major";

/// One student's entry in the uploaded roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub name: String,
    pub major: String,
}

/// Identifier -> record, serialized as a flat JSON object
pub type Roster = BTreeMap<String, RosterRecord>;

/// Tunables for the line heuristics.
///
/// The defaults match the USF Photo Roster export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOptions {
    /// Letter every student identifier starts with
    #[serde(default = "default_identifier_prefix")]
    pub identifier_prefix: char,
    /// Lines starting with this text are the document title, not rows
    #[serde(default = "default_title_banner")]
    pub title_banner: String,
    /// Lines mentioning "Major" shorter than this (in chars) are treated as
    /// column headers. Longer ones are assumed to be real rows.
    #[serde(default = "default_major_header_max_len")]
    pub major_header_max_len: usize,
}

fn default_identifier_prefix() -> char {
    'U'
}

fn default_title_banner() -> String {
    "USF Photo Roster".to_string()
}

fn default_major_header_max_len() -> usize {
    50
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            identifier_prefix: default_identifier_prefix(),
            title_banner: default_title_banner(),
            major_header_max_len: default_major_header_max_len(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RosterError {
    /// Upload is not a PDF; nothing was parsed
    #[error("{0}")]
    InvalidInput(String),
    /// The PDF library could not read the document
    #[error("PDF parsing failed: {0}")]
    DocumentParse(String),
}

/// Validate an uploaded file and extract its roster.
///
/// Rejects anything without a `.pdf` extension or `%PDF` header before
/// parsing. Any extraction failure discards the whole document.
pub fn roster_from_upload(
    filename: &str,
    bytes: &[u8],
    opts: &ExtractionOptions,
) -> Result<Roster, RosterError> {
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(RosterError::InvalidInput("File must be a PDF.".to_string()));
    }
    if !bytes.starts_with(b"%PDF") {
        return Err(RosterError::InvalidInput(format!(
            "{} does not look like a PDF document",
            filename
        )));
    }

    let pages = pdf_extractor::extract_pages(bytes)?;
    Ok(assemble(&pages, opts))
}
