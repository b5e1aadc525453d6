//! Parsing layer: raw extracted document text → ordered `Section` list.
//!
//! Consumes the output of upstream text extraction (one string of
//! page-joined text) and produces the normalized sections the
//! comparison engine works on. Table-of-contents lines, bare page
//! numbers, and repeating publisher headers are dropped here so the
//! engine can trust `body` to be denoised.

mod meaning;
mod sections;

pub use meaning::meaning_block;
pub use sections::parse_document;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document contains no text")]
    EmptyDocument,
}
