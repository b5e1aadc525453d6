//! The normalized unit of comparison produced by upstream parsing.

use serde::{Deserialize, Serialize};

/// A heading-delimited unit of regulatory document content.
///
/// Sections are immutable inputs to the comparison pipeline: every stage
/// derives new records from them and never writes back. The `identifier`
/// is the label as found in the source document and is *not* assumed
/// stable across revisions — matching is content-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Source label, e.g. "6.1" or a synthetic "H3" for unnumbered headings.
    pub identifier: String,
    /// Normalized heading text.
    pub heading: String,
    /// Full normalized paragraph text.
    pub body: String,
    /// Reduced high-signal excerpt of `body` (obligation/limit sentences).
    /// Always drawn from heading+body text; may equal `body`, may be empty.
    pub meaning: String,
}

impl Section {
    pub fn new(
        identifier: impl Into<String>,
        heading: impl Into<String>,
        body: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            heading: heading.into(),
            body: body.into(),
            meaning: meaning.into(),
        }
    }

    /// The text used for similarity scoring: the meaning excerpt when
    /// present, otherwise the full body.
    pub fn comparison_text(&self) -> &str {
        if self.meaning.trim().is_empty() {
            &self.body
        } else {
            &self.meaning
        }
    }

    /// Sections with no body text are excluded before matching.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}
