//! Line-oriented section parsing.
//!
//! Walks document text line by line, opening a new section at each
//! numbered heading ("12", "12.1", "3.4.2" with an optional trailing
//! "." or ")") or all-caps heading (assigned synthetic "H<n>"
//! identifiers in document order). Noise lines — table-of-contents
//! rows, bare page numbers, repeating publisher headers — are dropped
//! before they reach a section body.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use regdelta_core::Section;

use crate::ParseError;
use crate::meaning::meaning_block;

// Numbered section headers, e.g. 12, 12.1, 3.4.2
static SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<id>\d+(?:\.\d+)*)(?:[.)])?\s+(?P<title>.+)$").unwrap());

// Unnumbered all-caps headers, e.g. INTRODUCTION
static ALL_CAPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9\s,\-:/()&']{4,}$").unwrap());

static TOC_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)*\s+.+\.{3,}\s+\d+\s*$").unwrap());

static PAGE_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^page\s+\d+\s*$").unwrap());

static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// Headings longer than this are more likely wrapped table rows.
const MAX_HEADING_LEN: usize = 220;

/// Parse document text into ordered sections. Sections with empty
/// bodies are excluded — they carry nothing to compare.
pub fn parse_document(text: &str) -> Result<Vec<Section>, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyDocument);
    }

    let mut builder = SectionBuilder::default();
    let mut synthetic_counter = 0u32;

    for raw_line in text.lines() {
        let line = SPACE_RE.replace_all(raw_line.trim(), " ").into_owned();

        if is_noise(&line) {
            continue;
        }

        if let Some(caps) = SECTION_RE.captures(&line) {
            let title = caps["title"].trim();
            if looks_like_heading_title(title) {
                builder.open(caps["id"].to_string(), title.trim_end_matches([' ', '.']));
                continue;
            }
        }

        if ALL_CAPS_RE.is_match(&line) {
            synthetic_counter += 1;
            builder.open(format!("H{synthetic_counter}"), line.trim_end_matches([' ', '.']));
            continue;
        }

        builder.push_body_line(line);
    }

    let sections = builder.finish();
    debug!(sections = sections.len(), "parsed document");
    Ok(sections)
}

fn is_noise(line: &str) -> bool {
    if line.is_empty() {
        return true;
    }

    let low = line.to_lowercase();

    if PAGE_ONLY_RE.is_match(line) || TOC_LINE_RE.is_match(line) {
        return true;
    }
    if low.contains("table of contents") {
        return true;
    }

    // Repeating publisher headers/footers from extracted text.
    if low.starts_with("dgca") && (low.contains("car") || low.contains("issue") || low.contains("dated")) {
        return true;
    }

    false
}

fn looks_like_heading_title(title: &str) -> bool {
    !title.is_empty()
        && title.chars().any(|c| c.is_ascii_alphabetic())
        && title.len() <= MAX_HEADING_LEN
}

/// Accumulates the current section and the completed list.
#[derive(Default)]
struct SectionBuilder {
    current: Option<(String, String)>,
    body_lines: Vec<String>,
    sections: Vec<Section>,
}

impl SectionBuilder {
    fn open(&mut self, identifier: String, heading: &str) {
        self.flush();
        self.current = Some((identifier, heading.to_string()));
    }

    fn push_body_line(&mut self, line: String) {
        if self.current.is_some() {
            self.body_lines.push(line);
        }
    }

    fn flush(&mut self) {
        if let Some((identifier, heading)) = self.current.take() {
            let body = self.body_lines.join(" ").trim().to_string();
            self.body_lines.clear();
            if body.is_empty() {
                return;
            }
            let meaning = meaning_block(&heading, &body);
            self.sections.push(Section {
                identifier,
                heading,
                body,
                meaning,
            });
        }
    }

    fn finish(mut self) -> Vec<Section> {
        self.flush();
        self.sections
    }
}
