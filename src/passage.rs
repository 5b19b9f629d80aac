//! Passage splitting for twee files
//!
//! A twee file is a sequence of passages. Each passage starts with a header line
//! (`:: Title [tags] [config]`, see [header]) and owns every following line up to the
//! next header or the end of the file.
//!
//! Lines before the first header, and lines under a header with an empty title, do not
//! belong to any passage and are dropped. A file without headers yields no passages.

pub mod header;

pub use header::{parse_header, Header, HEADER_MARKER};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Lazy-compiled line break matcher (bare and carriage-return-prefixed newlines)
static LINE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n").unwrap());

/// One authoring unit of a twee file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub title: String,
    pub tags: Vec<String>,
    pub config: Vec<String>,
    /// Body text with surrounding blank lines and whitespace trimmed
    pub content: String,
    /// Body lines joined with `\n`, untrimmed
    pub raw: String,
}

impl Passage {
    fn from_parts(header: Header, body: &[&str]) -> Self {
        let raw = body.join("\n");
        Self {
            title: header.title,
            tags: header.tags,
            config: header.config,
            content: raw.trim().to_string(),
            raw,
        }
    }
}

/// Split the full text of a twee file into its passages, in file order.
pub fn split_passages(source: &str) -> Vec<Passage> {
    let mut passages = Vec::new();
    let mut current: Option<Header> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in LINE_BREAK_REGEX.split(source) {
        match line.strip_prefix(HEADER_MARKER) {
            Some(remainder) => {
                if let Some(header) = current.take() {
                    passages.push(Passage::from_parts(header, &buffer));
                }
                buffer.clear();
                current = Some(parse_header(remainder)).filter(|h| !h.title.is_empty());
            }
            None => buffer.push(line),
        }
    }

    // A header on the very last line has no body lines and is not emitted
    if let Some(header) = current {
        if !buffer.is_empty() {
            passages.push(Passage::from_parts(header, &buffer));
        }
    }

    passages
}

/// Read a twee file from disk and split it into passages.
pub fn parse_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<Passage>> {
    let source = fs::read_to_string(path)?;
    Ok(split_passages(&source))
}
