//! Chunked-text and POS line formats.
//!
//! The chunked format is whitespace-tokenized text with `(` and `)` marker
//! tokens delimiting spans, one sentence per line; lines starting with `##`
//! are comments. Spans may nest but must not cross. POS files carry one
//! tag sequence per line, positionally aligned with the chunked text after
//! stripping the stop symbol.

use std::fs;
use std::path::Path;

use crate::bracket::Bracket;
use crate::bracket_set::BracketSet;
use crate::{Error, Result};

/// Default boundary token stripped from POS lines.
pub const DEFAULT_STOP_SYMBOL: &str = "__stop__";

/// One sentence of chunked text: its tokens and the half-open
/// `(open, close)` spans marked on it, each covering token positions
/// `[open, close)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedSentence {
    /// The tokens, bracket markers removed.
    pub tokens: Vec<String>,
    /// Marked spans as half-open `(open, close)` pairs, in close order.
    pub spans: Vec<(usize, usize)>,
}

impl ChunkedSentence {
    /// Parse one line of chunked text.
    ///
    /// Markers need not be space-separated; `(the cat) sat` and
    /// `( the cat ) sat` parse alike. Each `)` closes the most recently
    /// opened span. Unbalanced markers are a parse error.
    pub fn parse(line: &str) -> Result<Self> {
        let spaced = line.replace('(', " ( ").replace(')', " ) ");
        let mut tokens = Vec::new();
        let mut open_stack = Vec::new();
        let mut spans = Vec::new();
        for item in spaced.split_whitespace() {
            match item {
                "(" => open_stack.push(tokens.len()),
                ")" => {
                    let open = open_stack.pop().ok_or_else(|| {
                        Error::parse(format!("unbalanced ')' in line: {}", line.trim()))
                    })?;
                    spans.push((open, tokens.len()));
                }
                token => tokens.push(token.to_string()),
            }
        }
        if !open_stack.is_empty() {
            return Err(Error::parse(format!(
                "unbalanced '(' in line: {}",
                line.trim()
            )));
        }
        Ok(Self { tokens, spans })
    }

    /// Build the positional [`BracketSet`] for this sentence.
    ///
    /// Spans become inclusive-endpoint brackets `(open, close - 1)`; empty
    /// marker pairs are dropped.
    pub fn bracket_set(&self) -> Result<BracketSet> {
        let brackets = self
            .spans
            .iter()
            .filter(|(open, close)| close > open)
            .map(|&(open, close)| Bracket::new(open, close - 1));
        BracketSet::from_brackets(self.tokens.clone(), brackets.collect::<Vec<_>>())
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with("##")
}

/// Read a chunked file, one sentence per line, skipping `##` comments.
pub fn read_chunked_file(path: impl AsRef<Path>) -> Result<Vec<ChunkedSentence>> {
    let text = fs::read_to_string(path)?;
    text.lines()
        .filter(|line| !is_comment(line))
        .map(ChunkedSentence::parse)
        .collect()
}

/// The `##` comment lines of a chunked file, in order.
pub fn file_comments(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .filter(|line| is_comment(line))
        .map(|line| line.trim_end().to_string())
        .collect())
}

/// Split a POS line into tags, dropping the stop symbol.
pub fn parse_pos_line(line: &str, stop_symbol: &str) -> Vec<String> {
    line.split_whitespace()
        .filter(|tag| *tag != stop_symbol)
        .map(|tag| tag.to_string())
        .collect()
}

/// Read a POS file, one tag sequence per line, stop symbol removed.
pub fn read_pos_file(path: impl AsRef<Path>, stop_symbol: &str) -> Result<Vec<Vec<String>>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(|line| parse_pos_line(line, stop_symbol))
        .collect())
}
