//! # chunkeval
//!
//! Evaluation of automatically produced chunkings and bracketings against
//! gold standards, for corpus linguistics experiments.
//!
//! - **Bracket structure**: per-sentence [`BracketSet`] collections with
//!   positional indices, crossing-aware nesting order, and in-place bracket
//!   extension.
//! - **Scoring**: precision/recall/F1 at the full-span and decomposed
//!   adjacent-pair levels, broken down by span length and POS sequence,
//!   with a Sub/Super/Crossing/NoOverlap error taxonomy.
//! - **Reports**: a fixed-format text summary, a CSV summary, and a
//!   per-span detail CSV.
//!
//! ## Quick Start
//!
//! ```
//! use chunkeval::corpus::ChunkedSentence;
//! use chunkeval::eval::compare_corpora;
//!
//! let gold = vec![ChunkedSentence::parse("( the cat ) sat")?];
//! let pred = vec![ChunkedSentence::parse("( the cat ) sat")?];
//! let results = compare_corpora(&gold, &pred, None)?;
//! assert_eq!(results.spans.true_pos, 1);
//! assert_eq!(results.pairs.true_pos, 2);
//! # Ok::<(), chunkeval::Error>(())
//! ```
//!
//! ## Input formats
//!
//! Chunked text is whitespace-tokenized, one sentence per line, with `(`
//! and `)` marker tokens delimiting spans; spans may nest but must not
//! cross. POS files carry one tag sequence per line, aligned with the
//! chunked text after stripping the stop symbol (`__stop__` by default).
//!
//! ## Design
//!
//! - Crossing brackets and gold/predicted sentence misalignment are fatal:
//!   the run aborts rather than emit statistics computed from malformed
//!   input.
//! - Zero denominators in any metric report 0, never an error.
//! - All accumulation happens in explicit [`eval::EvalResults`] values with
//!   a `merge` operation; there is no ambient global state.

#![warn(missing_docs)]

mod bracket;
mod bracket_set;
pub mod corpus;
mod error;
pub mod eval;

pub use bracket::Bracket;
pub use bracket_set::{BracketHandle, BracketSet};
pub use error::{Error, Result};
