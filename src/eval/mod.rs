//! Scoring of predicted bracketings against gold standards.
//!
//! # Overview
//!
//! The engine walks aligned gold/predicted corpora sentence by sentence and
//! folds every sentence into one [`EvalResults`] accumulator:
//!
//! - **Full-span** TP/FP/FN and gold/predicted totals, by plain set
//!   operations on span index pairs.
//! - **Decomposed-pair** totals: each span split into its adjacent unit
//!   pairs, crediting correctly found internal boundaries even when the
//!   full span is wrong.
//! - **Length buckets** (widths 2-5, >5) and **POS-sequence tallies** for
//!   the width >= 2 spans.
//! - **Substring/superstring** tallies and the four-way
//!   [`ErrorClass`] taxonomy (Sub / Crossing / Super / NoOverlap) for the
//!   detail export.
//!
//! Alignment failures between the inputs abort the run; no partial results
//! escape.
//!
//! # Example
//!
//! ```
//! use chunkeval::corpus::ChunkedSentence;
//! use chunkeval::eval::{compare_corpora, render_summary, ReportOptions};
//!
//! let gold = vec![ChunkedSentence::parse("( the cat ) sat")?];
//! let pred = vec![ChunkedSentence::parse("( the cat ) sat")?];
//! let results = compare_corpora(&gold, &pred, None)?;
//! let summary = render_summary(&results, &ReportOptions::default());
//! assert!(summary.starts_with("Summary 100.00 / 100.00 / 100.00"));
//! # Ok::<(), chunkeval::Error>(())
//! ```

pub mod compare;
pub mod counts;
pub mod report;

pub use compare::{
    classify_error, compare_corpora, decompose_spans, detail_rows, DetailRow, ErrorClass,
    SpanResult, POS_JOIN,
};
pub use counts::{
    length_bucket, prf, Category, CategoryCounts, EvalResults, PosTallies, LENGTH_BUCKET_NAMES,
};
pub use report::{render_csv, render_detail_csv, render_summary, CategoryLookup, ReportOptions};
