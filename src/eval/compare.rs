//! The scoring engine: aligned comparison of gold and predicted bracketings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::corpus::ChunkedSentence;
use crate::eval::counts::{length_bucket, Category, EvalResults, PosTallies};
use crate::{Error, Result};

/// Separator joining the POS tags covered by a span into a tally key.
pub const POS_JOIN: &str = "-";

/// Whether `outer` fully contains `inner` (half-open spans).
fn span_contains(outer: (usize, usize), inner: (usize, usize)) -> bool {
    outer.0 <= inner.0 && inner.1 <= outer.1
}

/// Whether two half-open spans overlap without containment either way.
fn spans_cross(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0.max(b.0) < a.1.min(b.1) && !span_contains(a, b) && !span_contains(b, a)
}

/// Split half-open spans into their adjacent unit pairs.
///
/// A span of width `w` yields the `w` pairs `(k, k+1)` for `k` in
/// `[open, close)` — the internal boundaries it identifies, scored for
/// partial credit even when the full span is wrong.
#[must_use]
pub fn decompose_spans(spans: &HashSet<(usize, usize)>) -> HashSet<(usize, usize)> {
    spans
        .iter()
        .flat_map(|&(open, close)| (open..close).map(|k| (k, k + 1)))
        .collect()
}

/// Four-way relation of an error span to the opposite error set.
///
/// A false positive classifies against the sentence's false negatives and
/// vice versa. Probes run in priority order over the whole opposite set:
/// containment by any opposite span beats crossing, which beats containing
/// one. The enum is exhaustive, so every error span resolves to a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Fully contained by some opposite-set span.
    Sub,
    /// Partially overlaps an opposite-set span without containment.
    Crossing,
    /// Fully contains some opposite-set span.
    Super,
    /// Shares no tokens with any opposite-set span.
    NoOverlap,
}

impl ErrorClass {
    /// The class name used in report output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Sub => "Sub",
            ErrorClass::Crossing => "Crossing",
            ErrorClass::Super => "Super",
            ErrorClass::NoOverlap => "NoOverlap",
        }
    }
}

/// Classify an error span against the opposite error set.
#[must_use]
pub fn classify_error(span: (usize, usize), opposite: &HashSet<(usize, usize)>) -> ErrorClass {
    if opposite.iter().any(|&o| span_contains(o, span)) {
        ErrorClass::Sub
    } else if opposite.iter().any(|&o| spans_cross(o, span)) {
        ErrorClass::Crossing
    } else if opposite.iter().any(|&o| span_contains(span, o)) {
        ErrorClass::Super
    } else {
        ErrorClass::NoOverlap
    }
}

fn check_corpus_shape(
    gold: &[ChunkedSentence],
    pred: &[ChunkedSentence],
    pos: Option<&[Vec<String>]>,
) -> Result<()> {
    if gold.len() != pred.len() {
        return Err(Error::evaluation(format!(
            "corpus length mismatch: {} gold vs {} predicted sentences",
            gold.len(),
            pred.len()
        )));
    }
    if let Some(pos) = pos {
        if pos.len() < gold.len() {
            return Err(Error::evaluation(format!(
                "POS corpus has {} sentences, need {}",
                pos.len(),
                gold.len()
            )));
        }
    }
    Ok(())
}

/// Case-insensitive token alignment gate; `index` is 1-based for messages.
fn check_alignment(index: usize, gold: &ChunkedSentence, pred: &ChunkedSentence) -> Result<()> {
    let matches = gold.tokens.len() == pred.tokens.len()
        && gold
            .tokens
            .iter()
            .zip(&pred.tokens)
            .all(|(g, p)| g.to_lowercase() == p.to_lowercase());
    if matches {
        Ok(())
    } else {
        Err(Error::SentenceMismatch {
            index,
            gold: gold.tokens.join(" "),
            pred: pred.tokens.join(" "),
        })
    }
}

fn check_pos_alignment(index: usize, tags: &[String], sentence: &ChunkedSentence) -> Result<()> {
    if tags.len() != sentence.tokens.len() {
        return Err(Error::evaluation(format!(
            "sentence {}: {} POS tags for {} tokens",
            index,
            tags.len(),
            sentence.tokens.len()
        )));
    }
    Ok(())
}

/// The span set of a sentence, extracted through its [`BracketSet`] and
/// mapped back to half-open pairs.
///
/// [`BracketSet`]: crate::BracketSet
fn span_pairs(sentence: &ChunkedSentence) -> Result<HashSet<(usize, usize)>> {
    let set = sentence.bracket_set()?;
    Ok(set
        .index_pairs(false)
        .into_iter()
        .map(|(start, end)| (start, end + 1))
        .collect())
}

/// Compare aligned gold and predicted corpora, optionally with a POS corpus.
///
/// Sentences are scored strictly in corresponding order. Alignment failures
/// (differing token sequences, mismatched corpus shapes) abort the run with
/// no partial results.
pub fn compare_corpora(
    gold: &[ChunkedSentence],
    pred: &[ChunkedSentence],
    pos: Option<&[Vec<String>]>,
) -> Result<EvalResults> {
    check_corpus_shape(gold, pred, pos)?;

    let mut results = EvalResults::default();
    if pos.is_some() {
        results.by_pos = Some(PosTallies::default());
    }

    for (i, (gold_sentence, pred_sentence)) in gold.iter().zip(pred).enumerate() {
        check_alignment(i + 1, gold_sentence, pred_sentence)?;
        let tags = pos.map(|p| p[i].as_slice());
        if let Some(tags) = tags {
            check_pos_alignment(i + 1, tags, gold_sentence)?;
        }
        compare_sentence(i + 1, gold_sentence, pred_sentence, tags, &mut results)?;
        results.sentences += 1;
    }
    Ok(results)
}

fn compare_sentence(
    index: usize,
    gold: &ChunkedSentence,
    pred: &ChunkedSentence,
    tags: Option<&[String]>,
    results: &mut EvalResults,
) -> Result<()> {
    let gold_spans = span_pairs(gold)?;
    let pred_spans = span_pairs(pred)?;

    let true_pos: HashSet<(usize, usize)> =
        gold_spans.intersection(&pred_spans).copied().collect();
    let false_pos: HashSet<(usize, usize)> =
        pred_spans.difference(&gold_spans).copied().collect();
    let false_neg: HashSet<(usize, usize)> =
        gold_spans.difference(&pred_spans).copied().collect();

    results.spans.true_pos += true_pos.len();
    results.spans.false_pos += false_pos.len();
    results.spans.false_neg += false_neg.len();
    results.spans.gold += gold_spans.len();
    results.spans.pred += pred_spans.len();

    let gold_pairs = decompose_spans(&gold_spans);
    let pred_pairs = decompose_spans(&pred_spans);
    results.pairs.true_pos += gold_pairs.intersection(&pred_pairs).count();
    results.pairs.false_pos += pred_pairs.difference(&gold_pairs).count();
    results.pairs.false_neg += gold_pairs.difference(&pred_pairs).count();
    results.pairs.gold += gold_pairs.len();
    results.pairs.pred += pred_pairs.len();

    for &fp in &false_pos {
        if false_neg.iter().any(|&fneg| span_contains(fneg, fp)) {
            results.substring += 1;
        }
    }
    for &fneg in &false_neg {
        if false_pos.iter().any(|&fp| span_contains(fp, fneg)) {
            results.superstring += 1;
        }
    }

    let tallied: [(Category, &HashSet<(usize, usize)>); 5] = [
        (Category::TruePos, &true_pos),
        (Category::FalsePos, &false_pos),
        (Category::FalseNeg, &false_neg),
        (Category::Gold, &gold_spans),
        (Category::Pred, &pred_spans),
    ];
    for (category, spans) in tallied {
        for &(open, close) in spans {
            let width = close - open;
            let Some(bucket) = length_bucket(width) else {
                log::debug!(
                    "sentence {index}: length {width} clump ({open}, {close}) \
                     left out of length statistics"
                );
                results.skipped_clumps += 1;
                continue;
            };
            results.length_sums.add(category, width);
            results.length_counts.add(category, 1);
            results.by_length[bucket].add(category, 1);
            if let (Some(tags), Some(tallies)) = (tags, results.by_pos.as_mut()) {
                if let Some(map) = tallies.map_mut(category) {
                    let key = tags[open..close].join(POS_JOIN);
                    *map.entry(key).or_insert(0) += 1;
                }
            }
        }
    }
    Ok(())
}

/// Whether a span belongs to gold, the prediction, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanResult {
    /// In both sets.
    TruePos,
    /// Predicted only.
    FalsePos,
    /// Gold only.
    FalseNeg,
}

impl SpanResult {
    /// The short name used in report output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanResult::TruePos => "TP",
            SpanResult::FalsePos => "FP",
            SpanResult::FalseNeg => "FN",
        }
    }
}

/// One row of the per-span detail export.
#[derive(Debug, Clone, Serialize)]
pub struct DetailRow {
    /// 0-based sentence index.
    pub sentence: usize,
    /// Span open position.
    pub start: usize,
    /// Span close position (exclusive).
    pub end: usize,
    /// The covered tokens, space-joined.
    pub terms: String,
    /// The covered POS tags joined with [`POS_JOIN`], empty without a POS
    /// corpus.
    pub pos_seq: String,
    /// Whether the span is a TP, FP or FN.
    pub result: SpanResult,
    /// Error class for FP/FN spans, `None` for true positives.
    pub error: Option<ErrorClass>,
}

/// Produce the per-span detail rows for aligned corpora.
///
/// Rows come out sentence by sentence, true positives first, then false
/// positives, then false negatives, each group in span order. The same
/// alignment gates as [`compare_corpora`] apply.
pub fn detail_rows(
    gold: &[ChunkedSentence],
    pred: &[ChunkedSentence],
    pos: Option<&[Vec<String>]>,
) -> Result<Vec<DetailRow>> {
    check_corpus_shape(gold, pred, pos)?;

    let mut rows = Vec::new();
    for (i, (gold_sentence, pred_sentence)) in gold.iter().zip(pred).enumerate() {
        check_alignment(i + 1, gold_sentence, pred_sentence)?;
        let tags = pos.map(|p| p[i].as_slice());
        if let Some(tags) = tags {
            check_pos_alignment(i + 1, tags, gold_sentence)?;
        }

        let gold_spans = span_pairs(gold_sentence)?;
        let pred_spans = span_pairs(pred_sentence)?;
        let false_pos: HashSet<(usize, usize)> =
            pred_spans.difference(&gold_spans).copied().collect();
        let false_neg: HashSet<(usize, usize)> =
            gold_spans.difference(&pred_spans).copied().collect();

        let mut emit = |span: (usize, usize), result: SpanResult, error: Option<ErrorClass>| {
            let (open, close) = span;
            rows.push(DetailRow {
                sentence: i,
                start: open,
                end: close,
                terms: gold_sentence.tokens[open..close].join(" "),
                pos_seq: tags.map(|t| t[open..close].join(POS_JOIN)).unwrap_or_default(),
                result,
                error,
            });
        };

        for span in sorted(gold_spans.intersection(&pred_spans).copied()) {
            emit(span, SpanResult::TruePos, None);
        }
        for span in sorted(false_pos.iter().copied()) {
            emit(span, SpanResult::FalsePos, Some(classify_error(span, &false_neg)));
        }
        for span in sorted(false_neg.iter().copied()) {
            emit(span, SpanResult::FalseNeg, Some(classify_error(span, &false_pos)));
        }
    }
    Ok(rows)
}

fn sorted(spans: impl Iterator<Item = (usize, usize)>) -> Vec<(usize, usize)> {
    let mut spans: Vec<_> = spans.collect();
    spans.sort_unstable();
    spans
}
