//! End-to-end comparison scenarios over small corpora.

use chunkeval::corpus::ChunkedSentence;
use chunkeval::eval::{
    compare_corpora, detail_rows, render_summary, ErrorClass, ReportOptions, SpanResult,
};
use chunkeval::Error;

fn sentence(line: &str) -> ChunkedSentence {
    ChunkedSentence::parse(line).unwrap()
}

#[test]
fn full_span_and_pair_counts_on_partial_match() {
    // gold {(0,2), (3,5)}, predicted {(0,2), (3,4)} over six tokens
    let gold = vec![sentence("( a b ) c ( d e ) f")];
    let pred = vec![sentence("( a b ) c ( d ) e f")];

    let results = compare_corpora(&gold, &pred, None).unwrap();

    assert_eq!(results.spans.true_pos, 1);
    assert_eq!(results.spans.false_pos, 1);
    assert_eq!(results.spans.false_neg, 1);
    assert_eq!(results.spans.gold, 2);
    assert_eq!(results.spans.pred, 2);

    // gold pairs {(0,1),(1,2),(3,4),(4,5)}, predicted pairs {(0,1),(1,2),(3,4)}
    assert_eq!(results.pairs.true_pos, 3);
    assert_eq!(results.pairs.false_pos, 0);
    assert_eq!(results.pairs.false_neg, 1);
}

#[test]
fn identical_corpora_score_perfectly() {
    let gold = vec![
        sentence("( a b ) ( c d e ) f"),
        sentence("g ( h i j k l m ) n"),
    ];
    let results = compare_corpora(&gold, &gold, None).unwrap();

    assert_eq!(results.sentences, 2);
    assert_eq!(results.pairs.true_pos, results.pairs.gold);
    assert_eq!(results.pairs.false_pos, 0);
    assert_eq!(results.pairs.false_neg, 0);
    assert!((results.spans.precision() - 100.0).abs() < 1e-9);
    assert!((results.spans.recall() - 100.0).abs() < 1e-9);
    assert!((results.spans.f1() - 100.0).abs() < 1e-9);
    // widths 2, 3 and 6 land in buckets "2", "3" and ">5"
    assert_eq!(results.by_length[0].true_pos, 1);
    assert_eq!(results.by_length[1].true_pos, 1);
    assert_eq!(results.by_length[4].true_pos, 1);
}

#[test]
fn empty_prediction_yields_zero_metrics() {
    let gold = vec![sentence("( a b ) c")];
    let pred = vec![sentence("a b c")];
    let results = compare_corpora(&gold, &pred, None).unwrap();

    assert_eq!(results.spans.true_pos, 0);
    assert_eq!(results.spans.false_neg, 1);
    assert_eq!(results.spans.precision(), 0.0);
    assert_eq!(results.spans.recall(), 0.0);
    assert_eq!(results.spans.f1(), 0.0);

    let summary = render_summary(&results, &ReportOptions::default());
    assert!(summary.starts_with("Summary 0.00 / 0.00 / 0.00 ( 0 / 0 / 1 )"));
}

#[test]
fn mismatched_tokens_abort_the_run() {
    let gold = vec![sentence("the cat sat")];
    let pred = vec![sentence("the dog sat")];
    let err = compare_corpora(&gold, &pred, None).unwrap_err();
    assert!(matches!(err, Error::SentenceMismatch { index: 1, .. }));
}

#[test]
fn mismatch_in_later_sentence_still_aborts() {
    let gold = vec![sentence("( a b ) c"), sentence("the cat sat")];
    let pred = vec![sentence("( a b ) c"), sentence("the dog sat")];
    let err = compare_corpora(&gold, &pred, None).unwrap_err();
    assert!(matches!(err, Error::SentenceMismatch { index: 2, .. }));
}

#[test]
fn corpus_length_mismatch_aborts_the_run() {
    let gold = vec![sentence("a b"), sentence("c d")];
    let pred = vec![sentence("a b")];
    assert!(matches!(
        compare_corpora(&gold, &pred, None),
        Err(Error::Evaluation(_))
    ));
}

#[test]
fn contained_false_positive_classifies_sub_and_super() {
    // false positive (2,6) against false negative (3,5)
    let gold = vec![sentence("a b c ( d e ) f g")];
    let pred = vec![sentence("a b ( c d e f ) g")];

    let rows = detail_rows(&gold, &pred, None).unwrap();
    let fp = rows.iter().find(|r| r.result == SpanResult::FalsePos).unwrap();
    let fneg = rows.iter().find(|r| r.result == SpanResult::FalseNeg).unwrap();
    assert_eq!((fp.start, fp.end), (2, 6));
    assert_eq!(fp.error, Some(ErrorClass::Super));
    assert_eq!((fneg.start, fneg.end), (3, 5));
    assert_eq!(fneg.error, Some(ErrorClass::Sub));

    let results = compare_corpora(&gold, &pred, None).unwrap();
    assert_eq!(results.superstring, 1);
    assert_eq!(results.substring, 0);
}

#[test]
fn pos_breakdown_ranks_sequences() {
    let gold = vec![
        sentence("( a b ) ( c d ) e"),
        sentence("( f g ) h i j"),
    ];
    let pred = vec![
        sentence("( a b ) c d e"),
        sentence("( f g ) h ( i j )"),
    ];
    let pos = vec![
        vec!["dt".into(), "nn".into(), "dt".into(), "nn".into(), "vb".into()],
        vec!["dt".into(), "nn".into(), "vb".into(), "jj".into(), "nn".into()],
    ];
    let results = compare_corpora(&gold, &pred, Some(&pos)).unwrap();
    let tallies = results.by_pos.as_ref().unwrap();
    assert_eq!(tallies.true_pos["dt-nn"], 2);
    assert_eq!(tallies.false_neg["dt-nn"], 1);
    assert_eq!(tallies.false_pos["jj-nn"], 1);

    let summary = render_summary(&results, &ReportOptions::default());
    assert!(summary.contains("== POS-TP =="));
    assert!(summary.contains("POS-TP dt-nn\t2\t"));
}

#[test]
fn nested_gold_brackets_are_scored() {
    let gold = vec![sentence("( a ( b c ) d ) e")];
    let pred = vec![sentence("( a b c d ) e")];
    let results = compare_corpora(&gold, &pred, None).unwrap();
    // outer (0,4) matches, inner (1,3) is missed
    assert_eq!(results.spans.true_pos, 1);
    assert_eq!(results.spans.false_neg, 1);
    assert_eq!(results.pairs.true_pos, 4);
}

#[test]
fn json_results_round_trip() {
    let gold = vec![sentence("( a b ) c")];
    let results = compare_corpora(&gold, &gold, None).unwrap();
    let json = serde_json::to_string(&results).unwrap();
    let back: chunkeval::eval::EvalResults = serde_json::from_str(&json).unwrap();
    assert_eq!(back.spans, results.spans);
    assert_eq!(back.sentences, results.sentences);
}
