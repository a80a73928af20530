//! Fixed-format rendering of evaluation results.
//!
//! The text summary and CSV layouts are stable interfaces: downstream
//! experiment tooling parses them, so numeric fields keep their fixed
//! two-decimal formatting and the section order never changes.

use std::collections::HashMap;

use crate::eval::compare::DetailRow;
use crate::eval::counts::{prf, Category, EvalResults, PosTallies, LENGTH_BUCKET_NAMES};

/// Rendering options.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// POS sequences shown per category before the `Others` row.
    pub top_pos: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { top_pos: 10 }
    }
}

/// Lookup for treebank categories of gold spans, keyed by
/// `(sentence, start, end)`, valued `(category, short category)`.
pub type CategoryLookup = HashMap<(usize, usize, usize), (String, String)>;

fn proportion(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// POS keys of one tally map ranked by descending count, count ties broken
/// toward the lexicographically later key.
fn ranked(map: &HashMap<String, usize>) -> Vec<(&String, usize)> {
    let mut items: Vec<(usize, &String)> = map.iter().map(|(key, &n)| (n, key)).collect();
    items.sort();
    items.into_iter().rev().map(|(n, key)| (key, n)).collect()
}

fn pos_sections(tallies: &PosTallies) -> [(&'static str, &HashMap<String, usize>); 3] {
    [
        ("POS-TP", &tallies.true_pos),
        ("POS-FP", &tallies.false_pos),
        ("POS-FN", &tallies.false_neg),
    ]
}

fn pos_key_counts(tallies: &PosTallies, key: &str) -> (usize, usize, usize) {
    (
        tallies.true_pos.get(key).copied().unwrap_or(0),
        tallies.false_pos.get(key).copied().unwrap_or(0),
        tallies.false_neg.get(key).copied().unwrap_or(0),
    )
}

fn pos_others_counts(tallies: &PosTallies, keep_out: &[&String]) -> (usize, usize, usize) {
    let sum = |map: &HashMap<String, usize>| {
        map.iter()
            .filter(|(key, _)| !keep_out.iter().any(|&k| k == *key))
            .map(|(_, &n)| n)
            .sum()
    };
    (
        sum(&tallies.true_pos),
        sum(&tallies.false_pos),
        sum(&tallies.false_neg),
    )
}

/// Render the human-readable summary.
#[must_use]
pub fn render_summary(results: &EvalResults, options: &ReportOptions) -> String {
    let mut out = String::new();
    let spans = &results.spans;
    let pairs = &results.pairs;

    let (p, r, f) = prf(spans.true_pos, spans.false_pos, spans.false_neg);
    out.push_str(&format!(
        "Summary {:.2} / {:.2} / {:.2} ( {} / {} / {} )\n",
        p, r, f, spans.true_pos, spans.false_pos, spans.false_neg
    ));
    let (p, r, f) = prf(pairs.true_pos, pairs.false_pos, pairs.false_neg);
    out.push_str(&format!(
        "PerBigr {:.2} / {:.2} / {:.2} ( {} / {} / {} )\n",
        p, r, f, pairs.true_pos, pairs.false_pos, pairs.false_neg
    ));
    out.push_str(&format!(
        "Substring prop {:.2} ( {} )\n",
        proportion(results.substring, spans.false_pos),
        results.substring
    ));
    out.push_str(&format!(
        "Supstring prop {:.2} ( {} )\n",
        proportion(results.superstring, spans.false_neg),
        results.superstring
    ));

    let means: Vec<f64> = Category::ALL
        .iter()
        .map(|&category| results.mean_length(category))
        .collect();
    out.push_str(&format!(
        "Mean Len : TP {:.2} / FP {:.2} / FN {:.2} / Gold {:.2} / Pred {:.2}\n",
        means[0], means[1], means[2], means[3], means[4]
    ));

    for (bucket, name) in results.by_length.iter().zip(LENGTH_BUCKET_NAMES) {
        let (p, r, f) = prf(bucket.true_pos, bucket.false_pos, bucket.false_neg);
        out.push_str(&format!(
            "NLEN {} {:.2} / {:.2} / {:.2} ( {} / {} / {} )\n",
            name, p, r, f, bucket.true_pos, bucket.false_pos, bucket.false_neg
        ));
    }

    if let Some(tallies) = &results.by_pos {
        for (name, map) in pos_sections(tallies) {
            out.push_str(&format!("== {} ==\n", name));
            let items = ranked(map);
            let top = &items[..items.len().min(options.top_pos)];
            for &(key, count) in top {
                let (tp, fp, fneg) = pos_key_counts(tallies, key);
                let (p, r, f) = prf(tp, fp, fneg);
                out.push_str(&format!(
                    "{} {}\t{}\t{:.2} / {:.2} / {:.2} ( {} / {} / {} )\n",
                    name, key, count, p, r, f, tp, fp, fneg
                ));
            }
            let keep_out: Vec<&String> = top.iter().map(|&(key, _)| key).collect();
            let rest: usize = items[top.len()..].iter().map(|&(_, n)| n).sum();
            let (tp, fp, fneg) = pos_others_counts(tallies, &keep_out);
            let (p, r, f) = prf(tp, fp, fneg);
            out.push_str(&format!(
                "{} Others\t{}\t{:.2} / {:.2} / {:.2} ( {} / {} / {} )\n",
                name, rest, p, r, f, tp, fp, fneg
            ));
        }
    }
    out
}

/// Render the sectioned CSV summary.
#[must_use]
pub fn render_csv(results: &EvalResults, options: &ReportOptions) -> String {
    let mut out = String::new();
    let spans = &results.spans;
    let pairs = &results.pairs;

    out.push_str("Summary,TP,FP,FN,,\n");
    out.push_str(&format!(
        "Acc,{},{},{},,\n",
        spans.true_pos, spans.false_pos, spans.false_neg
    ));
    out.push_str(&format!(
        "Per bigr,{},{},{},,\n",
        pairs.true_pos, pairs.false_pos, pairs.false_neg
    ));
    out.push_str(",,,,,\n");

    let means: Vec<f64> = Category::ALL
        .iter()
        .map(|&category| results.mean_length(category))
        .collect();
    out.push_str("Mean Len,TP,FP,FN,All pred,All gold\n");
    out.push_str(&format!(
        ",{:.2},{:.2},{:.2},{:.2},{:.2}\n",
        means[0], means[1], means[2], means[3], means[4]
    ));
    out.push_str(",,,,,\n");

    out.push_str(",Sub FP,All FP,Sup FN,All FN,\n");
    out.push_str(&format!(
        ",{},{},{},{},\n",
        results.substring, spans.false_pos, results.superstring, spans.false_neg
    ));
    out.push_str(",,,,,\n");

    out.push_str("By clump len,Len,TP,FP,FN\n");
    for (bucket, name) in results.by_length.iter().zip(LENGTH_BUCKET_NAMES) {
        out.push_str(&format!(
            ",{},{},{},{},\n",
            name, bucket.true_pos, bucket.false_pos, bucket.false_neg
        ));
    }
    out.push_str(",,,,,\n");

    if let Some(tallies) = &results.by_pos {
        for (name, map) in pos_sections(tallies) {
            out.push_str(&format!("{},POS,TP,FP,FN\n", name));
            let items = ranked(map);
            let top = &items[..items.len().min(options.top_pos)];
            for &(key, _) in top {
                let (tp, fp, fneg) = pos_key_counts(tallies, key);
                out.push_str(&format!(",{},{},{},{}\n", csv_field(key), tp, fp, fneg));
            }
            let keep_out: Vec<&String> = top.iter().map(|&(key, _)| key).collect();
            let (tp, fp, fneg) = pos_others_counts(tallies, &keep_out);
            out.push_str(&format!(",Others,{},{},{},\n", tp, fp, fneg));
            out.push_str(",,,,,\n");
        }
    }
    out
}

/// Render the per-span detail CSV.
///
/// The optional lookup supplies treebank categories for gold spans; absent
/// entries (and all entries when no lookup is given) render as `NA`.
#[must_use]
pub fn render_detail_csv(rows: &[DetailRow], categories: Option<&CategoryLookup>) -> String {
    let mut out = String::from(
        "Sentence,StartIndex,EndIndex,Terms,PosSeq,Category,CategoryShort,Result,ErrorType\n",
    );
    for row in rows {
        let looked_up =
            categories.and_then(|map| map.get(&(row.sentence, row.start, row.end)));
        let (category, category_short) = match looked_up {
            Some((category, short)) => (category.as_str(), short.as_str()),
            None => ("NA", "NA"),
        };
        let error = row.error.map_or("NA", |class| class.as_str());
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            row.sentence,
            row.start,
            row.end,
            csv_field(&row.terms),
            csv_field(&row.pos_seq),
            csv_field(category),
            csv_field(category_short),
            row.result.as_str(),
            error
        ));
    }
    out
}

fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
