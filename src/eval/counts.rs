//! Accumulated evaluation counts and derived metrics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Names of the span-length buckets, in order.
pub const LENGTH_BUCKET_NAMES: [&str; 5] = ["2", "3", "4", "5", ">5"];

/// The five tallied span categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Spans in both the gold and predicted sets.
    TruePos,
    /// Predicted spans absent from gold.
    FalsePos,
    /// Gold spans absent from the prediction.
    FalseNeg,
    /// All gold spans.
    Gold,
    /// All predicted spans.
    Pred,
}

impl Category {
    /// All categories in tally order.
    pub const ALL: [Category; 5] = [
        Category::TruePos,
        Category::FalsePos,
        Category::FalseNeg,
        Category::Gold,
        Category::Pred,
    ];
}

/// Precision, recall and F1 on the 0-100 scale.
///
/// Zero denominators yield 0, never an error.
#[must_use]
pub fn prf(true_pos: usize, false_pos: usize, false_neg: usize) -> (f64, f64, f64) {
    let precision = if true_pos + false_pos == 0 {
        0.0
    } else {
        100.0 * true_pos as f64 / (true_pos + false_pos) as f64
    };
    let recall = if true_pos + false_neg == 0 {
        0.0
    } else {
        100.0 * true_pos as f64 / (true_pos + false_neg) as f64
    };
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    (precision, recall, f1)
}

/// Length bucket for a span width: exact widths 2 through 5, then
/// "6 or more". `None` for width <= 1 clumps, which stay out of the length
/// statistics.
#[must_use]
pub fn length_bucket(width: usize) -> Option<usize> {
    if width <= 1 {
        None
    } else {
        Some(width.min(6) - 2)
    }
}

/// Parallel totals for the five span categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    /// True positive total.
    pub true_pos: usize,
    /// False positive total.
    pub false_pos: usize,
    /// False negative total.
    pub false_neg: usize,
    /// All-gold total.
    pub gold: usize,
    /// All-predicted total.
    pub pred: usize,
}

impl CategoryCounts {
    /// The total for one category.
    #[must_use]
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::TruePos => self.true_pos,
            Category::FalsePos => self.false_pos,
            Category::FalseNeg => self.false_neg,
            Category::Gold => self.gold,
            Category::Pred => self.pred,
        }
    }

    /// Add to one category's total.
    pub fn add(&mut self, category: Category, n: usize) {
        match category {
            Category::TruePos => self.true_pos += n,
            Category::FalsePos => self.false_pos += n,
            Category::FalseNeg => self.false_neg += n,
            Category::Gold => self.gold += n,
            Category::Pred => self.pred += n,
        }
    }

    /// Merge totals from another set of counts.
    pub fn merge(&mut self, other: &CategoryCounts) {
        self.true_pos += other.true_pos;
        self.false_pos += other.false_pos;
        self.false_neg += other.false_neg;
        self.gold += other.gold;
        self.pred += other.pred;
    }

    /// Precision over these counts, 0-100 scale.
    #[must_use]
    pub fn precision(&self) -> f64 {
        prf(self.true_pos, self.false_pos, self.false_neg).0
    }

    /// Recall over these counts, 0-100 scale.
    #[must_use]
    pub fn recall(&self) -> f64 {
        prf(self.true_pos, self.false_pos, self.false_neg).1
    }

    /// F1 over these counts, 0-100 scale.
    #[must_use]
    pub fn f1(&self) -> f64 {
        prf(self.true_pos, self.false_pos, self.false_neg).2
    }
}

/// POS-sequence occurrence tallies for the three error categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosTallies {
    /// Tallies for true positive spans, keyed by joined POS sequence.
    pub true_pos: HashMap<String, usize>,
    /// Tallies for false positive spans.
    pub false_pos: HashMap<String, usize>,
    /// Tallies for false negative spans.
    pub false_neg: HashMap<String, usize>,
}

impl PosTallies {
    /// The tally map for an error category; `None` for Gold/Pred, which are
    /// not tallied by POS sequence.
    #[must_use]
    pub fn map(&self, category: Category) -> Option<&HashMap<String, usize>> {
        match category {
            Category::TruePos => Some(&self.true_pos),
            Category::FalsePos => Some(&self.false_pos),
            Category::FalseNeg => Some(&self.false_neg),
            Category::Gold | Category::Pred => None,
        }
    }

    pub(crate) fn map_mut(&mut self, category: Category) -> Option<&mut HashMap<String, usize>> {
        match category {
            Category::TruePos => Some(&mut self.true_pos),
            Category::FalsePos => Some(&mut self.false_pos),
            Category::FalseNeg => Some(&mut self.false_neg),
            Category::Gold | Category::Pred => None,
        }
    }

    /// Merge tallies from another set.
    pub fn merge(&mut self, other: &PosTallies) {
        for (ours, theirs) in [
            (&mut self.true_pos, &other.true_pos),
            (&mut self.false_pos, &other.false_pos),
            (&mut self.false_neg, &other.false_neg),
        ] {
            for (key, n) in theirs {
                *ours.entry(key.clone()).or_insert(0) += n;
            }
        }
    }
}

/// Aggregated results of one comparison run.
///
/// `spans` counts every span including unit-width clumps; the length sums,
/// length counts, per-bucket totals and POS tallies describe the width >= 2
/// spans only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalResults {
    /// Full-span totals.
    pub spans: CategoryCounts,
    /// Decomposed adjacent-pair totals.
    pub pairs: CategoryCounts,
    /// Totals per span-length bucket.
    pub by_length: [CategoryCounts; 5],
    /// Sum of span widths per category.
    pub length_sums: CategoryCounts,
    /// Number of length-tallied spans per category.
    pub length_counts: CategoryCounts,
    /// POS-sequence tallies, present when a POS corpus was supplied.
    pub by_pos: Option<PosTallies>,
    /// False positives fully contained in some false negative.
    pub substring: usize,
    /// False negatives fully contained in some false positive.
    pub superstring: usize,
    /// Unit-width clump occurrences skipped from the length statistics.
    pub skipped_clumps: usize,
    /// Number of sentences scored.
    pub sentences: usize,
}

impl EvalResults {
    /// Mean width of the length-tallied spans in one category, 0 when the
    /// category is empty.
    #[must_use]
    pub fn mean_length(&self, category: Category) -> f64 {
        let n = self.length_counts.get(category);
        if n == 0 {
            0.0
        } else {
            self.length_sums.get(category) as f64 / n as f64
        }
    }

    /// Merge results from another run (e.g. a separately scored block of
    /// sentences).
    pub fn merge(&mut self, other: &EvalResults) {
        self.spans.merge(&other.spans);
        self.pairs.merge(&other.pairs);
        for (bucket, theirs) in self.by_length.iter_mut().zip(&other.by_length) {
            bucket.merge(theirs);
        }
        self.length_sums.merge(&other.length_sums);
        self.length_counts.merge(&other.length_counts);
        if let Some(theirs) = &other.by_pos {
            self.by_pos.get_or_insert_with(PosTallies::default).merge(theirs);
        }
        self.substring += other.substring;
        self.superstring += other.superstring;
        self.skipped_clumps += other.skipped_clumps;
        self.sentences += other.sentences;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prf_guards_zero_denominators() {
        assert_eq!(prf(0, 0, 0), (0.0, 0.0, 0.0));
        assert_eq!(prf(0, 0, 3), (0.0, 0.0, 0.0));
        assert_eq!(prf(0, 3, 0), (0.0, 0.0, 0.0));
        let (p, r, f) = prf(2, 2, 6);
        assert!((p - 50.0).abs() < 1e-9);
        assert!((r - 25.0).abs() < 1e-9);
        assert!((f - 2.0 * 50.0 * 25.0 / 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_length_bucket_edges() {
        assert_eq!(length_bucket(0), None);
        assert_eq!(length_bucket(1), None);
        assert_eq!(length_bucket(2), Some(0));
        assert_eq!(length_bucket(5), Some(3));
        assert_eq!(length_bucket(6), Some(4));
        assert_eq!(length_bucket(40), Some(4));
    }

    #[test]
    fn test_merge_adds_everything() {
        let mut a = EvalResults::default();
        a.spans.true_pos = 1;
        a.by_length[0].false_pos = 2;
        a.substring = 1;
        let mut b = EvalResults::default();
        b.spans.true_pos = 2;
        b.by_length[0].false_pos = 1;
        b.sentences = 4;
        let mut pos = PosTallies::default();
        pos.true_pos.insert("dt-nn".into(), 3);
        b.by_pos = Some(pos);

        a.merge(&b);
        assert_eq!(a.spans.true_pos, 3);
        assert_eq!(a.by_length[0].false_pos, 3);
        assert_eq!(a.substring, 1);
        assert_eq!(a.sentences, 4);
        assert_eq!(a.by_pos.unwrap().true_pos["dt-nn"], 3);
    }

    #[test]
    fn test_mean_length() {
        let mut results = EvalResults::default();
        results.length_sums.gold = 10;
        results.length_counts.gold = 4;
        assert!((results.mean_length(Category::Gold) - 2.5).abs() < 1e-9);
        assert_eq!(results.mean_length(Category::Pred), 0.0);
    }
}
