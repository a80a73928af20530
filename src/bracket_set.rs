//! Per-sentence bracket collections with positional indices.

use std::collections::HashSet;
use std::fmt;

use crate::bracket::Bracket;
use crate::{Error, Result};

/// Handle addressing one bracket inside a [`BracketSet`] arena.
///
/// Handles are only meaningful for the set that produced them and stay valid
/// for that set's lifetime (brackets are never removed, only extended).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BracketHandle(usize);

/// The brackets over one sentence, indexed by token position.
///
/// Brackets live in an arena addressed by [`BracketHandle`]. Three derived
/// indices are maintained across mutations:
///
/// - opens-at / closes-at: brackets whose current start (end) is a given
///   position;
/// - covering: brackets containing a given position, most specific first.
///
/// Each covering list is kept sorted by ascending bracket width, ties broken
/// by insertion order, and the order is restored after every [`add`] and
/// [`extend_to_cover`]. "Lowest bracket covering a position" queries are
/// therefore correct no matter how insertions and extensions interleave.
///
/// A set is built once per sentence, mutated while that sentence is
/// processed, read out via [`index_pairs`], and dropped.
///
/// [`add`]: BracketSet::add
/// [`extend_to_cover`]: BracketSet::extend_to_cover
/// [`index_pairs`]: BracketSet::index_pairs
#[derive(Debug, Clone)]
pub struct BracketSet {
    tokens: Vec<String>,
    brackets: Vec<Bracket>,
    opens_at: Vec<Vec<usize>>,
    closes_at: Vec<Vec<usize>>,
    covering: Vec<Vec<usize>>,
}

impl BracketSet {
    /// Create an empty set over a token sequence.
    pub fn new(tokens: Vec<String>) -> Self {
        let n = tokens.len();
        Self {
            tokens,
            brackets: Vec::new(),
            opens_at: vec![Vec::new(); n],
            closes_at: vec![Vec::new(); n],
            covering: vec![Vec::new(); n],
        }
    }

    /// Create a set pre-populated with an initial bracket list.
    pub fn from_brackets(
        tokens: Vec<String>,
        brackets: impl IntoIterator<Item = Bracket>,
    ) -> Result<Self> {
        let mut set = Self::new(tokens);
        for bracket in brackets {
            set.add(bracket)?;
        }
        Ok(set)
    }

    /// Number of tokens in the sentence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the sentence has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The token sequence.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of tracked brackets.
    #[must_use]
    pub fn bracket_count(&self) -> usize {
        self.brackets.len()
    }

    /// All tracked brackets, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Bracket> {
        self.brackets.iter()
    }

    /// The bracket behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle came from a different set.
    #[must_use]
    pub fn get(&self, handle: BracketHandle) -> &Bracket {
        &self.brackets[handle.0]
    }

    /// Whether an equal bracket (same endpoints and label) is already
    /// tracked.
    #[must_use]
    pub fn contains_bracket(&self, bracket: &Bracket) -> bool {
        self.find_duplicate(bracket).is_some()
    }

    fn find_duplicate(&self, bracket: &Bracket) -> Option<usize> {
        self.covering
            .get(bracket.start())?
            .iter()
            .copied()
            .find(|&h| self.brackets[h] == *bracket)
    }

    /// Track a bracket, suppressing duplicates.
    ///
    /// Returns the handle of the inserted bracket, or of the already-tracked
    /// equal bracket (the insert is idempotent). A set over zero tokens
    /// ignores the call and returns `None`. A bracket reaching past the last
    /// token is a parse error.
    pub fn add(&mut self, bracket: Bracket) -> Result<Option<BracketHandle>> {
        if self.tokens.is_empty() {
            return Ok(None);
        }
        if bracket.end() >= self.tokens.len() {
            return Err(Error::parse(format!(
                "bracket {} out of range for {} tokens",
                bracket,
                self.tokens.len()
            )));
        }
        if let Some(existing) = self.find_duplicate(&bracket) {
            return Ok(Some(BracketHandle(existing)));
        }

        let handle = self.brackets.len();
        let (start, end) = bracket.indices();
        self.opens_at[start].push(handle);
        self.closes_at[end].push(handle);
        self.brackets.push(bracket);
        for position in start..=end {
            self.insert_covering(position, handle);
        }
        Ok(Some(BracketHandle(handle)))
    }

    /// Widen a tracked bracket so it covers token position `index`.
    ///
    /// No-op when `index` already falls within the bracket. The opens-at or
    /// closes-at bucket moves accordingly, newly covered positions gain the
    /// bracket, and every covering list in the widened range is restored to
    /// narrowest-first order.
    ///
    /// # Panics
    ///
    /// Panics if the handle came from a different set.
    pub fn extend_to_cover(&mut self, handle: BracketHandle, index: usize) -> Result<()> {
        if index >= self.tokens.len() {
            return Err(Error::parse(format!(
                "position {} out of range for {} tokens",
                index,
                self.tokens.len()
            )));
        }
        let h = handle.0;
        let (start, end) = self.brackets[h].indices();
        if index >= start && index <= end {
            return Ok(());
        }

        if index < start {
            self.opens_at[start].retain(|&o| o != h);
            self.opens_at[index].push(h);
            self.brackets[h].set_start(index);
            for position in index..start {
                self.covering[position].push(h);
            }
        } else {
            self.closes_at[end].retain(|&o| o != h);
            self.closes_at[index].push(h);
            self.brackets[h].set_end(index);
            for position in end + 1..=index {
                self.covering[position].push(h);
            }
        }

        let (start, end) = self.brackets[h].indices();
        for position in start..=end {
            self.resort_covering(position);
        }
        Ok(())
    }

    fn insert_covering(&mut self, position: usize, handle: usize) {
        let brackets = &self.brackets;
        let key = (brackets[handle].width(), handle);
        let list = &mut self.covering[position];
        let at = list
            .iter()
            .position(|&o| (brackets[o].width(), o) > key)
            .unwrap_or(list.len());
        list.insert(at, handle);
    }

    fn resort_covering(&mut self, position: usize) {
        let brackets = &self.brackets;
        self.covering[position].sort_unstable_by_key(|&h| (brackets[h].width(), h));
    }

    /// Brackets containing `position`, most specific (narrowest) first.
    pub fn covering(&self, position: usize) -> impl Iterator<Item = &Bracket> {
        self.covering
            .get(position)
            .into_iter()
            .flatten()
            .map(move |&h| &self.brackets[h])
    }

    /// Brackets whose current start is `position`.
    pub fn opening_at(&self, position: usize) -> impl Iterator<Item = &Bracket> {
        self.opens_at
            .get(position)
            .into_iter()
            .flatten()
            .map(move |&h| &self.brackets[h])
    }

    /// Brackets whose current end is `position`.
    pub fn closing_at(&self, position: usize) -> impl Iterator<Item = &Bracket> {
        self.closes_at
            .get(position)
            .into_iter()
            .flatten()
            .map(move |&h| &self.brackets[h])
    }

    /// Whether some bracket covers `i` and the lowest (most specific) one
    /// also covers `k`.
    #[must_use]
    pub fn lowest_covering_contains(&self, i: usize, k: usize) -> bool {
        self.covering
            .get(i)
            .and_then(|list| list.first())
            .map_or(false, |&h| self.brackets[h].contains(k))
    }

    /// The `(start, end)` endpoint pairs of all tracked brackets.
    ///
    /// With `remove_trivial`, zero-width pairs and the pair spanning the
    /// whole sentence are excluded.
    #[must_use]
    pub fn index_pairs(&self, remove_trivial: bool) -> HashSet<(usize, usize)> {
        let whole = (0, self.tokens.len().saturating_sub(1));
        self.brackets
            .iter()
            .map(|b| b.indices())
            .filter(|&pair| !remove_trivial || (pair.0 != pair.1 && pair != whole))
            .collect()
    }
}

impl fmt::Display for BracketSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.tokens.len().saturating_sub(1);
        for (i, token) in self.tokens.iter().enumerate() {
            for &h in &self.opens_at[i] {
                f.write_str("(")?;
                if let Some(label) = self.brackets[h].label() {
                    write!(f, "{} ", label)?;
                }
            }
            f.write_str(token)?;
            for _ in &self.closes_at[i] {
                f.write_str(")")?;
            }
            if i < last {
                f.write_str(" ")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{i}")).collect()
    }

    #[test]
    fn test_add_maintains_indices() {
        let mut set = BracketSet::new(words(5));
        let h = set.add(Bracket::new(1, 3)).unwrap().unwrap();
        assert_eq!(set.get(h).indices(), (1, 3));
        assert_eq!(set.opening_at(1).count(), 1);
        assert_eq!(set.closing_at(3).count(), 1);
        for i in 1..=3 {
            assert_eq!(set.covering(i).count(), 1);
        }
        assert_eq!(set.covering(0).count(), 0);
        assert_eq!(set.covering(4).count(), 0);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut set = BracketSet::new(words(4));
        let first = set.add(Bracket::new(0, 2)).unwrap().unwrap();
        let second = set.add(Bracket::new(0, 2)).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(set.bracket_count(), 1);
        assert_eq!(set.index_pairs(false).len(), 1);
        // a different label is a different bracket
        set.add(Bracket::new(0, 2).with_label("NP")).unwrap();
        assert_eq!(set.bracket_count(), 2);
    }

    #[test]
    fn test_add_on_empty_sentence_is_a_noop() {
        let mut set = BracketSet::new(Vec::new());
        assert!(set.add(Bracket::new(0, 0)).unwrap().is_none());
        assert_eq!(set.bracket_count(), 0);
    }

    #[test]
    fn test_add_out_of_range_fails() {
        let mut set = BracketSet::new(words(3));
        assert!(set.add(Bracket::new(1, 3)).is_err());
    }

    #[test]
    fn test_covering_is_narrowest_first() {
        let mut set = BracketSet::new(words(6));
        // wider bracket added first; the narrower one must still come first
        set.add(Bracket::new(0, 4)).unwrap();
        set.add(Bracket::new(1, 2)).unwrap();
        let at_1: Vec<(usize, usize)> = set.covering(1).map(|b| b.indices()).collect();
        assert_eq!(at_1, vec![(1, 2), (0, 4)]);
    }

    #[test]
    fn test_lowest_covering_contains() {
        let mut set = BracketSet::new(words(6));
        set.add(Bracket::new(0, 4)).unwrap();
        set.add(Bracket::new(1, 2)).unwrap();
        // lowest bracket over 1 is (1, 2): covers 2 but not 3
        assert!(set.lowest_covering_contains(1, 2));
        assert!(!set.lowest_covering_contains(1, 3));
        // nothing covers 5
        assert!(!set.lowest_covering_contains(5, 5));
    }

    #[test]
    fn test_extend_to_cover_left() {
        let mut set = BracketSet::new(words(6));
        let h = set.add(Bracket::new(3, 4)).unwrap().unwrap();
        set.extend_to_cover(h, 1).unwrap();
        assert_eq!(set.get(h).indices(), (1, 4));
        assert_eq!(set.opening_at(3).count(), 0);
        assert_eq!(set.opening_at(1).count(), 1);
        assert_eq!(set.covering(1).count(), 1);
        assert_eq!(set.covering(2).count(), 1);
        let expected: HashSet<(usize, usize)> = [(1, 4)].into_iter().collect();
        assert_eq!(set.index_pairs(false), expected);
    }

    #[test]
    fn test_extend_to_cover_right() {
        let mut set = BracketSet::new(words(6));
        let h = set.add(Bracket::new(1, 2)).unwrap().unwrap();
        set.extend_to_cover(h, 4).unwrap();
        assert_eq!(set.get(h).indices(), (1, 4));
        assert_eq!(set.closing_at(2).count(), 0);
        assert_eq!(set.closing_at(4).count(), 1);
        assert_eq!(set.covering(3).count(), 1);
        assert_eq!(set.covering(4).count(), 1);
    }

    #[test]
    fn test_extend_to_cover_inside_is_a_noop() {
        let mut set = BracketSet::new(words(6));
        let h = set.add(Bracket::new(1, 4)).unwrap().unwrap();
        let before: Vec<Vec<(usize, usize)>> = (0..6)
            .map(|i| set.covering(i).map(|b| b.indices()).collect())
            .collect();
        set.extend_to_cover(h, 2).unwrap();
        let after: Vec<Vec<(usize, usize)>> = (0..6)
            .map(|i| set.covering(i).map(|b| b.indices()).collect())
            .collect();
        assert_eq!(set.get(h).indices(), (1, 4));
        assert_eq!(before, after);
    }

    #[test]
    fn test_extend_restores_covering_order() {
        let mut set = BracketSet::new(words(8));
        let narrow = set.add(Bracket::new(2, 3)).unwrap().unwrap();
        set.add(Bracket::new(1, 4)).unwrap();
        // widening the narrow bracket past the other must demote it
        set.extend_to_cover(narrow, 6).unwrap();
        let at_2: Vec<(usize, usize)> = set.covering(2).map(|b| b.indices()).collect();
        assert_eq!(at_2, vec![(1, 4), (2, 6)]);
        assert!(set.lowest_covering_contains(2, 4));
        assert!(!set.lowest_covering_contains(2, 6));
    }

    #[test]
    fn test_index_pairs_remove_trivial() {
        let mut set = BracketSet::new(words(5));
        set.add(Bracket::new(2, 2)).unwrap();
        set.add(Bracket::new(0, 4)).unwrap();
        set.add(Bracket::new(1, 3)).unwrap();
        assert_eq!(set.index_pairs(false).len(), 3);
        let expected: HashSet<(usize, usize)> = [(1, 3)].into_iter().collect();
        assert_eq!(set.index_pairs(true), expected);
    }

    #[test]
    fn test_display_renders_brackets() {
        let tokens: Vec<String> = ["the", "cat", "sat"].iter().map(|s| s.to_string()).collect();
        let mut set = BracketSet::new(tokens);
        set.add(Bracket::new(0, 1)).unwrap();
        assert_eq!(set.to_string(), "(the cat) sat");
        let mut labeled = BracketSet::new(
            ["the", "cat"].iter().map(|s| s.to_string()).collect(),
        );
        labeled.add(Bracket::new(0, 1).with_label("NP")).unwrap();
        assert_eq!(labeled.to_string(), "(NP the cat)");
    }
}
