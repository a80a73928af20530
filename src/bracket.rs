//! Labeled bracket spans and their nesting order.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One constituent: an interval over token positions, endpoints inclusive,
/// with an optional category label.
///
/// Equality and hashing consider `(start, end, label)` only. The
/// part-of-speech flag participates solely as the [`nesting_cmp`] tie-break
/// between brackets with identical endpoints: POS-level brackets are the
/// most specific kind at their position.
///
/// [`nesting_cmp`]: Bracket::nesting_cmp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bracket {
    start: usize,
    end: usize,
    label: Option<String>,
    is_pos: bool,
}

impl Bracket {
    /// Create an unlabeled bracket covering `[start, end]`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "bracket start {start} exceeds end {end}");
        Self {
            start,
            end,
            label: None,
            is_pos: false,
        }
    }

    /// Create a part-of-speech-level bracket.
    pub fn pos(start: usize, end: usize) -> Self {
        Self {
            is_pos: true,
            ..Self::new(start, end)
        }
    }

    /// Attach a category label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// First token position covered.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last token position covered (inclusive).
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Category label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether this is a part-of-speech-level bracket.
    #[must_use]
    pub fn is_pos(&self) -> bool {
        self.is_pos
    }

    /// Interval width, `end - start`. Zero for a single-token bracket.
    #[must_use]
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    /// The `(start, end)` endpoint pair.
    #[must_use]
    pub fn indices(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Whether token position `index` falls within this bracket.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub(crate) fn set_start(&mut self, start: usize) {
        debug_assert!(start <= self.end);
        self.start = start;
    }

    pub(crate) fn set_end(&mut self, end: usize) {
        debug_assert!(end >= self.start);
        self.end = end;
    }

    fn rank(&self) -> i8 {
        if self.is_pos {
            -1
        } else {
            0
        }
    }

    /// Three-way nesting order against another bracket over the same
    /// sentence.
    ///
    /// Brackets with identical endpoints order by rank, POS-level first;
    /// equal rank compares equal. A bracket nested inside another orders
    /// before it (more specific sorts first). Disjoint brackets order by
    /// position. Partial overlap without containment in either direction is
    /// a crossing pair and fails with [`Error::CrossingBrackets`] — that
    /// case signals malformed constituent structure and must abort whatever
    /// triggered the comparison.
    pub fn nesting_cmp(&self, other: &Bracket) -> Result<Ordering> {
        if self.start == other.start && self.end == other.end {
            Ok(self.rank().cmp(&other.rank()))
        } else if self.start >= other.start && self.end <= other.end {
            Ok(Ordering::Less)
        } else if other.start >= self.start && other.end <= self.end {
            Ok(Ordering::Greater)
        } else if self.end < other.start {
            Ok(Ordering::Less)
        } else if other.end < self.start {
            Ok(Ordering::Greater)
        } else {
            Err(Error::crossing(self.to_string(), other.to_string()))
        }
    }
}

impl PartialEq for Bracket {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.label == other.label
    }
}

impl Eq for Bracket {}

impl Hash for Bracket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
        self.label.hash(state);
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "[{}, {}] {}", self.start, self.end, label),
            None => write!(f, "[{}, {}]", self.start, self.end),
        }
    }
}
