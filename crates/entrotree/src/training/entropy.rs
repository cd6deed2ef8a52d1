//! Shannon entropy over label distributions.
//!
//! All entropies are base-2 and measured in bits.

use std::fmt;

use crate::data::LabeledRecord;

// =============================================================================
// LabelCounts
// =============================================================================

/// Label → occurrence count table.
///
/// Labels are kept in first-seen order, which makes [`LabelCounts::majority`]
/// deterministic: ties go to the label that appeared first in the input.
/// Comment categories are a handful of labels, so lookups are a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCounts<'a> {
    counts: Vec<(&'a str, usize)>,
    total: usize,
}

impl<'a> LabelCounts<'a> {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the labels of a record set.
    pub fn from_records(records: &[LabeledRecord<'a>]) -> Self {
        let mut counts = Self::new();
        for r in records {
            counts.add(r.label);
        }
        counts
    }

    /// Record one more occurrence of `label`.
    pub fn add(&mut self, label: &'a str) {
        self.total += 1;
        match self.counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, c)) => *c += 1,
            None => self.counts.push((label, 1)),
        }
    }

    /// Remove one occurrence of `label`.
    ///
    /// Labels whose count drops to zero keep their slot so first-seen order
    /// is stable. Removing an absent label is a no-op.
    pub fn remove(&mut self, label: &str) {
        if let Some((_, c)) = self.counts.iter_mut().find(|(l, _)| *l == label) {
            if *c > 0 {
                *c -= 1;
                self.total -= 1;
            }
        }
    }

    /// Total number of counted records.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of labels with a non-zero count.
    pub fn n_distinct(&self) -> usize {
        self.counts.iter().filter(|(_, c)| *c > 0).count()
    }

    /// Count for one label.
    pub fn get(&self, label: &str) -> usize {
        self.counts
            .iter()
            .find(|(l, _)| *l == label)
            .map_or(0, |(_, c)| *c)
    }

    /// Iterate `(label, count)` pairs with non-zero counts in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, usize)> + '_ {
        self.counts.iter().copied().filter(|(_, c)| *c > 0)
    }

    /// The most frequent label; ties go to the first-seen label.
    pub fn majority(&self) -> Option<&'a str> {
        let mut best: Option<(&'a str, usize)> = None;
        for (label, count) in self.iter() {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((label, count));
            }
        }
        best.map(|(l, _)| l)
    }

    /// Entropy of this distribution.
    #[inline]
    pub fn entropy(&self) -> f64 {
        entropy(self.iter().map(|(_, c)| c))
    }
}

impl fmt::Display for LabelCounts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (label, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{label:?}: {count}")?;
        }
        f.write_str("}")
    }
}

// =============================================================================
// Entropy
// =============================================================================

/// Entropy `Σ (c/n) · log2(n/c)` of a label-count distribution.
///
/// Zero counts are ignored. Returns 0 for an empty distribution.
pub fn entropy<I>(counts: I) -> f64
where
    I: IntoIterator<Item = usize>,
{
    let counts: Vec<usize> = counts.into_iter().filter(|&c| c > 0).collect();
    let n: usize = counts.iter().sum();
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    counts
        .iter()
        .map(|&c| {
            let c = c as f64;
            (c / n) * (n / c).log2()
        })
        .sum()
}

/// Entropy of the labels of a record set.
pub fn record_entropy(records: &[LabeledRecord<'_>]) -> f64 {
    LabelCounts::from_records(records).entropy()
}

/// Conditional entropy `Σ (|p_i|/n) · entropy(p_i)` of a candidate split.
///
/// `n` is the total size of all partitions. Returns 0 when every partition
/// is empty.
pub fn weighted_child_entropy<'p, 'a: 'p, I>(partitions: I) -> f64
where
    I: IntoIterator<Item = &'p LabelCounts<'a>>,
{
    let mut weighted = 0.0;
    let mut n = 0usize;
    for counts in partitions {
        weighted += counts.total() as f64 * counts.entropy();
        n += counts.total();
    }
    if n == 0 {
        0.0
    } else {
        weighted / n as f64
    }
}
