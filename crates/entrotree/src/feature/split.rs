//! Minimum-conditional-entropy split search, one algorithm per feature kind.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use crate::data::{LabeledRecord, Record};
use crate::training::entropy::{weighted_child_entropy, LabelCounts};

use super::{OutcomeKey, SplitArg};

/// A candidate split of a record set.
///
/// Partitions are non-empty and listed in creation order, which is also the
/// order children appear in the learned branch.
#[derive(Debug, Clone)]
pub struct Split<'r> {
    /// Weighted child entropy (bits) after splitting.
    pub entropy: f64,
    /// Argument stored on the branch and passed back to `ident`.
    pub arg: SplitArg,
    /// Records routed to each outcome.
    pub partitions: Vec<(OutcomeKey, Vec<LabeledRecord<'r>>)>,
}

impl Split<'_> {
    /// Number of records across all partitions.
    pub fn n_records(&self) -> usize {
        self.partitions.iter().map(|(_, p)| p.len()).sum()
    }

    /// Partition sizes in order.
    pub fn sizes(&self) -> Vec<usize> {
        self.partitions.iter().map(|(_, p)| p.len()).collect()
    }
}

// =============================================================================
// Discrete
// =============================================================================

/// Group records by exact key equality.
///
/// Groups appear in first-seen order. Needs at least two distinct keys.
pub(super) fn split_discrete<'r, F>(records: &[LabeledRecord<'r>], key: F) -> Option<Split<'r>>
where
    F: Fn(&'r Record) -> OutcomeKey,
{
    let mut index: HashMap<OutcomeKey, usize> = HashMap::new();
    let mut groups: Vec<(OutcomeKey, Vec<LabeledRecord<'r>>)> = Vec::new();

    for &r in records {
        let k = key(r.record);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(r),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![r]));
            }
        }
    }

    if groups.len() < 2 {
        return None;
    }

    let counts: Vec<LabelCounts<'r>> = groups
        .iter()
        .map(|(_, g)| LabelCounts::from_records(g))
        .collect();

    Some(Split {
        entropy: weighted_child_entropy(&counts),
        arg: SplitArg::None,
        partitions: groups,
    })
}

// =============================================================================
// Membership
// =============================================================================

/// Find the token whose "contains / does not contain" split has minimal entropy.
///
/// Candidates are tried in first-seen order and a later candidate must be
/// strictly better to win. Tokens present in every record cannot split and
/// are skipped.
pub(super) fn split_membership<'r, F>(
    records: &[LabeledRecord<'r>],
    tokens: F,
) -> Option<Split<'r>>
where
    F: Fn(&'r Record) -> Vec<Cow<'r, str>>,
{
    let token_sets: Vec<Vec<Cow<'r, str>>> = records.iter().map(|r| tokens(r.record)).collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut candidates: Vec<&str> = Vec::new();
    for set in &token_sets {
        for t in set {
            if seen.insert(t.as_ref()) {
                candidates.push(t.as_ref());
            }
        }
    }

    let n = records.len() as f64;
    let mut best: Option<(f64, usize)> = None;

    for (ci, &candidate) in candidates.iter().enumerate() {
        let mut inside = LabelCounts::new();
        let mut outside = LabelCounts::new();
        for (r, set) in records.iter().zip(&token_sets) {
            if set.iter().any(|t| t == candidate) {
                inside.add(r.label);
            } else {
                outside.add(r.label);
            }
        }
        if outside.total() == 0 {
            continue;
        }

        let e = (inside.total() as f64 * inside.entropy()
            + outside.total() as f64 * outside.entropy())
            / n;
        if best.map_or(true, |(b, _)| e < b) {
            best = Some((e, ci));
        }
    }

    let (entropy, ci) = best?;
    let token = candidates[ci];

    let mut inside = Vec::new();
    let mut outside = Vec::new();
    for (&r, set) in records.iter().zip(&token_sets) {
        if set.iter().any(|t| t == token) {
            inside.push(r);
        } else {
            outside.push(r);
        }
    }

    Some(Split {
        entropy,
        arg: SplitArg::Token(token.to_string()),
        partitions: vec![(OutcomeKey::Member(true), inside), (OutcomeKey::Member(false), outside)],
    })
}

// =============================================================================
// Quantitative
// =============================================================================

/// Find the threshold with minimal weighted entropy.
///
/// Records with an undefined value are set aside into an `Undefined`
/// partition that contributes to the weighted entropy of every candidate.
/// The remaining records are sorted by value and every boundary between two
/// distinct consecutive values is scored. Ties keep the lowest threshold.
///
/// The threshold is the midpoint between the two values around the chosen
/// boundary, so `value < threshold` reproduces the partition exactly.
pub(super) fn split_quantitative<'r, F>(
    records: &[LabeledRecord<'r>],
    value: F,
) -> Option<Split<'r>>
where
    F: Fn(&'r Record) -> Option<f64>,
{
    let mut defined: Vec<(f64, LabeledRecord<'r>)> = Vec::with_capacity(records.len());
    let mut undefined: Vec<LabeledRecord<'r>> = Vec::new();
    for &r in records {
        match value(r.record) {
            Some(v) => defined.push((v, r)),
            None => undefined.push(r),
        }
    }
    if defined.len() < 2 {
        return None;
    }
    // Stable: equal values keep input order.
    defined.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = records.len() as f64;
    let undefined_term = {
        let counts = LabelCounts::from_records(&undefined);
        counts.total() as f64 * counts.entropy()
    };

    let mut left = LabelCounts::new();
    let mut right = LabelCounts::new();
    for (_, r) in &defined {
        right.add(r.label);
    }

    let mut best: Option<(f64, usize)> = None;
    for i in 1..defined.len() {
        let moved = defined[i - 1].1.label;
        left.add(moved);
        right.remove(moved);

        if defined[i - 1].0 == defined[i].0 {
            continue;
        }

        let e = (left.total() as f64 * left.entropy()
            + right.total() as f64 * right.entropy()
            + undefined_term)
            / n;
        if best.map_or(true, |(b, _)| e < b) {
            best = Some((e, i));
        }
    }

    let (entropy, cut) = best?;
    let threshold = midpoint(defined[cut - 1].0, defined[cut].0);

    let ge: Vec<LabeledRecord<'r>> = defined[cut..].iter().map(|(_, r)| *r).collect();
    let lt: Vec<LabeledRecord<'r>> = defined[..cut].iter().map(|(_, r)| *r).collect();

    let mut partitions = vec![(OutcomeKey::Lt, lt), (OutcomeKey::Ge, ge)];
    if !undefined.is_empty() {
        partitions.push((OutcomeKey::Undefined, undefined));
    }

    Some(Split {
        entropy,
        arg: SplitArg::Threshold(threshold),
        partitions,
    })
}

/// A value `t` with `lo < t <= hi`, preferring the midpoint.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid > lo && mid <= hi {
        mid
    } else {
        hi
    }
}
