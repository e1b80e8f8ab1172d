//! Shannon entropy and information gain.

use crate::data::dataset::Dataset;
use std::collections::HashMap;
use std::hash::Hash;

/// Bits needed to encode the given labels, `-Σ p·log2(p)`.
///
/// Zero for an empty or single-class sequence.
pub fn entropy<'a, T, I>(labels: I) -> f64
where
    T: Eq + Hash + 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    let mut counts: HashMap<&T, usize> = HashMap::new();
    let mut total = 0usize;
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
        total += 1;
    }
    entropy_of_counts(counts.values().copied(), total)
}

pub(crate) fn entropy_of_counts<I: IntoIterator<Item = usize>>(counts: I, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let sum = counts
        .into_iter()
        .filter(|&count| count > 0)
        .map(|count| {
            let p = count as f64 / total;
            p * p.log2()
        })
        .sum::<f64>();
    // -0.0 for pure sets
    (-sum).max(0.0)
}

/// Class entropy minus the size weighted class entropy of every value
/// partition of `feature`.
pub fn gain(dataset: &Dataset, feature: usize) -> f64 {
    let total = dataset.nrows();
    if total == 0 {
        return 0.0;
    }
    let base = entropy(dataset.y.iter());
    let remainder = dataset
        .partition(feature)
        .values()
        .map(|rows| {
            let weight = rows.len() as f64 / total as f64;
            weight * entropy(rows.iter().map(|&row| &dataset.y[row]))
        })
        .sum::<f64>();
    (base - remainder).max(0.0)
}

/// Weighted entropy of the split `S1 = {v <= cut}`, `S2 = {v > cut}`.
pub fn cut_point_entropy<L: Eq + Hash>(values: &[f64], labels: &[L], cut: f64) -> f64 {
    let total = values.len();
    if total == 0 {
        return 0.0;
    }
    let mut left: Vec<&L> = Vec::new();
    let mut right: Vec<&L> = Vec::new();
    for (value, label) in values.iter().zip(labels) {
        if *value <= cut {
            left.push(label);
        } else {
            right.push(label);
        }
    }

    let weight = |size: usize| size as f64 / total as f64;
    weight(left.len()) * entropy(left.iter().copied())
        + weight(right.len()) * entropy(right.iter().copied())
}
