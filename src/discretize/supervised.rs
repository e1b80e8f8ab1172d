//! Supervised, entropy minimizing discretization.
//!
//! Cut points are chosen greedily: within the current sub-range the value
//! whose binary split has the lowest class entropy wins, then both halves are
//! split again until `levels` halving rounds are spent.

use crate::data::dataset::Dataset;
use crate::discretize::interval::Interval;
use crate::error::{ModelError, Result};
use crate::metrics::entropy::entropy;
use tracing::debug;

/// Splits a numeric attribute into intervals using at most `2^levels - 1`
/// internal cut points.
///
/// The intervals are disjoint and cover `[min, max]` of the attribute.
pub fn discretize(dataset: &Dataset, attribute: &str, levels: u32) -> Result<Vec<Interval>> {
    let feature = dataset.feature_index(attribute)?;
    if !dataset.is_not_empty() {
        return Err(ModelError::EmptyDataset);
    }

    let mut pairs = dataset
        .column(feature)
        .zip(dataset.y.iter())
        .map(|(value, label)| {
            value
                .as_number()
                .map(|number| (number, label.as_str()))
                .ok_or_else(|| ModelError::NotNumeric(attribute.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let values = pairs.iter().map(|(value, _)| *value).collect::<Vec<_>>();
    let labels = pairs.iter().map(|(_, label)| *label).collect::<Vec<_>>();

    let mut boundaries = cut_points(&values, &labels, levels);
    // pairs is non-empty, so both ends exist
    boundaries.push(values[0]);
    boundaries.push(values[values.len() - 1]);
    boundaries.sort_by(|a, b| a.total_cmp(b));
    boundaries.dedup();

    debug!(attribute, levels, ?boundaries, "entropy discretization");
    Ok(Interval::from_boundaries(&boundaries))
}

/// Recursive cut point search over values sorted ascending.
fn cut_points(values: &[f64], labels: &[&str], levels: u32) -> Vec<f64> {
    if values.len() <= 1 || levels == 0 {
        return Vec::new();
    }
    let mut distinct = values.to_vec();
    distinct.dedup();
    if distinct.len() <= 1 {
        return Vec::new();
    }

    // ties go to the lowest value since only a strictly lower entropy replaces
    let mut best: Option<(f64, usize, f64)> = None;
    for &candidate in &distinct {
        let split = values.partition_point(|&value| value <= candidate);
        let score = split_entropy(labels, split);
        if best.map_or(true, |(_, _, best_score)| score < best_score) {
            best = Some((candidate, split, score));
        }
    }

    let Some((cut, split, _)) = best else {
        return Vec::new();
    };

    let mut cuts = cut_points(&values[..split], &labels[..split], levels - 1);
    cuts.push(cut);
    cuts.extend(cut_points(&values[split..], &labels[split..], levels - 1));
    cuts
}

fn split_entropy(labels: &[&str], split: usize) -> f64 {
    let total = labels.len() as f64;
    let (left, right) = labels.split_at(split);
    left.len() as f64 / total * entropy(left.iter().copied())
        + right.len() as f64 / total * entropy(right.iter().copied())
}
