use crate::discretize::interval::Interval;

/// `bins` intervals of equal width over `[min, max]` of the values.
pub fn equal_width(values: &[f64], bins: usize) -> Vec<Interval> {
    let Some((min, max)) = bounds(values) else {
        return Vec::new();
    };
    let bins = bins.max(1);
    let width = (max - min) / bins as f64;
    let mut boundaries = (0..bins).map(|i| min + width * i as f64).collect::<Vec<_>>();
    boundaries.push(max);
    Interval::from_boundaries(&clean(boundaries))
}

/// Intervals holding roughly the same number of values each.
///
/// Boundaries are the `i / bins` quantiles with linear interpolation,
/// repeated boundaries are dropped.
pub fn equal_depth(values: &[f64], bins: usize) -> Vec<Interval> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let bins = bins.max(1);
    let boundaries = (0..=bins)
        .map(|i| quantile(&sorted, i as f64 / bins as f64))
        .collect();
    Interval::from_boundaries(&clean(boundaries))
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(min, max), &value| {
        (min.min(value), max.max(value))
    }))
}

fn clean(mut boundaries: Vec<f64>) -> Vec<f64> {
    boundaries.sort_by(|a, b| a.total_cmp(b));
    boundaries.dedup();
    boundaries
}
