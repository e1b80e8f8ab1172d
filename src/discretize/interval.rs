use crate::data::value::Value;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Numeric range `(left, right]`, or `[left, right]` when `closed_left` is set.
#[derive(Clone, Copy, Debug)]
pub struct Interval {
    pub left: f64,
    pub right: f64,
    pub closed_left: bool,
}

impl Interval {
    pub fn new(left: f64, right: f64, closed_left: bool) -> Self {
        Self {
            left,
            right,
            closed_left,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        let above_left = if self.closed_left {
            value >= self.left
        } else {
            value > self.left
        };
        above_left && value <= self.right
    }

    /// Builds the interval list for sorted, de-duplicated boundaries.
    ///
    /// The first interval is closed on the left so that the minimum itself is
    /// covered. A single boundary yields the degenerate interval `[b, b]`.
    pub fn from_boundaries(boundaries: &[f64]) -> Vec<Interval> {
        match boundaries {
            [] => Vec::new(),
            [only] => vec![Interval::new(*only, *only, true)],
            _ => boundaries
                .windows(2)
                .enumerate()
                .map(|(idx, pair)| Interval::new(pair[0], pair[1], idx == 0))
                .collect(),
        }
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Interval {}

impl Hash for Interval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.left.to_bits().hash(state);
        self.right.to_bits().hash(state);
        self.closed_left.hash(state);
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.left
            .total_cmp(&other.left)
            .then_with(|| self.right.total_cmp(&other.right))
            .then_with(|| other.closed_left.cmp(&self.closed_left))
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let open = if self.closed_left { '[' } else { '(' };
        write!(f, "{}{}, {}]", open, self.left, self.right)
    }
}

/// Finds the interval a value belongs to.
///
/// Intervals are expected to be disjoint and gap free. An interval value is
/// returned unchanged. Numbers outside the covered range clamp to the lowest
/// or the highest interval. Categories have no interval and yield `None`.
pub fn find_best_interval(value: &Value, intervals: &[Interval]) -> Option<Interval> {
    let number = match value {
        Value::Interval(interval) => return Some(*interval),
        Value::Number(number) => *number,
        Value::Category(_) => return None,
    };

    let first = intervals.first()?;
    let mut min_interval = first;
    let mut max_interval = first;

    for interval in intervals {
        if interval.contains(number) {
            return Some(*interval);
        }
        if interval.right < min_interval.right {
            min_interval = interval;
        }
        if interval.left > max_interval.left {
            max_interval = interval;
        }
    }

    if min_interval.right >= number {
        Some(*min_interval)
    } else {
        Some(*max_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intervals() -> Vec<Interval> {
        Interval::from_boundaries(&[22.0, 25.0, 60.0])
    }

    #[test]
    fn test_from_boundaries() {
        let intervals = intervals();
        assert_eq!(intervals.len(), 2);
        assert!(intervals[0].closed_left);
        assert!(!intervals[1].closed_left);
        assert_eq!(intervals[0].right, intervals[1].left);
    }

    #[test]
    fn test_from_single_boundary() {
        let intervals = Interval::from_boundaries(&[4.0]);
        assert_eq!(intervals, vec![Interval::new(4.0, 4.0, true)]);
        assert!(intervals[0].contains(4.0));
    }

    #[test]
    fn test_contains_edges() {
        let intervals = intervals();
        assert!(intervals[0].contains(22.0));
        assert!(intervals[0].contains(25.0));
        assert!(!intervals[1].contains(25.0));
        assert!(intervals[1].contains(60.0));
    }

    #[test]
    fn test_find_inside() {
        let intervals = intervals();
        let found = find_best_interval(&Value::Number(23.0), &intervals);
        assert_eq!(found, Some(intervals[0]));
        let found = find_best_interval(&Value::Number(40.0), &intervals);
        assert_eq!(found, Some(intervals[1]));
    }

    #[test]
    fn test_find_clamps_out_of_range() {
        let intervals = intervals();
        let below = find_best_interval(&Value::Number(-5.0), &intervals);
        assert_eq!(below, Some(intervals[0]));
        let above = find_best_interval(&Value::Number(1000.0), &intervals);
        assert_eq!(above, Some(intervals[1]));
    }

    #[test]
    fn test_find_is_idempotent() {
        let intervals = intervals();
        for interval in &intervals {
            let found = find_best_interval(&Value::Interval(*interval), &intervals);
            assert_eq!(found, Some(*interval));
        }
    }

    #[test]
    fn test_find_category_or_empty() {
        assert_eq!(
            find_best_interval(&Value::Category("low".into()), &intervals()),
            None
        );
        assert_eq!(find_best_interval(&Value::Number(1.0), &[]), None);
    }

    #[test]
    fn test_display() {
        let intervals = intervals();
        assert_eq!(intervals[0].to_string(), "[22, 25]");
        assert_eq!(intervals[1].to_string(), "(25, 60]");
    }
}
