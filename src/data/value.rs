use crate::discretize::interval::Interval;
use num_traits::ToPrimitive;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// A single cell of a dataset.
///
/// Values are totally ordered (categories first, then numbers, then
/// intervals) so that tables and tree branches iterate deterministically.
#[derive(Clone, Debug)]
pub enum Value {
    Category(String),
    Number(f64),
    Interval(Interval),
}

impl Value {
    /// Numeric value from any primitive number.
    pub fn number<T: ToPrimitive>(value: T) -> Self {
        Value::Number(value.to_f64().unwrap_or(f64::NAN))
    }

    pub fn category<S: Into<String>>(value: S) -> Self {
        Value::Category(value.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_interval(&self) -> bool {
        matches!(self, Value::Interval(_))
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Category(_) => 0,
            Value::Number(_) => 1,
            Value::Interval(_) => 2,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Category(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Category(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<Interval> for Value {
    fn from(value: Interval) -> Self {
        Value::Interval(value)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Category(category) => category.hash(state),
            Value::Number(number) => number.to_bits().hash(state),
            Value::Interval(interval) => interval.hash(state),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Category(a), Value::Category(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Interval(a), Value::Interval(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Category(category) => write!(f, "{}", category),
            Value::Number(number) => write!(f, "{}", number),
            Value::Interval(interval) => write!(f, "{}", interval),
        }
    }
}
