//! Training-time value domains of every attribute.
//!
//! Numeric query values have to be re-binned exactly the way the training
//! data was binned, so both classifiers keep one shared, read-only map from
//! attribute name to its domain.

use crate::data::dataset::Dataset;
use crate::data::value::Value;
use crate::discretize::interval::{find_best_interval, Interval};
use std::collections::{BTreeMap, BTreeSet};

/// Legal values of one attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeDomain {
    /// Sorted distinct raw values.
    Categories(Vec<Value>),
    /// Ordered intervals produced by a discretizer.
    Intervals(Vec<Interval>),
}

impl AttributeDomain {
    /// Domain of a column; a column made only of intervals becomes an
    /// interval domain.
    pub fn from_values<'a, I: IntoIterator<Item = &'a Value>>(values: I) -> Self {
        let distinct = values.into_iter().cloned().collect::<BTreeSet<_>>();
        let intervals = distinct
            .iter()
            .map(|value| match value {
                Value::Interval(interval) => Some(*interval),
                _ => None,
            })
            .collect::<Option<Vec<_>>>();
        match intervals {
            Some(intervals) if !intervals.is_empty() => AttributeDomain::Intervals(intervals),
            _ => AttributeDomain::Categories(distinct.into_iter().collect()),
        }
    }

    /// Every value of the domain, intervals wrapped as values.
    pub fn values(&self) -> Vec<Value> {
        match self {
            AttributeDomain::Categories(values) => values.clone(),
            AttributeDomain::Intervals(intervals) => {
                intervals.iter().map(|i| Value::Interval(*i)).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AttributeDomain::Categories(values) => values.len(),
            AttributeDomain::Intervals(intervals) => intervals.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maps a query value onto this domain; numbers land in their interval.
    pub fn resolve(&self, value: &Value) -> Value {
        match self {
            AttributeDomain::Intervals(intervals) => find_best_interval(value, intervals)
                .map(Value::Interval)
                .unwrap_or_else(|| value.clone()),
            AttributeDomain::Categories(_) => value.clone(),
        }
    }
}

/// Attribute name to domain, built once per training set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeDomains {
    domains: BTreeMap<String, AttributeDomain>,
}

impl AttributeDomains {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: &Dataset) -> Self {
        let domains = dataset
            .features
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), AttributeDomain::from_values(dataset.column(idx))))
            .collect();
        Self { domains }
    }

    pub fn insert<S: Into<String>>(&mut self, attribute: S, domain: AttributeDomain) {
        self.domains.insert(attribute.into(), domain);
    }

    pub fn get(&self, attribute: &str) -> Option<&AttributeDomain> {
        self.domains.get(attribute)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeDomain)> {
        self.domains.iter()
    }

    /// Re-bins a query value; unknown attributes pass the value through.
    pub fn resolve(&self, attribute: &str, value: &Value) -> Value {
        match self.domains.get(attribute) {
            Some(domain) => domain.resolve(value),
            None => value.clone(),
        }
    }

    /// Adds training values a declared domain did not list.
    ///
    /// Declared categories may miss values that appear in the data; every
    /// observed value must still be representable. Declared intervals are
    /// kept as they are since numbers get re-binned into them.
    pub fn merge_observed(&mut self, dataset: &Dataset) {
        for (idx, name) in dataset.features.iter().enumerate() {
            let observed = AttributeDomain::from_values(dataset.column(idx));
            let merged = match (self.domains.remove(name), observed) {
                (Some(AttributeDomain::Categories(declared)), AttributeDomain::Categories(seen)) => {
                    let all = declared.into_iter().chain(seen).collect::<BTreeSet<_>>();
                    AttributeDomain::Categories(all.into_iter().collect())
                }
                (Some(declared @ AttributeDomain::Intervals(_)), _) => declared,
                (_, observed) => observed,
            };
            self.domains.insert(name.clone(), merged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binned() -> Dataset {
        let low = Interval::new(22.0, 25.0, true);
        let high = Interval::new(25.0, 60.0, false);
        Dataset::from_rows(
            vec!["age".into(), "income".into()],
            vec![
                vec![Value::from(low), Value::from("low")],
                vec![Value::from(high), Value::from("high")],
                vec![Value::from(high), Value::from("high")],
            ],
            vec!["n".into(), "y".into(), "y".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_from_dataset() {
        let domains = AttributeDomains::from_dataset(&binned());
        assert_eq!(domains.len(), 2);
        assert!(matches!(domains.get("age"), Some(AttributeDomain::Intervals(i)) if i.len() == 2));
        assert_eq!(
            domains.get("income"),
            Some(&AttributeDomain::Categories(vec![
                Value::from("high"),
                Value::from("low")
            ]))
        );
    }

    #[test]
    fn test_resolve_rebins_numbers() {
        let domains = AttributeDomains::from_dataset(&binned());
        assert_eq!(
            domains.resolve("age", &Value::number(23)),
            Value::from(Interval::new(22.0, 25.0, true))
        );
        assert_eq!(
            domains.resolve("age", &Value::number(99)),
            Value::from(Interval::new(25.0, 60.0, false))
        );
        assert_eq!(domains.resolve("income", &Value::from("mid")), Value::from("mid"));
        assert_eq!(domains.resolve("unknown", &Value::number(1)), Value::number(1));
    }

    #[test]
    fn test_merge_observed_keeps_declared_values() {
        let mut domains = AttributeDomains::new();
        domains.insert(
            "income",
            AttributeDomain::Categories(vec![Value::from("mid"), Value::from("low")]),
        );
        domains.merge_observed(&binned());
        assert_eq!(domains.get("income").map(AttributeDomain::len), Some(3));
        assert!(matches!(domains.get("age"), Some(AttributeDomain::Intervals(_))));
    }
}
