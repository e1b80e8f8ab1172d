use crate::classifier::Classifier;
use crate::data::dataset::{Dataset, Row};
use crate::data::domain::AttributeDomains;
use crate::data::value::Value;
use crate::error::{ModelError, Result};
use crate::metrics::confusion::ClassificationMetrics;
use nalgebra::DMatrix;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Identifies one of the frequency tables of a [`CategoricalNB`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableId {
    /// Class prior counts
    Class,
    /// Counts of the attribute at this position of the training features
    Attribute(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ProbabilityKey {
    table: TableId,
    value: Value,
    given: Option<String>,
}

/// Class × value counts, every cell starting at one (Laplace correction).
#[derive(Clone, Debug)]
pub struct FrequencyTable {
    classes: HashMap<String, usize>,
    values: HashMap<Value, usize>,
    counts: DMatrix<usize>,
}

impl FrequencyTable {
    pub fn new(classes: &[String], values: &[Value]) -> Self {
        Self {
            classes: classes
                .iter()
                .enumerate()
                .map(|(idx, class)| (class.clone(), idx))
                .collect(),
            values: values
                .iter()
                .enumerate()
                .map(|(idx, value)| (value.clone(), idx))
                .collect(),
            counts: DMatrix::from_element(classes.len(), values.len(), 1),
        }
    }

    /// Counts one observation, `false` when the class or value is unknown.
    pub fn increment(&mut self, class: &str, value: &Value) -> bool {
        match (self.classes.get(class), self.values.get(value)) {
            (Some(&row), Some(&col)) => {
                self.counts[(row, col)] += 1;
                true
            }
            _ => false,
        }
    }

    pub fn count(&self, class: &str, value: &Value) -> Option<usize> {
        let row = *self.classes.get(class)?;
        let col = *self.values.get(value)?;
        Some(self.counts[(row, col)])
    }

    /// Sum of the counts of one class over all values.
    pub fn class_total(&self, class: &str) -> Option<usize> {
        let row = *self.classes.get(class)?;
        Some(self.counts.row(row).sum())
    }

    pub fn total(&self) -> usize {
        self.counts.sum()
    }
}

/// Naive Bayes over categorical and interval valued attributes.
///
/// Probabilities are read from Laplace corrected frequency tables and
/// memoized per `(table, value, class)`. The cache is safe to fill from
/// several predicting threads; all of them write the same numbers.
#[derive(Debug, Default)]
pub struct CategoricalNB {
    features: Vec<String>,
    classes: Vec<String>,
    tables: Vec<FrequencyTable>,
    class_table: Option<FrequencyTable>,
    domains: Option<Arc<AttributeDomains>>,
    majority_class: Option<String>,
    cache: RwLock<HashMap<ProbabilityKey, f64>>,
}

impl ClassificationMetrics for CategoricalNB {}

// single column of the class prior table
const PRIOR_COLUMN: &str = "value";

impl CategoricalNB {
    pub fn new() -> Self {
        Self::default()
    }

    /// Model whose tables span the given domains instead of only the values
    /// seen while fitting.
    pub fn with_domains(domains: Arc<AttributeDomains>) -> Self {
        Self {
            domains: Some(domains),
            ..Self::default()
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn majority_class(&self) -> Option<&str> {
        self.majority_class.as_deref()
    }

    pub fn domains(&self) -> Option<&Arc<AttributeDomains>> {
        self.domains.as_ref()
    }

    pub fn table(&self, attribute: &str) -> Option<&FrequencyTable> {
        let idx = self.features.iter().position(|f| f == attribute)?;
        self.tables.get(idx)
    }

    /// Builds the frequency tables from a dataset.
    ///
    /// # Errors
    ///
    /// Fails on an empty dataset.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<String> {
        if !dataset.is_not_empty() {
            return Err(ModelError::EmptyDataset);
        }

        let mut domains = self
            .domains
            .as_deref()
            .cloned()
            .unwrap_or_default();
        domains.merge_observed(dataset);

        let classes = dataset.classes();
        let mut tables = Vec::with_capacity(dataset.ncols());
        for (idx, feature) in dataset.features.iter().enumerate() {
            let values = domains
                .get(feature)
                .map(|domain| domain.values())
                .unwrap_or_default();
            let mut table = FrequencyTable::new(&classes, &values);
            for (row, cell) in dataset.column(idx).enumerate() {
                let value = domains.resolve(feature, cell);
                if !table.increment(&dataset.y[row], &value) {
                    debug!(attribute = feature.as_str(), %value, "value outside of the attribute domain");
                }
            }
            tables.push(table);
        }

        let prior = [Value::category(PRIOR_COLUMN)];
        let mut class_table = FrequencyTable::new(&classes, &prior);
        for class in dataset.y.iter() {
            class_table.increment(class, &prior[0]);
        }

        debug!(
            attributes = tables.len(),
            classes = classes.len(),
            rows = dataset.nrows(),
            "fitted naive bayes"
        );

        self.features = dataset.features.clone();
        self.majority_class = dataset.majority_class();
        self.classes = classes;
        self.tables = tables;
        self.class_table = Some(class_table);
        self.domains = Some(Arc::new(domains));
        self.cache.write().clear();

        Ok("Finished fitting".into())
    }

    /// Prior probability of a class.
    pub fn prior(&self, class: &str) -> f64 {
        self.probability(TableId::Class, &Value::category(class), None)
    }

    /// Probability of an attribute value given a class. Numbers are re-binned
    /// first; unknown attributes or values yield 1.
    pub fn conditional(&self, attribute: &str, value: &Value, class: &str) -> f64 {
        let Some(idx) = self.features.iter().position(|f| f == attribute) else {
            return 1.0;
        };
        let value = self.resolve(attribute, value);
        self.probability(TableId::Attribute(idx), &value, Some(class))
    }

    /// `P(a)` as the row marginal of a table, `P(a | b)` as the joint count
    /// over the marginal of `b`. Lookups that find nothing yield 1.
    fn probability(&self, table: TableId, value: &Value, given: Option<&str>) -> f64 {
        let key = ProbabilityKey {
            table,
            value: value.clone(),
            given: given.map(str::to_string),
        };
        if let Some(&cached) = self.cache.read().get(&key) {
            return cached;
        }

        let probability = self.compute_probability(table, value, given).unwrap_or(1.0);
        *self.cache.write().entry(key).or_insert(probability)
    }

    fn compute_probability(&self, table: TableId, value: &Value, given: Option<&str>) -> Option<f64> {
        let frequencies = match table {
            TableId::Class => self.class_table.as_ref()?,
            TableId::Attribute(idx) => self.tables.get(idx)?,
        };
        let total = frequencies.total() as f64;
        match given {
            None => {
                let Value::Category(class) = value else {
                    return None;
                };
                Some(frequencies.class_total(class)? as f64 / total)
            }
            Some(class) => {
                let joint = frequencies.count(class, value)? as f64 / total;
                let marginal = self.probability(table, &Value::category(class), None);
                Some(joint / marginal)
            }
        }
    }

    fn resolve(&self, attribute: &str, value: &Value) -> Value {
        match &self.domains {
            Some(domains) => domains.resolve(attribute, value),
            None => value.clone(),
        }
    }

    fn score(&self, row: &Row) -> Result<String> {
        let mut scores = self
            .classes
            .iter()
            .map(|class| (class, self.prior(class)))
            .collect::<Vec<_>>();

        for (idx, feature) in self.features.iter().enumerate() {
            let raw = row
                .get(feature)
                .ok_or_else(|| ModelError::MissingAttribute(feature.clone()))?;
            let value = self.resolve(feature, raw);
            for (class, score) in scores.iter_mut() {
                *score *= self.probability(TableId::Attribute(idx), &value, Some(class.as_str()));
            }
        }

        // classes are sorted, the first one wins a tie
        let mut best: Option<(&String, f64)> = None;
        for (class, score) in scores {
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((class, score));
            }
        }
        best.map(|(class, _)| class.clone())
            .ok_or(ModelError::EmptyDataset)
    }
}

impl Classifier for CategoricalNB {
    fn predict_row(&self, row: &Row) -> Result<String> {
        let majority = self.majority_class.as_ref().ok_or(ModelError::NotFitted)?;
        match self.score(row) {
            Ok(class) => Ok(class),
            Err(err) => {
                warn!(%err, fallback = majority.as_str(), "naive bayes fell back to the majority class");
                Ok(majority.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discretize::{discretize_dataset, DiscretizeParams, Strategy};
    use approx::assert_relative_eq;

    fn colors() -> Dataset {
        Dataset::from_rows(
            vec!["color".into(), "size".into()],
            vec![
                vec![Value::from("red"), Value::from("big")],
                vec![Value::from("red"), Value::from("small")],
                vec![Value::from("red"), Value::from("big")],
                vec![Value::from("blue"), Value::from("small")],
                vec![Value::from("blue"), Value::from("big")],
            ],
            vec!["a".into(), "a".into(), "a".into(), "b".into(), "b".into()],
        )
        .unwrap()
    }

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_new() {
        let model = CategoricalNB::new();
        assert!(model.classes().is_empty());
        assert!(model.majority_class().is_none());
    }

    #[test]
    fn test_fit_builds_laplace_tables() {
        let mut model = CategoricalNB::new();
        assert!(model.fit(&colors()).is_ok());

        let table = model.table("color").unwrap();
        assert_eq!(table.count("a", &Value::from("red")), Some(4));
        assert_eq!(table.count("a", &Value::from("blue")), Some(1));
        assert_eq!(table.count("b", &Value::from("blue")), Some(3));
        assert_eq!(table.total(), 4 + 5);
        assert_eq!(model.majority_class(), Some("a"));
    }

    #[test]
    fn test_probabilities() {
        let mut model = CategoricalNB::new();
        model.fit(&colors()).unwrap();

        // priors: a -> 1 + 3, b -> 1 + 2, total 7
        assert_relative_eq!(model.prior("a"), 4.0 / 7.0);
        assert_relative_eq!(model.prior("b"), 3.0 / 7.0);
        // red | a: 4 of the 5 counts in row a
        assert_relative_eq!(model.conditional("color", &Value::from("red"), "a"), 0.8);
        assert_relative_eq!(
            model.conditional("color", &Value::from("red"), "b"),
            0.25,
            epsilon = 1e-12
        );
        assert_eq!(model.conditional("color", &Value::from("green"), "a"), 1.0);
        assert_eq!(model.conditional("shape", &Value::from("red"), "a"), 1.0);
        assert_eq!(model.prior("c"), 1.0);
    }

    #[test]
    fn test_probabilities_are_cached() {
        let mut model = CategoricalNB::new();
        model.fit(&colors()).unwrap();
        assert!(model.cache.read().is_empty());

        let red = Value::from("red");
        let first = model.conditional("color", &red, "a");
        let joint = ProbabilityKey {
            table: TableId::Attribute(0),
            value: red.clone(),
            given: Some("a".to_string()),
        };
        let marginal = ProbabilityKey {
            table: TableId::Attribute(0),
            value: Value::category("a"),
            given: None,
        };
        assert_eq!(model.cache.read().get(&joint), Some(&first));
        assert!(model.cache.read().contains_key(&marginal));
        assert_eq!(model.cache.read().len(), 2);

        // repeated lookups are served from the cache and add nothing
        assert_eq!(model.conditional("color", &red, "a"), first);
        assert_eq!(model.cache.read().len(), 2);

        model.prior("a");
        let prior = ProbabilityKey {
            table: TableId::Class,
            value: Value::category("a"),
            given: None,
        };
        assert!(model.cache.read().contains_key(&prior));

        // misses are remembered as 1 as well
        model.conditional("color", &Value::from("green"), "a");
        assert_eq!(model.cache.read().len(), 4);

        // a stored entry wins over recomputation
        let big = ProbabilityKey {
            table: TableId::Attribute(1),
            value: Value::from("big"),
            given: Some("b".to_string()),
        };
        model.cache.write().insert(big, 0.125);
        assert_eq!(model.conditional("size", &Value::from("big"), "b"), 0.125);
    }

    #[test]
    fn test_correlated_attribute_predicts_its_class() {
        let mut model = CategoricalNB::new();
        model.fit(&colors()).unwrap();

        let red = row(&[("color", Value::from("red")), ("size", Value::from("small"))]);
        assert_eq!(model.predict_row(&red).unwrap(), "a");
        let blue = row(&[("color", Value::from("blue")), ("size", Value::from("small"))]);
        assert_eq!(model.predict_row(&blue).unwrap(), "b");
    }

    #[test]
    fn test_unseen_value_and_missing_attribute_never_fail() {
        let mut model = CategoricalNB::new();
        model.fit(&colors()).unwrap();

        let unseen = row(&[("color", Value::from("green")), ("size", Value::from("huge"))]);
        assert_eq!(model.predict_row(&unseen).unwrap(), "a");

        let missing = row(&[("size", Value::from("small"))]);
        assert_eq!(model.predict_row(&missing).unwrap(), "a");
    }

    #[test]
    fn test_predict_before_fit() {
        let model = CategoricalNB::new();
        assert!(matches!(
            model.predict_row(&Row::new()),
            Err(ModelError::NotFitted)
        ));
    }

    #[test]
    fn test_rebins_numeric_queries() {
        let raw = Dataset::from_rows(
            vec!["age".into(), "income".into()],
            vec![
                vec![Value::number(25), Value::from("low")],
                vec![Value::number(40), Value::from("high")],
                vec![Value::number(60), Value::from("high")],
                vec![Value::number(22), Value::from("low")],
            ],
            vec!["n".into(), "y".into(), "y".into(), "n".into()],
        )
        .unwrap();
        let params = DiscretizeParams::with_strategy(Strategy::Entropy, 2).unwrap();
        let (binned, domains) = discretize_dataset(&raw, &params).unwrap();

        let mut model = CategoricalNB::with_domains(Arc::new(domains));
        model.fit(&binned).unwrap();

        let query = row(&[("age", Value::number(23)), ("income", Value::from("low"))]);
        assert_eq!(model.predict_row(&query).unwrap(), "n");
        let query = row(&[("age", Value::number(100)), ("income", Value::from("high"))]);
        assert_eq!(model.predict_row(&query).unwrap(), "y");

        let predictions = model.predict(&raw).unwrap();
        assert_eq!(predictions.as_slice(), raw.y.as_slice());
    }

    #[test]
    fn test_declared_domain_values_get_tables() {
        let mut domains = AttributeDomains::new();
        domains.insert(
            "color",
            crate::data::domain::AttributeDomain::Categories(vec![Value::from("green")]),
        );
        let mut model = CategoricalNB::with_domains(Arc::new(domains));
        model.fit(&colors()).unwrap();
        assert_eq!(model.table("color").unwrap().count("b", &Value::from("green")), Some(1));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let mut model = CategoricalNB::new();
        assert!(matches!(
            model.fit(&colors().select(&[])),
            Err(ModelError::EmptyDataset)
        ));
    }
}
