//! # id3-bayes
//!
//! `id3-bayes` turns numeric columns of a tabular dataset into intervals and
//! trains two classifiers on the result: a Laplace corrected Naive Bayes and
//! an ID3 decision tree. Query rows may carry raw numbers; they are mapped
//! onto the training intervals before classification.
//!
//! ## Example Usage
//!
//! ```rust
//! use id3_bayes::bayes::CategoricalNB;
//! use id3_bayes::classifier::Classifier;
//! use id3_bayes::data::{Dataset, Row, Value};
//! use id3_bayes::discretize::{discretize_dataset, DiscretizeParams, Strategy};
//! use id3_bayes::trees::Id3Classifier;
//! use std::sync::Arc;
//!
//! let dataset = Dataset::from_rows(
//!     vec!["age".into(), "income".into()],
//!     vec![
//!         vec![Value::number(25), Value::from("low")],
//!         vec![Value::number(40), Value::from("high")],
//!         vec![Value::number(60), Value::from("high")],
//!         vec![Value::number(22), Value::from("low")],
//!     ],
//!     vec!["n".into(), "y".into(), "y".into(), "n".into()],
//! )
//! .unwrap();
//!
//! let params = DiscretizeParams::with_strategy(Strategy::Entropy, 2).unwrap();
//! let (binned, domains) = discretize_dataset(&dataset, &params).unwrap();
//! let domains = Arc::new(domains);
//!
//! let mut bayes = CategoricalNB::with_domains(domains.clone());
//! bayes.fit(&binned).unwrap();
//!
//! let mut tree = Id3Classifier::new();
//! tree.set_domains(domains);
//! tree.fit(&binned).unwrap();
//!
//! let query: Row = [
//!     ("age".to_string(), Value::number(23)),
//!     ("income".to_string(), Value::from("low")),
//! ]
//! .into_iter()
//! .collect();
//! assert_eq!(bayes.predict_row(&query).unwrap(), "n");
//! assert_eq!(tree.predict_row(&query).unwrap(), "n");
//! ```

/// Naive Bayes Classifiers
pub mod bayes;
/// Prediction interface shared by the classifiers
pub mod classifier;
/// Dataset and data manipulation utilities
pub mod data;
/// Turning numbers into intervals
pub mod discretize;
/// Crate error type
pub mod error;
/// Training and evaluating every model and discretization combination
pub mod experiment;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;

pub use error::{ModelError, Result};

#[cfg(test)]
mod tests {
    use super::bayes::CategoricalNB;
    use super::classifier::Classifier;
    use super::data::reader::DataReader;
    use super::data::{Dataset, Row, Value};
    use super::discretize::{discretize_dataset, DiscretizeParams, Strategy};
    use super::metrics::ClassificationMetrics;
    use super::trees::Id3Classifier;
    use std::sync::Arc;

    const PEOPLE: &str = "age,income,class\n\
                          25,low,n\n\
                          40,high,y\n\
                          60,high,y\n\
                          22,low,n\n";

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    fn fitted(data: &Dataset) -> (CategoricalNB, Id3Classifier) {
        let params = DiscretizeParams::with_strategy(Strategy::Entropy, 2).unwrap();
        let (binned, domains) = discretize_dataset(data, &params).unwrap();
        let domains = Arc::new(domains);

        let mut bayes = CategoricalNB::with_domains(domains.clone());
        bayes.fit(&binned).unwrap();
        let mut tree = Id3Classifier::new();
        tree.set_domains(domains);
        tree.fit(&binned).unwrap();
        (bayes, tree)
    }

    #[test]
    fn test_csv_to_prediction() {
        let data = DataReader::new().read(PEOPLE.as_bytes()).unwrap();
        let (bayes, tree) = fitted(&data);

        let query = row(&[("age", Value::number(23)), ("income", Value::from("low"))]);
        assert_eq!(bayes.predict_row(&query).unwrap(), "n");
        assert_eq!(tree.predict_row(&query).unwrap(), "n");

        // raw numbers are re-binned, so the unprocessed data scores perfectly
        let predictions = tree.predict(&data).unwrap();
        assert_eq!(tree.accuracy(&data.y, &predictions).unwrap(), 1.0);
        let predictions = bayes.predict(&data).unwrap();
        assert_eq!(bayes.accuracy(&data.y, &predictions).unwrap(), 1.0);
    }

    #[test]
    fn test_unseen_category_gets_majority_class() {
        let data = Dataset::from_rows(
            vec!["colour".into()],
            vec![
                vec![Value::from("red")],
                vec![Value::from("red")],
                vec![Value::from("blue")],
            ],
            vec!["a".into(), "a".into(), "b".into()],
        )
        .unwrap();
        let (bayes, tree) = fitted(&data);

        let query = row(&[("colour", Value::from("green"))]);
        assert_eq!(bayes.predict_row(&query).unwrap(), "a");
        assert_eq!(tree.predict_row(&query).unwrap(), "a");
    }
}
