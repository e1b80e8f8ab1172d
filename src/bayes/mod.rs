/// Laplace corrected Naive Bayes over discretized attributes
pub mod categorical;

pub use categorical::{CategoricalNB, FrequencyTable, TableId};
