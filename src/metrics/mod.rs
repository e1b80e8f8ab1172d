/// Confusion matrix and classification scores
pub mod confusion;
/// Shannon entropy and information gain
pub mod entropy;

pub use confusion::{ClassificationMetrics, ConfusionMatrix};
pub use entropy::{cut_point_entropy, entropy, gain};
