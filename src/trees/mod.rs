/// ID3 decision tree classifier
pub mod classifier;
/// Arena node
pub mod node;
/// Growth parameters
pub mod params;

pub use classifier::{normalized_gain, Id3Classifier};
pub use node::TreeNode;
pub use params::TreeParams;
