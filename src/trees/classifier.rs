//! ID3 Decision Tree Classifier
use super::{node::TreeNode, params::TreeParams};
use crate::classifier::Classifier;
use crate::data::dataset::{Dataset, Row};
use crate::data::domain::AttributeDomains;
use crate::error::{ModelError, Result};
use crate::metrics::confusion::ClassificationMetrics;
use crate::metrics::entropy::{entropy, gain};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// ID3 decision tree over categorical and interval valued attributes.
///
/// Splits use the information gain normalized by the attribute's own
/// entropy. Nodes live in an arena and refer to their children by index.
#[derive(Clone, Debug, Default)]
pub struct Id3Classifier {
    nodes: Vec<TreeNode>,
    root: Option<usize>,
    features: Vec<String>,
    domains: Option<Arc<AttributeDomains>>,
    tree_params: TreeParams,
}

impl ClassificationMetrics for Id3Classifier {}

impl Id3Classifier {
    /// Creates a new tree with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new tree with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `min_gain` - The normalized gain a split has to exceed, 0.3 by default.
    /// * `min_samples_split` - Subsets smaller than this become leaves, 0 (off) by default.
    ///
    /// # Errors
    ///
    /// This method will return an error if the minimum gain is not finite.
    pub fn with_params(min_gain: Option<f64>, min_samples_split: Option<usize>) -> Result<Self> {
        let mut tree = Self::new();
        tree.tree_params.set_min_gain(min_gain.unwrap_or(0.3))?;
        tree.tree_params
            .set_min_samples_split(min_samples_split.unwrap_or(0));
        Ok(tree)
    }

    /// Domains used to re-bin query values. Without them the domains are
    /// taken from the training data.
    pub fn set_domains(&mut self, domains: Arc<AttributeDomains>) {
        self.domains = Some(domains);
    }

    pub fn with_domains(mut self, domains: Arc<AttributeDomains>) -> Self {
        self.set_domains(domains);
        self
    }

    pub fn min_gain(&self) -> f64 {
        self.tree_params.min_gain()
    }

    pub fn min_samples_split(&self) -> usize {
        self.tree_params.min_samples_split()
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.and_then(|idx| self.nodes.get(idx))
    }

    pub fn node(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    /// Nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.reachable().len()
    }

    /// Longest root to leaf path, counted in edges.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], idx: usize) -> usize {
            nodes[idx]
                .children
                .values()
                .map(|&child| 1 + walk(nodes, child))
                .max()
                .unwrap_or(0)
        }
        self.root.map_or(0, |root| walk(&self.nodes, root))
    }

    /// Names of the attributes the reachable nodes split on.
    pub fn split_features(&self) -> Vec<&str> {
        self.reachable()
            .into_iter()
            .filter_map(|idx| self.nodes[idx].feature_index)
            .map(|feature| self.features[feature].as_str())
            .collect()
    }

    fn reachable(&self) -> Vec<usize> {
        let mut stack = self.root.into_iter().collect::<Vec<_>>();
        let mut seen = Vec::new();
        while let Some(idx) = stack.pop() {
            seen.push(idx);
            stack.extend(self.nodes[idx].children.values().copied());
        }
        seen
    }

    /// Builds the decision tree from a dataset.
    ///
    /// # Returns
    ///
    /// A string indicating that the tree was built successfully.
    ///
    /// # Errors
    ///
    /// This method will return an error if the dataset is empty.
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

        self.nodes.clear();
        self.features = dataset.features.clone();
        let available = vec![true; dataset.ncols()];
        let root = self.build_tree(dataset, &available)?;
        self.root = Some(root);
        self.domains = Some(Arc::new(domains));

        debug!(
            nodes = self.node_count(),
            depth = self.depth(),
            "built id3 tree"
        );
        Ok("Finished building the tree.".into())
    }

    fn build_tree(&mut self, dataset: &Dataset, available: &[bool]) -> Result<usize> {
        let class_result = dataset.majority_class().ok_or(ModelError::EmptyDataset)?;

        let candidates = available
            .iter()
            .enumerate()
            .filter_map(|(idx, &usable)| usable.then_some(idx))
            .collect::<Vec<_>>();
        let min_samples_split = self.min_samples_split();
        let too_small = min_samples_split > 0 && dataset.nrows() < min_samples_split;
        let is_pure = dataset.class_counts().len() <= 1;

        if candidates.is_empty() || too_small || is_pure {
            return Ok(self.push(TreeNode::leaf(class_result)));
        }

        let gains = candidates
            .par_iter()
            .map(|&feature| (feature, normalized_gain(dataset, feature)))
            .collect::<Vec<_>>();

        // candidates are in column order, the first attribute wins a tie
        let mut best: Option<(usize, f64)> = None;
        for (feature, feature_gain) in gains {
            if best.map_or(true, |(_, best_gain)| feature_gain > best_gain) {
                best = Some((feature, feature_gain));
            }
        }
        let Some((feature, feature_gain)) = best else {
            return Ok(self.push(TreeNode::leaf(class_result)));
        };
        if feature_gain <= self.min_gain() {
            return Ok(self.push(TreeNode::leaf(class_result)));
        }

        let mut remaining = available.to_vec();
        remaining[feature] = false;

        let mut node = TreeNode::leaf(class_result);
        node.feature_index = Some(feature);
        for (value, rows) in dataset.partition(feature) {
            let child = self.build_tree(&dataset.select(&rows), &remaining)?;
            node.children.insert(value, child);
        }

        // a single branch adds nothing, the child takes this node's place
        if node.children.len() == 1 {
            if let Some(&child) = node.children.values().next() {
                return Ok(child);
            }
        }
        Ok(self.push(node))
    }

    fn push(&mut self, node: TreeNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn make_prediction(&self, row: &Row, root: usize, domains: &AttributeDomains) -> String {
        let mut node = &self.nodes[root];
        while let Some(feature) = node.feature_index {
            let name = &self.features[feature];
            let Some(raw) = row.get(name) else {
                break;
            };
            let value = domains.resolve(name, raw);
            match node.children.get(&value) {
                Some(&child) => node = &self.nodes[child],
                None => break,
            }
        }
        node.class_result.clone()
    }
}

/// Information gain divided by the attribute's own entropy, 0 for a constant
/// attribute.
pub fn normalized_gain(dataset: &Dataset, feature: usize) -> f64 {
    let attribute_entropy = entropy(dataset.column(feature));
    if attribute_entropy == 0.0 {
        return 0.0;
    }
    gain(dataset, feature) / attribute_entropy
}

impl Classifier for Id3Classifier {
    fn predict_row(&self, row: &Row) -> Result<String> {
        let root = self.root.ok_or(ModelError::NotFitted)?;
        let domains = self.domains.as_deref().ok_or(ModelError::NotFitted)?;
        Ok(self.make_prediction(row, root, domains))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::value::Value;
    use approx::assert_relative_eq;

    fn dataset(features: &[&str], rows: &[&[&str]], labels: &[&str]) -> Dataset {
        Dataset::from_rows(
            features.iter().map(|f| f.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|&v| Value::from(v)).collect())
                .collect(),
            labels.iter().map(|l| l.to_string()).collect(),
        )
        .unwrap()
    }

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), Value::from(*value)))
            .collect()
    }

    fn weather() -> Dataset {
        dataset(
            &["outlook", "windy"],
            &[
                &["sunny", "no"],
                &["sunny", "yes"],
                &["overcast", "no"],
                &["rain", "no"],
                &["rain", "yes"],
                &["overcast", "yes"],
            ],
            &["stay", "stay", "play", "play", "stay", "play"],
        )
    }

    #[test]
    fn test_with_params() {
        let tree = Id3Classifier::with_params(Some(0.1), Some(4)).unwrap();
        assert_eq!(tree.min_gain(), 0.1);
        assert_eq!(tree.min_samples_split(), 4);
        assert!(Id3Classifier::with_params(Some(f64::NAN), None).is_err());
    }

    #[test]
    fn test_normalized_gain() {
        let data = weather();
        // outlook: gain 1 - 2/6 = 0.666.., own entropy log2(3)
        assert_relative_eq!(
            normalized_gain(&data, 0),
            (2.0 / 3.0) / 3f64.log2(),
            epsilon = 1e-12
        );
        let constant = dataset(&["c"], &[&["k"], &["k"]], &["a", "b"]);
        assert_eq!(normalized_gain(&constant, 0), 0.0);
    }

    #[test]
    fn test_fit_and_predict() {
        let mut tree = Id3Classifier::with_params(Some(0.0), None).unwrap();
        tree.fit(&weather()).unwrap();

        assert_eq!(tree.split_features()[0], "outlook");
        let predictions = tree.predict(&weather()).unwrap();
        assert_eq!(predictions.as_slice(), weather().y.as_slice());

        let query = row(&[("outlook", "rain"), ("windy", "no")]);
        assert_eq!(tree.predict_row(&query).unwrap(), "play");
    }

    #[test]
    fn test_zero_gain_gives_single_leaf() {
        let xor = dataset(
            &["a", "b"],
            &[&["0", "0"], &["0", "1"], &["1", "0"], &["1", "1"]],
            &["f", "t", "t", "f"],
        );
        let mut tree = Id3Classifier::new();
        tree.fit(&xor).unwrap();

        assert_eq!(tree.node_count(), 1);
        assert!(tree.root().unwrap().is_leaf());
        assert_eq!(tree.root().unwrap().class_result, "f");
    }

    #[test]
    fn test_single_branch_nodes_are_pruned() {
        let data = dataset(
            &["constant", "noise"],
            &[&["k", "x"], &["k", "x"], &["k", "y"], &["k", "y"]],
            &["a", "b", "a", "b"],
        );

        // every split is allowed, "constant" wins the tie but only has one branch
        let mut tree = Id3Classifier::with_params(Some(-1.0), None).unwrap();
        tree.fit(&data).unwrap();
        assert_eq!(tree.split_features(), vec!["noise"]);
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.depth(), 1);

        let mut strict = Id3Classifier::with_params(Some(0.0), None).unwrap();
        strict.fit(&data).unwrap();
        assert_eq!(strict.node_count(), 1);
    }

    #[test]
    fn test_min_samples_split_stops_growth() {
        let mut tree = Id3Classifier::with_params(Some(0.0), Some(10)).unwrap();
        tree.fit(&weather()).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.root().unwrap().class_result, "play");
    }

    #[test]
    fn test_unseen_value_returns_majority() {
        let mut tree = Id3Classifier::with_params(Some(0.0), None).unwrap();
        tree.fit(&weather()).unwrap();

        let unseen = row(&[("outlook", "snow"), ("windy", "no")]);
        assert_eq!(tree.predict_row(&unseen).unwrap(), "play");
        let missing = row(&[("windy", "no")]);
        assert_eq!(tree.predict_row(&missing).unwrap(), "play");
    }

    #[test]
    fn test_numeric_queries_are_rebinned() {
        use crate::discretize::{discretize_dataset, DiscretizeParams, Strategy};

        let raw = Dataset::from_rows(
            vec!["age".into()],
            vec![
                vec![Value::number(25)],
                vec![Value::number(40)],
                vec![Value::number(60)],
                vec![Value::number(22)],
            ],
            vec!["n".into(), "y".into(), "y".into(), "n".into()],
        )
        .unwrap();
        let params = DiscretizeParams::with_strategy(Strategy::Entropy, 2).unwrap();
        let (binned, domains) = discretize_dataset(&raw, &params).unwrap();

        let mut tree = Id3Classifier::new().with_domains(Arc::new(domains));
        tree.fit(&binned).unwrap();

        let query = |age: i32| Row::from([("age".to_string(), Value::number(age))]);
        assert_eq!(tree.predict_row(&query(23)).unwrap(), "n");
        // out of range values clamp to the outermost intervals
        assert_eq!(tree.predict_row(&query(5)).unwrap(), "n");
        assert_eq!(tree.predict_row(&query(99)).unwrap(), "y");
    }

    #[test]
    fn test_predict_before_fit() {
        let tree = Id3Classifier::new();
        assert!(matches!(
            tree.predict_row(&Row::new()),
            Err(ModelError::NotFitted)
        ));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let mut tree = Id3Classifier::new();
        assert!(tree.fit(&weather().select(&[])).is_err());
    }
}
