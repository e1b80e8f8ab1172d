use crate::data::value::Value;
use std::collections::BTreeMap;

/// Decision tree node stored in the classifier's arena.
///
/// A leaf has no split attribute and no children. An internal node keeps
/// `class_result` as the answer for values none of its branches cover.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub class_result: String,
    pub feature_index: Option<usize>,
    pub children: BTreeMap<Value, usize>,
}

impl TreeNode {
    pub fn leaf(class_result: String) -> Self {
        Self {
            class_result,
            feature_index: None,
            children: BTreeMap::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.feature_index.is_none()
    }
}
