use crate::data::value::Value;
use crate::error::{ModelError, Result};
use nalgebra::{DMatrix, DVector};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug, Formatter};

/// Name of the label column unless told otherwise.
pub const DEFAULT_LABEL: &str = "class";

/// One row addressed by attribute name.
pub type Row = HashMap<String, Value>;

/// Rows of named attributes plus one class label per row.
///
/// Feature cells live in `x` (one column per entry of `features`), labels in
/// `y`. Every row carries the same attribute set by construction.
#[derive(Clone)]
pub struct Dataset {
    pub features: Vec<String>,
    pub x: DMatrix<Value>,
    pub y: DVector<String>,
    label: String,
}

impl Debug for Dataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    features: {:?},\n    x: [\n", self.features)?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for j in 0..self.x.ncols() {
                write!(f, "{}, ", self.x[(i, j)])?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ],\n    {}: [", self.label)?;
        for label in self.y.iter() {
            write!(f, "{}, ", label)?;
        }
        write!(f, "]\n}}")
    }
}

impl Dataset {
    pub fn new(features: Vec<String>, x: DMatrix<Value>, y: DVector<String>) -> Result<Self> {
        if x.ncols() != features.len() {
            return Err(ModelError::shape_mismatch(format!(
                "{} feature names for {} columns",
                features.len(),
                x.ncols()
            )));
        }
        if x.nrows() != y.len() {
            return Err(ModelError::shape_mismatch(format!(
                "{} rows for {} labels",
                x.nrows(),
                y.len()
            )));
        }
        Ok(Self {
            features,
            x,
            y,
            label: DEFAULT_LABEL.to_string(),
        })
    }

    /// Builds a dataset from row vectors, rejecting ragged rows.
    pub fn from_rows(
        features: Vec<String>,
        rows: Vec<Vec<Value>>,
        labels: Vec<String>,
    ) -> Result<Self> {
        let ncols = features.len();
        if let Some(idx) = rows.iter().position(|row| row.len() != ncols) {
            return Err(ModelError::shape_mismatch(format!(
                "row {} has {} values, expected {}",
                idx,
                rows[idx].len(),
                ncols
            )));
        }
        let nrows = rows.len();
        let cells = rows.into_iter().flatten().collect::<Vec<_>>();
        Self::new(
            features,
            DMatrix::from_row_slice(nrows, ncols, &cells),
            DVector::from_vec(labels),
        )
    }

    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_not_empty(&self) -> bool {
        !self.y.is_empty()
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    pub fn feature_index(&self, name: &str) -> Result<usize> {
        self.features
            .iter()
            .position(|feature| feature == name)
            .ok_or_else(|| ModelError::UnknownAttribute(name.to_string()))
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        (0..self.nrows()).map(move |row| &self.x[(row, index)])
    }

    /// True when the column is non-empty and holds only numbers.
    pub fn is_numeric(&self, index: usize) -> bool {
        self.nrows() > 0 && self.column(index).all(Value::is_number)
    }

    /// The row as a name to value map, label included.
    pub fn row(&self, index: usize) -> Row {
        let mut row = self
            .features
            .iter()
            .enumerate()
            .map(|(col, name)| (name.clone(), self.x[(index, col)].clone()))
            .collect::<Row>();
        row.insert(self.label.clone(), Value::Category(self.y[index].clone()));
        row
    }

    /// New dataset holding the given rows in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        let x = DMatrix::from_fn(indices.len(), self.ncols(), |row, col| {
            self.x[(indices[row], col)].clone()
        });
        let y = DVector::from_fn(indices.len(), |row, _| self.y[indices[row]].clone());
        Self {
            features: self.features.clone(),
            x,
            y,
            label: self.label.clone(),
        }
    }

    /// Row indices grouped by the value they hold in `index`.
    pub fn partition(&self, index: usize) -> BTreeMap<Value, Vec<usize>> {
        let mut groups: BTreeMap<Value, Vec<usize>> = BTreeMap::new();
        for (row, value) in self.column(index).enumerate() {
            groups.entry(value.clone()).or_default().push(row);
        }
        groups
    }

    pub fn class_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for label in self.y.iter() {
            *counts.entry(label.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Sorted distinct class labels.
    pub fn classes(&self) -> Vec<String> {
        self.class_counts().keys().map(|c| c.to_string()).collect()
    }

    /// Most frequent class, the lexicographically first one on ties.
    pub fn majority_class(&self) -> Option<String> {
        let mut best: Option<(&str, usize)> = None;
        for (class, count) in self.class_counts() {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((class, count));
            }
        }
        best.map(|(class, _)| class.to_string())
    }

    pub fn set_column(&mut self, index: usize, values: Vec<Value>) -> Result<()> {
        if index >= self.ncols() {
            return Err(ModelError::UnknownAttribute(format!("#{}", index)));
        }
        if values.len() != self.nrows() {
            return Err(ModelError::shape_mismatch(format!(
                "{} values for {} rows",
                values.len(),
                self.nrows()
            )));
        }
        for (row, value) in values.into_iter().enumerate() {
            self.x[(row, index)] = value;
        }
        Ok(())
    }

    pub fn train_test_split(&self, train_size: f64, seed: Option<u64>) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&train_size) {
            return Err(ModelError::invalid_parameter(
                "Train size should be between 0.0 and 1.0",
            ));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.nrows()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        let train_size = (self.nrows() as f64 * train_size).floor() as usize;

        Ok((
            self.select(&indices[..train_size]),
            self.select(&indices[train_size..]),
        ))
    }
}
