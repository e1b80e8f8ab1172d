use crate::error::{ModelError, Result};
use nalgebra::{DMatrix, DVector};
use std::collections::BTreeSet;
use std::fmt::{self, Debug, Display, Formatter};

/// Counts of (expected, predicted) label pairs.
///
/// Rows are expected labels, columns predicted labels, both in sorted label
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfusionMatrix<T> {
    pub labels: Vec<T>,
    pub matrix: DMatrix<usize>,
}

impl<T: Display> Display for ConfusionMatrix<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "expected \\ predicted")?;
        for label in &self.labels {
            write!(f, "\t{}", label)?;
        }
        for (row, label) in self.labels.iter().enumerate() {
            write!(f, "\n{}", label)?;
            for col in 0..self.labels.len() {
                write!(f, "\t{}", self.matrix[(row, col)])?;
            }
        }
        Ok(())
    }
}

pub trait ClassificationMetrics<T: Clone + Ord + Debug + 'static = String> {
    /// Computes the confusion matrix based on the true labels and predicted labels.
    ///
    /// # Arguments
    ///
    /// * `y_true` - The true labels.
    /// * `y_pred` - The predicted labels.
    ///
    /// # Returns
    ///
    /// The confusion matrix as a `Result` containing a `ConfusionMatrix` or an error message.
    fn confusion_matrix(
        &self,
        y_true: &DVector<T>,
        y_pred: &DVector<T>,
    ) -> Result<ConfusionMatrix<T>> {
        if y_true.len() != y_pred.len() {
            return Err(ModelError::shape_mismatch(
                "Predictions and labels are of different sizes.",
            ));
        }

        let labels = y_true
            .iter()
            .chain(y_pred.iter())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();

        let mut matrix = DMatrix::zeros(labels.len(), labels.len());

        for (y_t, y_p) in y_true.iter().zip(y_pred.iter()) {
            // labels holds every value of both vectors
            if let (Ok(row), Ok(col)) = (labels.binary_search(y_t), labels.binary_search(y_p)) {
                matrix[(row, col)] += 1;
            }
        }

        Ok(ConfusionMatrix { labels, matrix })
    }

    /// Computes the accuracy based on the true labels and predicted labels.
    ///
    /// # Returns
    ///
    /// The accuracy as a `Result` containing a `f64` value or an error message.
    fn accuracy(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<f64> {
        let confusion = self.confusion_matrix(y_true, y_pred)?;
        if y_true.is_empty() {
            return Ok(0.0);
        }

        let correct = confusion.matrix.diagonal().sum();

        Ok(correct as f64 / y_true.len() as f64)
    }

    /// Macro averaged precision over every label.
    fn precision(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<f64> {
        let confusion = self.confusion_matrix(y_true, y_pred)?;
        let matrix = &confusion.matrix;

        let num_classes = matrix.nrows();
        if num_classes == 0 {
            return Ok(0.0);
        }

        let mut precision_total = 0.0;
        for class in 0..num_classes {
            let tp = matrix[(class, class)];
            let fp = matrix.column(class).sum() - tp;

            if tp + fp > 0 {
                precision_total += tp as f64 / (tp + fp) as f64;
            }
        }

        Ok(precision_total / num_classes as f64)
    }

    /// Macro averaged recall over every label.
    fn recall(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<f64> {
        let confusion = self.confusion_matrix(y_true, y_pred)?;
        let matrix = &confusion.matrix;

        let num_classes = matrix.nrows();
        if num_classes == 0 {
            return Ok(0.0);
        }

        let mut recall_total = 0.0;
        for class in 0..num_classes {
            let tp = matrix[(class, class)];
            let fn_ = matrix.row(class).sum() - tp;

            if tp + fn_ > 0 {
                recall_total += tp as f64 / (tp + fn_) as f64;
            }
        }

        Ok(recall_total / num_classes as f64)
    }
}
