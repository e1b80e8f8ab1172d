use crate::data::dataset::{Dataset, Row};
use crate::error::Result;
use nalgebra::DVector;
use rayon::prelude::*;

/// A trained model that labels rows.
///
/// Models are read-only once fitted, so rows of a batch are predicted in
/// parallel.
pub trait Classifier: Sync {
    /// Predicts the class of one row. The label column, when present, is
    /// ignored. Fails only when the model was never fitted.
    fn predict_row(&self, row: &Row) -> Result<String>;

    /// Predicts every row of a dataset.
    fn predict(&self, dataset: &Dataset) -> Result<DVector<String>> {
        let predictions = (0..dataset.nrows())
            .into_par_iter()
            .map(|index| self.predict_row(&dataset.row(index)))
            .collect::<Result<Vec<_>>>()?;
        Ok(DVector::from_vec(predictions))
    }
}
