//! Error type shared by the whole crate.

use std::io;

use thiserror::Error;

/// Errors raised while loading data, discretizing it or training a model.
///
/// Prediction never produces these for odd rows: unseen values fall back to
/// the majority class instead. Only structural problems surface here.
#[derive(Error, Debug)]
pub enum ModelError {
    /// I/O errors (reading datasets, writing reports)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A dataset without a single row
    #[error("Dataset is empty.")]
    EmptyDataset,

    /// The label column is absent from the header
    #[error("Label column '{0}' is missing.")]
    MissingLabel(String),

    /// An attribute name that is not part of the dataset
    #[error("Unknown attribute '{0}'.")]
    UnknownAttribute(String),

    /// A query row lacks an attribute the model was trained on
    #[error("Row has no value for attribute '{0}'.")]
    MissingAttribute(String),

    /// A column without a single value to impute from
    #[error("Column '{0}' has no values.")]
    EmptyColumn(String),

    /// Discretization was requested for a non numeric column
    #[error("Attribute '{0}' is not numeric.")]
    NotNumeric(String),

    /// Rows and labels or predictions and labels disagree in size
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A parameter outside its valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Structure file could not be understood
    #[error("Structure error at line {line}: {message}")]
    Structure { line: usize, message: String },

    /// Prediction was requested before `fit`
    #[error("Model wasn't fitted yet.")]
    NotFitted,
}

impl ModelError {
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        ModelError::InvalidParameter(msg.into())
    }

    pub fn shape_mismatch<S: Into<String>>(msg: S) -> Self {
        ModelError::ShapeMismatch(msg.into())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ModelError>;
