use crate::error::{ModelError, Result};

#[derive(Clone, Debug)]
pub struct TreeParams {
    pub min_gain: f64,
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub fn new() -> Self {
        Self {
            min_gain: 0.3,
            min_samples_split: 0,
        }
    }

    /// Sets the normalized gain a split has to exceed.
    ///
    /// Negative values let the tree split on attributes without any gain,
    /// single branch splits are then removed by pruning.
    pub fn set_min_gain(&mut self, min_gain: f64) -> Result<()> {
        if !min_gain.is_finite() {
            return Err(ModelError::invalid_parameter(
                "The minimum gain must be a finite number.",
            ));
        }
        self.min_gain = min_gain;
        Ok(())
    }

    /// Subsets smaller than this become leaves, 0 disables the check.
    pub fn set_min_samples_split(&mut self, min_samples_split: usize) {
        self.min_samples_split = min_samples_split;
    }

    pub fn min_gain(&self) -> f64 {
        self.min_gain
    }

    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = TreeParams::default();
        assert_eq!(params.min_gain(), 0.3);
        assert_eq!(params.min_samples_split(), 0);
    }

    #[test]
    fn test_min_gain_must_be_finite() {
        let mut params = TreeParams::new();
        assert!(params.set_min_gain(f64::NAN).is_err());
        assert!(params.set_min_gain(f64::INFINITY).is_err());
        assert!(params.set_min_gain(-0.5).is_ok());
        assert_eq!(params.min_gain(), -0.5);
    }
}
