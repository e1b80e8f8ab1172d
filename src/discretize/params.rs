use crate::error::{ModelError, Result};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// How numeric columns are turned into intervals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    EqualWidth,
    EqualDepth,
    Entropy,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::EqualWidth, Strategy::EqualDepth, Strategy::Entropy];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::EqualWidth => "equal width",
            Strategy::EqualDepth => "equal depth",
            Strategy::Entropy => "entropy",
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "equal width" | "width" => Ok(Strategy::EqualWidth),
            "equal depth" | "depth" => Ok(Strategy::EqualDepth),
            "entropy" => Ok(Strategy::Entropy),
            other => Err(ModelError::invalid_parameter(format!(
                "Unknown discretization strategy '{}'.",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DiscretizeParams {
    pub strategy: Strategy,
    pub bins: usize,
}

impl Default for DiscretizeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscretizeParams {
    pub fn new() -> Self {
        Self {
            strategy: Strategy::Entropy,
            bins: 5,
        }
    }

    pub fn with_strategy(strategy: Strategy, bins: usize) -> Result<Self> {
        let mut params = Self::new();
        params.set_strategy(strategy);
        params.set_bins(bins)?;
        Ok(params)
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    pub fn set_bins(&mut self, bins: usize) -> Result<()> {
        if bins < 1 {
            return Err(ModelError::invalid_parameter(
                "The number of bins must be greater than 0.",
            ));
        }
        self.bins = bins;
        Ok(())
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Halving rounds of the entropy strategy, never fewer than two.
    pub fn levels(&self) -> u32 {
        (self.bins as f64).log2().floor().max(2.0) as u32
    }
}
