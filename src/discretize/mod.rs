/// Interval type and the interval resolver
pub mod interval;
/// Discretization parameters
pub mod params;
/// Entropy based, supervised discretization
pub mod supervised;
/// Equal width and equal depth binning
pub mod unsupervised;

pub use interval::{find_best_interval, Interval};
pub use params::{DiscretizeParams, Strategy};
pub use supervised::discretize;

use crate::data::dataset::Dataset;
use crate::data::domain::{AttributeDomain, AttributeDomains};
use crate::data::value::Value;
use crate::error::{ModelError, Result};
use tracing::debug;

/// Replaces every numeric column with interval values.
///
/// Returns the binned dataset together with the domains of all attributes,
/// which the classifiers need to re-bin query rows later on.
pub fn discretize_dataset(
    dataset: &Dataset,
    params: &DiscretizeParams,
) -> Result<(Dataset, AttributeDomains)> {
    if !dataset.is_not_empty() {
        return Err(ModelError::EmptyDataset);
    }
    let mut binned = dataset.clone();
    let mut domains = AttributeDomains::new();

    for (idx, name) in dataset.features.iter().enumerate() {
        if !dataset.is_numeric(idx) {
            domains.insert(name.clone(), AttributeDomain::from_values(dataset.column(idx)));
            continue;
        }

        let values = dataset
            .column(idx)
            .filter_map(Value::as_number)
            .collect::<Vec<_>>();
        let intervals = match params.strategy() {
            Strategy::EqualWidth => unsupervised::equal_width(&values, params.bins()),
            Strategy::EqualDepth => unsupervised::equal_depth(&values, params.bins()),
            Strategy::Entropy => discretize(dataset, name, params.levels())?,
        };
        debug!(
            attribute = name.as_str(),
            strategy = %params.strategy(),
            intervals = intervals.len(),
            "binned numeric attribute"
        );

        let column = dataset
            .column(idx)
            .map(|value| {
                find_best_interval(value, &intervals)
                    .map(Value::Interval)
                    .unwrap_or_else(|| value.clone())
            })
            .collect();
        binned.set_column(idx, column)?;
        domains.insert(name.clone(), AttributeDomain::Intervals(intervals));
    }

    Ok((binned, domains))
}
