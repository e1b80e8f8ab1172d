use crate::data::dataset::{Dataset, DEFAULT_LABEL};
use crate::data::structure::{ColumnKind, Structure};
use crate::data::value::Value;
use crate::error::{ModelError, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Cell contents read as missing, on top of the empty cell. Compared after
/// lower-casing.
const MISSING_MARKERS: [&str; 14] = [
    "#n/a", "#n/a n/a", "#na", "-1.#ind", "-1.#qnan", "-nan", "1.#ind", "1.#qnan", "<na>",
    "n/a", "na", "nan", "null", "none",
];

/// Loads a headed CSV file into a cleaned [`Dataset`].
///
/// Cells are trimmed and lower-cased. A column is numeric when every non
/// empty cell parses as a number, unless a structure file says otherwise.
/// Empty numeric cells get the column mean, empty categorical cells the most
/// common value. Rows without a label are dropped.
#[derive(Clone, Debug)]
pub struct DataReader {
    label: String,
    structure: Option<Structure>,
}

impl Default for DataReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataReader {
    pub fn new() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            structure: None,
        }
    }

    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into().trim().to_lowercase();
        self
    }

    /// Restricts the columns and class values to the declared ones.
    pub fn with_structure(mut self, structure: Structure) -> Self {
        self.structure = Some(structure);
        self
    }

    pub fn structure(&self) -> Option<&Structure> {
        self.structure.as_ref()
    }

    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let dataset = self.read(File::open(path)?)?;
        debug!(
            path = %path.display(),
            rows = dataset.nrows(),
            columns = dataset.ncols(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    pub fn read<R: Read>(&self, reader: R) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()?
            .iter()
            .map(|header| header.to_lowercase())
            .collect::<Vec<_>>();
        let label_idx = headers
            .iter()
            .position(|header| *header == self.label)
            .ok_or_else(|| ModelError::MissingLabel(self.label.clone()))?;

        let allowed_classes = self
            .structure
            .as_ref()
            .and_then(|structure| structure.categories(&self.label));

        let mut labels = Vec::new();
        let mut cells = Vec::new();
        for record in reader.records() {
            let record = record?;
            let label = normalize(record.get(label_idx).unwrap_or_default());
            if label.is_empty() {
                continue;
            }
            if let Some(classes) = allowed_classes {
                if !classes.contains(&label) {
                    continue;
                }
            }
            labels.push(label);
            cells.push(record.iter().map(normalize).collect::<Vec<_>>());
        }
        if labels.is_empty() {
            return Err(ModelError::EmptyDataset);
        }

        let kept = headers
            .iter()
            .enumerate()
            .filter(|&(idx, name)| {
                idx != label_idx
                    && self
                        .structure
                        .as_ref()
                        .map_or(true, |structure| structure.contains(name))
            })
            .collect::<Vec<_>>();

        let mut columns = Vec::with_capacity(kept.len());
        for &(idx, name) in &kept {
            let raw = cells
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or_default())
                .collect::<Vec<_>>();
            let kind = self.structure.as_ref().and_then(|s| s.kind(name));
            columns.push(clean_column(name, &raw, kind)?);
        }

        let features = kept.iter().map(|(_, name)| name.to_string()).collect();
        let rows = (0..labels.len())
            .map(|row| columns.iter().map(|column| column[row].clone()).collect())
            .collect();
        Ok(Dataset::from_rows(features, rows, labels)?.with_label(self.label.clone()))
    }
}

/// Lower-cased cell, or the empty string for a missing value marker.
fn normalize(cell: &str) -> String {
    let cell = cell.to_lowercase();
    if MISSING_MARKERS.contains(&cell.as_str()) {
        String::new()
    } else {
        cell
    }
}

/// Finite numbers only; `inf` and friends keep a column categorical.
fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn clean_column(name: &str, raw: &[&str], kind: Option<&ColumnKind>) -> Result<Vec<Value>> {
    let present = raw.iter().filter(|cell| !cell.is_empty()).collect::<Vec<_>>();
    if present.is_empty() {
        return Err(ModelError::EmptyColumn(name.to_string()));
    }

    let numbers = present
        .iter()
        .map(|cell| parse_number(cell))
        .collect::<Option<Vec<_>>>();
    let numbers = match (kind, numbers) {
        (Some(ColumnKind::Categorical(_)), _) => None,
        (Some(ColumnKind::Numeric), None) => {
            return Err(ModelError::NotNumeric(name.to_string()));
        }
        (_, numbers) => numbers,
    };

    if let Some(numbers) = numbers {
        let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
        return Ok(raw
            .iter()
            .map(|cell| Value::number(parse_number(cell).unwrap_or(mean)))
            .collect());
    }

    let mut counts = BTreeMap::new();
    for cell in &present {
        *counts.entry(**cell).or_insert(0usize) += 1;
    }
    // BTreeMap iterates in order, so the first maximum is the smallest value
    let mut mode = "";
    let mut best = 0;
    for (value, count) in counts {
        if count > best {
            mode = value;
            best = count;
        }
    }
    Ok(raw
        .iter()
        .map(|cell| Value::category(if cell.is_empty() { mode } else { *cell }))
        .collect())
}
