use crate::data::domain::{AttributeDomain, AttributeDomains};
use crate::data::value::Value;
use crate::error::{ModelError, Result};
use std::fs;
use std::path::Path;

const ATTRIBUTE_TAG: &str = "@attribute";
const NUMERIC_TAG: &str = "numeric";

/// Declared type of one column.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnKind {
    Numeric,
    Categorical(Vec<String>),
}

/// Column declarations read from a structure file.
///
/// Every non blank line has the form `@ATTRIBUTE <name> <{v1,v2,...}|NUMERIC>`.
/// Names and values are lower-cased like the data they describe.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Structure {
    columns: Vec<(String, ColumnKind)>,
}

impl Structure {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut columns: Vec<(String, ColumnKind)> = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let error = |message: &str| ModelError::Structure {
                line: idx + 1,
                message: message.to_string(),
            };

            let (tag, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            if !tag.eq_ignore_ascii_case(ATTRIBUTE_TAG) {
                return Err(error("expected @ATTRIBUTE"));
            }
            let rest = rest.trim_start();
            let (name, kind) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if name.is_empty() {
                return Err(error("missing attribute name"));
            }
            let name = name.to_lowercase();
            let kind = kind.trim();
            if kind.is_empty() {
                return Err(error("missing attribute type"));
            }

            let kind = if kind.eq_ignore_ascii_case(NUMERIC_TAG) {
                ColumnKind::Numeric
            } else if kind.starts_with('{') && kind.ends_with('}') {
                let values = kind[1..kind.len() - 1]
                    .split(',')
                    .map(|value| value.trim().to_lowercase())
                    .filter(|value| !value.is_empty())
                    .collect::<Vec<_>>();
                if values.is_empty() {
                    return Err(error("empty value list"));
                }
                ColumnKind::Categorical(values)
            } else {
                return Err(error("type must be NUMERIC or a {...} value list"));
            };

            if columns.iter().any(|(existing, _)| *existing == name) {
                return Err(error("attribute declared twice"));
            }
            columns.push((name, kind));
        }

        Ok(Self { columns })
    }

    /// Declared column names in file order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.kind(column).is_some()
    }

    pub fn kind(&self, column: &str) -> Option<&ColumnKind> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, kind)| kind)
    }

    /// The values a categorical column may take.
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        match self.kind(column) {
            Some(ColumnKind::Categorical(values)) => Some(values),
            _ => None,
        }
    }

    /// Categorical domains of every declared attribute except the label.
    pub fn domains(&self, label: &str) -> AttributeDomains {
        let mut domains = AttributeDomains::new();
        for (name, kind) in self.columns.iter().filter(|(name, _)| name != label) {
            if let ColumnKind::Categorical(values) = kind {
                let values = values.iter().cloned().map(Value::category).collect();
                domains.insert(name.clone(), AttributeDomain::Categories(values));
            }
        }
        domains
    }
}
