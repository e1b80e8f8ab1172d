/// Dataset container
pub mod dataset;
/// Shared attribute domains
pub mod domain;
/// CSV ingestion and cleaning
pub mod reader;
/// Structure file parsing
pub mod structure;
/// Cell values
pub mod value;

pub use dataset::{Dataset, Row, DEFAULT_LABEL};
pub use domain::{AttributeDomain, AttributeDomains};
pub use value::Value;
