//! Leafsense - Plant Condition Diagnostics
//!
//! Diagnoses the health of an individual plant observation by combining
//! semantic similarity search over symptom descriptions with structured
//! comparison of environmental sensor readings, producing concrete
//! environment-adjustment advice benchmarked against healthier reference
//! observations of the same species.

pub mod analyze;
pub mod compare;
pub mod embedding;
pub mod groups;
pub mod growth;
pub mod record;
pub mod report;
pub mod search;
pub mod similarity;
pub mod store;
