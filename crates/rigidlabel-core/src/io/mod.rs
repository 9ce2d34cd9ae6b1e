#![forbid(unsafe_code)]

//! File formats: tie-point CSV, plain-text matrices, and GT folders.

pub mod csv;
pub mod matrix;

pub use csv::{CsvDocument, CsvError, CsvHeader, CsvRow, ImportSummary};
pub use matrix::{GtExporter, MatrixError};
