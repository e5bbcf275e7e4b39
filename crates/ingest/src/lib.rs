//! Spreadsheet ingestion: uploaded bytes in, ordered signals out.
//!
//! This crate provides:
//! - `ingest` for xlsx/xls/xlsb/ods uploads (first sheet only)
//! - The column resolver and row normalizer it is built from
//! - `upload_key` for storing the original file

pub mod spreadsheet;
pub mod upload;

pub use spreadsheet::{ingest, FormatError};
pub use upload::upload_key;
