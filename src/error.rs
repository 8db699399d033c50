//! Error types for the analyzer library.
//!
//! Only loading can fail fatally. Unparseable numeric cells are not errors:
//! they become missing values during normalization.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP request to {url} failed with status: {status}")]
    HttpStatus { url: String, status: u16 },

    /// The header row lacks one of the fixed dataset columns
    #[error("Dataset is missing required column: {0}")]
    MissingColumn(String),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Configuration serialization error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No row of the dataset belongs to the requested institution
    #[error("Data untuk {0} tidak ditemukan")]
    InstitutionNotFound(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
