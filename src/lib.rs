//! Statistics and chart inputs for the PTN international undergraduate
//! program (IUP) dataset.
//!
//! The dataset is loaded once into an immutable [`Dataset`] and every query
//! borrows it through a [`DatasetAnalyzer`].

pub mod analyzer;
pub mod charts;
pub mod currency;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;

pub use analyzer::{DatasetAnalyzer, InstitutionDetail, NationalSummary, SummaryOptions};
pub use error::{DashboardError, Result};
pub use loader::DatasetLoader;
pub use models::{Config, Dataset, Direction, Field, ProgramRecord};
