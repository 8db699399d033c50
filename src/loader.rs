use crate::currency::{format_tuition, parse_tuition};
use crate::error::{DashboardError, Result};
use crate::models::{Dataset, ProgramRecord};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use tracing::{debug, info, warn};

/// Header names the dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = ["PTN", "JURUSAN", "PROVINSI", "KOTA", "DAYA TAMPUNG", "UKT"];

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "PTN", default)]
    institution: String,
    #[serde(rename = "JURUSAN", default)]
    program: String,
    #[serde(rename = "PROVINSI", default)]
    province: String,
    #[serde(rename = "KOTA", default)]
    city: String,
    #[serde(rename = "DAYA TAMPUNG", default)]
    capacity: String,
    #[serde(rename = "UKT", default)]
    tuition: String,
}

pub struct DatasetLoader {
    client: reqwest::Client,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Load from a local path or, for `http(s)://` sources, over the network.
    pub async fn load(&self, source: &str) -> Result<Dataset> {
        if source.starts_with("http://") || source.starts_with("https://") {
            self.load_url(source).await
        } else {
            self.load_file(source)
        }
    }

    pub fn load_file(&self, file_path: &str) -> Result<Dataset> {
        info!(path = file_path, "Reading dataset file");
        let file = File::open(file_path)?;
        parse_csv(file)
    }

    pub async fn load_url(&self, url: &str) -> Result<Dataset> {
        info!(url, "Fetching dataset");

        let response = self
            .client
            .get(url)
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DashboardError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let content = response.bytes().await?;
        parse_csv(content.as_ref())
    }
}

/// Parse CSV content into a [`Dataset`], keeping every data row.
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DashboardError::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    let mut missing_capacity = 0usize;
    let mut missing_tuition = 0usize;

    for row in csv_reader.deserialize::<RawRow>() {
        let row = row?;
        let record = normalize_row(row);
        if record.capacity.is_none() {
            missing_capacity += 1;
        }
        if record.tuition.is_none() {
            missing_tuition += 1;
        }
        if record.institution.is_empty() || record.program.is_empty() {
            warn!(
                institution = %record.institution,
                program = %record.program,
                "Row without institution or program name"
            );
        }
        records.push(record);
    }

    debug!(missing_capacity, missing_tuition, "Numeric fields marked missing");
    info!(rows = records.len(), "Dataset loaded");

    Ok(Dataset::new(records))
}

fn normalize_row(row: RawRow) -> ProgramRecord {
    let tuition = parse_tuition(&row.tuition);
    ProgramRecord {
        institution: row.institution,
        program: row.program,
        province: row.province,
        city: row.city,
        capacity: parse_capacity(&row.capacity),
        tuition,
        tuition_formatted: format_tuition(tuition),
    }
}

/// Coerce a `DAYA TAMPUNG` cell; `"120"` and `"120.0"` both give 120.
pub fn parse_capacity(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u32>() {
        return Some(value);
    }

    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}
