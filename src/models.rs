use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Data source configuration
    pub data_source_mode: DataSourceMode,
    pub data_file: Option<String>,
    pub data_url: Option<String>,
    pub output_directory: Option<String>,
    /// Drop rows missing either UKT or DAYA TAMPUNG before ranking extremes
    pub complete_rows_only: bool,
    pub top_n: TopN,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSourceMode {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "internet")]
    Internet,
}

/// How many entries each nationwide ranking keeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopN {
    pub provinces_stat: usize,
    pub provinces_chart: usize,
    pub programs: usize,
    pub extremes: usize,
}

impl Default for TopN {
    fn default() -> Self {
        Self {
            provinces_stat: 3,
            provinces_chart: 8,
            programs: 8,
            extremes: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source_mode: DataSourceMode::Local,
            data_file: Some("MINI_TIM_B.csv".to_string()),
            data_url: Some("https://example.com/MINI_TIM_B.csv".to_string()),
            output_directory: Some("output".to_string()),
            complete_rows_only: false,
            top_n: TopN::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }
}

/// One program offered by one institution (one CSV row).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramRecord {
    pub institution: String,
    pub program: String,
    pub province: String,
    pub city: String,
    pub capacity: Option<u32>,
    pub tuition: Option<u64>,
    /// Display-only rupiah rendering of `tuition`; missing shows as `Rp0`
    pub tuition_formatted: String,
}

/// Numeric columns the engine aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Capacity,
    Tuition,
}

impl Field {
    pub fn value(&self, record: &ProgramRecord) -> Option<u64> {
        match self {
            Field::Capacity => record.capacity.map(u64::from),
            Field::Tuition => record.tuition,
        }
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            Field::Capacity => "DAYA TAMPUNG",
            Field::Tuition => "UKT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Highest,
    Lowest,
}

/// Text columns that can be counted for distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Institution,
    Program,
    Province,
    City,
}

impl Column {
    pub fn value<'r>(&self, record: &'r ProgramRecord) -> &'r str {
        match self {
            Column::Institution => &record.institution,
            Column::Program => &record.program,
            Column::Province => &record.province,
            Column::City => &record.city,
        }
    }
}

/// Row subset an aggregate runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'s> {
    All,
    Institution(&'s str),
}

impl Scope<'_> {
    pub fn contains(&self, record: &ProgramRecord) -> bool {
        match self {
            Scope::All => true,
            Scope::Institution(name) => record.institution == *name,
        }
    }
}

/// The loaded program table. Built once by the loader and only read after.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<ProgramRecord>,
}

impl Dataset {
    pub fn new(records: Vec<ProgramRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ProgramRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
