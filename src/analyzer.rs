use crate::currency::format_rupiah;
use crate::error::{DashboardError, Result};
use crate::models::{Column, Config, Dataset, Direction, Field, ProgramRecord, Scope};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Placeholder shown when an average has no input values.
pub const NOT_AVAILABLE: &str = "N/A";

/// The program holding an institution's highest or lowest value of a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremum {
    pub institution: String,
    pub program: String,
    pub value: u64,
}

/// One line of the per-institution program table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub program: String,
    pub capacity: Option<u32>,
    pub tuition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstitutionDetail {
    pub institution: String,
    pub rows: Vec<ProgramRecord>,
    pub table: Vec<TableRow>,
    pub avg_capacity: Option<f64>,
    pub avg_tuition: Option<f64>,
    pub avg_capacity_display: String,
    pub avg_tuition_display: String,
    /// (program, capacity) in source order
    pub pie_slices: Vec<(String, u64)>,
    /// (program, tuition), cheapest first
    pub tuition_bars: Vec<(String, u64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalSummary {
    pub institution_count: usize,
    pub province_count: usize,
    pub city_count: usize,
    pub program_name_count: usize,
    pub total_programs: usize,
    pub top_provinces: Vec<(String, usize)>,
    pub province_distribution: Vec<(String, usize)>,
    pub popular_programs: Vec<(String, usize)>,
    pub highest_tuition: Vec<Extremum>,
    pub lowest_tuition: Vec<Extremum>,
    pub largest_capacity: Vec<Extremum>,
    pub smallest_capacity: Vec<Extremum>,
    pub programs_per_institution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone)]
pub struct SummaryOptions {
    pub top_provinces_stat: usize,
    pub top_provinces_chart: usize,
    pub top_programs: usize,
    pub top_extremes: usize,
    /// Rank extremes only over rows where both UKT and DAYA TAMPUNG are present
    pub complete_rows_only: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SummaryOptions {
    fn from(config: &Config) -> Self {
        Self {
            top_provinces_stat: config.top_n.provinces_stat,
            top_provinces_chart: config.top_n.provinces_chart,
            top_programs: config.top_n.programs,
            top_extremes: config.top_n.extremes,
            complete_rows_only: config.complete_rows_only,
        }
    }
}

/// Read-only queries over a loaded [`Dataset`].
///
/// Every query is a pure function of the table: missing numeric values are
/// skipped, never counted as zero, and no query mutates the dataset.
pub struct DatasetAnalyzer<'a> {
    dataset: &'a Dataset,
}

impl<'a> DatasetAnalyzer<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Alphabetically sorted institution names
    pub fn distinct_institutions(&self) -> BTreeSet<String> {
        self.dataset
            .records()
            .iter()
            .filter(|r| !r.institution.is_empty())
            .map(|r| r.institution.clone())
            .collect()
    }

    /// Number of distinct non-empty values in a text column
    pub fn count_distinct(&self, column: Column) -> usize {
        self.dataset
            .records()
            .iter()
            .map(|r| column.value(r))
            .filter(|v| !v.is_empty())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Distinct program names offered by each institution
    pub fn program_count_per_institution(&self) -> BTreeMap<String, usize> {
        let mut programs: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
        for record in self.dataset.records() {
            if record.institution.is_empty() {
                continue;
            }
            let entry = programs.entry(record.institution.as_str()).or_default();
            if !record.program.is_empty() {
                entry.insert(record.program.as_str());
            }
        }

        programs
            .into_iter()
            .map(|(institution, names)| (institution.to_string(), names.len()))
            .collect()
    }

    pub fn top_provinces_by_institution_count(&self, n: usize) -> Vec<(String, usize)> {
        take_top(self.institutions_per(Column::Province), n)
    }

    /// Program names ranked by how many institutions offer them
    pub fn top_programs_by_popularity(&self, n: usize) -> Vec<(String, usize)> {
        take_top(self.institutions_per(Column::Program), n)
    }

    /// One row per institution holding its highest or lowest `field` value,
    /// ranked across institutions and cut to `n`.
    ///
    /// Within an institution the first row in source order wins a tie. Across
    /// institutions the sort is stable, so equal values keep the order in
    /// which the institutions first appear.
    pub fn extremum_per_institution(&self, field: Field, direction: Direction, n: usize) -> Vec<Extremum> {
        rank_extremes(self.dataset.records().iter(), field, direction, n)
    }

    /// All rows of one institution in source order
    pub fn rows_for_institution(&self, name: &str) -> Vec<&'a ProgramRecord> {
        self.dataset
            .records()
            .iter()
            .filter(|r| r.institution == name)
            .collect()
    }

    /// Mean of the present values of `field`, or `None` when there are none
    pub fn mean_present(&self, field: Field, scope: Scope<'_>) -> Option<f64> {
        let (sum, count) = self
            .dataset
            .records()
            .iter()
            .filter(|r| scope.contains(r))
            .filter_map(|r| field.value(r))
            .fold((0.0_f64, 0usize), |(sum, count), v| (sum + v as f64, count + 1));

        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// (program, capacity) pairs for the capacity pie chart
    pub fn pie_slices(&self, institution: &str) -> Vec<(String, u64)> {
        self.present_values(institution, Field::Capacity)
    }

    pub fn sorted_bar_series(&self, institution: &str, field: Field, ascending: bool) -> Vec<(String, u64)> {
        let mut series = self.present_values(institution, field);
        if ascending {
            series.sort_by_key(|(_, value)| *value);
        } else {
            series.sort_by(|a, b| b.1.cmp(&a.1));
        }
        series
    }

    /// Everything the detail view of one institution needs.
    pub fn institution_detail(&self, name: &str) -> Result<InstitutionDetail> {
        let rows = self.rows_for_institution(name);
        if rows.is_empty() {
            return Err(DashboardError::InstitutionNotFound(name.to_string()));
        }

        let scope = Scope::Institution(name);
        let avg_capacity = self.mean_present(Field::Capacity, scope);
        let avg_tuition = self.mean_present(Field::Tuition, scope);

        let avg_capacity_display = avg_capacity
            .map(|avg| format!("{}", avg.trunc() as u64))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let avg_tuition_display = avg_tuition
            .map(|avg| format_rupiah(Some(avg)))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let table = rows
            .iter()
            .map(|r| TableRow {
                program: r.program.clone(),
                capacity: r.capacity,
                tuition: r.tuition_formatted.clone(),
            })
            .collect();

        debug!(institution = name, rows = rows.len(), "Built institution detail");

        Ok(InstitutionDetail {
            institution: name.to_string(),
            table,
            avg_capacity,
            avg_tuition,
            avg_capacity_display,
            avg_tuition_display,
            pie_slices: self.pie_slices(name),
            tuition_bars: self.sorted_bar_series(name, Field::Tuition, true),
            rows: rows.into_iter().cloned().collect(),
        })
    }

    /// Nationwide statistics and rankings for the dashboard front page.
    pub fn national_summary(&self, options: &SummaryOptions) -> NationalSummary {
        let extremes = |field: Field, direction: Direction| {
            let records = self.dataset.records().iter();
            if options.complete_rows_only {
                rank_extremes(
                    records.filter(|r| r.capacity.is_some() && r.tuition.is_some()),
                    field,
                    direction,
                    options.top_extremes,
                )
            } else {
                rank_extremes(records, field, direction, options.top_extremes)
            }
        };

        NationalSummary {
            institution_count: self.count_distinct(Column::Institution),
            province_count: self.count_distinct(Column::Province),
            city_count: self.count_distinct(Column::City),
            program_name_count: self.count_distinct(Column::Program),
            total_programs: self.dataset.len(),
            top_provinces: self.top_provinces_by_institution_count(options.top_provinces_stat),
            province_distribution: self.top_provinces_by_institution_count(options.top_provinces_chart),
            popular_programs: self.top_programs_by_popularity(options.top_programs),
            highest_tuition: extremes(Field::Tuition, Direction::Highest),
            lowest_tuition: extremes(Field::Tuition, Direction::Lowest),
            largest_capacity: extremes(Field::Capacity, Direction::Highest),
            smallest_capacity: extremes(Field::Capacity, Direction::Lowest),
            programs_per_institution: self.program_count_per_institution(),
        }
    }

    fn present_values(&self, institution: &str, field: Field) -> Vec<(String, u64)> {
        self.dataset
            .records()
            .iter()
            .filter(|r| r.institution == institution)
            .filter_map(|r| field.value(r).map(|v| (r.program.clone(), v)))
            .collect()
    }

    /// Distinct institutions per value of `column`, in first-seen order
    fn institutions_per(&self, column: Column) -> Vec<(String, usize)> {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, HashSet<&str>> = HashMap::new();

        for record in self.dataset.records() {
            let key = column.value(record);
            if key.is_empty() || record.institution.is_empty() {
                continue;
            }
            groups
                .entry(key)
                .or_insert_with(|| {
                    order.push(key);
                    HashSet::new()
                })
                .insert(record.institution.as_str());
        }

        order
            .into_iter()
            .map(|key| (key.to_string(), groups[&key].len()))
            .collect()
    }
}

fn take_top(mut counts: Vec<(String, usize)>, n: usize) -> Vec<(String, usize)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

fn rank_extremes<'r>(
    records: impl Iterator<Item = &'r ProgramRecord>,
    field: Field,
    direction: Direction,
    n: usize,
) -> Vec<Extremum> {
    let mut order: Vec<&str> = Vec::new();
    let mut best: HashMap<&str, (&ProgramRecord, u64)> = HashMap::new();

    for record in records {
        if record.institution.is_empty() {
            continue;
        }
        let Some(value) = field.value(record) else {
            continue;
        };

        match best.entry(record.institution.as_str()) {
            Entry::Vacant(slot) => {
                order.push(record.institution.as_str());
                slot.insert((record, value));
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get().1;
                let replaces = match direction {
                    Direction::Highest => value > current,
                    Direction::Lowest => value < current,
                };
                if replaces {
                    slot.insert((record, value));
                }
            }
        }
    }

    let mut extremes: Vec<Extremum> = order
        .into_iter()
        .map(|institution| {
            let (record, value) = best[&institution];
            Extremum {
                institution: record.institution.clone(),
                program: record.program.clone(),
                value,
            }
        })
        .collect();

    match direction {
        Direction::Highest => extremes.sort_by(|a, b| b.value.cmp(&a.value)),
        Direction::Lowest => extremes.sort_by_key(|e| e.value),
    }
    extremes.truncate(n);
    extremes
}
