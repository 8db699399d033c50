//! Chart inputs for the dashboard.
//!
//! Rendering is left to whatever charting library consumes the JSON; this
//! module only shapes query results into labelled points plus an explicit
//! [`ChartConfig`].

use crate::analyzer::{Extremum, InstitutionDetail, NationalSummary};
use crate::currency::format_rupiah;
use crate::models::Field;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Column whose values pick the bar colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartField {
    Institution,
    Program,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    Currency,
    Integer,
}

impl ValueFormat {
    pub fn render(&self, value: u64) -> String {
        match self {
            ValueFormat::Currency => format_rupiah(Some(value as f64)),
            ValueFormat::Integer => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub orientation: Orientation,
    pub color_by: Option<ChartField>,
    pub value_format: ValueFormat,
    /// Hole ratio for donut pies
    pub donut_hole: Option<f64>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            color_by: None,
            value_format: ValueFormat::Integer,
            donut_hole: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
    pub group: Option<String>,
    /// `value` rendered with the chart's value format
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub config: ChartConfig,
    pub points: Vec<ChartPoint>,
}

impl ChartSpec {
    fn new(kind: ChartKind, title: impl Into<String>, config: ChartConfig) -> Self {
        Self {
            kind,
            title: title.into(),
            config,
            points: Vec::new(),
        }
    }

    fn push(&mut self, label: impl Into<String>, value: u64, group: Option<String>) {
        let text = self.config.value_format.render(value);
        self.points.push(ChartPoint {
            label: label.into(),
            value,
            group,
            text,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn horizontal(value_format: ValueFormat, color_by: Option<ChartField>) -> ChartConfig {
    ChartConfig {
        orientation: Orientation::Horizontal,
        color_by,
        value_format,
        donut_hole: None,
    }
}

/// Donut chart of seats per program at one institution.
pub fn capacity_pie(institution: &str, slices: &[(String, u64)]) -> ChartSpec {
    let config = ChartConfig {
        donut_hole: Some(0.3),
        ..ChartConfig::default()
    };
    if slices.is_empty() {
        return ChartSpec::new(
            ChartKind::Pie,
            format!("Tidak ada data daya tampung untuk {}", institution),
            config,
        );
    }

    let mut chart = ChartSpec::new(ChartKind::Pie, format!("Distribusi Daya Tampung di {}", institution), config);
    for (program, capacity) in slices {
        chart.push(program.as_str(), *capacity, None);
    }
    chart
}

/// Horizontal bars of tuition per program at one institution.
pub fn tuition_bar(institution: &str, bars: &[(String, u64)]) -> ChartSpec {
    let config = horizontal(ValueFormat::Currency, None);
    if bars.is_empty() {
        return ChartSpec::new(ChartKind::Bar, format!("Tidak ada data UKT untuk {}", institution), config);
    }

    let mut chart = ChartSpec::new(ChartKind::Bar, format!("UKT per Prodi di {}", institution), config);
    for (program, tuition) in bars {
        chart.push(program.as_str(), *tuition, None);
    }
    chart
}

pub fn popular_programs_bar(programs: &[(String, usize)]) -> ChartSpec {
    count_bar("Program Studi Paling Populer", programs)
}

pub fn province_bar(provinces: &[(String, usize)]) -> ChartSpec {
    count_bar("Distribusi PTN per Provinsi", provinces)
}

fn count_bar(title: &str, counts: &[(String, usize)]) -> ChartSpec {
    let mut chart = ChartSpec::new(ChartKind::Bar, title, horizontal(ValueFormat::Integer, None));
    for (label, count) in counts {
        chart.push(label.as_str(), *count as u64, None);
    }
    chart
}

/// Bars for one of the per-institution extremum rankings.
///
/// Tuition bars are labelled `PTN - JURUSAN`; capacity bars by institution.
/// Both are colored by program.
pub fn extremum_bar(title: &str, field: Field, extremes: &[Extremum]) -> ChartSpec {
    let format = match field {
        Field::Tuition => ValueFormat::Currency,
        Field::Capacity => ValueFormat::Integer,
    };
    let mut chart = ChartSpec::new(ChartKind::Bar, title, horizontal(format, Some(ChartField::Program)));
    for extremum in extremes {
        let label = match field {
            Field::Tuition => format!("{} - {}", extremum.institution, extremum.program),
            Field::Capacity => extremum.institution.clone(),
        };
        chart.push(label, extremum.value, Some(extremum.program.clone()));
    }
    chart
}

/// Charts of the nationwide page keyed by their slot name.
pub fn summary_charts(summary: &NationalSummary) -> BTreeMap<&'static str, ChartSpec> {
    let mut charts = BTreeMap::new();
    charts.insert("populer", popular_programs_bar(&summary.popular_programs));
    charts.insert(
        "ukt_tinggi",
        extremum_bar("Program Studi dengan UKT Tertinggi", Field::Tuition, &summary.highest_tuition),
    );
    charts.insert(
        "ukt_rendah",
        extremum_bar("Program Studi dengan UKT Terendah", Field::Tuition, &summary.lowest_tuition),
    );
    charts.insert(
        "kapasitas_besar",
        extremum_bar(
            "Program Studi dengan Daya Tampung Terbesar",
            Field::Capacity,
            &summary.largest_capacity,
        ),
    );
    charts.insert(
        "kapasitas_kecil",
        extremum_bar(
            "Program Studi dengan Daya Tampung Terkecil",
            Field::Capacity,
            &summary.smallest_capacity,
        ),
    );
    charts.insert("provinsi", province_bar(&summary.province_distribution));
    charts
}

pub fn institution_charts(detail: &InstitutionDetail) -> BTreeMap<&'static str, ChartSpec> {
    let mut charts = BTreeMap::new();
    charts.insert("pie_chart", capacity_pie(&detail.institution, &detail.pie_slices));
    charts.insert("bar_chart", tuition_bar(&detail.institution, &detail.tuition_bars));
    charts
}
