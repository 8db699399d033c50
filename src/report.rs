use crate::analyzer::{Extremum, InstitutionDetail, NationalSummary};
use crate::charts::{institution_charts, summary_charts, ChartSpec};
use crate::currency::format_tuition;
use crate::error::Result;
use csv::Writer;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// File-system safe name for an institution
pub fn safe_name(name: &str) -> String {
    name.replace(['/', '\\'], "_").replace(' ', "_")
}

pub fn write_summary_report(summary: &NationalSummary, output_dir: &str) -> Result<()> {
    let mut content = String::new();
    content.push_str("Ringkasan Program IUP PTN Indonesia\n");
    content.push_str("===================================\n\n");

    content.push_str(&format!(
        "Jumlah PTN: {}\n\
        Jumlah provinsi: {}\n\
        Jumlah kota: {}\n\
        Jumlah nama program studi: {}\n\
        Total program studi: {}\n\n",
        summary.institution_count,
        summary.province_count,
        summary.city_count,
        summary.program_name_count,
        summary.total_programs,
    ));

    content.push_str("Provinsi dengan PTN terbanyak:\n");
    for (province, count) in &summary.top_provinces {
        content.push_str(&format!("   - {}: {} PTN\n", province, count));
    }
    content.push('\n');

    content.push_str("Program studi paling populer:\n");
    for (i, (program, count)) in summary.popular_programs.iter().enumerate() {
        content.push_str(&format!("   {}. {} ({} PTN)\n", i + 1, program, count));
    }
    content.push('\n');

    push_extremes(&mut content, "UKT tertinggi", &summary.highest_tuition, true);
    push_extremes(&mut content, "UKT terendah", &summary.lowest_tuition, true);
    push_extremes(&mut content, "Daya tampung terbesar", &summary.largest_capacity, false);
    push_extremes(&mut content, "Daya tampung terkecil", &summary.smallest_capacity, false);

    let path = Path::new(output_dir).join("summary.txt");
    fs::write(&path, content)?;
    debug!(path = %path.display(), "Wrote summary report");
    Ok(())
}

fn push_extremes(content: &mut String, heading: &str, extremes: &[Extremum], currency: bool) {
    content.push_str(&format!("{}:\n", heading));
    for (i, extremum) in extremes.iter().enumerate() {
        let value = if currency {
            format_tuition(Some(extremum.value))
        } else {
            extremum.value.to_string()
        };
        content.push_str(&format!(
            "   {}. {} - {}: {}\n",
            i + 1,
            extremum.institution,
            extremum.program,
            value
        ));
    }
    content.push('\n');
}

pub fn write_programs_per_institution_csv(summary: &NationalSummary, output_dir: &str) -> Result<()> {
    let csv_path = Path::new(output_dir).join("programs_per_ptn.csv");
    let mut writer = Writer::from_path(csv_path)?;

    writer.write_record(["PTN", "Jumlah_Jurusan"])?;
    for (institution, count) in &summary.programs_per_institution {
        writer.write_record([institution.as_str(), &count.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_rankings_csv(summary: &NationalSummary, output_dir: &str) -> Result<()> {
    let csv_path = Path::new(output_dir).join("rankings.csv");
    let mut writer = Writer::from_path(csv_path)?;

    writer.write_record(["Ranking", "Position", "PTN", "Jurusan", "Value", "Display"])?;

    let rankings: [(&str, &[Extremum], bool); 4] = [
        ("ukt_tertinggi", &summary.highest_tuition, true),
        ("ukt_terendah", &summary.lowest_tuition, true),
        ("daya_tampung_terbesar", &summary.largest_capacity, false),
        ("daya_tampung_terkecil", &summary.smallest_capacity, false),
    ];

    for (ranking, extremes, currency) in rankings {
        for (i, extremum) in extremes.iter().enumerate() {
            let display = if currency {
                format_tuition(Some(extremum.value))
            } else {
                extremum.value.to_string()
            };
            writer.write_record([
                ranking,
                &(i + 1).to_string(),
                &extremum.institution,
                &extremum.program,
                &extremum.value.to_string(),
                &display,
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn write_charts(charts: &BTreeMap<&'static str, ChartSpec>, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(charts)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), charts = charts.len(), "Wrote chart inputs");
    Ok(())
}

/// Write every nationwide artifact into `output_dir`.
pub fn write_summary_outputs(summary: &NationalSummary, output_dir: &str) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    write_summary_report(summary, output_dir)?;
    write_programs_per_institution_csv(summary, output_dir)?;
    write_rankings_csv(summary, output_dir)?;

    let charts_dir = Path::new(output_dir).join("charts");
    fs::create_dir_all(&charts_dir)?;
    write_charts(&summary_charts(summary), &charts_dir.join("summary.json"))?;

    info!(output_dir, "Nationwide reports written");
    Ok(())
}

/// Program table and chart inputs for one institution under `output_dir/ptn`.
pub fn write_institution_outputs(detail: &InstitutionDetail, output_dir: &str) -> Result<()> {
    let ptn_dir = Path::new(output_dir).join("ptn");
    fs::create_dir_all(&ptn_dir)?;

    let name = safe_name(&detail.institution);
    let mut writer = Writer::from_path(ptn_dir.join(format!("{}.csv", name)))?;
    writer.write_record(["JURUSAN", "DAYA TAMPUNG", "UKT"])?;
    for row in &detail.table {
        let capacity = row.capacity.map(|c| c.to_string()).unwrap_or_default();
        writer.write_record([row.program.as_str(), &capacity, &row.tuition])?;
    }
    writer.flush()?;

    write_charts(&institution_charts(detail), &ptn_dir.join(format!("{}_charts.json", name)))?;

    info!(institution = %detail.institution, output_dir, "Institution reports written");
    Ok(())
}

/// Everything a nationwide run writes.
pub const SUMMARY_OUTPUTS: [&str; 4] = ["summary.txt", "programs_per_ptn.csv", "rankings.csv", "charts"];

/// Everything a detail run writes.
pub const INSTITUTION_OUTPUTS: [&str; 1] = ["ptn"];

// Clean up previous results from output directory
pub fn clean_output_directory(output_dir: &str, items_to_clean: &[&str]) -> Result<()> {
    let output_path = Path::new(output_dir);

    if !output_path.exists() {
        return Ok(());
    }

    for item in items_to_clean {
        let item_path = output_path.join(item);

        if item_path.is_file() {
            fs::remove_file(&item_path)?;
            debug!(item, "Removed file");
        } else if item_path.is_dir() {
            fs::remove_dir_all(&item_path)?;
            debug!(item, "Removed directory");
        }
    }

    Ok(())
}

/// Terminal rendering of the nationwide summary.
pub fn render_summary(summary: &NationalSummary) -> String {
    let mut content = String::new();
    content.push_str("\n📊 RINGKASAN\n");
    content.push_str("============\n\n");
    content.push_str(&format!(
        "🏛️  {} PTN di {} provinsi dan {} kota, {} program studi\n\n",
        summary.institution_count, summary.province_count, summary.city_count, summary.total_programs
    ));

    content.push_str("📍 Provinsi dengan PTN terbanyak:\n");
    for (province, count) in &summary.top_provinces {
        content.push_str(&format!("   - {} ({} PTN)\n", province, count));
    }
    content.push('\n');

    content.push_str("📈 Program studi paling populer:\n");
    for (i, (program, count)) in summary.popular_programs.iter().enumerate() {
        content.push_str(&format!("   {}. {} - {} PTN\n", i + 1, program, count));
    }
    content.push('\n');

    push_extremes(&mut content, "💰 UKT tertinggi", &summary.highest_tuition, true);
    push_extremes(&mut content, "💸 UKT terendah", &summary.lowest_tuition, true);
    push_extremes(&mut content, "🎓 Daya tampung terbesar", &summary.largest_capacity, false);
    push_extremes(&mut content, "🪑 Daya tampung terkecil", &summary.smallest_capacity, false);
    content
}

pub fn print_summary(summary: &NationalSummary) {
    print!("{}", render_summary(summary));
}

pub fn print_institution_detail(detail: &InstitutionDetail) {
    println!("\n🏛️  {}", detail.institution);
    println!("   Rata-rata daya tampung: {}", detail.avg_capacity_display);
    println!("   Rata-rata UKT: {}", detail.avg_tuition_display);
    println!();
    for row in &detail.table {
        let capacity = row
            .capacity
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("   - {} | daya tampung: {} | UKT: {}", row.program, capacity, row.tuition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{DatasetAnalyzer, SummaryOptions};
    use crate::loader::parse_csv;

    const CSV: &str = "PTN,JURUSAN,PROVINSI,KOTA,DAYA TAMPUNG,UKT\n\
        Universitas Indonesia,Ilmu Komputer,Jawa Barat,Depok,60,\"Rp30.000.000\"\n\
        Universitas Indonesia,Hukum,Jawa Barat,Depok,,\"Rp20.000.000\"\n\
        Universitas Gadjah Mada,Farmasi,DI Yogyakarta,Sleman,40,-\n";

    #[test]
    fn test_safe_name() {
        assert_eq!(safe_name("Universitas Indonesia"), "Universitas_Indonesia");
        assert_eq!(safe_name("UIN Syarif/Hidayatullah"), "UIN_Syarif_Hidayatullah");
    }

    #[test]
    fn test_write_summary_outputs() {
        let dataset = parse_csv(CSV.as_bytes()).unwrap();
        let summary = DatasetAnalyzer::new(&dataset).national_summary(&SummaryOptions::default());
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().to_str().unwrap();

        write_summary_outputs(&summary, output_dir).unwrap();

        let report = fs::read_to_string(dir.path().join("summary.txt")).unwrap();
        assert!(report.contains("Jumlah PTN: 2"));
        assert!(report.contains("Universitas Indonesia - Ilmu Komputer: Rp30.000.000"));

        let per_ptn = fs::read_to_string(dir.path().join("programs_per_ptn.csv")).unwrap();
        assert!(per_ptn.contains("Universitas Gadjah Mada,1"));
        assert!(per_ptn.contains("Universitas Indonesia,2"));

        let charts = fs::read_to_string(dir.path().join("charts").join("summary.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&charts).unwrap();
        assert_eq!(json["ukt_tinggi"]["points"][0]["text"], "Rp30.000.000");
    }

    #[test]
    fn test_write_institution_outputs_and_clean() {
        let dataset = parse_csv(CSV.as_bytes()).unwrap();
        let detail = DatasetAnalyzer::new(&dataset)
            .institution_detail("Universitas Indonesia")
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().to_str().unwrap();

        write_institution_outputs(&detail, output_dir).unwrap();

        let table = fs::read_to_string(dir.path().join("ptn").join("Universitas_Indonesia.csv")).unwrap();
        assert!(table.starts_with("JURUSAN,DAYA TAMPUNG,UKT"));
        assert!(table.contains("Hukum,,Rp20.000.000"));
        assert!(dir.path().join("ptn").join("Universitas_Indonesia_charts.json").exists());

        clean_output_directory(output_dir, &INSTITUTION_OUTPUTS).unwrap();
        assert!(!dir.path().join("ptn").exists());
    }

    #[test]
    fn test_detail_cleaning_keeps_summary_outputs() {
        let dataset = parse_csv(CSV.as_bytes()).unwrap();
        let analyzer = DatasetAnalyzer::new(&dataset);
        let summary = analyzer.national_summary(&SummaryOptions::default());
        let detail = analyzer.institution_detail("Universitas Indonesia").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().to_str().unwrap();

        write_summary_outputs(&summary, output_dir).unwrap();
        write_institution_outputs(&detail, output_dir).unwrap();

        clean_output_directory(output_dir, &INSTITUTION_OUTPUTS).unwrap();
        assert!(!dir.path().join("ptn").exists());
        assert!(dir.path().join("summary.txt").exists());
        assert!(dir.path().join("rankings.csv").exists());
        assert!(dir.path().join("charts").join("summary.json").exists());

        clean_output_directory(output_dir, &SUMMARY_OUTPUTS).unwrap();
        assert!(!dir.path().join("summary.txt").exists());
        assert!(!dir.path().join("charts").exists());
    }

    #[test]
    fn test_render_summary_lists_all_four_rankings() {
        let dataset = parse_csv(CSV.as_bytes()).unwrap();
        let summary = DatasetAnalyzer::new(&dataset).national_summary(&SummaryOptions::default());

        let rendered = render_summary(&summary);
        assert!(rendered.contains("UKT tertinggi:"));
        assert!(rendered.contains("UKT terendah:"));
        assert!(rendered.contains("Daya tampung terbesar:"));
        assert!(rendered.contains("Daya tampung terkecil:"));
        assert!(rendered.contains("Universitas Indonesia - Hukum: Rp20.000.000"));
        assert!(rendered.contains("Universitas Gadjah Mada - Farmasi: 40"));
    }
}
