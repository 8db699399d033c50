use ptn_iup_analyzer::analyzer::NOT_AVAILABLE;
use ptn_iup_analyzer::charts::institution_charts;
use ptn_iup_analyzer::loader::parse_csv;
use ptn_iup_analyzer::models::{Column, Scope};
use ptn_iup_analyzer::{
    DashboardError, Dataset, DatasetAnalyzer, DatasetLoader, Direction, Field, SummaryOptions,
};

fn fixture() -> Dataset {
    DatasetLoader::new()
        .load_file(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/iup_sample.csv"))
        .expect("Failed to load fixture")
}

#[test]
fn test_fixture_keeps_every_row() {
    let dataset = fixture();
    assert_eq!(dataset.len(), 11);

    let airlangga = &dataset.records()[8];
    assert_eq!(airlangga.capacity, None);
    assert_eq!(airlangga.tuition, None);
    assert_eq!(airlangga.tuition_formatted, "Rp0");

    let undip = &dataset.records()[10];
    assert_eq!(undip.capacity, Some(30));
    assert_eq!(undip.tuition, Some(15_000_000));
}

#[test]
fn test_duplicate_rows_are_preserved() {
    let dataset = fixture();
    let analyzer = DatasetAnalyzer::new(&dataset);
    let itb = analyzer.rows_for_institution("Institut Teknologi Bandung");
    assert_eq!(itb.len(), 3);
    assert_eq!(itb[0], itb[1]);
}

#[tokio::test]
async fn test_load_dispatches_local_paths() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/iup_sample.csv");
    let dataset = DatasetLoader::new().load(path).await.unwrap();
    assert_eq!(dataset.len(), 11);
}

#[test]
fn test_single_row_round_trip() {
    let content = "PTN,JURUSAN,PROVINSI,KOTA,DAYA TAMPUNG,UKT\nX,Y,P,K,100,\"Rp2.500.000\"\n";
    let dataset = parse_csv(content.as_bytes()).unwrap();
    assert_eq!(dataset.records()[0].tuition_formatted, "Rp2.500.000");

    let detail = DatasetAnalyzer::new(&dataset).institution_detail("X").unwrap();
    assert_eq!(detail.pie_slices, vec![("Y".to_string(), 100)]);
    assert_eq!(detail.tuition_bars, vec![("Y".to_string(), 2_500_000)]);
    assert_eq!(detail.table[0].tuition, "Rp2.500.000");
}

#[test]
fn test_institution_without_capacity_shows_not_available() {
    let dataset = fixture();
    let analyzer = DatasetAnalyzer::new(&dataset);

    assert!(analyzer.pie_slices("Universitas Airlangga").is_empty());
    assert_eq!(analyzer.mean_present(Field::Capacity, Scope::Institution("Universitas Airlangga")), None);

    let detail = analyzer.institution_detail("Universitas Airlangga").unwrap();
    assert_eq!(detail.avg_capacity_display, NOT_AVAILABLE);
    assert_eq!(detail.avg_tuition_display, NOT_AVAILABLE);

    let charts = institution_charts(&detail);
    assert!(charts["pie_chart"].is_empty());
    assert!(charts["bar_chart"].title.starts_with("Tidak ada data UKT"));
}

#[test]
fn test_unknown_institution_is_not_found() {
    let dataset = fixture();
    let analyzer = DatasetAnalyzer::new(&dataset);

    let result = analyzer.institution_detail("Universitas Terbuka");
    assert!(matches!(result, Err(DashboardError::InstitutionNotFound(_))));
    assert!(analyzer.rows_for_institution("Universitas Terbuka").is_empty());
}

#[test]
fn test_tuition_is_never_negative() {
    let content = "PTN,JURUSAN,PROVINSI,KOTA,DAYA TAMPUNG,UKT\nA,B,C,D,-5,-1000\nA,B,C,D,5,\"Rp-2.000\"\n";
    let dataset = parse_csv(content.as_bytes()).unwrap();
    for record in dataset.records() {
        assert_eq!(record.tuition, None);
    }
    assert_eq!(dataset.records()[0].capacity, None);
}

#[test]
fn test_national_summary_over_fixture() {
    let dataset = fixture();
    let analyzer = DatasetAnalyzer::new(&dataset);
    let summary = analyzer.national_summary(&SummaryOptions::default());

    assert_eq!(summary.institution_count, 6);
    assert_eq!(summary.province_count, 4);
    assert_eq!(summary.city_count, 6);
    assert_eq!(summary.total_programs, 11);
    assert_eq!(summary.top_provinces[0], ("Jawa Barat".to_string(), 2));
    assert_eq!(summary.top_provinces[1], ("Jawa Timur".to_string(), 2));
    // Both offered by three institutions; Ilmu Komputer appears first in the file
    assert_eq!(summary.popular_programs[0], ("Ilmu Komputer".to_string(), 3));
    assert_eq!(summary.popular_programs[1], ("Akuntansi".to_string(), 3));

    assert_eq!(summary.highest_tuition.len(), 5);
    assert_eq!(summary.highest_tuition[0].program, "Kedokteran");
    assert_eq!(summary.lowest_tuition[0].institution, "Universitas Diponegoro");
    assert_eq!(summary.largest_capacity[0].value, 100);
    assert_eq!(summary.smallest_capacity[0].value, 30);
}

#[test]
fn test_extremum_never_exceeds_institutions_with_values() {
    let dataset = fixture();
    let analyzer = DatasetAnalyzer::new(&dataset);

    let with_tuition = analyzer
        .distinct_institutions()
        .into_iter()
        .filter(|name| analyzer.mean_present(Field::Tuition, Scope::Institution(name)).is_some())
        .count();

    let ranked = analyzer.extremum_per_institution(Field::Tuition, Direction::Highest, 100);
    assert_eq!(ranked.len(), with_tuition);
    assert!(ranked.windows(2).all(|w| w[0].value >= w[1].value));
    assert_eq!(analyzer.count_distinct(Column::Institution), 6);
}

#[test]
fn test_concurrent_queries_share_dataset() {
    let dataset = fixture();
    let expected = DatasetAnalyzer::new(&dataset).national_summary(&SummaryOptions::default());

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| DatasetAnalyzer::new(&dataset).national_summary(&SummaryOptions::default()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
