use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use ptn_iup_analyzer::models::DataSourceMode;
use ptn_iup_analyzer::report::{
    clean_output_directory, print_institution_detail, print_summary, write_institution_outputs,
    write_summary_outputs, INSTITUTION_OUTPUTS, SUMMARY_OUTPUTS,
};
use ptn_iup_analyzer::{Config, DashboardError, DatasetAnalyzer, DatasetLoader, SummaryOptions};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("ptn-iup-analyzer")
        .version("0.1.0")
        .about("Statistics and chart inputs for IUP programs at Indonesian public universities")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .value_name("FILE")
                .help("Dataset CSV file, overrides the configured source"),
        )
        .arg(
            Arg::new("ptn")
                .short('p')
                .long("ptn")
                .value_name("NAME")
                .help("Show the detail view of one institution"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory, overrides the configured one"),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .action(ArgAction::SetTrue)
                .help("List all institutions and exit"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the query result as JSON"),
        )
        .get_matches();

    let config_file = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");

    // Load or create configuration
    let config = if Path::new(config_file).exists() {
        info!(path = config_file, "Loading configuration");
        Config::load_from_file(config_file)
            .with_context(|| format!("Failed to load configuration: {}", config_file))?
    } else {
        info!(path = config_file, "Creating default configuration file");
        let default_config = Config::default();
        default_config
            .save_to_file(config_file)
            .with_context(|| format!("Failed to write configuration: {}", config_file))?;
        default_config
    };

    let source = match matches.get_one::<String>("data") {
        Some(file) => file.clone(),
        None => match config.data_source_mode {
            DataSourceMode::Local => config.data_file.clone(),
            DataSourceMode::Internet => config.data_url.clone(),
        }
        .context("No dataset source configured")?,
    };

    let output_dir = matches
        .get_one::<String>("output")
        .cloned()
        .or_else(|| config.output_directory.clone())
        .unwrap_or_else(|| "output".to_string());

    // The table is loaded once; without it nothing can be served
    let loader = DatasetLoader::new();
    let dataset = loader
        .load(&source)
        .await
        .with_context(|| format!("Failed to load dataset from {}", source))?;
    if dataset.is_empty() {
        warn!(source = %source, "Dataset has no rows");
    }

    let analyzer = DatasetAnalyzer::new(&dataset);
    let print_json = matches.get_flag("json");

    if matches.get_flag("list") {
        let institutions = analyzer.distinct_institutions();
        if print_json {
            println!("{}", serde_json::to_string_pretty(&institutions)?);
        } else {
            for name in &institutions {
                println!("{}", name);
            }
        }
        return Ok(());
    }

    std::fs::create_dir_all(&output_dir)?;

    if let Some(ptn) = matches.get_one::<String>("ptn") {
        // A detail run leaves the nationwide reports in place
        clean_output_directory(&output_dir, &INSTITUTION_OUTPUTS)?;
        match analyzer.institution_detail(ptn) {
            Ok(detail) => {
                write_institution_outputs(&detail, &output_dir)?;
                if print_json {
                    println!("{}", serde_json::to_string_pretty(&detail)?);
                } else {
                    print_institution_detail(&detail);
                }
            }
            Err(DashboardError::InstitutionNotFound(name)) => {
                println!("❌ Data untuk {} tidak ditemukan", name);
            }
            Err(e) => return Err(e.into()),
        }
        return Ok(());
    }

    clean_output_directory(&output_dir, &SUMMARY_OUTPUTS)?;
    let summary = analyzer.national_summary(&SummaryOptions::from(&config));
    write_summary_outputs(&summary, &output_dir)?;

    if print_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
        println!("\n✅ Analysis complete!");
        println!("📂 Results: {}", output_dir);
    }

    Ok(())
}
