// src/main.rs

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{error, info, warn};

use KC_Report_Render::cache::ResultCache;
use KC_Report_Render::constants::{STEP_BLOCK_CLOSE, STEP_BLOCK_OPEN};
use KC_Report_Render::crate_version;
use KC_Report_Render::data_analysis::results_packager::ExportView;
use KC_Report_Render::data_input::block_extractor::BlockMarkers;
use KC_Report_Render::plot_functions::plot_fit_lines::plot_fit_lines;
use KC_Report_Render::test_definition::Protocol;

#[derive(Parser, Debug)]
#[command(name = "KC_Report_Render")]
#[command(about = "Extracts kinematics and compliance gradients from suspension rig reports")]
#[command(version = crate_version())]
struct Cli {
    /// Rig report files (.res)
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Test protocol: bump, roll, lat_inphase, lat_antiphase or braking
    #[arg(short, long = "test", value_name = "PROTOCOL")]
    protocol: Protocol,

    /// Directory for plots and exported tables (default: next to each input)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Write the parameter table as CSV, optionally to FILE
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
    export: Option<String>,

    /// Export only the left-wheel key results
    #[arg(long, requires = "export")]
    key_only: bool,

    /// Skip PNG rendering
    #[arg(long)]
    no_plots: bool,

    /// Print the offset channel table
    #[arg(long)]
    show_table: bool,

    #[arg(long, value_name = "S", default_value = STEP_BLOCK_OPEN)]
    open_marker: String,

    #[arg(long, value_name = "S", default_value = STEP_BLOCK_CLOSE)]
    close_marker: String,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn root_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string())
}

fn output_dir_for(cli: &Cli, input: &Path) -> PathBuf {
    match &cli.output_dir {
        Some(dir) => dir.clone(),
        None => input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// Export path: `{root}_{protocol}_results.csv` unless a file was named.
/// A named file is shared by every input, so batch runs prefix it with the report name.
fn export_path(cli: &Cli, requested: &str, root: &str, dir: &Path) -> PathBuf {
    if requested.is_empty() {
        return dir.join(format!("{}_{}_results.csv", root, cli.protocol.key()));
    }
    let requested = PathBuf::from(requested);
    if cli.inputs.len() < 2 {
        return requested;
    }
    let file_name = requested
        .file_name()
        .map(|n| format!("{}_{}", root, n.to_string_lossy()))
        .unwrap_or_else(|| format!("{}_{}_results.csv", root, cli.protocol.key()));
    requested.with_file_name(file_name)
}

fn process_input(cli: &Cli, input: &Path, markers: &BlockMarkers, cache: &mut ResultCache) -> Result<(), Box<dyn Error>> {
    let root = root_name(input);
    let dir = output_dir_for(cli, input);
    info!("Processing '{}' as {}", input.display(), cli.protocol);

    let content = fs::read_to_string(input)?;
    let result = cache.get_or_process(&content, cli.protocol.definition(), markers)?;

    println!("\n{} ({})", root, result.definition.title);
    println!("  Number of available data blocks = {}", result.block_count);
    println!(
        "  Reference row = {} ('{}' closest to zero)",
        result.reference_row + 1,
        result.definition.reference_channel
    );
    if cli.show_table {
        println!("\nOffset table:\n{}", result.offset);
    }

    let table = result.parameters();
    println!("\n{}", table);
    if table.unavailable_count() > 0 {
        warn!(
            "{} of {} parameters unavailable for '{}'",
            table.unavailable_count(),
            table.rows.len(),
            root
        );
    }

    if let Some(requested) = &cli.export {
        fs::create_dir_all(&dir)?;
        let view = if cli.key_only { ExportView::KeyResults } else { ExportView::All };
        table.write_csv(&export_path(cli, requested, &root, &dir), view)?;
    }

    if cli.no_plots {
        info!("Plots skipped for '{}'", root);
    } else {
        fs::create_dir_all(&dir)?;
        let written = plot_fit_lines(result, &root, &dir)?;
        info!("{} plot(s) written for '{}'", written.len(), root);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
    info!("KC_Report_Render {}", crate_version());

    let markers = BlockMarkers::new(cli.open_marker.clone(), cli.close_marker.clone());
    let mut cache = ResultCache::new();
    let mut failed = 0usize;

    for input in &cli.inputs {
        if let Err(e) = process_input(&cli, input, &markers, &mut cache) {
            error!("'{}': {}", input.display(), e);
            failed += 1;
        }
    }

    if cache.hits() > 0 {
        info!("{} input(s) reused cached results", cache.hits());
    }
    if failed > 0 {
        return Err(format!("{} of {} report(s) failed", failed, cli.inputs.len()).into());
    }
    Ok(())
}

// src/main.rs
