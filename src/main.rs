// Entry point and batch flow.
//
// Every `.csv` in the working directory becomes one PDF in the output
// directory. Files are independent, so they are processed in parallel;
// a failure in one file is reported and never aborts the rest.
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use vagas_report::output;
use vagas_report::util::{date_text_pt, format_int};
use vagas_report::{generate_report, FileSummary, ReportConfig, ReportError};

/// Collect the CSV files in the current directory, sorted for stable
/// console output.
fn csv_files() -> Result<Vec<PathBuf>, ReportError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(".")?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn report_success(summary: &FileSummary) {
    println!(
        "Report generated: {} ({} rows loaded, {} listings rendered, {} skipped)",
        summary.output.display(),
        format_int(summary.rows_loaded as i64),
        format_int(summary.records_rendered as i64),
        format_int(summary.records_skipped as i64)
    );
    output::preview_records(&summary.preview, 3);
    println!("Total de Vagas: {}\n", summary.total_vacancies);
}

/// Process every input file, checking the cancellation flag between files
/// only; a report that already started always runs to completion.
fn run(files: &[PathBuf], cfg: &ReportConfig, cancel: &AtomicBool) -> usize {
    let date_text = date_text_pt();
    files
        .par_iter()
        .map(|file| {
            if cancel.load(Ordering::Relaxed) {
                return 0usize;
            }
            match generate_report(file, cfg, Some(&date_text)) {
                Ok(summary) => {
                    report_success(&summary);
                    1
                }
                Err(err) => {
                    eprintln!("Failed to generate report for {}: {}", file.display(), err);
                    0
                }
            }
        })
        .sum()
}

fn main() {
    env_logger::init();

    let cfg = ReportConfig::default();
    if let Err(err) = output::ensure_output_dir(&cfg.output_dir) {
        eprintln!("Failed to create output directory: {}", err);
        std::process::exit(1);
    }

    let files = match csv_files() {
        Ok(files) => files,
        Err(err) => {
            eprintln!("Failed to list input files: {}", err);
            std::process::exit(1);
        }
    };
    if files.is_empty() {
        println!("No .csv files found in the current directory.");
        return;
    }

    println!("Processing {} input file(s)...\n", files.len());
    let cancel = AtomicBool::new(false);
    let generated = run(&files, &cfg, &cancel);
    println!(
        "Done: {} of {} report(s) generated.",
        generated,
        files.len()
    );
    if generated < files.len() {
        std::process::exit(1);
    }
}
