use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tabled::{settings::Style, Table};

use crate::types::DisplayRecord;

/// Suffix appended to each input file's base name for its report.
const REPORT_SUFFIX: &str = "_relatorio.pdf";

pub fn ensure_output_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Derive the report path for an input file: `<dir>/<stem>_relatorio.pdf`.
pub fn pdf_path_for(input: &Path, dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("relatorio");
    dir.join(format!("{}{}", stem, REPORT_SUFFIX))
}

/// Print the first `max_rows` rendered records as a Markdown table, the
/// same preview shown for every generated report.
pub fn preview_records(records: &[DisplayRecord], max_rows: usize) {
    let slice: Vec<DisplayRecord> = records.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_name_keeps_the_input_stem() {
        let out = pdf_path_for(Path::new("vagas_2026-08-06.csv"), Path::new("output"));
        assert_eq!(out, PathBuf::from("output/vagas_2026-08-06_relatorio.pdf"));
    }

    #[test]
    fn missing_stem_falls_back() {
        let out = pdf_path_for(Path::new(".."), Path::new("output"));
        assert_eq!(out, PathBuf::from("output/relatorio_relatorio.pdf"));
    }
}
