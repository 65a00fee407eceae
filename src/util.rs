// Utility helpers for parsing and console formatting.
//
// This module centralizes the "dirty" CSV/number handling so the rest of
// the code can assume clean, typed values.
use chrono::{Datelike, Local};
use num_format::{Locale, ToFormattedString};

/// Parse a vacancy-count cell into `u32` while being forgiving about the
/// formatting issues that are common in CSV exports.
///
/// - Trims whitespace.
/// - Returns `None` for empty, negative, or non-numeric values.
pub fn parse_count_safe(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<u32>().ok()
}

/// Parse a string into `f64`, trimming whitespace first. Returns `None`
/// for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

/// Portuguese month name for a 1-based month number.
fn month_name_pt(month: u32) -> &'static str {
    match month {
        1 => "Janeiro",
        2 => "Fevereiro",
        3 => "Março",
        4 => "Abril",
        5 => "Maio",
        6 => "Junho",
        7 => "Julho",
        8 => "Agosto",
        9 => "Setembro",
        10 => "Outubro",
        11 => "Novembro",
        12 => "Dezembro",
        _ => "Mês inválido",
    }
}

/// Today's date spelled out in Portuguese, e.g. `6 de Agosto de 2026`.
///
/// Computed once per run and threaded through the report assembler as a
/// plain string so generation stays deterministic within a batch.
pub fn date_text_pt() -> String {
    let now = Local::now();
    format!(
        "{} de {} de {}",
        now.day(),
        month_name_pt(now.month()),
        now.year()
    )
}
