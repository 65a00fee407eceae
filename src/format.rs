// Field-level display transforms.
//
// Each function turns one raw cell value into its display form. They are
// pure and individually small; `transform` wires them across a whole row.
use std::collections::HashMap;

use crate::config::{ReportConfig, LEGACY_TRUNCATE_LIMIT};
use crate::error::FormatError;
use crate::util::parse_f64_safe;

/// Contract label for listings reserved for people with disabilities.
pub const EXCLUSIVE_PCD: &str = "Exclusivo PCD";
/// Contract label already present on listings that accept (but are not
/// reserved for) people with disabilities.
pub const ACCEPTS_PCD: &str = "Aceita deficiente";
/// Disability-acceptance category marking a reserved listing.
pub const EXCLUSIVE_CATEGORY: &str = "Exclusivamente deficiente";

const NOT_REQUIRED: &str = "Não Exigida";
const NOT_INFORMED: &str = "Não informado";

/// First `limit` characters of `text`. Under the legacy flag the historical
/// behavior is reproduced instead: a fixed cut at 35 regardless of `limit`.
pub fn truncate(text: &str, limit: usize, legacy: bool) -> String {
    let limit = if legacy { LEGACY_TRUNCATE_LIMIT } else { limit };
    text.chars().take(limit).collect()
}

/// Strip the "Sine" site prefix and the trailing "/Pe" region suffix from
/// an office label.
pub fn normalize_office(raw: &str) -> String {
    let label = raw.replace("Sine", "");
    let label = label.trim();
    match label.strip_suffix("/Pe") {
        Some(stripped) => stripped.trim().to_string(),
        None => label.to_string(),
    }
}

/// Rewrite a normalized office label through the alias table (exact match
/// only), then strip any residual "Sine" token.
pub fn abbreviate_office(label: &str, aliases: &HashMap<String, String>) -> String {
    let label = aliases.get(label).map(String::as_str).unwrap_or(label);
    label.replace("Sine", "").trim().to_string()
}

/// Strip the "PE-" region code and truncate to the configured width.
pub fn normalize_municipality(raw: &str, cfg: &ReportConfig) -> String {
    truncate(
        &raw.replace("PE-", ""),
        cfg.municipality_limit,
        cfg.legacy_truncation,
    )
}

/// Abbreviate schooling levels: " Completo" disappears, " Incompleto"
/// becomes " Não C.".
pub fn normalize_schooling(raw: &str) -> String {
    raw.replace(" Completo", "").replace(" Incompleto", " Não C.")
}

/// Months of required experience as display text. Unparseable input means
/// "not required" rather than an error.
pub fn normalize_experience(raw: &str) -> String {
    match parse_f64_safe(raw) {
        Some(value) => {
            let months = value as i64;
            if months == 0 {
                NOT_REQUIRED.to_string()
            } else {
                format!("{} Meses", months)
            }
        }
        None => NOT_REQUIRED.to_string(),
    }
}

/// Combine a wage amount (comma decimal separator, dot thousands separator)
/// with its pay frequency.
///
/// Zero means the employer did not inform a wage. Values of at least 100
/// are rounded to whole reais; smaller nonzero values keep their cents.
/// A non-numeric amount is a `FormatError` for the caller to handle.
pub fn normalize_wage(raw_wage: &str, frequency: &str) -> Result<String, FormatError> {
    let normalized = raw_wage.replace('.', "").replace(',', ".");
    let value: f64 = normalized.trim().parse().map_err(|_| {
        FormatError::new("Salário", raw_wage, "not a numeric wage after separator normalization")
    })?;

    if value == 0.0 {
        Ok(NOT_INFORMED.to_string())
    } else if value >= 100.0 {
        Ok(format!("R$ {} / {}", value.round() as i64, frequency))
    } else {
        Ok(format!("R$ {} / {}", value, frequency))
    }
}

/// Reclassify a contract label for disability-exclusive listings.
///
/// Returns the override label when the acceptance category marks the
/// listing as reserved and the contract is not already the generic
/// "accepts" marker; `None` leaves the contract untouched.
pub fn classify_disability_contract(contract: &str, category: &str) -> Option<&'static str> {
    if category.contains(EXCLUSIVE_CATEGORY) && contract != ACCEPTS_PCD {
        Some(EXCLUSIVE_PCD)
    } else {
        None
    }
}
