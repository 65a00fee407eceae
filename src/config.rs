// Report policy knobs.
//
// The original generator existed in several near-identical copies that
// disagreed on page capacity, sort key, and the office alias table. All of
// those choices live here as named configuration so one pipeline covers
// every variant.
use std::collections::HashMap;
use std::path::PathBuf;

use once_cell::sync::Lazy;

/// Banner image placement: asset path plus the drawn size in points.
#[derive(Debug, Clone)]
pub struct BannerSpec {
    pub path: PathBuf,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Data rows per table block. The final record of a group may overflow
    /// this by one (see `paginate`).
    pub page_capacity: usize,
    /// Exact-match office label rewrites applied after prefix/suffix
    /// stripping.
    pub office_aliases: HashMap<String, String>,
    /// Include the contract-type label as the sort-key tiebreaker.
    pub sort_by_contract: bool,
    /// Character limit for the occupation description column.
    pub occupation_limit: usize,
    /// Character limit for the municipality column.
    pub municipality_limit: usize,
    /// Reproduce the historical truncation defect: every truncation cuts at
    /// 35 characters regardless of the limit above.
    pub legacy_truncation: bool,
    /// Drop the last data row of each file (export tools append a footer
    /// row there).
    pub drop_trailing_sentinel: bool,
    /// Banner drawn at the top of every report page. `None` omits it.
    pub banner: Option<BannerSpec>,
    /// Emit the publication date line on the first page.
    pub date_line: bool,
    /// Directory for the generated PDFs.
    pub output_dir: PathBuf,
}

/// Legacy cut point applied when `legacy_truncation` is on.
pub const LEGACY_TRUNCATE_LIMIT: usize = 35;

/// Office labels with a known abbreviated form. Built once; each config
/// takes its own copy so callers can extend it freely.
static DEFAULT_OFFICE_ALIASES: Lazy<HashMap<String, String>> = Lazy::new(|| {
    [
        ("Cabo de Santo Agostinho", "Cabo de Santo A."),
        ("Nazare da Mata", "Nazaré da Mata"),
        ("Igarassu", "Igarassu"),
        ("Vitoria de Santo Antao", "Vitória de S. Antão"),
        ("Santa Cruz do Capibaribe", "Santa Cruz do C."),
        ("Sao Lourenco da Mata", "São L. da Mata"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
});

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            page_capacity: 15,
            office_aliases: DEFAULT_OFFICE_ALIASES.clone(),
            sort_by_contract: true,
            occupation_limit: 35,
            municipality_limit: 30,
            legacy_truncation: false,
            drop_trailing_sentinel: true,
            banner: Some(BannerSpec {
                path: PathBuf::from("governo-copia.png"),
                width: 400.0,
                height: 80.0,
            }),
            date_line: true,
            output_dir: PathBuf::from("output"),
        }
    }
}
