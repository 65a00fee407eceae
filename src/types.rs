use std::path::PathBuf;

use serde::Deserialize;
use tabled::Tabled;

/// One row as read from a listings CSV. No guarantees beyond "string":
/// values may be empty, padded, or malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Posto")]
    pub posto: Option<String>,
    #[serde(rename = "Ocupação")]
    pub ocupacao: Option<String>,
    #[serde(rename = "Qtd. Vagas Disponíveis")]
    pub qtd_vagas: Option<String>,
    #[serde(rename = "Município Local de Trabalho")]
    pub municipio: Option<String>,
    #[serde(rename = "Forma de Contratação")]
    pub forma_contratacao: Option<String>,
    #[serde(rename = "Salário")]
    pub salario: Option<String>,
    #[serde(rename = "Frequência de Pagamento")]
    pub frequencia_pagamento: Option<String>,
    #[serde(rename = "Escolaridade")]
    pub escolaridade: Option<String>,
    #[serde(rename = "Tempo de Experiência")]
    pub tempo_experiencia: Option<String>,
    #[serde(rename = "Aceita Deficientes")]
    pub aceita_deficientes: Option<String>,
}

/// Required source columns, checked against the CSV header before parsing.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "Posto",
    "Ocupação",
    "Qtd. Vagas Disponíveis",
    "Município Local de Trabalho",
    "Forma de Contratação",
    "Salário",
    "Frequência de Pagamento",
    "Escolaridade",
    "Tempo de Experiência",
    "Aceita Deficientes",
];

/// A fully normalized listing, in display column order. Built only by
/// `transform::to_display`; never converted back to a `RawRow`.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct DisplayRecord {
    #[tabled(rename = "Agência")]
    pub agencia: String,
    #[tabled(rename = "Vagas")]
    pub vagas: String,
    #[tabled(rename = "Descrição")]
    pub descricao: String,
    #[tabled(rename = "Local de Trabalho")]
    pub local_trabalho: String,
    #[tabled(rename = "Contrato")]
    pub contrato: String,
    #[tabled(rename = "Salário")]
    pub salario: String,
    #[tabled(rename = "Escolaridade")]
    pub escolaridade: String,
    #[tabled(rename = "Experiência")]
    pub experiencia: String,
}

/// Column headers repeated at the top of every table block, in the same
/// order as the `DisplayRecord` fields.
pub const COLUMN_HEADERS: [&str; 8] = [
    "Agência",
    "Vagas",
    "Descrição",
    "Local de Trabalho",
    "Contrato",
    "Salário",
    "Escolaridade",
    "Experiência",
];

impl DisplayRecord {
    /// The record as one table row, display column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.agencia.clone(),
            self.vagas.clone(),
            self.descricao.clone(),
            self.local_trabalho.clone(),
            self.contrato.clone(),
            self.salario.clone(),
            self.escolaridade.clone(),
            self.experiencia.clone(),
        ]
    }
}

/// Listings for a single office, in globally sorted order.
#[derive(Debug, Clone)]
pub struct Group {
    pub office: String,
    pub records: Vec<DisplayRecord>,
}

/// One table's worth of rows for a single page: the header row followed by
/// at most capacity data rows (capacity + 1 on a group's final block).
/// Created by the paginator, consumed by the assembler, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBlock {
    pub rows: Vec<Vec<String>>,
}

impl PageBlock {
    /// Data rows in this block, excluding the header row.
    pub fn data_rows(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

/// Paragraph styling handled by the renderer. Names describe the role; the
/// renderer maps each to font, size, and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    /// Bold red, centered; observation lines, headings, totals.
    Notice,
    /// Bold italic red; the legend title.
    LegendTitle,
    /// Plain body text; legend entries.
    LegendBody,
    /// Near-invisible filler used for vertical separation.
    Spacer,
}

/// A typed content block handed to the document renderer. The renderer lays
/// blocks out linearly, breaking pages on overflow and on `PageBreak`.
#[derive(Debug, Clone)]
pub enum ContentBlock {
    Image {
        path: PathBuf,
        width: f32,
        height: f32,
    },
    Paragraph {
        text: String,
        style: ParagraphStyle,
    },
    Table {
        rows: Vec<Vec<String>>,
        col_widths: Vec<f32>,
        row_height: f32,
        repeat_header_rows: usize,
    },
    PageBreak,
}

/// Counters produced while loading one CSV file.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub parse_errors: usize,
}

/// Outcome of one per-file report generation.
#[derive(Debug, Clone)]
pub struct FileSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_loaded: usize,
    pub records_rendered: usize,
    pub records_skipped: usize,
    pub group_count: usize,
    pub total_vacancies: u64,
    /// First rendered records, kept for the console preview.
    pub preview: Vec<DisplayRecord>,
}
