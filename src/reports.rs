// Grouping, aggregation, and report assembly.
//
// `generate_report` is the per-file driver: load, transform, sort, group,
// paginate, assemble the content-block sequence, and hand it to the PDF
// renderer. All totals are local to one call; nothing leaks across files.
use std::path::Path;

use log::{debug, warn};

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::format::EXCLUSIVE_PCD;
use crate::output;
use crate::paginate::paginate;
use crate::pdf::DocRenderer;
use crate::types::{
    ContentBlock, DisplayRecord, FileSummary, Group, ParagraphStyle, COLUMN_HEADERS,
};
use crate::util::parse_count_safe;
use crate::{loader, transform};

const OBS_TEXT: &str = "Obs: Vagas sujeitas a alterações no decorrer do dia.";
const DATE_PREFIX: &str = "Vagas a serem publicadas para o dia: ";
const PCD_HEADING: &str = "Vagas Exclusivas para PCD:";
const SUBTOTAL_LABEL: &str = "Vagas";
const LEGEND_TITLE: &str = "Legenda:";
const LEGEND_PCD: &str = "Exclusivo PCD = Exclusivo para Pessoa com Deficiência";
const LEGEND_SCHOOLING: &str = "Não C. = Não Completo";

/// Table geometry shared by every block: per-column widths in points and
/// the fixed row height.
pub const COL_WIDTHS: [f32; 8] = [90.0, 40.0, 190.0, 135.0, 75.0, 80.0, 100.0, 65.0];
pub const ROW_HEIGHT: f32 = 25.0;

/// Sort records by (uppercased first letter of office, office, contract),
/// stably, so ties keep their input order. The contract component can be
/// switched off to match the older sort policy.
pub fn sort_records(records: &mut [DisplayRecord], cfg: &ReportConfig) {
    fn first_letter_upper(label: &str) -> String {
        label
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
    records.sort_by(|a, b| {
        let key = first_letter_upper(&a.agencia)
            .cmp(&first_letter_upper(&b.agencia))
            .then_with(|| a.agencia.cmp(&b.agencia));
        if cfg.sort_by_contract {
            key.then_with(|| a.contrato.cmp(&b.contrato))
        } else {
            key
        }
    });
}

/// Partition sorted records into office groups, in order of each office's
/// first appearance. Concatenating the groups reproduces the input.
pub fn group_by_office(records: Vec<DisplayRecord>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for record in records {
        match groups.last_mut() {
            Some(group) if group.office == record.agencia => group.records.push(record),
            _ => groups.push(Group {
                office: record.agencia.clone(),
                records: vec![record],
            }),
        }
    }
    groups
}

/// Sum vacancy counts, treating malformed values as zero.
pub fn sum_vacancies<'a>(records: impl IntoIterator<Item = &'a DisplayRecord>) -> u64 {
    records
        .into_iter()
        .map(|r| parse_count_safe(&r.vagas).unwrap_or(0) as u64)
        .sum()
}

fn paragraph(text: impl Into<String>, style: ParagraphStyle) -> ContentBlock {
    ContentBlock::Paragraph {
        text: text.into(),
        style,
    }
}

fn table(rows: Vec<Vec<String>>, repeat_header_rows: usize) -> ContentBlock {
    ContentBlock::Table {
        rows,
        col_widths: COL_WIDTHS.to_vec(),
        row_height: ROW_HEIGHT,
        repeat_header_rows,
    }
}

fn banner(cfg: &ReportConfig) -> Option<ContentBlock> {
    cfg.banner.as_ref().map(|spec| ContentBlock::Image {
        path: spec.path.clone(),
        width: spec.width,
        height: spec.height,
    })
}

fn subtotal_row(total: u64) -> Vec<String> {
    let mut row = vec![SUBTOTAL_LABEL.to_string(), total.to_string()];
    row.extend(std::iter::repeat(String::new()).take(COLUMN_HEADERS.len() - 2));
    row
}

/// Build the full content-block sequence for one report.
///
/// Records whose contract is the exclusive-PCD marker are diverted out of
/// the office groups into a dedicated final section; the global total
/// still counts them. Returns the blocks, the group count, and the total.
pub fn assemble(
    mut records: Vec<DisplayRecord>,
    cfg: &ReportConfig,
    date_text: Option<&str>,
) -> (Vec<ContentBlock>, usize, u64) {
    sort_records(&mut records, cfg);
    let total_vacancies = sum_vacancies(records.iter());

    let (exclusive, regular): (Vec<DisplayRecord>, Vec<DisplayRecord>) = records
        .into_iter()
        .partition(|r| r.contrato == EXCLUSIVE_PCD);

    let groups = group_by_office(regular);
    let mut blocks: Vec<ContentBlock> = Vec::new();
    let mut first_page = true;

    for (group_index, group) in groups.iter().enumerate() {
        let is_last_group = group_index + 1 == groups.len();
        let subtotal = sum_vacancies(group.records.iter());
        let mut page_blocks = paginate(&group.records, cfg.page_capacity);
        if let Some(last) = page_blocks.last_mut() {
            last.rows.push(subtotal_row(subtotal));
        }

        let block_count = page_blocks.len();
        for (block_index, page_block) in page_blocks.into_iter().enumerate() {
            if let Some(image) = banner(cfg) {
                blocks.push(image);
            }
            if first_page {
                if let (true, Some(date)) = (cfg.date_line, date_text) {
                    blocks.push(paragraph(
                        format!("{}{}", DATE_PREFIX, date),
                        ParagraphStyle::Notice,
                    ));
                }
                first_page = false;
            }
            blocks.push(paragraph(OBS_TEXT, ParagraphStyle::Notice));
            blocks.push(table(page_block.rows, 1));

            let is_last_block = block_index + 1 == block_count;
            if !(is_last_block && is_last_group) {
                blocks.push(ContentBlock::PageBreak);
            }
        }
    }

    if !exclusive.is_empty() {
        if !blocks.is_empty() {
            blocks.push(ContentBlock::PageBreak);
        }
        if let Some(image) = banner(cfg) {
            blocks.push(image);
        }
        blocks.push(paragraph(PCD_HEADING, ParagraphStyle::Notice));
        blocks.push(paragraph(OBS_TEXT, ParagraphStyle::Notice));
        let mut rows: Vec<Vec<String>> =
            vec![COLUMN_HEADERS.iter().map(|h| h.to_string()).collect()];
        rows.extend(exclusive.iter().map(|r| r.to_row()));
        blocks.push(table(rows, 1));
    }

    blocks.push(paragraph("-", ParagraphStyle::Spacer));
    blocks.push(paragraph(
        format!("Total de Vagas: {}", total_vacancies),
        ParagraphStyle::Notice,
    ));
    blocks.push(paragraph(LEGEND_TITLE, ParagraphStyle::LegendTitle));
    blocks.push(paragraph(LEGEND_PCD, ParagraphStyle::LegendBody));
    blocks.push(paragraph(LEGEND_SCHOOLING, ParagraphStyle::LegendBody));

    (blocks, groups.len(), total_vacancies)
}

/// Generate one PDF report for one input file.
///
/// Per-record format failures are logged and skipped; any other error
/// aborts this file only and is reported to the caller.
pub fn generate_report(
    input: &Path,
    cfg: &ReportConfig,
    date_text: Option<&str>,
) -> Result<FileSummary, ReportError> {
    let (raw_rows, load_report) = loader::load_raw(input, cfg)?;

    let mut records: Vec<DisplayRecord> = Vec::with_capacity(raw_rows.len());
    let mut skipped = 0usize;
    for raw in &raw_rows {
        match transform::to_display(raw, cfg) {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                warn!("{}: skipping record: {}", input.display(), err);
            }
        }
    }
    if records.is_empty() {
        return Err(ReportError::EmptyInput {
            path: input.to_path_buf(),
        });
    }

    let record_count = records.len();
    let preview: Vec<DisplayRecord> = records.iter().take(3).cloned().collect();
    let (blocks, group_count, total_vacancies) = assemble(records, cfg, date_text);
    debug!(
        "{}: {} content blocks across {} groups",
        input.display(),
        blocks.len(),
        group_count
    );

    let out_path = output::pdf_path_for(input, &cfg.output_dir);
    let renderer = DocRenderer::landscape_letter();
    renderer.render(&blocks, &out_path)?;

    Ok(FileSummary {
        input: input.to_path_buf(),
        output: out_path,
        rows_loaded: load_report.total_rows,
        records_rendered: record_count,
        records_skipped: skipped + load_report.parse_errors,
        group_count,
        total_vacancies,
        preview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(office: &str, contract: &str, vagas: &str) -> DisplayRecord {
        DisplayRecord {
            agencia: office.into(),
            vagas: vagas.into(),
            descricao: "Operador".into(),
            local_trabalho: "Recife".into(),
            contrato: contract.into(),
            salario: "R$ 1412 / Mensal".into(),
            escolaridade: "Ensino Médio".into(),
            experiencia: "Não Exigida".into(),
        }
    }

    fn no_banner_cfg() -> ReportConfig {
        let mut cfg = ReportConfig::default();
        cfg.banner = None;
        cfg.date_line = false;
        cfg
    }

    #[test]
    fn sorting_is_case_insensitive_on_the_first_letter() {
        let mut records = vec![
            record("igarassu", "CLT", "1"),
            record("Goiana", "CLT", "1"),
            record("Igarassu", "CLT", "1"),
        ];
        sort_records(&mut records, &ReportConfig::default());
        let offices: Vec<&str> = records.iter().map(|r| r.agencia.as_str()).collect();
        assert_eq!(offices, ["Goiana", "Igarassu", "igarassu"]);
    }

    #[test]
    fn groups_concatenate_back_to_the_sorted_sequence() {
        let mut records = vec![
            record("Recife", "CLT", "1"),
            record("Goiana", "CLT", "2"),
            record("Recife", "Temporário", "3"),
            record("Goiana", "CLT", "4"),
        ];
        sort_records(&mut records, &ReportConfig::default());
        let sorted = records.clone();
        let groups = group_by_office(records);
        let rebuilt: Vec<DisplayRecord> =
            groups.into_iter().flat_map(|g| g.records).collect();
        assert_eq!(rebuilt, sorted);
    }

    #[test]
    fn vacancy_sum_skips_malformed_counts() {
        let records = vec![
            record("Recife", "CLT", "3"),
            record("Recife", "CLT", "x"),
            record("Recife", "CLT", "5"),
        ];
        assert_eq!(sum_vacancies(records.iter()), 8);
    }

    #[test]
    fn assembled_report_ends_with_totals_and_legend() {
        let cfg = no_banner_cfg();
        let records = vec![record("Recife", "CLT", "2"), record("Goiana", "CLT", "4")];
        let (blocks, group_count, total) = assemble(records, &cfg, None);
        assert_eq!(group_count, 2);
        assert_eq!(total, 6);
        let texts: Vec<String> = blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Paragraph { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"Total de Vagas: 6".to_string()));
        assert_eq!(texts.last().unwrap(), LEGEND_SCHOOLING);
    }

    #[test]
    fn every_table_is_preceded_by_the_observation_line() {
        let mut cfg = no_banner_cfg();
        cfg.page_capacity = 2;
        let records: Vec<DisplayRecord> =
            (0..5).map(|_| record("Recife", "CLT", "1")).collect();
        let (blocks, _, _) = assemble(records, &cfg, None);
        for (i, block) in blocks.iter().enumerate() {
            if matches!(block, ContentBlock::Table { .. }) {
                match &blocks[i - 1] {
                    ContentBlock::Paragraph { text, .. } => assert_eq!(text, OBS_TEXT),
                    other => panic!("expected observation paragraph, got {:?}", other),
                }
            }
        }
    }

    #[test]
    fn page_breaks_separate_blocks_but_not_the_report_end() {
        let mut cfg = no_banner_cfg();
        cfg.page_capacity = 2;
        // 5 records in one office: blocks of 2 and 3 with one break between.
        let records: Vec<DisplayRecord> =
            (0..5).map(|_| record("Recife", "CLT", "1")).collect();
        let (blocks, _, _) = assemble(records, &cfg, None);
        let breaks = blocks
            .iter()
            .filter(|b| matches!(b, ContentBlock::PageBreak))
            .count();
        assert_eq!(breaks, 1);
    }

    #[test]
    fn group_subtotal_lands_on_the_final_block() {
        let mut cfg = no_banner_cfg();
        cfg.page_capacity = 2;
        let records: Vec<DisplayRecord> =
            (0..5).map(|_| record("Recife", "CLT", "2")).collect();
        let (blocks, _, _) = assemble(records, &cfg, None);
        let tables: Vec<&Vec<Vec<String>>> = blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Table { rows, .. } => Some(rows),
                _ => None,
            })
            .collect();
        assert_eq!(tables.len(), 2);
        // header + 2 data rows on the first block
        assert_eq!(tables[0].len(), 3);
        // header + 3 data rows + subtotal on the final block
        let last = tables[1];
        assert_eq!(last.len(), 5);
        assert_eq!(last.last().unwrap()[0], SUBTOTAL_LABEL);
        assert_eq!(last.last().unwrap()[1], "10");
    }

    #[test]
    fn exclusive_records_move_to_their_own_section() {
        let cfg = no_banner_cfg();
        let records = vec![
            record("Recife", "CLT", "1"),
            record("Recife", EXCLUSIVE_PCD, "2"),
        ];
        let (blocks, group_count, total) = assemble(records, &cfg, None);
        // The exclusive record does not form an office group.
        assert_eq!(group_count, 1);
        assert_eq!(total, 3);
        let texts: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Paragraph { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&PCD_HEADING));
        let tables: Vec<&Vec<Vec<String>>> = blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Table { rows, .. } => Some(rows),
                _ => None,
            })
            .collect();
        let pcd_table = tables.last().unwrap();
        assert_eq!(pcd_table.len(), 2);
        assert_eq!(pcd_table[1][4], EXCLUSIVE_PCD);
    }

    #[test]
    fn date_line_appears_once_on_the_first_page() {
        let mut cfg = no_banner_cfg();
        cfg.date_line = true;
        cfg.page_capacity = 1;
        let records = vec![record("Recife", "CLT", "1"), record("Recife", "CLT", "1")];
        let (blocks, _, _) = assemble(records, &cfg, Some("6 de Agosto de 2026"));
        let date_lines = blocks
            .iter()
            .filter(|b| match b {
                ContentBlock::Paragraph { text, .. } => text.starts_with(DATE_PREFIX),
                _ => false,
            })
            .count();
        assert_eq!(date_lines, 1);
        match &blocks[0] {
            ContentBlock::Paragraph { text, .. } => {
                assert_eq!(text, "Vagas a serem publicadas para o dia: 6 de Agosto de 2026")
            }
            other => panic!("expected the date line first, got {:?}", other),
        }
    }
}
