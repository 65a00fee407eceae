// Row-level transformation: one `RawRow` in, one `DisplayRecord` out.
use crate::config::ReportConfig;
use crate::error::FormatError;
use crate::format;
use crate::types::{DisplayRecord, RawRow};

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("").trim()
}

/// Build the display form of a raw listing row.
///
/// A failed sub-step (non-numeric wage) is returned as a `FormatError`;
/// the caller logs it and drops the record without aborting the file.
pub fn to_display(raw: &RawRow, cfg: &ReportConfig) -> Result<DisplayRecord, FormatError> {
    let office = format::abbreviate_office(
        &format::normalize_office(field(&raw.posto)),
        &cfg.office_aliases,
    );

    let wage = format::normalize_wage(field(&raw.salario), field(&raw.frequencia_pagamento))?;

    let raw_contract = field(&raw.forma_contratacao);
    let contract =
        match format::classify_disability_contract(raw_contract, field(&raw.aceita_deficientes)) {
            Some(exclusive) => exclusive.to_string(),
            None => raw_contract.to_string(),
        };

    Ok(DisplayRecord {
        agencia: office,
        vagas: field(&raw.qtd_vagas).to_string(),
        descricao: format::truncate(
            field(&raw.ocupacao),
            cfg.occupation_limit,
            cfg.legacy_truncation,
        ),
        local_trabalho: format::normalize_municipality(field(&raw.municipio), cfg),
        contrato: contract,
        salario: wage,
        escolaridade: format::normalize_schooling(field(&raw.escolaridade)),
        experiencia: format::normalize_experience(field(&raw.tempo_experiencia)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_raw() -> RawRow {
        RawRow {
            posto: Some("Sine Igarassu/Pe".into()),
            ocupacao: Some("Auxiliar de linha de produção".into()),
            qtd_vagas: Some("3".into()),
            municipio: Some("PE-Igarassu".into()),
            forma_contratacao: Some("CLT".into()),
            salario: Some("1.412,00".into()),
            frequencia_pagamento: Some("Mensal".into()),
            escolaridade: Some("Ensino Médio Completo".into()),
            tempo_experiencia: Some("6".into()),
            aceita_deficientes: Some("Não aceita".into()),
        }
    }

    #[test]
    fn full_row_is_normalized_in_display_order() {
        let cfg = ReportConfig::default();
        let rec = to_display(&sample_raw(), &cfg).unwrap();
        assert_eq!(rec.agencia, "Igarassu");
        assert_eq!(rec.vagas, "3");
        assert_eq!(rec.descricao, "Auxiliar de linha de produção");
        assert_eq!(rec.local_trabalho, "Igarassu");
        assert_eq!(rec.contrato, "CLT");
        assert_eq!(rec.salario, "R$ 1412 / Mensal");
        assert_eq!(rec.escolaridade, "Ensino Médio");
        assert_eq!(rec.experiencia, "6 Meses");
    }

    #[test]
    fn exclusive_listing_gets_the_override_label() {
        let cfg = ReportConfig::default();
        let mut raw = sample_raw();
        raw.aceita_deficientes = Some("Exclusivamente deficiente".into());
        let rec = to_display(&raw, &cfg).unwrap();
        assert_eq!(rec.contrato, "Exclusivo PCD");
    }

    #[test]
    fn bad_wage_fails_the_record_only() {
        let cfg = ReportConfig::default();
        let mut raw = sample_raw();
        raw.salario = Some("a combinar".into());
        assert!(to_display(&raw, &cfg).is_err());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let cfg = ReportConfig::default();
        let mut raw = sample_raw();
        raw.tempo_experiencia = None;
        raw.escolaridade = None;
        let rec = to_display(&raw, &cfg).unwrap();
        assert_eq!(rec.experiencia, "Não Exigida");
        assert_eq!(rec.escolaridade, "");
    }
}
