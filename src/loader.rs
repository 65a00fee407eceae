use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use log::warn;

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::types::{LoadReport, RawRow, REQUIRED_COLUMNS};

/// Read one semicolon-delimited listings file into raw rows.
///
/// The exports are Latin-1 encoded, so the bytes are decoded up front
/// (Windows-1252, a superset of ISO-8859-1 on the printable range) and the
/// CSV reader runs over the decoded text. Rows that fail to deserialize
/// are counted and skipped; a missing required column fails the file.
pub fn load_raw(path: &Path, cfg: &ReportConfig) -> Result<(Vec<RawRow>, LoadReport), ReportError> {
    let bytes = fs::read(path).map_err(|source| ReportError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);

    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|source| ReportError::MalformedInput {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(ReportError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let mut report = LoadReport::default();
    let mut rows: Vec<RawRow> = Vec::new();
    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        match result {
            Ok(row) => rows.push(row),
            Err(err) => {
                report.parse_errors += 1;
                warn!("{}: skipping unreadable row: {}", path.display(), err);
            }
        }
    }

    // Some export tools close the file with a footer row; drop it.
    if cfg.drop_trailing_sentinel {
        rows.pop();
    }
    report.kept_rows = rows.len();

    if rows.is_empty() {
        return Err(ReportError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    Ok((rows, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const HEADER: &str = "Posto;Ocupação;Qtd. Vagas Disponíveis;Município Local de Trabalho;Forma de Contratação;Salário;Frequência de Pagamento;Escolaridade;Tempo de Experiência;Aceita Deficientes";

    fn write_latin1(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("vagas-loader-{}-{}", std::process::id(), name));
        let (encoded, _, _) = encoding_rs::WINDOWS_1252.encode(content);
        fs::write(&path, encoded).unwrap();
        path
    }

    fn row(posto: &str, vagas: &str) -> String {
        format!("{posto};Operador;{vagas};PE-Recife;CLT;1.500,00;Mensal;Ensino Médio Completo;0;Não aceita")
    }

    #[test]
    fn reads_latin1_semicolon_files() {
        let content = format!(
            "{HEADER}\n{}\n{}\nsentinel;;;;;;;;;\n",
            row("Sine Igarassu/Pe", "2"),
            row("Sine Vitoria de Santo Antao/Pe", "1")
        );
        let path = write_latin1("ok.csv", &content);
        let cfg = ReportConfig::default();
        let (rows, report) = load_raw(&path, &cfg).unwrap();
        // The sentinel footer row is dropped.
        assert_eq!(rows.len(), 2);
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.kept_rows, 2);
        assert_eq!(rows[0].posto.as_deref(), Some("Sine Igarassu/Pe"));
        assert_eq!(rows[0].ocupacao.as_deref(), Some("Operador"));
        fs::remove_file(path).ok();
    }

    #[test]
    fn sentinel_drop_is_configurable() {
        let content = format!("{HEADER}\n{}\n", row("Sine Igarassu/Pe", "2"));
        let path = write_latin1("nosentinel.csv", &content);
        let mut cfg = ReportConfig::default();
        cfg.drop_trailing_sentinel = false;
        let (rows, _) = load_raw(&path, &cfg).unwrap();
        assert_eq!(rows.len(), 1);
        fs::remove_file(path).ok();
    }

    #[test]
    fn missing_column_fails_the_file() {
        let content = "Posto;Ocupação\nSine Igarassu/Pe;Operador\n";
        let path = write_latin1("missing.csv", content);
        let cfg = ReportConfig::default();
        match load_raw(&path, &cfg) {
            Err(ReportError::MissingColumn { column, .. }) => {
                assert_eq!(column, "Qtd. Vagas Disponíveis")
            }
            other => panic!("expected MissingColumn, got {:?}", other.map(|_| ())),
        }
        fs::remove_file(path).ok();
    }

    #[test]
    fn accented_values_survive_decoding() {
        let content = format!(
            "{HEADER}\nSine Vitoria de Santo Antao/Pe;Padeiro de São José;1;PE-Vitória;CLT;1.500,00;Mensal;Ensino Médio Completo;0;Não aceita\nx;;;;;;;;;\n"
        );
        let path = write_latin1("accents.csv", &content);
        let cfg = ReportConfig::default();
        let (rows, _) = load_raw(&path, &cfg).unwrap();
        assert_eq!(rows[0].ocupacao.as_deref(), Some("Padeiro de São José"));
        assert_eq!(rows[0].municipio.as_deref(), Some("PE-Vitória"));
        fs::remove_file(path).ok();
    }
}
