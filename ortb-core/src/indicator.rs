//! Indicator reference table: raw code -> display name, theme and source.

use crate::observation::find_column;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// Theme assigned to indicators missing from the reference table.
pub const UNCLASSIFIED_THEME: &str = "Non classé";

/// Field delimiter of `columns_indicateurs.csv`.
pub const MAPPING_DELIMITER: u8 = b';';

const CODE_COLUMN: &str = "Indicateur";
const THEME_COLUMN: &str = "Thématique";
const NAME_COLUMN: &str = "Nouveau_nom_indicateur";
const SOURCE_COLUMN: &str = "Source";

/// One row of the indicator reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    /// Raw indicator code as it appears in the observation files.
    pub code: String,
    /// Display name that replaces the code once the mapping is applied.
    pub name: String,
    /// Thematic category.
    pub theme: String,
    /// Data producer, shown under the map title.
    pub source: Option<String>,
}

impl IndicatorRecord {
    /// Degenerate record used when no reference table is available.
    pub fn unclassified(code: &str) -> Self {
        Self {
            code: code.to_string(),
            name: code.to_string(),
            theme: UNCLASSIFIED_THEME.to_string(),
            source: None,
        }
    }

    /// Parse the `;`-delimited reference table.
    ///
    /// Expected headers: `Indicateur;Thématique;Nouveau_nom_indicateur[;Source]`.
    /// Empty themes fall back to [`UNCLASSIFIED_THEME`] and empty names to the
    /// raw code. Rows without a code are skipped.
    pub fn parse_csv(csv_data: &str) -> anyhow::Result<Vec<IndicatorRecord>> {
        let csv_data = csv_data.trim_start_matches('\u{feff}');
        let mut rdr = ReaderBuilder::new()
            .delimiter(MAPPING_DELIMITER)
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let headers = rdr.headers()?.clone();
        let code_idx = match find_column(&headers, &[CODE_COLUMN]) {
            Some(idx) => idx,
            None => anyhow::bail!("Colonne manquante dans le référentiel des indicateurs : {}", CODE_COLUMN),
        };
        let theme_idx = find_column(&headers, &[THEME_COLUMN]);
        let name_idx = find_column(&headers, &[NAME_COLUMN]);
        let source_idx = find_column(&headers, &[SOURCE_COLUMN]);

        let non_empty = |record: &csv::StringRecord, idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let mut records = Vec::new();
        for result in rdr.records() {
            let r = result?;
            let code = match non_empty(&r, Some(code_idx)) {
                Some(code) => code,
                None => continue,
            };
            records.push(IndicatorRecord {
                name: non_empty(&r, name_idx).unwrap_or_else(|| code.clone()),
                theme: non_empty(&r, theme_idx).unwrap_or_else(|| UNCLASSIFIED_THEME.to_string()),
                source: non_empty(&r, source_idx),
                code,
            });
        }
        log::info!("indicator: parsed {} indicator records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPPING_CSV: &str = "\
Indicateur;Thématique;Nouveau_nom_indicateur;Source
pop_tot;Démographie;Population totale;INSEE
nb_vp;Mobilité;Nombre de voitures particulières;SDES
emis_co2;;;CITEPA
;Mobilité;Ligne sans code;
";

    #[test]
    fn parses_reference_table() {
        let records = IndicatorRecord::parse_csv(MAPPING_CSV).unwrap();
        assert_eq!(records.len(), 3, "row without code is skipped");
        assert_eq!(records[0].code, "pop_tot");
        assert_eq!(records[0].name, "Population totale");
        assert_eq!(records[0].theme, "Démographie");
        assert_eq!(records[0].source.as_deref(), Some("INSEE"));
    }

    #[test]
    fn empty_cells_fall_back_to_code_and_unclassified() {
        let records = IndicatorRecord::parse_csv(MAPPING_CSV).unwrap();
        let co2 = records.iter().find(|r| r.code == "emis_co2").unwrap();
        assert_eq!(co2.name, "emis_co2");
        assert_eq!(co2.theme, UNCLASSIFIED_THEME);
        assert_eq!(co2.source.as_deref(), Some("CITEPA"), "source is read even when name and theme are empty");
    }

    #[test]
    fn source_column_is_optional() {
        let csv = "\u{feff}Indicateur;Thématique;Nouveau_nom_indicateur\nx;T;Nom X\n";
        let records = IndicatorRecord::parse_csv(csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "x");
        assert!(records[0].source.is_none());
    }

    #[test]
    fn missing_code_column_is_an_error() {
        let csv = "Code;Thématique\nx;T\n";
        assert!(IndicatorRecord::parse_csv(csv).is_err());
    }

    #[test]
    fn unclassified_record_uses_code_as_name() {
        let record = IndicatorRecord::unclassified("abc");
        assert_eq!(record.name, "abc");
        assert_eq!(record.theme, UNCLASSIFIED_THEME);
    }
}
