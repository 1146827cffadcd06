use crate::dates::parse_source_date;
use crate::indicator::UNCLASSIFIED_THEME;
use crate::scale::Scale;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};

/// Indicator code column in the observation files.
pub const INDICATOR_COLUMN: &str = "indicateur";
/// Date column in the observation files ("DD/MM/YYYY").
pub const DATE_COLUMN: &str = "date";
/// Numeric value column.
pub const VALUE_COLUMN: &str = "valeur";
/// Unit column.
pub const UNIT_COLUMN: &str = "unite";

/// A single indicator value for one territory at one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub scale: Scale,
    /// Territorial code (INSEE commune code or SIREN of the EPCI), always text.
    pub code: String,
    /// Territorial display name.
    pub label: Option<String>,
    /// Raw indicator code from the source file.
    pub indicator_code: String,
    /// Indicator display name (equals `indicator_code` until the mapping is applied).
    pub indicator: String,
    pub theme: String,
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub unit: Option<String>,
}

/// Result of parsing one observation file.
#[derive(Debug, Clone, Default)]
pub struct ParsedObservations {
    pub rows: Vec<Observation>,
    /// Rows dropped because their date could not be parsed.
    pub dropped_dates: usize,
    /// Rows dropped because their code or indicator was empty.
    pub dropped_incomplete: usize,
}

impl Observation {
    /// Parse a commune or EPCI observation file.
    ///
    /// Columns are located by header name so extra columns are ignored.
    /// `code_*`, `indicateur` and `date` are required; `valeur`, `unite` and
    /// the label column are optional.
    ///
    /// # Example CSV
    /// ```text
    /// code_commune,libelle_commune,indicateur,date,valeur,unite
    /// 35238,Rennes,pop_tot,01/01/2024,227830,habitants
    /// ```
    pub fn parse_csv(scale: Scale, csv_data: &str) -> anyhow::Result<ParsedObservations> {
        let csv_data = csv_data.trim_start_matches('\u{feff}');
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let headers = rdr.headers()?.clone();
        let required = |name: &str| -> anyhow::Result<usize> {
            match find_column(&headers, &[name]) {
                Some(idx) => Ok(idx),
                None => anyhow::bail!(
                    "Colonne manquante dans les données {} : {}",
                    scale.label(),
                    name
                ),
            }
        };
        let code_idx = required(scale.code_column())?;
        let indicator_idx = required(INDICATOR_COLUMN)?;
        let date_idx = required(DATE_COLUMN)?;
        let label_idx = find_column(&headers, scale.source_label_columns());
        let value_idx = find_column(&headers, &[VALUE_COLUMN]);
        let unit_idx = find_column(&headers, &[UNIT_COLUMN]);

        let mut parsed = ParsedObservations::default();
        for result in rdr.records() {
            let r = result?;
            let code = normalize_code(r.get(code_idx).unwrap_or(""));
            let indicator = r.get(indicator_idx).unwrap_or("").trim();
            if code.is_empty() || indicator.is_empty() {
                parsed.dropped_incomplete += 1;
                continue;
            }
            let date = match parse_source_date(r.get(date_idx).unwrap_or("")) {
                Some(date) => date,
                None => {
                    parsed.dropped_dates += 1;
                    continue;
                }
            };
            parsed.rows.push(Observation {
                scale,
                code,
                label: optional_text(&r, label_idx),
                indicator_code: indicator.to_string(),
                indicator: indicator.to_string(),
                theme: UNCLASSIFIED_THEME.to_string(),
                date,
                value: value_idx.and_then(|i| parse_value(r.get(i).unwrap_or(""))),
                unit: optional_text(&r, unit_idx),
            });
        }
        log::info!(
            "observation: parsed {} {} rows, dropped {} invalid dates, {} incomplete",
            parsed.rows.len(),
            scale,
            parsed.dropped_dates,
            parsed.dropped_incomplete
        );
        Ok(parsed)
    }
}

/// Cast a territorial code to text.
///
/// Codes exported by spreadsheet tools sometimes come out as floats
/// (`35238.0`); those are brought back to their integer form so that
/// the codes match the geometry keys.
pub fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_suffix(".0") {
        Some(int_part) if !int_part.is_empty() && int_part.chars().all(|c| c.is_ascii_digit()) => {
            int_part.to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// Parse a numeric cell; empty, non-numeric and non-finite cells are `None`.
pub fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Index of the first header matching one of `names`.
pub(crate) fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h.trim() == *name))
}

fn optional_text(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod test {
    use super::*;

    const COMMUNES_CSV: &str = "\
code_commune,libelle_commune,indicateur,date,valeur,unite
35238,Rennes,pop_tot,01/01/2024,227830,habitants
35238.0,Rennes,pop_tot,01/01/2023,225081,habitants
29019,Brest,pop_tot,pas une date,139926,habitants
29019,Brest,nb_vp,01/01/2024,,véhicules
,Sans code,pop_tot,01/01/2024,1,habitants
";

    const EPCI_CSV: &str = "\
code_epci,nom,indicateur,date,valeur,unite
243500139,Rennes Métropole,pop_tot,01/01/2024,472602,habitants
";

    #[test]
    fn parses_commune_rows_and_drops_invalid_dates() {
        let parsed = Observation::parse_csv(Scale::Commune, COMMUNES_CSV).unwrap();
        assert_eq!(parsed.rows.len(), 3);
        assert_eq!(parsed.dropped_dates, 1);
        assert_eq!(parsed.dropped_incomplete, 1);

        let first = &parsed.rows[0];
        assert_eq!(first.code, "35238");
        assert_eq!(first.label.as_deref(), Some("Rennes"));
        assert_eq!(first.indicator, "pop_tot");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(first.value, Some(227830.0));
        assert_eq!(first.theme, UNCLASSIFIED_THEME);
    }

    #[test]
    fn float_codes_are_cast_to_text() {
        let parsed = Observation::parse_csv(Scale::Commune, COMMUNES_CSV).unwrap();
        assert_eq!(parsed.rows[1].code, "35238");
    }

    #[test]
    fn empty_value_is_none() {
        let parsed = Observation::parse_csv(Scale::Commune, COMMUNES_CSV).unwrap();
        let nb_vp = parsed.rows.iter().find(|r| r.indicator == "nb_vp").unwrap();
        assert!(nb_vp.value.is_none());
        assert_eq!(nb_vp.unit.as_deref(), Some("véhicules"));
    }

    #[test]
    fn epci_label_is_read_from_nom() {
        let parsed = Observation::parse_csv(Scale::Epci, EPCI_CSV).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].scale, Scale::Epci);
        assert_eq!(parsed.rows[0].label.as_deref(), Some("Rennes Métropole"));
        assert_eq!(parsed.rows[0].code, "243500139");
    }

    #[test]
    fn missing_required_column_is_reported() {
        let csv = "code_commune,libelle_commune,date,valeur\n35238,Rennes,01/01/2024,1\n";
        let err = Observation::parse_csv(Scale::Commune, csv).unwrap_err();
        assert!(err.to_string().contains("indicateur"));
    }

    #[test]
    fn normalize_code_keeps_alphanumeric_codes() {
        assert_eq!(normalize_code(" 2A004 "), "2A004");
        assert_eq!(normalize_code("35000.0"), "35000");
        assert_eq!(normalize_code("35000.5"), "35000.5");
        assert_eq!(normalize_code(".0"), ".0");
    }

    #[test]
    fn parse_value_rejects_non_finite() {
        assert_eq!(parse_value("12.5"), Some(12.5));
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value("abc"), None);
    }
}
