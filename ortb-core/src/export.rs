//! CSV export of filtered observations.
//!
//! Exports are UTF-8 with a BOM so that spreadsheet tools pick the right
//! encoding. Columns follow the raw-data table order: label, code, scale,
//! date, theme, indicator, value, unit, then the raw indicator code.

use crate::dates::{format_iso, parse_iso_date};
use crate::observation::{find_column, normalize_code, parse_value, Observation};
use crate::scale::Scale;
use anyhow::Context;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};

const BOM: &str = "\u{feff}";

pub const SCALE_COLUMN: &str = "maille";
pub const THEME_COLUMN: &str = "thematique";
pub const INDICATOR_CODE_COLUMN: &str = "code_indicateur";

/// Name of the downloaded file, e.g. `donnees_commune_filtrees.csv`.
pub fn file_name(scale: Scale) -> String {
    format!("donnees_{}_filtrees.csv", scale.slug())
}

/// Header row of an export for `scale`.
pub fn headers(scale: Scale) -> [&'static str; 9] {
    [
        scale.label_column(),
        scale.code_column(),
        SCALE_COLUMN,
        "date",
        THEME_COLUMN,
        "indicateur",
        "valeur",
        "unite",
        INDICATOR_CODE_COLUMN,
    ]
}

/// Serialize rows to a BOM-prefixed CSV string.
pub fn to_csv(rows: &[Observation], scale: Scale) -> anyhow::Result<String> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(headers(scale))?;
    for row in rows {
        let value = row.value.map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([
            row.label.as_deref().unwrap_or(""),
            row.code.as_str(),
            row.scale.label(),
            format_iso(&row.date).as_str(),
            row.theme.as_str(),
            row.indicator.as_str(),
            value.as_str(),
            row.unit.as_deref().unwrap_or(""),
            row.indicator_code.as_str(),
        ])?;
    }
    let bytes = wtr.into_inner().context("flushing CSV export")?;
    let body = String::from_utf8(bytes).context("CSV export is not UTF-8")?;
    log::info!("export: wrote {} {} rows", rows.len(), scale);
    Ok(format!("{}{}", BOM, body))
}

/// Read an export back into observations.
///
/// The scale of each row comes from the `maille` column; the code and label
/// columns may be either the commune or the EPCI ones.
pub fn parse(csv_data: &str) -> anyhow::Result<Vec<Observation>> {
    let csv_data = csv_data.trim_start_matches('\u{feff}');
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());
    let headers = rdr.headers()?.clone();

    let column = |names: &[&str]| -> anyhow::Result<usize> {
        find_column(&headers, names)
            .with_context(|| format!("Colonne manquante dans l'export : {}", names.join(" / ")))
    };
    let code_idx = column(&[Scale::Commune.code_column(), Scale::Epci.code_column()])?;
    let scale_idx = column(&[SCALE_COLUMN])?;
    let date_idx = column(&["date"])?;
    let indicator_idx = column(&["indicateur"])?;
    let label_idx = find_column(&headers, &[Scale::Commune.label_column(), Scale::Epci.label_column()]);
    let theme_idx = find_column(&headers, &[THEME_COLUMN]);
    let value_idx = find_column(&headers, &["valeur"]);
    let unit_idx = find_column(&headers, &["unite"]);
    let indicator_code_idx = find_column(&headers, &[INDICATOR_CODE_COLUMN]);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let r = result?;
        let indicator = cell(&r, Some(indicator_idx)).unwrap_or_default();
        rows.push(Observation {
            scale: cell(&r, Some(scale_idx)).unwrap_or_default().parse()?,
            code: normalize_code(r.get(code_idx).unwrap_or("")),
            label: cell(&r, label_idx),
            indicator_code: cell(&r, indicator_code_idx).unwrap_or_else(|| indicator.clone()),
            theme: cell(&r, theme_idx).unwrap_or_default(),
            date: parse_iso_date(r.get(date_idx).unwrap_or(""))?,
            value: value_idx.and_then(|i| parse_value(r.get(i).unwrap_or(""))),
            unit: cell(&r, unit_idx),
            indicator,
        });
    }
    Ok(rows)
}

fn cell(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(code: &str, value: Option<f64>) -> Observation {
        Observation {
            scale: Scale::Epci,
            code: code.to_string(),
            label: Some("Rennes Métropole".to_string()),
            indicator_code: "pop_tot".to_string(),
            indicator: "Population totale".to_string(),
            theme: "Démographie".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            value,
            unit: Some("habitants".to_string()),
        }
    }

    #[test]
    fn file_name_uses_scale_slug() {
        assert_eq!(file_name(Scale::Commune), "donnees_commune_filtrees.csv");
        assert_eq!(file_name(Scale::Epci), "donnees_epci_filtrees.csv");
    }

    #[test]
    fn export_starts_with_bom_and_headers() {
        let csv = to_csv(&[row("243500139", Some(472602.0))], Scale::Epci).unwrap();
        assert!(csv.starts_with('\u{feff}'));
        let first_line = csv.trim_start_matches('\u{feff}').lines().next().unwrap();
        assert_eq!(
            first_line,
            "libelle_epci,code_epci,maille,date,thematique,indicateur,valeur,unite,code_indicateur"
        );
    }

    #[test]
    fn export_reads_back() {
        let rows = vec![row("243500139", Some(472602.5)), row("200039022", None)];
        let csv = to_csv(&rows, Scale::Epci).unwrap();
        let back = parse(&csv).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn parse_requires_scale_column() {
        let err = parse("code_commune,date,indicateur\n35238,2024-01-01,x\n").unwrap_err();
        assert!(err.to_string().contains("maille"));
    }
}
