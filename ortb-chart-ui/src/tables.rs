//! Row/config JSON for the D3.js data tables.

use ortb_core::dates::{format_iso, iso_to_display};
use ortb_core::export;
use ortb_core::observation::Observation;
use ortb_core::scale::Scale;
use ortb_db::models::TerritoryValue;
use serde_json::{json, Value};

/// Rows shown at most in the raw-data table; the CSV export is not capped.
pub const RAW_TABLE_MAX_ROWS: usize = 2000;

fn config(columns: &[&str], numeric: &[&str], max_rows: usize, height: u32) -> String {
    json!({
        "columns": columns,
        "numericColumns": numeric,
        "maxRows": max_rows,
        "height": height,
    })
    .to_string()
}

/// Filtered observations in export column order.
///
/// Returns `(data_json, config_json)` for `js_bridge::render_data_table`.
pub fn raw_table(rows: &[Observation], scale: Scale) -> (String, String) {
    let data: Vec<Value> = rows
        .iter()
        .map(|row| {
            json!([
                row.label.as_deref().unwrap_or(""),
                row.code,
                row.scale.label(),
                format_iso(&row.date),
                row.theme,
                row.indicator,
                row.value,
                row.unit.as_deref().unwrap_or(""),
                row.indicator_code,
            ])
        })
        .collect();
    (
        Value::Array(data).to_string(),
        config(&export::headers(scale), &["valeur"], RAW_TABLE_MAX_ROWS, 400),
    )
}

/// The "Données affichées" table under the map: label, code, value and
/// the date as DD/MM/YYYY.
pub fn map_table(values: &[TerritoryValue], scale: Scale) -> (String, String) {
    let data: Vec<Value> = values
        .iter()
        .map(|v| json!([v.label, v.code, v.value, iso_to_display(&v.date)]))
        .collect();
    let columns = [scale.label_column(), scale.code_column(), "valeur", "date"];
    (
        Value::Array(data).to_string(),
        config(&columns, &["valeur"], values.len().max(1), 360),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn observation(value: Option<f64>) -> Observation {
        Observation {
            scale: Scale::Epci,
            code: "243500139".to_string(),
            label: Some("Rennes Métropole".to_string()),
            indicator_code: "pop_tot".to_string(),
            indicator: "Population totale".to_string(),
            theme: "Démographie".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            value,
            unit: None,
        }
    }

    #[test]
    fn raw_rows_follow_export_columns() {
        let (data, config) = raw_table(&[observation(Some(472602.0)), observation(None)], Scale::Epci);
        let data: Value = serde_json::from_str(&data).unwrap();
        let config: Value = serde_json::from_str(&config).unwrap();

        assert_eq!(config["columns"][0], "libelle_epci");
        assert_eq!(config["columns"][2], "maille");
        assert_eq!(data[0][2], "EPCI");
        assert_eq!(data[0][3], "2024-01-01");
        assert_eq!(data[0][6], 472602.0);
        assert!(data[1][6].is_null());
        assert_eq!(data[1][7], "");
    }

    #[test]
    fn map_rows_use_display_dates() {
        let values = vec![TerritoryValue {
            code: "35238".to_string(),
            label: "Rennes".to_string(),
            value: Some(227830.0),
            date: "2024-01-01".to_string(),
        }];
        let (data, config) = map_table(&values, Scale::Commune);
        let data: Value = serde_json::from_str(&data).unwrap();
        let config: Value = serde_json::from_str(&config).unwrap();

        assert_eq!(data[0], json!(["Rennes", "35238", 227830.0, "01/01/2024"]));
        assert_eq!(config["columns"], json!(["libelle_commune", "code_commune", "valeur", "date"]));
    }
}
