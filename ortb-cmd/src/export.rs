//! Raw-data filter and CSV export without the dashboard.

use crate::load::load_database;
use anyhow::Context;
use log::info;
use ortb_core::dates::{format_iso, parse_any_date};
use ortb_core::export;
use ortb_core::filter::{Facet, FilterSpec};
use ortb_core::scale::Scale;
use ortb_db::Database;
use std::fs;
use std::path::{Path, PathBuf};

/// Facet values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ExportFilters {
    pub territories: Vec<String>,
    pub themes: Vec<String>,
    pub indicators: Vec<String>,
    pub dates: Vec<String>,
}

impl ExportFilters {
    /// Build the filter of `scale`. Dates are accepted in either source or
    /// ISO form and stored as ISO.
    pub fn to_spec(&self, scale: Scale) -> anyhow::Result<FilterSpec> {
        let dates = self
            .dates
            .iter()
            .map(|d| {
                parse_any_date(d)
                    .map(|date| format_iso(&date))
                    .with_context(|| format!("Invalid date: {}", d))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(FilterSpec::new(Some(scale))
            .with(Facet::Territory, self.territories.iter().cloned())
            .with(Facet::Theme, self.themes.iter().cloned())
            .with(Facet::Indicator, self.indicators.iter().cloned())
            .with(Facet::Date, dates))
    }
}

/// Filter `db` and serialize the result. Fails when no facet is selected
/// or nothing matches.
pub fn export_filtered(db: &Database, spec: &FilterSpec) -> anyhow::Result<(usize, String)> {
    let scale = spec.scale.unwrap_or_default();
    if spec.is_empty() {
        anyhow::bail!("Aucun filtre sélectionné : précisez au moins un territoire, une thématique, un indicateur ou une date");
    }
    let rows = db.query_filtered(spec)?;
    if rows.is_empty() {
        anyhow::bail!("Aucune donnée ne correspond aux filtres sélectionnés.");
    }
    Ok((rows.len(), export::to_csv(&rows, scale)?))
}

pub fn run_export(
    data_dir: &Path,
    scale: Scale,
    filters: &ExportFilters,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let db = load_database(data_dir)?;
    if !db.available_scales()?.contains(&scale) {
        anyhow::bail!("Pas de données à l'échelle {}", scale);
    }
    let spec = filters.to_spec(scale)?;
    let (count, csv) = export_filtered(&db, &spec)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(export::file_name(scale)));
    fs::write(&output, csv).with_context(|| format!("Failed to write {}", output.display()))?;
    info!("export: {} rows written to {}", count, output.display());
    println!("{} lignes filtrées -> {}", count, output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::tests::data_dir;

    #[test]
    fn date_forms_are_normalized() {
        let filters = ExportFilters {
            dates: vec!["01/01/2024".to_string(), "2023-01-01".to_string()],
            ..ExportFilters::default()
        };
        let spec = filters.to_spec(Scale::Commune).unwrap();
        assert!(spec.is_selected(Facet::Date, "2024-01-01"));
        assert!(spec.is_selected(Facet::Date, "2023-01-01"));
        assert_eq!(spec.selected_count(Facet::Territory), 0);
    }

    #[test]
    fn invalid_date_is_an_error() {
        let filters = ExportFilters {
            dates: vec!["janvier".to_string()],
            ..ExportFilters::default()
        };
        assert!(filters.to_spec(Scale::Commune).is_err());
    }

    #[test]
    fn writes_filtered_rows() {
        let dir = data_dir(true, true);
        let output = dir.path().join("out.csv");
        let filters = ExportFilters {
            indicators: vec!["Population totale".to_string()],
            dates: vec!["2024-01-01".to_string()],
            ..ExportFilters::default()
        };
        run_export(dir.path(), Scale::Commune, &filters, Some(&output)).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        let rows = export::parse(&written).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.scale == Scale::Commune));
        assert!(rows.iter().any(|r| r.code == "29019"));
    }

    #[test]
    fn empty_filter_is_refused() {
        let dir = data_dir(false, true);
        let db = load_database(dir.path()).unwrap();
        assert!(export_filtered(&db, &FilterSpec::new(Some(Scale::Commune))).is_err());
    }

    #[test]
    fn missing_scale_is_refused() {
        let dir = data_dir(false, true);
        let filters = ExportFilters {
            themes: vec!["Démographie".to_string()],
            ..ExportFilters::default()
        };
        assert!(run_export(dir.path(), Scale::Epci, &filters, None).is_err());
    }
}
