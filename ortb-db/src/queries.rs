//! Typed query methods over the loaded datasets.
//!
//! Facet filtering for the raw-data page and the CLI export goes through a
//! single translation from [`FilterSpec`] to a SQL `WHERE` clause, see
//! [`filter_clause`].

use crate::models::{DatasetSummary, FilterMetrics, Territory, TerritoryValue, ThemeIndicators};
use crate::Database;
use chrono::NaiveDate;
use ortb_core::dates::format_iso;
use ortb_core::filter::{Facet, FilterSpec};
use ortb_core::observation::Observation;
use ortb_core::scale::Scale;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Row};

const OBSERVATION_COLUMNS: &str =
    "scale, code, label, indicator_code, indicator, theme, date, value, unit";

/// Column of `observations` tested by a facet.
fn facet_column(facet: Facet) -> &'static str {
    match facet {
        Facet::Territory => "code",
        Facet::Theme => "theme",
        Facet::Indicator => "indicator",
        Facet::Date => "date",
    }
}

/// Translate a filter specification into a `WHERE` clause and its parameters.
///
/// Facets are combined with `AND`, each one being a membership test.
/// Facets without a selected value add no condition.
pub(crate) fn filter_clause(spec: &FilterSpec) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut values = Vec::new();
    if let Some(scale) = spec.scale {
        conditions.push("scale = ?".to_string());
        values.push(scale.label().to_string());
    }
    for (facet, selected) in spec.active_facets() {
        let placeholders = vec!["?"; selected.len()].join(", ");
        conditions.push(format!("{} IN ({})", facet_column(facet), placeholders));
        values.extend(selected.iter().cloned());
    }
    if conditions.is_empty() {
        (String::new(), values)
    } else {
        (format!("WHERE {}", conditions.join(" AND ")), values)
    }
}

fn observation_from_row(row: &Row<'_>) -> rusqlite::Result<Observation> {
    let scale: String = row.get(0)?;
    let scale: Scale = scale
        .parse()
        .map_err(|e: anyhow::Error| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, e.into()))?;
    Ok(Observation {
        scale,
        code: row.get(1)?,
        label: row.get(2)?,
        indicator_code: row.get(3)?,
        indicator: row.get(4)?,
        theme: row.get(5)?,
        date: row.get(6)?,
        value: row.get(7)?,
        unit: row.get(8)?,
    })
}

impl Database {
    // ───────────────────── Dataset overview ─────────────────────

    /// Number of rows loaded for a scale.
    pub fn row_count(&self, scale: Scale) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM observations WHERE scale = ?1",
            params![scale.label()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Scales with at least one row, commune first.
    pub fn available_scales(&self) -> anyhow::Result<Vec<Scale>> {
        let mut scales = Vec::new();
        for scale in Scale::ALL {
            if self.row_count(scale)? > 0 {
                scales.push(scale);
            }
        }
        Ok(scales)
    }

    /// Headline numbers for the home page and the sidebar panel.
    pub fn query_summary(&self) -> anyhow::Result<DatasetSummary> {
        let conn = self.conn.borrow();
        let per_scale = |scale: Scale| -> anyhow::Result<(usize, usize, usize)> {
            let (indicators, territories, rows): (i64, i64, i64) = conn.query_row(
                "SELECT COUNT(DISTINCT indicator), COUNT(DISTINCT code), COUNT(*)
                 FROM observations WHERE scale = ?1",
                params![scale.label()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;
            Ok((indicators as usize, territories as usize, rows as usize))
        };
        let (commune_indicators, communes, _) = per_scale(Scale::Commune)?;
        let (epci_indicators, epcis, epci_rows) = per_scale(Scale::Epci)?;

        let (themes, first_date, last_date): (i64, Option<String>, Option<String>) = conn.query_row(
            "SELECT COUNT(DISTINCT theme), MIN(date), MAX(date)
             FROM observations WHERE scale = ?1",
            params![Scale::Commune.label()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(DatasetSummary {
            commune_indicators,
            epci_indicators,
            themes: themes as usize,
            communes,
            epcis,
            first_date,
            last_date,
            has_epci: epci_rows > 0,
        })
    }

    // ───────────────────── Map page ─────────────────────

    /// Distinct themes of a scale (or of every scale), sorted.
    pub fn query_themes(&self, scale: Option<Scale>) -> anyhow::Result<Vec<String>> {
        self.query_facet_values(&FilterSpec::new(scale), Facet::Theme)
    }

    /// Indicator display names of a scale, optionally restricted to a theme,
    /// in order of first appearance in the data.
    pub fn query_indicators(&self, scale: Scale, theme: Option<&str>) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT indicator FROM observations
             WHERE scale = ?1 AND (?2 IS NULL OR theme = ?2)
             GROUP BY indicator
             ORDER BY MIN(rowid)",
        )?;
        let rows = stmt
            .query_map(params![scale.label(), theme], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        log::debug!("query: query_indicators returned {} records", rows.len());
        Ok(rows)
    }

    /// Indicators grouped by theme, both in order of first appearance.
    pub fn query_indicators_by_theme(&self, scale: Scale) -> anyhow::Result<Vec<ThemeIndicators>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT theme, indicator, MIN(rowid) AS first_row FROM observations
             WHERE scale = ?1
             GROUP BY theme, indicator
             ORDER BY first_row",
        )?;
        let pairs = stmt
            .query_map(params![scale.label()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut groups: Vec<ThemeIndicators> = Vec::new();
        for (theme, indicator) in pairs {
            match groups.iter_mut().find(|g| g.theme == theme) {
                Some(group) => group.indicators.push(indicator),
                None => groups.push(ThemeIndicators {
                    theme,
                    indicators: vec![indicator],
                }),
            }
        }
        Ok(groups)
    }

    /// Dates available for an indicator at a scale, oldest first.
    pub fn query_dates(&self, scale: Scale, indicator: &str) -> anyhow::Result<Vec<NaiveDate>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT date FROM observations
             WHERE scale = ?1 AND indicator = ?2
             ORDER BY date",
        )?;
        let rows = stmt
            .query_map(params![scale.label(), indicator], |row| row.get(0))?
            .collect::<Result<Vec<NaiveDate>, _>>()?;
        Ok(rows)
    }

    /// Territory values of one (indicator, date) selection, in load order.
    ///
    /// Territories without a label are shown under their code.
    pub fn query_map_values(
        &self,
        scale: Scale,
        indicator: &str,
        date: &NaiveDate,
    ) -> anyhow::Result<Vec<TerritoryValue>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT code, COALESCE(label, code), value, date FROM observations
             WHERE scale = ?1 AND indicator = ?2 AND date = ?3
             ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map(params![scale.label(), indicator, format_iso(date)], |row| {
                Ok(TerritoryValue {
                    code: row.get(0)?,
                    label: row.get(1)?,
                    value: row.get(2)?,
                    date: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "query: query_map_values {} / {} / {} returned {} records",
            scale,
            indicator,
            date,
            rows.len()
        );
        Ok(rows)
    }

    /// Data source of an indicator, looked up by display name.
    pub fn query_indicator_source(&self, indicator: &str) -> anyhow::Result<Option<String>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT source FROM indicators
             WHERE name = ?1 AND source IS NOT NULL AND TRIM(source) != ''
             LIMIT 1",
        )?;
        let mut rows = stmt.query_map(params![indicator], |row| row.get::<_, String>(0))?;
        let source = rows.next().transpose()?;
        Ok(source.map(|s| s.trim().to_string()))
    }

    // ───────────────────── Raw-data page ─────────────────────

    /// Territories of a scale sorted by label; unlabeled ones use their code.
    pub fn query_territories(&self, scale: Scale) -> anyhow::Result<Vec<Territory>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT code, COALESCE(MAX(label), code) AS name FROM observations
             WHERE scale = ?1
             GROUP BY code
             ORDER BY name, code",
        )?;
        let rows = stmt
            .query_map(params![scale.label()], |row| {
                Ok(Territory {
                    code: row.get(0)?,
                    label: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Sorted distinct values of a facet among the rows matching `spec`.
    ///
    /// Only the scale of `spec` is applied; facet selections are ignored so
    /// the options do not shrink as the user selects.
    pub fn query_facet_values(&self, spec: &FilterSpec, facet: Facet) -> anyhow::Result<Vec<String>> {
        let (clause, values) = filter_clause(&FilterSpec::new(spec.scale));
        let column = facet_column(facet);
        let sql = format!(
            "SELECT DISTINCT {col} FROM observations {clause} ORDER BY {col}",
            col = column,
            clause = clause
        );
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(rows)
    }

    /// Rows matching a filter specification, in load order.
    pub fn query_filtered(&self, spec: &FilterSpec) -> anyhow::Result<Vec<Observation>> {
        let (clause, values) = filter_clause(spec);
        let sql = format!(
            "SELECT {} FROM observations {} ORDER BY rowid",
            OBSERVATION_COLUMNS, clause
        );
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), observation_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("query: query_filtered returned {} records", rows.len());
        Ok(rows)
    }

    /// Every row of a scale, or of both scales, in load order.
    pub fn query_observations(&self, scale: Option<Scale>) -> anyhow::Result<Vec<Observation>> {
        self.query_filtered(&FilterSpec::new(scale))
    }

    /// Row, indicator and theme counts plus the covered period of a filter.
    pub fn query_filter_metrics(&self, spec: &FilterSpec) -> anyhow::Result<FilterMetrics> {
        let (clause, values) = filter_clause(spec);
        let sql = format!(
            "SELECT COUNT(*), COUNT(DISTINCT indicator), COUNT(DISTINCT theme), MIN(date), MAX(date)
             FROM observations {}",
            clause
        );
        let conn = self.conn.borrow();
        let metrics = conn.query_row(&sql, params_from_iter(values.iter()), |row| {
            Ok(FilterMetrics {
                rows: row.get::<_, i64>(0)? as usize,
                indicators: row.get::<_, i64>(1)? as usize,
                themes: row.get::<_, i64>(2)? as usize,
                first_date: row.get(3)?,
                last_date: row.get(4)?,
            })
        })?;
        Ok(metrics)
    }
}
