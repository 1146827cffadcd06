//! Loading functions for populating the in-memory SQLite database.
//!
//! # CSV Formats
//!
//! - **Communes** (comma, headers): `code_commune,libelle_commune,indicateur,date,valeur,unite`
//! - **EPCI** (comma, headers): `code_epci,nom,indicateur,date,valeur,unite`
//! - **Indicator reference** (`;`, headers): `Indicateur;Thématique;Nouveau_nom_indicateur;Source`
//!
//! Dates are `DD/MM/YYYY` in the source files and stored as ISO text.

use crate::models::LoadReport;
use crate::Database;
use ortb_core::indicator::{IndicatorRecord, UNCLASSIFIED_THEME};
use ortb_core::observation::Observation;
use ortb_core::scale::Scale;
use rusqlite::params;

impl Database {
    /// Insert parsed observations, keeping their order.
    pub fn insert_observations(&self, rows: &[Observation]) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO observations
                 (scale, code, label, indicator_code, indicator, theme, date, value, unit)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.scale.label(),
                    row.code,
                    row.label,
                    row.indicator_code,
                    row.indicator,
                    row.theme,
                    row.date,
                    row.value,
                    row.unit,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Load a commune or EPCI observation file.
    ///
    /// Returns `(loaded, dropped_dates)`. Missing required columns are an
    /// error whose message names the column.
    ///
    /// # Example CSV
    /// ```text
    /// code_epci,nom,indicateur,date,valeur,unite
    /// 243500139,Rennes Métropole,pop_tot,01/01/2024,472602,habitants
    /// ```
    pub fn load_observations(&self, scale: Scale, csv_data: &str) -> anyhow::Result<(usize, usize)> {
        let parsed = Observation::parse_csv(scale, csv_data)?;
        let count = self.insert_observations(&parsed.rows)?;
        log::info!(
            "loader: Loaded {} {} observations, dropped {} invalid dates",
            count,
            scale,
            parsed.dropped_dates
        );
        Ok((count, parsed.dropped_dates))
    }

    /// Load the `;`-delimited indicator reference table.
    ///
    /// Later rows replace earlier ones with the same code.
    pub fn load_indicators(&self, csv_data: &str) -> anyhow::Result<usize> {
        let records = IndicatorRecord::parse_csv(csv_data)?;
        self.insert_indicators(&records)
    }

    pub fn insert_indicators(&self, records: &[IndicatorRecord]) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        for record in records {
            conn.execute(
                "INSERT OR REPLACE INTO indicators (code, name, theme, source)
                 VALUES (?1, ?2, ?3, ?4)",
                params![record.code, record.name, record.theme, record.source],
            )?;
        }
        log::info!("loader: Loaded {} indicator records", records.len());
        Ok(records.len())
    }

    /// Build the degenerate reference table: every indicator code present
    /// in the observations, unclassified, named after itself.
    pub fn load_default_indicators(&self) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let count = conn.execute(
            "INSERT OR IGNORE INTO indicators (code, name, theme, source)
             SELECT DISTINCT indicator_code, indicator_code, ?1, NULL
             FROM observations",
            params![UNCLASSIFIED_THEME],
        )?;
        log::warn!(
            "loader: No indicator reference table, {} indicators filed under '{}'",
            count,
            UNCLASSIFIED_THEME
        );
        Ok(count)
    }

    /// Join the reference table onto every observation.
    ///
    /// Theme comes from the table (unclassified when absent); the display
    /// name replaces the indicator label, codes missing from the table keep
    /// their raw code.
    pub fn apply_indicator_mapping(&self) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let updated = conn.execute(
            "UPDATE observations SET
                theme = COALESCE(
                    (SELECT i.theme FROM indicators i WHERE i.code = observations.indicator_code),
                    ?1),
                indicator = COALESCE(
                    (SELECT i.name FROM indicators i WHERE i.code = observations.indicator_code),
                    observations.indicator_code)",
            params![UNCLASSIFIED_THEME],
        )?;
        let unmatched: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT indicator_code) FROM observations
             WHERE indicator_code NOT IN (SELECT code FROM indicators)",
            [],
            |row| row.get(0),
        )?;
        if unmatched > 0 {
            log::warn!(
                "loader: {} indicator codes missing from the reference table",
                unmatched
            );
        }
        log::info!("loader: Applied indicator mapping to {} rows", updated);
        Ok(updated)
    }

    /// Load everything the dashboard needs in one go.
    ///
    /// The commune file is mandatory. `epci_csv` is `None` when the EPCI
    /// file could not be fetched; the dataset is then commune-only. A
    /// missing, empty or unparseable reference table falls back to
    /// [`load_default_indicators`](Self::load_default_indicators).
    pub fn load_sources(
        &self,
        communes_csv: &str,
        epci_csv: Option<&str>,
        indicators_csv: Option<&str>,
    ) -> anyhow::Result<LoadReport> {
        let mut report = LoadReport::default();

        let (rows, dropped) = self.load_observations(Scale::Commune, communes_csv)?;
        report.commune_rows = rows;
        report.dropped_dates += dropped;

        if let Some(csv) = epci_csv {
            let (rows, dropped) = self.load_observations(Scale::Epci, csv)?;
            report.epci_rows = Some(rows);
            report.dropped_dates += dropped;
        } else {
            log::warn!("loader: No EPCI data, commune-only mode");
        }

        let mapped = match indicators_csv.map(|csv| self.load_indicators(csv)) {
            Some(Ok(count)) if count > 0 => Some(count),
            Some(Ok(_)) => None,
            Some(Err(e)) => {
                log::warn!("loader: Unreadable indicator reference table: {}", e);
                None
            }
            None => None,
        };
        report.indicators = match mapped {
            Some(count) => count,
            None => {
                report.mapping_fallback = true;
                self.load_default_indicators()?
            }
        };

        self.apply_indicator_mapping()?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use ortb_core::indicator::UNCLASSIFIED_THEME;
    use ortb_core::scale::Scale;

    const COMMUNES_CSV: &str = "\
code_commune,libelle_commune,indicateur,date,valeur,unite
35238,Rennes,pop_tot,01/01/2024,227830,habitants
29019,Brest,pop_tot,01/01/2024,139926,habitants
29019,Brest,inconnu,01/01/2024,3,
29019,Brest,pop_tot,2024-01-01,139926,habitants
";

    const EPCI_CSV: &str = "\
code_epci,nom,indicateur,date,valeur,unite
243500139,Rennes Métropole,pop_tot,01/01/2024,472602,habitants
";

    const MAPPING_CSV: &str = "\
\u{feff}Indicateur;Thématique;Nouveau_nom_indicateur;Source
pop_tot;Démographie;Population totale;INSEE
";

    fn scalar<T: rusqlite::types::FromSql>(db: &Database, sql: &str) -> T {
        db.conn.borrow().query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn load_observations_stores_iso_dates() {
        let db = Database::new().unwrap();
        let (rows, dropped) = db.load_observations(Scale::Commune, COMMUNES_CSV).unwrap();
        assert_eq!(rows, 3);
        assert_eq!(dropped, 1);

        let date: String = scalar(&db, "SELECT date FROM observations WHERE code = '35238'");
        assert_eq!(date, "2024-01-01");
        let scale: String = scalar(&db, "SELECT DISTINCT scale FROM observations");
        assert_eq!(scale, "Commune");
    }

    #[test]
    fn mapping_renames_and_classifies() {
        let db = Database::new().unwrap();
        let report = db
            .load_sources(COMMUNES_CSV, Some(EPCI_CSV), Some(MAPPING_CSV))
            .unwrap();
        assert_eq!(report.commune_rows, 3);
        assert_eq!(report.epci_rows, Some(1));
        assert_eq!(report.indicators, 1);
        assert!(!report.mapping_fallback);

        let renamed: i64 = scalar(
            &db,
            "SELECT COUNT(*) FROM observations WHERE indicator = 'Population totale' AND theme = 'Démographie'",
        );
        assert_eq!(renamed, 3, "both scales are mapped");
    }

    #[test]
    fn unmapped_codes_keep_raw_code_and_unclassified_theme() {
        let db = Database::new().unwrap();
        db.load_sources(COMMUNES_CSV, None, Some(MAPPING_CSV)).unwrap();
        let (indicator, theme): (String, String) = db
            .conn
            .borrow()
            .query_row(
                "SELECT indicator, theme FROM observations WHERE indicator_code = 'inconnu'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(indicator, "inconnu");
        assert_eq!(theme, UNCLASSIFIED_THEME);
    }

    #[test]
    fn missing_mapping_falls_back_to_unclassified() {
        let db = Database::new().unwrap();
        let report = db.load_sources(COMMUNES_CSV, None, None).unwrap();
        assert!(report.mapping_fallback);
        assert_eq!(report.indicators, 2);
        assert_eq!(report.epci_rows, None);

        let classified: i64 = scalar(
            &db,
            "SELECT COUNT(*) FROM observations WHERE theme != 'Non classé' OR indicator != indicator_code",
        );
        assert_eq!(classified, 0);
    }

    #[test]
    fn empty_or_broken_mapping_falls_back() {
        let db = Database::new().unwrap();
        let report = db
            .load_sources(COMMUNES_CSV, None, Some("Indicateur;Thématique;Nouveau_nom_indicateur\n"))
            .unwrap();
        assert!(report.mapping_fallback);

        let db = Database::new().unwrap();
        let report = db
            .load_sources(COMMUNES_CSV, None, Some("pas;un;référentiel\n"))
            .unwrap();
        assert!(report.mapping_fallback);
    }

    #[test]
    fn missing_commune_column_is_an_error() {
        let db = Database::new().unwrap();
        let err = db
            .load_sources("libelle_commune,indicateur,date\nRennes,x,01/01/2024\n", None, None)
            .unwrap_err();
        assert!(err.to_string().contains("code_commune"));
    }
}
