//! SQL schema definitions for the in-memory SQLite database.
//!
//! The schema is applied as a single batch when the database is initialized.

/// Returns the full SQL schema as a single batch string.
///
/// - `indicators` - the indicator reference table (code, display name, theme, source)
/// - `observations` - commune and EPCI rows, one table tagged by `scale`
///
/// `observations` has no primary key: load order is kept through `rowid`
/// and duplicate (scale, code, indicator, date) tuples are tolerated.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS indicators (
        code TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        theme TEXT NOT NULL,
        source TEXT
    );

    CREATE TABLE IF NOT EXISTS observations (
        scale TEXT NOT NULL,
        code TEXT NOT NULL,
        label TEXT,
        indicator_code TEXT NOT NULL,
        indicator TEXT NOT NULL,
        theme TEXT NOT NULL,
        date TEXT NOT NULL,
        value REAL,
        unit TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_obs_scale_indicator_date ON observations(scale, indicator, date);
    CREATE INDEX IF NOT EXISTS idx_obs_scale_code ON observations(scale, code);
    CREATE INDEX IF NOT EXISTS idx_obs_indicator_code ON observations(indicator_code);
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn count(conn: &Connection, kind: &str, name: &str) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn schema_creates_tables_and_indexes() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema())
            .expect("Schema SQL should be valid");

        for table in ["indicators", "observations"] {
            assert_eq!(count(&conn, "table", table), 1, "Table '{}' should exist", table);
        }
        for idx in [
            "idx_obs_scale_indicator_date",
            "idx_obs_scale_code",
            "idx_obs_indicator_code",
        ] {
            assert_eq!(count(&conn, "index", idx), 1, "Index '{}' should exist", idx);
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        conn.execute_batch(create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }
}
