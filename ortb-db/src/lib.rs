//! In-memory SQLite database layer for the ORTB territorial indicators.
//!
//! This crate loads the commune and EPCI observation files and the
//! indicator reference table into an in-memory SQLite database and exposes
//! typed query methods for the dashboard pages and the CLI.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper for interior mutability in single-threaded WASM
//! - In-memory SQLite via `rusqlite` (compiles to WASM via `wasm32-unknown-unknown`)
//! - CSV text fetched at startup by the dashboard, or read from disk by the CLI
//! - Typed query methods returning serializable structs for JSON export to D3.js
//!
//! # Usage
//!
//! ```rust
//! use ortb_core::filter::{Facet, FilterSpec};
//! use ortb_core::scale::Scale;
//! use ortb_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_sources(
//!     "code_commune,libelle_commune,indicateur,date,valeur,unite\n35238,Rennes,pop_tot,01/01/2024,227830,hab\n",
//!     None,
//!     Some("Indicateur;Thématique;Nouveau_nom_indicateur\npop_tot;Démographie;Population totale\n"),
//! )
//! .unwrap();
//!
//! let spec = FilterSpec::new(Some(Scale::Commune)).with(Facet::Indicator, ["Population totale"]);
//! let rows = db.query_filtered(&spec).unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].theme, "Démographie");
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.

pub mod schema;
mod loader;
mod queries;
pub mod models;

use rusqlite::Connection;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// In-memory SQLite database holding the loaded datasets.
///
/// This struct is cheaply cloneable (via `Rc`) and suitable for sharing
/// across Dioxus components in a single-threaded WASM environment.
/// Pages only query it; all writes happen in the `load_*` methods.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}

impl PartialEq for Database {
    /// Two handles are equal when they share the same connection.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.conn, &other.conn)
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("conn", &self.conn.as_ptr())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ortb_core::scale::Scale;

    #[test]
    fn database_creates_successfully() {
        let db = Database::new();
        assert!(db.is_ok(), "Database should create without errors");
    }

    #[test]
    fn database_is_cloneable() {
        let db = Database::new().unwrap();
        let db2 = db.clone();
        db.load_observations(
            Scale::Commune,
            "code_commune,libelle_commune,indicateur,date,valeur\n35238,Rennes,pop_tot,01/01/2024,1\n",
        )
        .unwrap();
        assert_eq!(db2.row_count(Scale::Commune).unwrap(), 1, "Clone should see same data via shared Rc");
        assert!(db == db2);
    }

    #[test]
    fn database_is_debug() {
        let db = Database::new().unwrap();
        let result: anyhow::Result<Database> = Ok(db);
        assert!(format!("{:?}", result).starts_with("Ok(Database"));
    }

    #[test]
    fn database_starts_empty() {
        let db = Database::new().unwrap();
        assert_eq!(db.row_count(Scale::Commune).unwrap(), 0);
        assert!(db.available_scales().unwrap().is_empty());
    }
}
