//! Loading a data directory into an in-memory database.

use anyhow::Context;
use log::{info, warn};
use ortb_core::paths::DataPaths;
use ortb_core::scale::Scale;
use ortb_db::Database;
use std::fs;
use std::path::Path;

/// Read an optional input file. A missing or unreadable file yields `None`.
fn read_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("load: {} unavailable ({}), skipped", path.display(), e);
            None
        }
    }
}

/// Load the commune file (required), the EPCI file and the indicator
/// reference table (both optional) of `data_dir`.
pub fn load_database(data_dir: &Path) -> anyhow::Result<Database> {
    let paths = DataPaths::new(data_dir);
    let communes_path = paths.observations(Scale::Commune);
    let communes = fs::read_to_string(&communes_path)
        .with_context(|| format!("Failed to read {}", communes_path.display()))?;
    let epci = read_optional(&paths.observations(Scale::Epci));
    let indicators = read_optional(&paths.indicators());

    let db = Database::new()?;
    let report = db.load_sources(&communes, epci.as_deref(), indicators.as_deref())?;
    info!(
        "load: {} commune rows, {} EPCI rows, {} indicators{}",
        report.commune_rows,
        report.epci_rows.unwrap_or(0),
        report.indicators,
        if report.mapping_fallback { " (unclassified)" } else { "" }
    );
    Ok(db)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ortb_core::paths::{COMMUNES_CSV, EPCI_CSV, INDICATORS_CSV};

    pub(crate) const COMMUNES: &str = "\
code_commune,libelle_commune,indicateur,date,valeur,unite
35238,Rennes,pop_tot,01/01/2023,225081,habitants
35238,Rennes,pop_tot,01/01/2024,227830,habitants
29019.0,Brest,pop_tot,01/01/2024,139926,habitants
29019,Brest,nb_vp,01/01/2024,61000,véhicules
";

    pub(crate) const EPCI: &str = "\
code_epci,nom,indicateur,date,valeur,unite
243500139,Rennes Métropole,pop_tot,01/01/2024,472602,habitants
";

    pub(crate) const MAPPING: &str = "\
Indicateur;Thématique;Nouveau_nom_indicateur;Source
pop_tot;Démographie;Population totale;INSEE
nb_vp;Mobilité;Voitures particulières;SDES
";

    /// A data directory holding the commune file and, optionally, the EPCI
    /// file and the reference table.
    pub(crate) fn data_dir(with_epci: bool, with_mapping: bool) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(COMMUNES_CSV), COMMUNES).unwrap();
        if with_epci {
            fs::write(dir.path().join(EPCI_CSV), EPCI).unwrap();
        }
        if with_mapping {
            fs::write(dir.path().join(INDICATORS_CSV), MAPPING).unwrap();
        }
        dir
    }

    #[test]
    fn loads_every_file() {
        let dir = data_dir(true, true);
        let db = load_database(dir.path()).unwrap();
        assert_eq!(db.available_scales().unwrap(), vec![Scale::Commune, Scale::Epci]);
        assert_eq!(db.query_themes(None).unwrap(), vec!["Démographie", "Mobilité"]);
    }

    #[test]
    fn optional_files_degrade() {
        let dir = data_dir(false, false);
        let db = load_database(dir.path()).unwrap();
        assert_eq!(db.available_scales().unwrap(), vec![Scale::Commune]);
        assert_eq!(db.query_themes(None).unwrap(), vec!["Non classé"]);
    }

    #[test]
    fn commune_file_is_required() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_database(dir.path()).unwrap_err();
        assert!(err.to_string().contains(COMMUNES_CSV));
    }
}
