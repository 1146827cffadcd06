//! Terminal rendition of the home page.

use crate::load::load_database;
use ortb_core::dates::iso_to_display;
use ortb_core::scale::Scale;
use ortb_db::Database;
use std::fmt::Write;
use std::path::Path;

pub fn run_summary(data_dir: &Path) -> anyhow::Result<()> {
    let db = load_database(data_dir)?;
    print!("{}", render_summary(&db)?);
    Ok(())
}

pub fn render_summary(db: &Database) -> anyhow::Result<String> {
    let summary = db.query_summary()?;
    let mut out = String::new();

    writeln!(out, "Nombre d'indicateurs : {}", summary.commune_indicators)?;
    writeln!(out, "Nombre de communes   : {}", summary.communes)?;
    let (label, value) = summary.third_metric();
    writeln!(out, "{:<21}: {}", label, value)?;
    if let Some(last) = summary.last_date.as_deref() {
        writeln!(out, "Données mises à jour le: {}", iso_to_display(last))?;
    }
    if summary.has_epci {
        writeln!(out, "Indicateurs EPCI     : {}", summary.epci_indicators)?;
    }
    writeln!(out, "Thématiques          : {}", summary.themes)?;

    writeln!(out)?;
    writeln!(out, "Indicateurs disponibles")?;
    for group in db.query_indicators_by_theme(Scale::Commune)? {
        writeln!(out, "  {}", group.theme)?;
        for indicator in &group.indicators {
            writeln!(out, "    • {}", indicator)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::tests::data_dir;

    #[test]
    fn summary_with_epci() {
        let dir = data_dir(true, true);
        let db = load_database(dir.path()).unwrap();
        let text = render_summary(&db).unwrap();
        assert!(text.contains("Nombre d'indicateurs : 2"));
        assert!(text.contains("Nombre de communes   : 2"));
        assert!(text.contains("Nombre d'EPCI"));
        assert!(text.contains("Données mises à jour le: 01/01/2024"));
        assert!(text.contains("    • Voitures particulières"));
    }

    #[test]
    fn summary_without_epci_shows_period() {
        let dir = data_dir(false, true);
        let db = load_database(dir.path()).unwrap();
        let text = render_summary(&db).unwrap();
        assert!(text.contains("Période couverte"));
        assert!(text.contains("2023-2024"));
        assert!(!text.contains("Indicateurs EPCI"));
    }
}
