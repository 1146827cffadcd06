//! Territorial scales (mailles) of the datasets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The territorial aggregation level of an observation.
#[derive(Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
pub enum Scale {
    #[default]
    Commune,
    Epci,
}

impl Scale {
    pub const ALL: [Scale; 2] = [Scale::Commune, Scale::Epci];

    /// Label used in the `maille` column and in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Scale::Commune => "Commune",
            Scale::Epci => "EPCI",
        }
    }

    /// Name of the territorial code column in the source and export files.
    pub fn code_column(&self) -> &'static str {
        match self {
            Scale::Commune => "code_commune",
            Scale::Epci => "code_epci",
        }
    }

    /// Name of the territorial label column in exports.
    pub fn label_column(&self) -> &'static str {
        match self {
            Scale::Commune => "libelle_commune",
            Scale::Epci => "libelle_epci",
        }
    }

    /// Accepted label columns in the source file, in order of preference.
    /// The EPCI file ships its label as `nom`.
    pub fn source_label_columns(&self) -> &'static [&'static str] {
        match self {
            Scale::Commune => &["libelle_commune"],
            Scale::Epci => &["libelle_epci", "nom"],
        }
    }

    /// Adjective used in map titles ("à l'échelle communale").
    pub fn title_qualifier(&self) -> &'static str {
        match self {
            Scale::Commune => "communale",
            Scale::Epci => "EPCI",
        }
    }

    /// "1 commune", "12 communes", "3 EPCI".
    pub fn count_label(&self, count: usize) -> String {
        match self {
            Scale::Commune if count > 1 => format!("{} communes", count),
            Scale::Commune => format!("{} commune", count),
            Scale::Epci => format!("{} EPCI", count),
        }
    }

    /// Lowercase slug used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Scale::Commune => "commune",
            Scale::Epci => "epci",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Scale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commune" | "communes" => Ok(Scale::Commune),
            "epci" => Ok(Scale::Epci),
            other => anyhow::bail!("Unknown scale: {}. Use: commune, epci", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Scale;

    #[test]
    fn parses_labels_and_slugs() {
        assert_eq!("Commune".parse::<Scale>().unwrap(), Scale::Commune);
        assert_eq!("epci".parse::<Scale>().unwrap(), Scale::Epci);
        assert_eq!(" EPCI ".parse::<Scale>().unwrap(), Scale::Epci);
        assert!("region".parse::<Scale>().is_err());
    }

    #[test]
    fn label_round_trips_through_from_str() {
        for scale in Scale::ALL {
            assert_eq!(scale.label().parse::<Scale>().unwrap(), scale);
        }
    }

    #[test]
    fn count_labels() {
        assert_eq!(Scale::Commune.count_label(1), "1 commune");
        assert_eq!(Scale::Commune.count_label(12), "12 communes");
        assert_eq!(Scale::Epci.count_label(3), "3 EPCI");
    }

    #[test]
    fn epci_accepts_nom_as_label_column() {
        assert!(Scale::Epci.source_label_columns().contains(&"nom"));
        assert_eq!(Scale::Epci.label_column(), "libelle_epci");
    }
}
