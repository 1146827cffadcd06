//! Locations of the data files.
//!
//! The CLI reads them from a data directory; the dashboard fetches them
//! relative to the page, under `./data/`.

use crate::scale::Scale;
use std::path::{Path, PathBuf};

pub const COMMUNES_CSV: &str = "final_df_communes.csv";
pub const EPCI_CSV: &str = "final_df_epci.csv";
pub const INDICATORS_CSV: &str = "columns_indicateurs.csv";

/// URL prefix of the data files served next to the WASM bundle.
pub const DATA_URL_PREFIX: &str = "./data";

/// Geometry collection before simplification.
pub fn geometry_source_name(scale: Scale) -> &'static str {
    match scale {
        Scale::Commune => "communes.geojson",
        Scale::Epci => "epci.geojson",
    }
}

/// Simplified geometry collection used by the map page.
pub fn geometry_simplified_name(scale: Scale) -> &'static str {
    match scale {
        Scale::Commune => "communes_simple.geojson",
        Scale::Epci => "epci_simple.geojson",
    }
}

/// Observation file of a scale.
pub fn observations_name(scale: Scale) -> &'static str {
    match scale {
        Scale::Commune => COMMUNES_CSV,
        Scale::Epci => EPCI_CSV,
    }
}

/// URL of a data file for the dashboard, e.g. `./data/epci_simple.geojson`.
pub fn data_url(file_name: &str) -> String {
    format!("{}/{}", DATA_URL_PREFIX, file_name)
}

/// Data directory layout on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn observations(&self, scale: Scale) -> PathBuf {
        self.root.join(observations_name(scale))
    }

    pub fn indicators(&self) -> PathBuf {
        self.root.join(INDICATORS_CSV)
    }

    pub fn geometry_source(&self, scale: Scale) -> PathBuf {
        self.root.join(geometry_source_name(scale))
    }

    pub fn geometry_simplified(&self, scale: Scale) -> PathBuf {
        self.root.join(geometry_simplified_name(scale))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let paths = DataPaths::default();
        assert_eq!(paths.observations(Scale::Commune), PathBuf::from("data/final_df_communes.csv"));
        assert_eq!(paths.indicators(), PathBuf::from("data/columns_indicateurs.csv"));
        assert_eq!(
            paths.geometry_simplified(Scale::Epci),
            PathBuf::from("data/epci_simple.geojson")
        );
        assert_eq!(paths.geometry_source(Scale::Commune), PathBuf::from("data/communes.geojson"));
    }

    #[test]
    fn data_urls_are_relative() {
        assert_eq!(data_url(EPCI_CSV), "./data/final_df_epci.csv");
    }
}
