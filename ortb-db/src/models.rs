//! Query result model structs.
//!
//! All structs derive `Serialize` so they can be handed to the D3.js
//! layer as JSON from the Dioxus WASM frontend.

use serde::Serialize;

/// Outcome of [`Database::load_sources`](crate::Database::load_sources).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub commune_rows: usize,
    /// `None` when no EPCI file was provided.
    pub epci_rows: Option<usize>,
    /// Rows dropped across both files because of an unparseable date.
    pub dropped_dates: usize,
    /// Entries of the indicator reference table.
    pub indicators: usize,
    /// True when the reference table was missing or empty and every
    /// indicator was filed under the unclassified theme.
    pub mapping_fallback: bool,
}

/// Headline numbers for the home page and the sidebar.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub commune_indicators: usize,
    pub epci_indicators: usize,
    /// Distinct themes among commune rows.
    pub themes: usize,
    pub communes: usize,
    pub epcis: usize,
    /// Earliest commune date, ISO.
    pub first_date: Option<String>,
    /// Latest commune date, ISO.
    pub last_date: Option<String>,
    pub has_epci: bool,
}

impl DatasetSummary {
    /// "YYYY-YYYY" span of the commune dates.
    pub fn covered_years(&self) -> Option<String> {
        let year = |d: &Option<String>| d.as_deref().and_then(|d| d.get(..4)).map(str::to_string);
        Some(format!("{}-{}", year(&self.first_date)?, year(&self.last_date)?))
    }

    /// Third headline figure: the EPCI count, or the covered years when
    /// there is no EPCI data.
    pub fn third_metric(&self) -> (&'static str, String) {
        if self.has_epci {
            ("Nombre d'EPCI", self.epcis.to_string())
        } else {
            (
                "Période couverte",
                self.covered_years().unwrap_or_else(|| "N/A".to_string()),
            )
        }
    }
}

/// A territory and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Territory {
    pub code: String,
    pub label: String,
}

/// One value of a map selection, joined to the geometry by `code`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerritoryValue {
    pub code: String,
    pub label: String,
    pub value: Option<f64>,
    /// ISO date.
    pub date: String,
}

/// Indicators of one theme, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeIndicators {
    pub theme: String,
    pub indicators: Vec<String>,
}

/// Metrics of a filtered row set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterMetrics {
    pub rows: usize,
    pub indicators: usize,
    pub themes: usize,
    /// ISO dates of the covered period.
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}
