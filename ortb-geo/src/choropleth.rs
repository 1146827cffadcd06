//! Joins map values onto territory geometries.

use crate::index::GeometryIndex;
use crate::FEATURE_KEY;
use geojson::{Feature, FeatureCollection, JsonObject};
use ortb_core::dates::iso_to_display as display_date;
use ortb_core::scale::Scale;
use ortb_data::color::ColorScale;
use ortb_db::models::TerritoryValue;
use serde_json::{json, Value as JsonValue};

/// Title and subtitle lines of a map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapTitle {
    pub title: String,
    /// Range annotation.
    pub note: String,
    /// `Source : …` line, when the indicator has a known source.
    pub source: Option<String>,
}

impl MapTitle {
    /// `{indicator} à l'échelle communale pour la date 01/01/2024`
    pub fn new(indicator: &str, scale: Scale, iso_date: &str, note: &str, source: Option<&str>) -> Self {
        Self {
            title: format!(
                "{} à l'échelle {} pour la date {}",
                indicator,
                scale.title_qualifier(),
                display_date(iso_date)
            ),
            note: note.to_string(),
            source: source
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| format!("Source : {}", s)),
        }
    }
}

/// Colored features of one map selection.
#[derive(Debug, Clone)]
pub struct ChoroplethLayer {
    pub collection: FeatureCollection,
    pub matched: usize,
    /// Codes of values without a geometry; they are not drawn.
    pub unmatched: Vec<String>,
}

/// Build the colored feature collection of a selection.
///
/// Each drawn feature carries `code`, `label`, `value` and `fill`
/// properties. Without a color scale every fill is the missing color.
pub fn join_values(index: &GeometryIndex, values: &[TerritoryValue], scale: Option<&ColorScale>) -> ChoroplethLayer {
    let mut features = Vec::with_capacity(values.len());
    let mut unmatched = Vec::new();

    for tv in values {
        let Some(source) = index.get(&tv.code) else {
            unmatched.push(tv.code.clone());
            continue;
        };
        let fill = match scale {
            Some(scale) => scale.color_for(tv.value),
            None => ortb_data::color::MISSING_COLOR.to_string(),
        };
        let mut properties = JsonObject::new();
        properties.insert(FEATURE_KEY.to_string(), JsonValue::from(tv.code.clone()));
        properties.insert("label".to_string(), JsonValue::from(tv.label.clone()));
        properties.insert("value".to_string(), tv.value.map(JsonValue::from).unwrap_or(JsonValue::Null));
        properties.insert("date".to_string(), JsonValue::from(display_date(&tv.date)));
        properties.insert("fill".to_string(), JsonValue::from(fill));
        features.push(Feature {
            bbox: None,
            geometry: source.geometry.clone(),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    if !unmatched.is_empty() {
        log::debug!(
            "choropleth: {} territories without geometry: {:?}",
            unmatched.len(),
            unmatched
        );
    }
    ChoroplethLayer {
        matched: features.len(),
        collection: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        unmatched,
    }
}

impl ChoroplethLayer {
    /// JSON payload for the map renderer: features, titles and legend.
    pub fn to_payload(&self, title: &MapTitle, scale: Option<&ColorScale>) -> JsonValue {
        let legend: Vec<JsonValue> = scale
            .map(|s| {
                s.legend_stops(6)
                    .into_iter()
                    .map(|(value, color)| json!({ "value": value, "color": color }))
                    .collect()
            })
            .unwrap_or_default();
        json!({
            "title": title.title,
            "note": title.note,
            "source": title.source,
            "scale": scale.map(|s| s.name()),
            "legend": legend,
            "geojson": self.collection,
        })
    }
}
