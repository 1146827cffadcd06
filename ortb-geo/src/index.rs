use crate::FEATURE_KEY;
use anyhow::Context;
use geojson::{Feature, FeatureCollection, GeoJson};
use ortb_core::observation::normalize_code;
use std::collections::HashMap;

/// Parse a GeoJSON document that must be a feature collection.
pub fn parse_feature_collection(geojson_str: &str) -> anyhow::Result<FeatureCollection> {
    let geojson: GeoJson = geojson_str
        .parse()
        .context("Fichier GeoJSON illisible")?;
    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        GeoJson::Feature(_) => anyhow::bail!("GeoJSON: expected a FeatureCollection, found a Feature"),
        GeoJson::Geometry(_) => anyhow::bail!("GeoJSON: expected a FeatureCollection, found a Geometry"),
    }
}

/// Territorial code of a feature, read from `properties.code`.
///
/// Numeric codes are accepted and normalized like the CSV codes.
pub fn feature_code(feature: &Feature) -> Option<String> {
    let code = match feature.property(FEATURE_KEY)? {
        serde_json::Value::String(s) => normalize_code(s),
        serde_json::Value::Number(n) => normalize_code(&n.to_string()),
        _ => return None,
    };
    (!code.is_empty()).then_some(code)
}

/// Features of one scale keyed by territorial code.
#[derive(Debug, Clone, Default)]
pub struct GeometryIndex {
    features: Vec<Feature>,
    by_code: HashMap<String, usize>,
}

impl GeometryIndex {
    pub fn from_collection(collection: FeatureCollection) -> Self {
        let mut index = Self::default();
        let mut unkeyed = 0usize;
        for feature in collection.features {
            match feature_code(&feature) {
                Some(code) => {
                    index.by_code.insert(code, index.features.len());
                    index.features.push(feature);
                }
                None => unkeyed += 1,
            }
        }
        if unkeyed > 0 {
            log::warn!("geo: {} features without a '{}' property ignored", unkeyed, FEATURE_KEY);
        }
        log::info!("geo: indexed {} features", index.features.len());
        index
    }

    pub fn from_geojson_str(geojson_str: &str) -> anyhow::Result<Self> {
        Ok(Self::from_collection(parse_feature_collection(geojson_str)?))
    }

    pub fn get(&self, code: &str) -> Option<&Feature> {
        self.by_code.get(code).map(|&i| &self.features[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two unit squares keyed "35238" and "29019", plus one feature without code.
    pub(crate) const SQUARES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"code": "35238", "nom": "Rennes"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
            {"type": "Feature", "properties": {"code": 29019.0},
             "geometry": {"type": "Polygon", "coordinates": [[[2,0],[3,0],[3,1],[2,1],[2,0]]]}},
            {"type": "Feature", "properties": {"nom": "sans code"},
             "geometry": {"type": "Polygon", "coordinates": [[[4,0],[5,0],[5,1],[4,1],[4,0]]]}}
        ]
    }"#;

    #[test]
    fn indexes_features_by_code() {
        let index = GeometryIndex::from_geojson_str(SQUARES).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.contains("35238"));
        assert!(index.contains("29019"), "numeric code is normalized");
        assert!(index.get("00000").is_none());
    }

    #[test]
    fn rejects_non_collections() {
        let point = r#"{"type": "Point", "coordinates": [0, 0]}"#;
        assert!(parse_feature_collection(point).is_err());
        assert!(parse_feature_collection("not json").is_err());
    }
}
