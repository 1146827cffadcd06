//! Offline geometry simplification.
//!
//! Each polygon ring goes through Douglas-Peucker at a fixed tolerance
//! (in coordinate units, degrees for WGS84 data). Properties, ids and
//! feature order are kept. A ring that would collapse below a valid
//! polygon ring is not simplified: exteriors keep their original
//! coordinates, degenerate holes are dropped.

use anyhow::Context;
use geo::{CoordsIter, Geometry, LineString, MultiPolygon, Polygon, Simplify};
use geojson::{FeatureCollection, GeoJson};
use ortb_core::paths::DataPaths;
use ortb_core::scale::Scale;
use std::fs;
use std::path::Path;

/// Tolerance used for the dashboard geometry files.
pub const DEFAULT_TOLERANCE: f64 = 0.0008;

/// Minimum coordinate count of a closed polygon ring.
const MIN_RING_COORDS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimplifyReport {
    pub features: usize,
    pub coords_before: usize,
    pub coords_after: usize,
    /// Features left untouched because their geometry is not polygonal or
    /// could not be converted.
    pub untouched: usize,
}

impl SimplifyReport {
    /// Share of coordinates removed, in percent.
    pub fn reduction_percent(&self) -> f64 {
        if self.coords_before == 0 {
            return 0.0;
        }
        100.0 * (self.coords_before - self.coords_after) as f64 / self.coords_before as f64
    }
}

fn simplify_ring(ring: &LineString<f64>, tolerance: f64) -> Option<LineString<f64>> {
    let simplified = ring.simplify(&tolerance);
    (simplified.0.len() >= MIN_RING_COORDS).then_some(simplified)
}

fn simplify_polygon(polygon: &Polygon<f64>, tolerance: f64) -> Polygon<f64> {
    let exterior =
        simplify_ring(polygon.exterior(), tolerance).unwrap_or_else(|| polygon.exterior().clone());
    let interiors = polygon
        .interiors()
        .iter()
        .filter_map(|ring| simplify_ring(ring, tolerance))
        .collect();
    Polygon::new(exterior, interiors)
}

/// Simplify a polygonal geometry; other geometry types are returned as-is.
pub fn simplify_geometry(geometry: &Geometry<f64>, tolerance: f64) -> Geometry<f64> {
    match geometry {
        Geometry::Polygon(p) => Geometry::Polygon(simplify_polygon(p, tolerance)),
        Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(MultiPolygon(
            mp.0.iter().map(|p| simplify_polygon(p, tolerance)).collect(),
        )),
        other => other.clone(),
    }
}

/// Simplify every feature of a collection.
pub fn simplify_feature_collection(
    collection: &FeatureCollection,
    tolerance: f64,
) -> (FeatureCollection, SimplifyReport) {
    let mut report = SimplifyReport::default();
    let mut simplified = collection.clone();

    for feature in simplified.features.iter_mut() {
        report.features += 1;
        let Some(geometry) = feature.geometry.as_mut() else {
            report.untouched += 1;
            continue;
        };
        let geo_geometry = match Geometry::<f64>::try_from(geometry.value.clone()) {
            Ok(g @ (Geometry::Polygon(_) | Geometry::MultiPolygon(_))) => g,
            Ok(_) => {
                report.untouched += 1;
                continue;
            }
            Err(e) => {
                log::warn!("simplify: geometry conversion failed: {}", e);
                report.untouched += 1;
                continue;
            }
        };
        let reduced = simplify_geometry(&geo_geometry, tolerance);
        report.coords_before += geo_geometry.coords_count();
        report.coords_after += reduced.coords_count();
        geometry.value = geojson::Value::from(&reduced);
    }
    (simplified, report)
}

/// Read a GeoJSON file, simplify it and write the result.
pub fn simplify_file(input: &Path, output: &Path, tolerance: f64) -> anyhow::Result<SimplifyReport> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let collection = crate::index::parse_feature_collection(&text)
        .with_context(|| format!("Invalid GeoJSON in {}", input.display()))?;

    let (simplified, report) = simplify_feature_collection(&collection, tolerance);
    fs::write(output, GeoJson::from(simplified).to_string())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!(
        "simplify: {} -> {}: {} features, {} -> {} coordinates ({:.1}% removed)",
        input.display(),
        output.display(),
        report.features,
        report.coords_before,
        report.coords_after,
        report.reduction_percent()
    );
    Ok(report)
}

/// Simplify the commune and EPCI collections of a data directory.
///
/// A scale whose source file is absent is skipped with a warning; it is an
/// error when neither exists.
pub fn simplify_data_dir(paths: &DataPaths, tolerance: f64) -> anyhow::Result<Vec<(Scale, SimplifyReport)>> {
    let mut reports = Vec::new();
    for scale in Scale::ALL {
        let input = paths.geometry_source(scale);
        if !input.exists() {
            log::warn!("simplify: {} not found, {} skipped", input.display(), scale);
            continue;
        }
        let report = simplify_file(&input, &paths.geometry_simplified(scale), tolerance)?;
        reports.push((scale, report));
    }
    if reports.is_empty() {
        anyhow::bail!("No geometry file found in {}", paths.root().display());
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    /// A square whose edges carry nearly collinear intermediate points.
    fn noisy_square() -> Polygon<f64> {
        polygon![
            (x: 0.0, y: 0.0),
            (x: 0.5, y: 0.0001),
            (x: 1.0, y: 0.0),
            (x: 1.0001, y: 0.5),
            (x: 1.0, y: 1.0),
            (x: 0.5, y: 0.9999),
            (x: 0.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ]
    }

    #[test]
    fn removes_nearly_collinear_points() {
        let simplified = simplify_polygon(&noisy_square(), DEFAULT_TOLERANCE);
        assert_eq!(simplified.exterior().0.len(), 5);
        assert!(simplified.exterior().is_closed());
    }

    #[test]
    fn collapsed_exterior_is_kept() {
        let tiny = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0001, y: 0.0),
            (x: 0.0001, y: 0.0001),
            (x: 0.0, y: 0.0),
        ];
        let simplified = simplify_polygon(&tiny, 1.0);
        assert_eq!(simplified.exterior(), tiny.exterior());
    }

    #[test]
    fn degenerate_holes_are_dropped() {
        let hole = LineString::from(vec![(0.4, 0.4), (0.4001, 0.4), (0.4001, 0.4001), (0.4, 0.4)]);
        let with_hole = Polygon::new(noisy_square().exterior().clone(), vec![hole]);
        let simplified = simplify_polygon(&with_hole, 0.01);
        assert!(simplified.interiors().is_empty());
    }

    #[test]
    fn simplifies_collection_and_keeps_properties() {
        let collection = crate::index::parse_feature_collection(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"code": "35238"},
                 "geometry": {"type": "Polygon", "coordinates":
                    [[[0,0],[0.5,0.0001],[1,0],[1,1],[0,1],[0,0]]]}},
                {"type": "Feature", "properties": {"code": "p"},
                 "geometry": {"type": "Point", "coordinates": [0, 0]}}
            ]}"#,
        )
        .unwrap();
        let (simplified, report) = simplify_feature_collection(&collection, DEFAULT_TOLERANCE);
        assert_eq!(report.features, 2);
        assert_eq!(report.untouched, 1);
        assert_eq!(report.coords_before, 6);
        assert_eq!(report.coords_after, 5);
        assert_eq!(
            crate::index::feature_code(&simplified.features[0]).as_deref(),
            Some("35238")
        );
    }

    #[test]
    fn simplify_data_dir_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        fs::write(paths.geometry_source(Scale::Epci), crate::index::tests::SQUARES).unwrap();

        let reports = simplify_data_dir(&paths, DEFAULT_TOLERANCE).unwrap();
        assert_eq!(reports.len(), 1, "communes.geojson is absent");
        assert_eq!(reports[0].0, Scale::Epci);

        let written = fs::read_to_string(paths.geometry_simplified(Scale::Epci)).unwrap();
        let index = crate::index::GeometryIndex::from_geojson_str(&written).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn simplify_data_dir_without_sources_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(simplify_data_dir(&DataPaths::new(dir.path()), DEFAULT_TOLERANCE).is_err());
    }
}
