//! Offline geometry simplification.

use log::info;
use ortb_core::paths::DataPaths;
use ortb_geo::simplify::simplify_data_dir;
use std::path::Path;

/// Simplify the commune and EPCI geometry files of `data_dir` in place,
/// writing `communes_simple.geojson` and `epci_simple.geojson`.
pub fn run_simplify(data_dir: &Path, tolerance: f64) -> anyhow::Result<()> {
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        anyhow::bail!("Invalid tolerance: {}", tolerance);
    }
    let paths = DataPaths::new(data_dir);
    info!("Simplifying geometries in {} (tolerance {})", data_dir.display(), tolerance);

    for (scale, report) in simplify_data_dir(&paths, tolerance)? {
        println!(
            "{:<8} {:>6} features  {:>9} -> {:>9} coordinates  (-{:.1}%)  {}",
            scale.label(),
            report.features,
            report.coords_before,
            report.coords_after,
            report.reduction_percent(),
            paths.geometry_simplified(scale).display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ortb_core::scale::Scale;
    use std::fs;

    const COMMUNES_GEOJSON: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"code": "35238", "nom": "Rennes"},
         "geometry": {"type": "Polygon", "coordinates": [[
            [0.0, 0.0], [0.5, 0.0001], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]
         ]]}}
    ]}"#;

    #[test]
    fn writes_simplified_communes() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        fs::write(paths.geometry_source(Scale::Commune), COMMUNES_GEOJSON).unwrap();

        run_simplify(dir.path(), 0.0008).unwrap();

        let written = fs::read_to_string(paths.geometry_simplified(Scale::Commune)).unwrap();
        let index = ortb_geo::index::GeometryIndex::from_geojson_str(&written).unwrap();
        assert!(index.contains("35238"));
        assert!(!paths.geometry_simplified(Scale::Epci).exists());
    }

    #[test]
    fn rejects_negative_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_simplify(dir.path(), -1.0).is_err());
    }

    #[test]
    fn fails_without_geometry() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_simplify(dir.path(), 0.0008).is_err());
    }
}
