//! Territory geometries for the choropleth maps.
//!
//! - [`index`] reads a GeoJSON feature collection and keys its features by
//!   the `properties.code` territorial code
//! - [`simplify`] is the offline Douglas-Peucker pass that shrinks the
//!   commune and EPCI collections before they are served to the dashboard
//! - [`choropleth`] joins map values onto the geometries and colors them

pub mod choropleth;
pub mod index;
pub mod simplify;

/// Property holding the territorial code of a feature.
pub const FEATURE_KEY: &str = "code";
