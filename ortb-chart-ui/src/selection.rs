//! Resolution of the session selections against the loaded data.
//!
//! Pages keep the user's raw choices in [`AppState`](crate::state::AppState);
//! the functions here turn them into what is actually shown, falling back to
//! defaults when a stored choice does not exist for the current scale or
//! indicator.

use chrono::NaiveDate;
use ortb_core::filter::{Facet, FilterSpec};
use ortb_core::scale::Scale;
use ortb_data::color::{ColorScale, ColorScheme};
use ortb_data::range::{ColorRange, RangeMode};
use ortb_data::stats::{describe, finite_values, DescriptiveStats};
use ortb_db::models::{Territory, TerritoryValue};
use ortb_db::Database;
use ortb_geo::choropleth::{join_values, ChoroplethLayer, MapTitle};
use ortb_geo::index::GeometryIndex;

/// Choices made on the map page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapSelection {
    pub scale: Scale,
    /// `None` stands for every theme ("Toutes").
    pub theme: Option<String>,
    pub indicator: Option<String>,
    pub date: Option<NaiveDate>,
    pub scheme: ColorScheme,
    pub mode: RangeMode,
    pub reversed: bool,
}

/// The map page options and the effective selection among them.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub scales: Vec<Scale>,
    pub scale: Scale,
    pub themes: Vec<String>,
    pub theme: Option<String>,
    pub indicators: Vec<String>,
    pub indicator: Option<String>,
    /// Dates of the indicator, oldest first.
    pub dates: Vec<NaiveDate>,
    /// Defaults to the most recent date.
    pub date: Option<NaiveDate>,
}

impl MapView {
    /// The theme selector is only offered when there is a choice to make.
    pub fn has_theme_choice(&self) -> bool {
        self.themes.len() > 1
    }
}

pub fn resolve_map_view(db: &Database, selection: &MapSelection) -> anyhow::Result<MapView> {
    let scales = db.available_scales()?;
    let scale = if scales.contains(&selection.scale) {
        selection.scale
    } else {
        scales.first().copied().unwrap_or_default()
    };

    let themes = db.query_themes(Some(scale))?;
    let theme = selection
        .theme
        .clone()
        .filter(|t| themes.len() > 1 && themes.contains(t));

    let indicators = db.query_indicators(scale, theme.as_deref())?;
    let indicator = selection
        .indicator
        .clone()
        .filter(|i| indicators.contains(i))
        .or_else(|| indicators.first().cloned());

    let dates = match &indicator {
        Some(indicator) => db.query_dates(scale, indicator)?,
        None => Vec::new(),
    };
    let date = selection
        .date
        .filter(|d| dates.contains(d))
        .or_else(|| dates.last().copied());

    Ok(MapView {
        scales,
        scale,
        themes,
        theme,
        indicators,
        indicator,
        dates,
        date,
    })
}

/// Everything the map page draws for one selection.
#[derive(Debug, Clone)]
pub struct MapFigure {
    pub values: Vec<TerritoryValue>,
    pub range: ColorRange,
    pub color_scale: Option<ColorScale>,
    pub stats: Option<DescriptiveStats>,
    pub title: MapTitle,
    /// `None` until the geometry of the scale is available.
    pub layer: Option<ChoroplethLayer>,
}

/// Compute the values, range, statistics and colored layer of a map.
///
/// Returns `None` when the view has no indicator or no date.
pub fn build_map_figure(
    db: &Database,
    view: &MapView,
    selection: &MapSelection,
    geometry: Option<&GeometryIndex>,
) -> anyhow::Result<Option<MapFigure>> {
    let (Some(indicator), Some(date)) = (view.indicator.as_deref(), view.date) else {
        return Ok(None);
    };
    let values = db.query_map_values(view.scale, indicator, &date)?;
    let numbers = finite_values(values.iter().map(|v| v.value));

    let range = ColorRange::for_selection(values.len(), &numbers, selection.mode);
    let color_scale = ColorScale::new(selection.scheme, selection.reversed, range.bounds, &numbers);
    let source = db.query_indicator_source(indicator)?;
    let title = MapTitle::new(
        indicator,
        view.scale,
        &ortb_core::dates::format_iso(&date),
        &range.note,
        source.as_deref(),
    );
    let layer = geometry.map(|index| join_values(index, &values, color_scale.as_ref()));

    Ok(Some(MapFigure {
        stats: describe(&numbers),
        values,
        range,
        color_scale,
        title,
        layer,
    }))
}

/// Options of the raw-data page for the selected scale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawOptions {
    pub scales: Vec<Scale>,
    pub territories: Vec<Territory>,
    pub themes: Vec<String>,
    pub indicators: Vec<String>,
    /// ISO dates.
    pub dates: Vec<String>,
}

impl RawOptions {
    pub fn load(db: &Database, spec: &FilterSpec) -> anyhow::Result<Self> {
        Ok(Self {
            scales: db.available_scales()?,
            territories: match spec.scale {
                Some(scale) => db.query_territories(scale)?,
                None => Vec::new(),
            },
            themes: db.query_facet_values(spec, Facet::Theme)?,
            indicators: db.query_facet_values(spec, Facet::Indicator)?,
            dates: db.query_facet_values(spec, Facet::Date)?,
        })
    }

    /// Every value offered for a facet.
    pub fn values(&self, facet: Facet) -> Vec<String> {
        match facet {
            Facet::Territory => self.territories.iter().map(|t| t.code.clone()).collect(),
            Facet::Theme => self.themes.clone(),
            Facet::Indicator => self.indicators.clone(),
            Facet::Date => self.dates.clone(),
        }
    }
}

/// "Tout": select every value of one facet.
pub fn select_all(spec: &mut FilterSpec, options: &RawOptions, facet: Facet) {
    spec.set(facet, options.values(facet));
}

/// "Tout remplir (sauf territoires)": select every theme, indicator and
/// date, and drop the territory selection.
pub fn fill_all_except_territories(spec: &mut FilterSpec, options: &RawOptions) {
    spec.clear(Facet::Territory);
    for facet in [Facet::Theme, Facet::Indicator, Facet::Date] {
        select_all(spec, options, facet);
    }
}

/// Switch the raw-data scale. Territory codes of the previous scale no
/// longer apply and are cleared.
pub fn change_scale(spec: &mut FilterSpec, scale: Scale) {
    if spec.scale != Some(scale) {
        spec.scale = Some(scale);
        spec.clear(Facet::Territory);
    }
}
