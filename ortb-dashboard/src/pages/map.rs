//! Choropleth of one indicator at one date, with its statistics and values.

use super::PageFallback;
use dioxus::prelude::*;
use log::{debug, info};
use ortb_chart_ui::components::{
    ChartContainer, ChartHeader, ErrorDisplay, Expander, MetricCard, Notice, NoticeKind, SelectInput,
    SelectOption,
};
use ortb_chart_ui::js_bridge;
use ortb_chart_ui::selection::{build_map_figure, resolve_map_view, MapFigure, MapSelection, MapView};
use ortb_chart_ui::state::{AppState, GeometryCache, Page};
use ortb_chart_ui::tables::map_table;
use ortb_core::dates::{format_display, format_iso, parse_iso_date};
use ortb_core::paths::{data_url, geometry_simplified_name};
use ortb_data::color::ColorScheme;
use ortb_data::range::RangeMode;
use ortb_db::Database;
use ortb_geo::index::GeometryIndex;
use std::str::FromStr;

const MAP_CONTAINER_ID: &str = "ortb-map";
const MAP_TABLE_ID: &str = "ortb-map-table";

/// Value of the "Toutes" theme option.
const ALL_THEMES: &str = "";

fn compute(
    db: &Database,
    selection: &MapSelection,
    geometries: &GeometryCache,
) -> anyhow::Result<(MapView, Option<MapFigure>)> {
    let view = resolve_map_view(db, selection)?;
    let geometry = geometries.get(view.scale);
    let figure = build_map_figure(db, &view, selection, geometry.as_deref())?;
    Ok((view, figure))
}

#[component]
pub fn MapPage(db: Database) -> Element {
    let mut state = use_context::<AppState>();

    // ─── Effect 1: fetch the geometry of the displayed scale once ───
    let fetch_db = db.clone();
    use_effect(move || {
        let selection = state.map.read().clone();
        let Ok(view) = resolve_map_view(&fetch_db, &selection) else {
            return;
        };
        let scale = view.scale;
        if !state.geometries.peek().needs_fetch(scale) {
            return;
        }
        state.geometries.write().mark_pending(scale);

        spawn(async move {
            let url = data_url(geometry_simplified_name(scale));
            let loaded = js_bridge::fetch_text(&url)
                .await
                .map_err(anyhow::Error::msg)
                .and_then(|text| GeometryIndex::from_geojson_str(&text));
            match loaded {
                Ok(index) => {
                    info!("Loaded {} {} geometries", index.len(), scale);
                    state.geometries.write().insert(scale, index);
                }
                Err(e) => {
                    state
                        .geometries
                        .write()
                        .fail(scale, format!("Impossible de charger les contours ({}) : {}", url, e));
                }
            }
        });
    });

    // ─── Effect 2: render the map and the table ───
    let render_db = db.clone();
    use_effect(move || {
        let selection = state.map.read().clone();
        let geometries = state.geometries.read().clone();
        let Ok((view, Some(figure))) = compute(&render_db, &selection, &geometries) else {
            return;
        };

        let (data_json, config_json) = map_table(&figure.values, view.scale);
        js_bridge::render_data_table(MAP_TABLE_ID, &data_json, &config_json);

        match &figure.layer {
            Some(layer) => {
                if !layer.unmatched.is_empty() {
                    debug!("{} codes without geometry: {:?}", layer.unmatched.len(), layer.unmatched);
                }
                let payload = layer.to_payload(&figure.title, figure.color_scale.as_ref());
                js_bridge::render_choropleth(MAP_CONTAINER_ID, &payload.to_string());
            }
            // Geometry of the new scale still loading: drop the previous map.
            None => js_bridge::destroy_chart(MAP_CONTAINER_ID),
        }
    });

    // ─── Render ───
    let selection = state.map.read().clone();
    let geometries = state.geometries.read().clone();
    let (view, figure) = match compute(&db, &selection, &geometries) {
        Ok(computed) => computed,
        Err(e) => {
            return rsx! { PageFallback { page: Page::Maps, message: e.to_string() } };
        }
    };
    let geometry_error = geometries.error(view.scale).map(str::to_string);
    let geometry_loading = geometries.get(view.scale).is_none() && geometry_error.is_none();

    let theme_options: Vec<SelectOption> = std::iter::once(SelectOption::new(ALL_THEMES, "Toutes"))
        .chain(view.themes.iter().map(SelectOption::plain))
        .collect();
    let indicator_options: Vec<SelectOption> = view.indicators.iter().map(SelectOption::plain).collect();
    let date_options: Vec<SelectOption> = view
        .dates
        .iter()
        .map(|d| SelectOption::new(format_iso(d), format_display(d)))
        .collect();
    let scheme_options: Vec<SelectOption> = ColorScheme::ALL
        .iter()
        .map(|s| SelectOption::plain(s.name()))
        .collect();
    let mode_options: Vec<SelectOption> = RangeMode::ALL
        .iter()
        .map(|m| SelectOption::plain(m.label()))
        .collect();

    let selected_theme = view.theme.clone().unwrap_or_default();
    let selected_indicator = view.indicator.clone().unwrap_or_default();
    let selected_date = view.date.map(|d| format_iso(&d)).unwrap_or_default();
    let scales = view.scales.clone();
    let current_scale = view.scale;
    let displayed = figure
        .as_ref()
        .map(|f| current_scale.count_label(f.values.len()))
        .unwrap_or_default();

    rsx! {
        h1 { "📊 Visualisation Cartographique des indicateurs de l'ORTB" }

        div {
            style: "display: flex; gap: 24px; flex-wrap: wrap; align-items: flex-end;",

            div {
                style: "margin: 8px 0;",
                div { style: "font-weight: bold; font-size: 14px; margin-bottom: 4px;", "Échelle géographique" }
                for scale in scales {
                    label {
                        key: "{scale}",
                        style: "margin-right: 12px; cursor: pointer;",
                        input {
                            r#type: "radio",
                            name: "map-scale",
                            checked: scale == current_scale,
                            onchange: move |_| state.map.write().scale = scale,
                        }
                        " {scale}"
                    }
                }
            }

            if view.has_theme_choice() {
                SelectInput {
                    id: "map-theme".to_string(),
                    label: "Thématique".to_string(),
                    options: theme_options,
                    selected: selected_theme,
                    on_change: move |value: String| {
                        state.map.write().theme = Some(value).filter(|v| v != ALL_THEMES);
                    },
                }
            }

            div {
                style: "flex: 1; min-width: 260px;",
                SelectInput {
                    id: "map-indicator".to_string(),
                    label: "Indicateur".to_string(),
                    options: indicator_options,
                    selected: selected_indicator,
                    on_change: move |value: String| {
                        state.map.write().indicator = Some(value);
                    },
                }
            }

            if !date_options.is_empty() {
                SelectInput {
                    id: "map-date".to_string(),
                    label: "Sélectionnez la date".to_string(),
                    options: date_options,
                    selected: selected_date,
                    on_change: move |value: String| {
                        state.map.write().date = parse_iso_date(&value).ok();
                    },
                }
            }
        }

        if view.dates.is_empty() {
            Notice { kind: NoticeKind::Warning, "Aucune date disponible pour cet indicateur" }
        } else {
            hr { style: "margin: 12px 0; border: none; border-top: 1px solid #e0e0e0;" }

            div {
                style: "display: flex; gap: 24px; flex-wrap: wrap; align-items: flex-end;",
                SelectInput {
                    id: "map-scheme".to_string(),
                    label: "Échelle de couleur".to_string(),
                    options: scheme_options,
                    selected: selection.scheme.name().to_string(),
                    on_change: move |value: String| {
                        if let Ok(scheme) = ColorScheme::from_str(&value) {
                            state.map.write().scheme = scheme;
                        }
                    },
                }
                SelectInput {
                    id: "map-mode".to_string(),
                    label: "Répartition statistique".to_string(),
                    options: mode_options,
                    selected: selection.mode.label().to_string(),
                    on_change: move |value: String| {
                        if let Ok(mode) = RangeMode::from_str(&value) {
                            state.map.write().mode = mode;
                        }
                    },
                }
                label {
                    style: "margin: 8px 0; cursor: pointer;",
                    input {
                        r#type: "checkbox",
                        checked: selection.reversed,
                        onchange: move |_| {
                            let mut map = state.map.write();
                            map.reversed = !map.reversed;
                        },
                    }
                    " Inverser l'échelle de couleur"
                }
            }

            if let Some(message) = geometry_error {
                ErrorDisplay { message }
            }

            ChartContainer {
                id: MAP_CONTAINER_ID.to_string(),
                loading: geometry_loading,
                min_height: 600,
            }

            if let Some(figure) = figure {
                MapDetails { figure_stats: figure.stats.map(|s| [s.mean, s.median, s.std_dev]) }
            }

            ChartHeader { title: "Données affichées".to_string(), subtitle: displayed }
            ChartContainer { id: MAP_TABLE_ID.to_string(), min_height: 200 }
        }
    }
}

/// "📈 Statistiques descriptives": mean, median and standard deviation of
/// the displayed values.
#[component]
fn MapDetails(figure_stats: Option<[f64; 3]>) -> Element {
    let Some([mean, median, std_dev]) = figure_stats else {
        return rsx! {};
    };
    rsx! {
        Expander {
            title: "📈 Statistiques descriptives".to_string(),
            div {
                style: "display: flex; gap: 16px; flex-wrap: wrap;",
                MetricCard { label: "Moyenne".to_string(), value: format!("{:.2}", mean) }
                MetricCard { label: "Médiane".to_string(), value: format!("{:.2}", median) }
                MetricCard { label: "Écart-type".to_string(), value: format!("{:.2}", std_dev) }
            }
        }
    }
}
