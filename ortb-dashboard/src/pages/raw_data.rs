//! Multi-criterion filtering of the combined commune and EPCI rows, with
//! CSV export.

use super::PageFallback;
use dioxus::prelude::*;
use log::error;
use ortb_chart_ui::components::{
    ActionButton, ChartContainer, ErrorDisplay, FacetOption, FacetSelector, MetricCard, Notice,
    NoticeKind, SelectInput, SelectOption,
};
use ortb_chart_ui::js_bridge;
use ortb_chart_ui::selection::{change_scale, fill_all_except_territories, RawOptions};
use ortb_chart_ui::state::{AppState, Page};
use ortb_chart_ui::tables::raw_table;
use ortb_core::export;
use ortb_core::filter::{Facet, FilterSpec};
use ortb_core::scale::Scale;
use ortb_db::Database;
use std::str::FromStr;

const RAW_TABLE_ID: &str = "ortb-raw-table";

/// The scale actually filtered: the stored one when it has data, the first
/// available otherwise.
fn effective_spec(spec: &FilterSpec, scales: &[Scale]) -> Option<FilterSpec> {
    let scale = spec
        .scale
        .filter(|s| scales.contains(s))
        .or_else(|| scales.first().copied())?;
    let mut spec = spec.clone();
    change_scale(&mut spec, scale);
    Some(spec)
}

fn facet_options(options: &RawOptions, facet: Facet) -> Vec<FacetOption> {
    match facet {
        Facet::Territory => options
            .territories
            .iter()
            .map(|t| FacetOption {
                value: t.code.clone(),
                text: t.label.clone(),
            })
            .collect(),
        _ => options
            .values(facet)
            .into_iter()
            .map(|v| FacetOption {
                value: v.clone(),
                text: v,
            })
            .collect(),
    }
}

#[component]
pub fn RawDataPage(db: Database) -> Element {
    let mut state = use_context::<AppState>();

    // ─── Effect: render the filtered table ───
    let table_db = db.clone();
    use_effect(move || {
        let Ok(scales) = table_db.available_scales() else {
            return;
        };
        let Some(spec) = effective_spec(&state.raw_filter.read(), &scales) else {
            return;
        };
        if spec.is_empty() {
            return;
        }
        let scale = spec.scale.unwrap_or_default();
        match table_db.query_filtered(&spec) {
            Ok(rows) if !rows.is_empty() => {
                let (data_json, config_json) = raw_table(&rows, scale);
                js_bridge::render_data_table(RAW_TABLE_ID, &data_json, &config_json);
            }
            Ok(_) => {}
            Err(e) => error!("Raw data query failed: {}", e),
        }
    });

    // ─── Render ───
    let stored = state.raw_filter.read().clone();
    let scales = match db.available_scales() {
        Ok(scales) => scales,
        Err(e) => return rsx! { PageFallback { page: Page::RawData, message: e.to_string() } },
    };
    let Some(spec) = effective_spec(&stored, &scales) else {
        return rsx! {
            h1 { "📁 Données Brutes" }
            ErrorDisplay { message: "Aucune donnée disponible pour les mailles".to_string() }
        };
    };
    let scale = spec.scale.unwrap_or_default();

    let options = match RawOptions::load(&db, &spec) {
        Ok(options) => options,
        Err(e) => return rsx! { PageFallback { page: Page::RawData, message: e.to_string() } },
    };

    let scale_options: Vec<SelectOption> = scales.iter().map(|s| SelectOption::plain(s.label())).collect();
    let selectors: Vec<(Facet, &'static str, Vec<FacetOption>)> = Facet::ALL
        .iter()
        .map(|&facet| (facet, facet.prompt(scale), facet_options(&options, facet)))
        .collect();
    let fill_options = options.clone();

    rsx! {
        h1 { "📁 Données Brutes" }

        div {
            style: "display: flex; gap: 24px; align-items: flex-start;",

            // Filters
            div {
                style: "width: 300px; flex-shrink: 0; padding: 12px; background: #f7f8fa; border-radius: 6px;",
                h3 { style: "margin-top: 0;", "🔍 Filtres" }
                Notice { "ℹ️ Veuillez sélectionner vos filtres ci-dessous" }

                SelectInput {
                    id: "raw-scale".to_string(),
                    label: "Maille territoriale".to_string(),
                    options: scale_options,
                    selected: scale.label().to_string(),
                    on_change: move |value: String| {
                        if let Ok(scale) = Scale::from_str(&value) {
                            change_scale(&mut state.raw_filter.write(), scale);
                        }
                    },
                }

                for (facet, prompt, facet_values) in selectors {
                    FacetSelector {
                        key: "{prompt}",
                        facet,
                        label: prompt.to_string(),
                        options: facet_values,
                    }
                }

                hr { style: "margin: 12px 0; border: none; border-top: 1px solid #e0e0e0;" }

                ActionButton {
                    label: "🧹 Tout remplir (sauf territoires)".to_string(),
                    primary: true,
                    onclick: move |_| fill_all_except_territories(&mut state.raw_filter.write(), &fill_options),
                }
                ActionButton {
                    label: "🗑️ Tout vider".to_string(),
                    onclick: move |_| state.raw_filter.write().clear_all(),
                }
            }

            // Data
            div {
                style: "flex: 1; min-width: 0;",
                if spec.is_empty() {
                    Instructions {}
                } else {
                    FilteredData { db: db.clone(), spec: spec.clone() }
                }
            }
        }
    }
}

#[component]
fn Instructions() -> Element {
    rsx! {
        hr { style: "border: none; border-top: 1px solid #e0e0e0;" }
        h3 { "📋 Instructions" }
        Notice {
            p { strong { "Veuillez sélectionner les filtres à gauche de l'écran :" } }
            ol {
                li { strong { "Choisissez une maille territoriale" } " (Commune ou EPCI)" }
                li { strong { "Sélectionnez les territoires" } " concernés" }
                li { strong { "Filtrez par thématique" } ", indicateur ou date selon vos besoins" }
                li { "Utilisez les boutons " strong { "\"Tout\"" } " pour sélectionner toutes les options d'un filtre" }
                li {
                    "Cliquez sur " strong { "\"Tout remplir (sauf territoires)\"" }
                    " pour sélectionner toutes les thématiques, indicateurs et dates"
                }
            }
            p { "Les données s'afficheront automatiquement une fois les filtres sélectionnés." }
        }
        hr { style: "border: none; border-top: 1px solid #e0e0e0;" }
    }
}

/// Row count, table, download button and metrics of a non-empty filter.
#[component]
fn FilteredData(db: Database, spec: FilterSpec) -> Element {
    let mut export_error = use_signal(|| None::<String>);
    let metrics = match db.query_filter_metrics(&spec) {
        Ok(metrics) => metrics,
        Err(e) => return rsx! { ErrorDisplay { message: e.to_string() } },
    };
    let row_count = metrics.rows;

    if row_count == 0 {
        return rsx! {
            p { strong { "📊 0 lignes filtrées" } }
            Notice { kind: NoticeKind::Warning, "Aucune donnée ne correspond aux filtres sélectionnés." }
        };
    }

    let period = match (metrics.first_date.as_deref(), metrics.last_date.as_deref()) {
        (Some(first), Some(last)) => format!("{} à {}", first, last),
        _ => "N/A".to_string(),
    };
    let scale = spec.scale.unwrap_or_default();
    let download_db = db.clone();
    let download_spec = spec.clone();

    rsx! {
        p { strong { "📊 {row_count} lignes filtrées" } }

        ChartContainer { id: RAW_TABLE_ID.to_string(), min_height: 400 }

        ActionButton {
            label: "📥 Télécharger les données filtrées (CSV)".to_string(),
            onclick: move |_| {
                let exported = download_db
                    .query_filtered(&download_spec)
                    .and_then(|rows| export::to_csv(&rows, scale));
                match exported {
                    Ok(csv) => {
                        export_error.set(None);
                        js_bridge::download_csv(&export::file_name(scale), &csv);
                    }
                    Err(e) => {
                        error!("CSV export failed: {}", e);
                        export_error.set(Some(e.to_string()));
                    }
                }
            },
        }
        if let Some(message) = export_error() {
            ErrorDisplay { message }
        }

        hr { style: "margin: 16px 0; border: none; border-top: 1px solid #e0e0e0;" }
        h3 { "📈 Statistiques des données filtrées" }
        div {
            style: "display: flex; gap: 16px; flex-wrap: wrap;",
            MetricCard { label: "Nombre de lignes".to_string(), value: row_count.to_string() }
            MetricCard { label: "Nombre d'indicateurs".to_string(), value: metrics.indicators.to_string() }
            MetricCard { label: "Nombre de thématiques".to_string(), value: metrics.themes.to_string() }
            MetricCard { label: "Période couverte".to_string(), value: period }
        }
    }
}
