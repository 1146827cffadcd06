//! Plateforme de visualisation des données de l'ORTB
//!
//! Territorial indicators of the Observatoire Régional des Transports de
//! Bretagne, at commune and EPCI scale, as choropleth maps and filterable
//! tables.
//!
//! Data flow:
//! 1. `build.rs` embeds the indicator reference table
//!    (`columns_indicateurs.csv`) at compile time.
//! 2. On mount: fetch the commune and EPCI observation files from `./data/`
//!    (gzip or plain CSV), load them into an in-memory SQLite database and
//!    apply the reference table.
//! 3. The sidebar selects one of four pages; each page only queries the
//!    database. Map geometries are fetched the first time a scale is shown.

mod pages;

use dioxus::prelude::*;
use dioxus_logger::tracing::Level;
use log::{error, info, warn};
use ortb_chart_ui::components::{LoadingSpinner, PageNav, SidebarInfo};
use ortb_chart_ui::js_bridge;
use ortb_chart_ui::state::AppState;
use ortb_core::paths::{data_url, observations_name};
use ortb_core::scale::Scale;
use ortb_db::Database;

// Indicator reference table, empty when the fixture was missing at build time.
const INDICATORS_CSV: &str = include_str!(concat!(env!("OUT_DIR"), "/columns_indicateurs.csv"));

fn main() {
    if let Err(e) = dioxus_logger::init(Level::INFO) {
        web_sys::console::warn_1(&format!("logger init failed: {}", e).into());
    }
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("ortb-root"))
        .launch(App);
}

/// Fetch the observation files and build the database.
///
/// The commune file is required. A failed EPCI fetch switches the
/// dashboard to commune-only mode.
async fn load_database() -> Result<Database, String> {
    let communes_url = data_url(observations_name(Scale::Commune));
    let communes = js_bridge::fetch_csv(&communes_url)
        .await
        .map_err(|e| format!("Impossible de charger les données communales ({}) : {}", communes_url, e))?;

    let epci_url = data_url(observations_name(Scale::Epci));
    let epci = match js_bridge::fetch_csv(&epci_url).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("EPCI data unavailable ({}): {}", epci_url, e);
            None
        }
    };

    let mapping = Some(INDICATORS_CSV).filter(|csv| !csv.trim().is_empty());

    let db = Database::new().map_err(|e| e.to_string())?;
    let report = db
        .load_sources(&communes, epci.as_deref(), mapping)
        .map_err(|e| e.to_string())?;
    info!(
        "Loaded {} commune rows, {} EPCI rows ({} rows with invalid dates dropped)",
        report.commune_rows,
        report.epci_rows.unwrap_or(0),
        report.dropped_dates
    );
    Ok(db)
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);

    // ─── Load the datasets once on mount ───
    use_effect(move || {
        js_bridge::init_charts();
        spawn(async move {
            match load_database().await {
                Ok(db) => {
                    match db.query_summary() {
                        Ok(summary) => state.summary.set(Some(summary)),
                        Err(e) => warn!("Dataset summary unavailable: {}", e),
                    }
                    state.db.set(Some(db));
                }
                Err(e) => {
                    error!("{}", e);
                    state.error_msg.set(Some(e));
                }
            }
            state.loading.set(false);
        });
    });

    rsx! {
        div {
            style: "display: flex; min-height: 100vh; font-family: system-ui, -apple-system, sans-serif; color: #262730;",

            aside {
                style: "width: 240px; flex-shrink: 0; padding: 16px; background: #f0f2f6; border-right: 1px solid #e0e0e0;",
                h2 { style: "margin: 0 0 12px 0; font-size: 20px;", "Navigation" }
                PageNav {}
                SidebarInfo {}
            }

            main {
                style: "flex: 1; min-width: 0; padding: 16px 32px;",
                if *state.loading.read() {
                    LoadingSpinner {}
                } else {
                    pages::PageRouter {}
                }
            }
        }
    }
}
