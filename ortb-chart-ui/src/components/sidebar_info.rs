//! Dataset information panel shown under the navigation.

use crate::state::AppState;
use dioxus::prelude::*;
use ortb_core::dates::iso_to_display;

#[component]
pub fn SidebarInfo() -> Element {
    let state = use_context::<AppState>();
    let Some(summary) = state.summary.read().clone() else {
        return rsx! {};
    };
    let updated = summary.last_date.as_deref().map(iso_to_display);
    let commune_indicators = summary.commune_indicators;
    let epci_indicators = summary.epci_indicators;
    let themes = summary.themes;

    rsx! {
        div {
            style: "border-top: 1px solid #ddd; margin-top: 12px; padding-top: 8px; font-size: 12px; color: #555;",
            h4 { style: "margin: 4px 0 8px 0; font-size: 15px; color: #222;", "📊 Informations" }
            if let Some(updated) = updated {
                p { style: "margin: 2px 0;", "Données mises à jour le: {updated}" }
            }
            if commune_indicators > 0 {
                p { style: "margin: 2px 0;", "Indicateurs communaux: {commune_indicators}" }
            }
            if summary.has_epci {
                p { style: "margin: 2px 0;", "Indicateurs EPCI: {epci_indicators}" }
            }
            p { style: "margin: 2px 0;", "Thématiques: {themes}" }
        }
    }
}
