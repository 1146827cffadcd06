//! Page dispatch.
//!
//! Each page builds its content from the database; when that fails, or
//! when the data never loaded, the error is shown together with a
//! placeholder instead of the page.

mod about;
mod home;
mod map;
mod raw_data;

use dioxus::prelude::*;
use ortb_chart_ui::components::{ErrorDisplay, Notice};
use ortb_chart_ui::state::{AppState, Page};

pub use about::AboutPage;
pub use home::HomePage;
pub use map::MapPage;
pub use raw_data::RawDataPage;

#[component]
pub fn PageRouter() -> Element {
    let state = use_context::<AppState>();
    let page = (state.page)();

    if page == Page::About {
        return rsx! { AboutPage {} };
    }

    let Some(db) = state.db.read().clone() else {
        let message = state
            .error_msg
            .read()
            .clone()
            .unwrap_or_else(|| "Données indisponibles".to_string());
        return rsx! { PageFallback { page, message } };
    };

    match page {
        Page::Home => rsx! { HomePage { db } },
        Page::Maps => rsx! { MapPage { db } },
        Page::RawData => rsx! { RawDataPage { db } },
        Page::About => rsx! { AboutPage {} },
    }
}

/// Error banner and placeholder shown in place of a page that failed.
#[component]
pub fn PageFallback(page: Page, message: String) -> Element {
    let label = page.label();
    rsx! {
        ErrorDisplay { message: format!("Erreur lors du chargement de la page : {}", message) }
        Notice { "Affichage de la page par défaut..." }
        h1 { "Page: {label}" }
        p { "Cette page est en cours de développement." }
    }
}
