use super::PageFallback;
use dioxus::prelude::*;
use ortb_chart_ui::components::{Expander, MetricCard};
use ortb_chart_ui::state::Page;
use ortb_core::scale::Scale;
use ortb_db::models::{DatasetSummary, ThemeIndicators};
use ortb_db::Database;

struct HomeView {
    summary: DatasetSummary,
    groups: Vec<ThemeIndicators>,
}

fn load_home(db: &Database) -> anyhow::Result<HomeView> {
    Ok(HomeView {
        summary: db.query_summary()?,
        groups: db.query_indicators_by_theme(Scale::Commune)?,
    })
}

#[component]
pub fn HomePage(db: Database) -> Element {
    let view = match load_home(&db) {
        Ok(view) => view,
        Err(e) => {
            return rsx! { PageFallback { page: Page::Home, message: e.to_string() } };
        }
    };
    let summary = &view.summary;

    let (third_label, third_value) = summary.third_metric();

    rsx! {
        h1 { "🏠 Tableau de bord - Observatoire Régional" }

        div {
            style: "display: flex; gap: 16px; flex-wrap: wrap; margin: 16px 0;",
            MetricCard { label: "Nombre d'indicateurs".to_string(), value: summary.commune_indicators.to_string() }
            MetricCard { label: "Nombre de communes".to_string(), value: summary.communes.to_string() }
            MetricCard { label: third_label.to_string(), value: third_value }
        }

        h3 { "📋 Indicateurs disponibles" }
        for group in view.groups.iter() {
            Expander {
                key: "{group.theme}",
                title: group.theme.clone(),
                ul {
                    style: "margin: 0; padding-left: 20px;",
                    for indicator in group.indicators.iter() {
                        li { key: "{indicator}", "{indicator}" }
                    }
                }
            }
        }
    }
}
