//! Sidebar page selector.

use crate::state::{AppState, Page};
use dioxus::prelude::*;

fn nav_style(active: bool) -> &'static str {
    if active {
        "text-align: left; padding: 8px 12px; border: none; border-radius: 4px; background: #e8eaf6; font-weight: 600; cursor: pointer;"
    } else {
        "text-align: left; padding: 8px 12px; border: none; border-radius: 4px; background: transparent; cursor: pointer;"
    }
}

#[component]
pub fn PageNav() -> Element {
    let mut state = use_context::<AppState>();
    let current = (state.page)();

    rsx! {
        nav {
            style: "display: flex; flex-direction: column; gap: 4px; margin: 8px 0;",
            for page in Page::ALL {
                {
                    let label = page.label();
                    rsx! {
                        button {
                            key: "{label}",
                            style: nav_style(page == current),
                            onclick: move |_| state.page.set(page),
                            "{label}"
                        }
                    }
                }
            }
        }
    }
}
