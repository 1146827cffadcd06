//! Multiselect for one raw-data facet.

use crate::state::AppState;
use dioxus::prelude::*;
use ortb_core::filter::Facet;

/// A selectable facet value: stored value and displayed text.
///
/// Territories are stored by code and displayed by label.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetOption {
    pub value: String,
    pub text: String,
}

#[derive(Props, Clone, PartialEq)]
pub struct FacetSelectorProps {
    pub facet: Facet,
    pub label: String,
    pub options: Vec<FacetOption>,
}

/// Checkbox list bound to `AppState::raw_filter`, with a "Tout" button that
/// selects every option of the facet.
#[component]
pub fn FacetSelector(props: FacetSelectorProps) -> Element {
    let mut state = use_context::<AppState>();
    let facet = props.facet;
    let selected_count = state.raw_filter.read().selected_count(facet);
    let all_values: Vec<String> = props.options.iter().map(|o| o.value.clone()).collect();

    let on_select_all = move |_: MouseEvent| {
        state.raw_filter.write().set(facet, all_values.clone());
    };

    rsx! {
        div {
            style: "margin: 10px 0;",
            div {
                style: "display: flex; justify-content: space-between; align-items: center; margin-bottom: 4px;",
                span {
                    style: "font-weight: bold; font-size: 14px;",
                    "{props.label}"
                    if selected_count > 0 {
                        span { style: "font-weight: normal; color: #666;", " ({selected_count})" }
                    }
                }
                button {
                    style: "padding: 2px 10px; font-size: 12px; border: 1px solid #ccc; background: #fff; border-radius: 4px; cursor: pointer;",
                    onclick: on_select_all,
                    "Tout"
                }
            }
            if props.options.is_empty() {
                p { style: "margin: 0; font-size: 12px; color: #666;", "Aucune valeur disponible" }
            } else {
                div {
                    style: "max-height: 160px; overflow-y: auto; border: 1px solid #e0e0e0; border-radius: 4px; padding: 4px 8px; background: #fff;",
                    for option in props.options.iter() {
                        {
                            let key = option.value.clone();
                            let text = option.text.clone();
                            let value = option.value.clone();
                            let checked = state.raw_filter.read().is_selected(facet, &value);
                            rsx! {
                                label {
                                    key: "{key}",
                                    style: "display: block; font-size: 13px; cursor: pointer;",
                                    input {
                                        r#type: "checkbox",
                                        checked,
                                        onchange: move |_| state.raw_filter.write().toggle(facet, &value),
                                    }
                                    " {text}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
