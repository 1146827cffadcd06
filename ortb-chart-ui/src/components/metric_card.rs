//! Headline number with its label.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct MetricCardProps {
    pub label: String,
    pub value: String,
}

#[component]
pub fn MetricCard(props: MetricCardProps) -> Element {
    rsx! {
        div {
            style: "flex: 1; min-width: 160px; padding: 12px 16px; background: #fafafa; border: 1px solid #e0e0e0; border-radius: 6px;",
            div {
                style: "font-size: 13px; color: #666; margin-bottom: 4px;",
                "{props.label}"
            }
            div {
                style: "font-size: 26px; font-weight: 600;",
                "{props.value}"
            }
        }
    }
}
