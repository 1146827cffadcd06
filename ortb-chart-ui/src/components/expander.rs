//! Collapsible section.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ExpanderProps {
    pub title: String,
    #[props(default = false)]
    pub open: bool,
    pub children: Element,
}

/// A `<details>` block with a clickable title.
#[component]
pub fn Expander(props: ExpanderProps) -> Element {
    rsx! {
        details {
            open: props.open,
            style: "margin: 6px 0; border: 1px solid #e0e0e0; border-radius: 4px; padding: 6px 12px;",
            summary {
                style: "cursor: pointer; font-weight: 600;",
                "{props.title}"
            }
            div {
                style: "padding: 8px 0 4px 0;",
                {props.children}
            }
        }
    }
}
