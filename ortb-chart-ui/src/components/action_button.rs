//! Full-width button used for the selection shortcuts and the CSV download.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ActionButtonProps {
    pub label: String,
    /// Highlighted styling
    #[props(default = false)]
    pub primary: bool,
    pub onclick: EventHandler<()>,
}

#[component]
pub fn ActionButton(props: ActionButtonProps) -> Element {
    let colors = if props.primary {
        "background: #FF4B4B; color: #fff; border: 1px solid #FF4B4B;"
    } else {
        "background: #fff; color: #333; border: 1px solid #ccc;"
    };
    let style = format!(
        "{colors} width: 100%; padding: 8px 12px; font-size: 14px; margin: 4px 0; border-radius: 4px; cursor: pointer;"
    );
    let onclick = props.onclick;

    rsx! {
        button {
            style: "{style}",
            onclick: move |_| onclick.call(()),
            "{props.label}"
        }
    }
}
