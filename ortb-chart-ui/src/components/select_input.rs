//! Labeled dropdown.

use dioxus::prelude::*;

/// One `<option>`: submitted value and displayed text.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }

    /// An option whose value is also its text.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            text,
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct SelectInputProps {
    /// DOM id, also used by the label
    pub id: String,
    pub label: String,
    pub options: Vec<SelectOption>,
    /// Value of the selected option
    pub selected: String,
    pub on_change: EventHandler<String>,
}

/// Dropdown reporting the chosen option value.
#[component]
pub fn SelectInput(props: SelectInputProps) -> Element {
    let handler = props.on_change;
    let on_change = move |evt: Event<FormData>| {
        handler.call(evt.value());
    };

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; flex-direction: column; gap: 4px;",
            label {
                r#for: "{props.id}",
                style: "font-weight: bold; font-size: 14px;",
                "{props.label}"
            }
            select {
                id: "{props.id}",
                style: "padding: 4px;",
                onchange: on_change,
                for opt in props.options.iter() {
                    option {
                        key: "{opt.value}",
                        value: "{opt.value}",
                        selected: opt.value == props.selected,
                        "{opt.text}"
                    }
                }
            }
        }
    }
}
