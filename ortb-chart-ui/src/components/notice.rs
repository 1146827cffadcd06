//! Informational and warning banners.

use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoticeKind {
    #[default]
    Info,
    Warning,
}

impl NoticeKind {
    fn style(&self) -> &'static str {
        match self {
            NoticeKind::Info => {
                "padding: 12px 16px; margin: 8px 0; background: #E3F2FD; color: #0D47A1; border-radius: 4px; border: 1px solid #90CAF9;"
            }
            NoticeKind::Warning => {
                "padding: 12px 16px; margin: 8px 0; background: #FFF8E1; color: #8D6E00; border-radius: 4px; border: 1px solid #FFE082;"
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct NoticeProps {
    #[props(default)]
    pub kind: NoticeKind,
    pub children: Element,
}

#[component]
pub fn Notice(props: NoticeProps) -> Element {
    rsx! {
        div {
            style: props.kind.style(),
            {props.children}
        }
    }
}
