//! Reusable Dioxus RSX components for the ORTB dashboard pages.

mod action_button;
mod chart_container;
mod chart_header;
mod error_display;
mod expander;
mod facet_selector;
mod loading_spinner;
mod metric_card;
mod notice;
mod page_nav;
mod select_input;
mod sidebar_info;

pub use action_button::ActionButton;
pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use error_display::ErrorDisplay;
pub use expander::Expander;
pub use facet_selector::{FacetOption, FacetSelector};
pub use loading_spinner::LoadingSpinner;
pub use metric_card::MetricCard;
pub use notice::{Notice, NoticeKind};
pub use page_nav::PageNav;
pub use select_input::{SelectInput, SelectOption};
pub use sidebar_info::SidebarInfo;
