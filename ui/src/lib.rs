pub mod components;
pub mod page;
pub mod theme;

pub use components::{HistoryTable, KpiCard, KpiRow, Panels, ProfilePanel, SummaryCard};
pub use page::{
    render_dashboard, render_missing_data, render_panels, DashboardPage, MissingDataPage,
    PAGE_TITLE,
};
pub use theme::{stylesheet, GLOBAL_CSS};

/// Browser bridge: swaps `#panels` and draws the Plotly charts from `/api/view`.
pub const DASHBOARD_JS: &str = include_str!("../assets/dashboard.js");
