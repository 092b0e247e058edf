pub mod dashboard;
pub mod pagination;
pub mod search;
pub mod stats;
pub mod temporal;
pub mod window;

pub use dashboard::{build_dashboard_kpi, build_kpi_for_set, DashboardKpi};
pub use pagination::{page_window, paginate, TicketPage};
pub use search::search;
pub use temporal::{build_priority_trend, PriorityTrendPoint};
pub use window::{filter_by_window, TimeWindow};
