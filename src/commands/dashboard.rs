use chrono::NaiveDateTime;

use crate::analyzer::dashboard::{build_dashboard_kpi, DashboardKpi};
use crate::analyzer::window::TimeWindow;
use crate::error::AppError;
use crate::formatting::{build_kpi_cards, KpiCard};
use crate::state::{AppState, StateAccess};

/// Selects the recency window ("all", "week", "month" or "quarter").
/// A different window sends the table back to page 1.
pub fn set_time_window(state: &AppState, window: &str) -> Result<TimeWindow, AppError> {
    let window: TimeWindow = window.parse()?;
    state.with_selection(|sel| sel.set_window(window))?;
    Ok(window)
}

/// Returns the complete dashboard payload for the selected window, anchored
/// at `now`.
pub fn get_dashboard_kpi(state: &AppState, now: NaiveDateTime) -> Result<DashboardKpi, AppError> {
    let config = state.config()?;
    let window = state.with_selection(|sel| sel.window())?;
    state.with_repository(|repo| Ok(build_dashboard_kpi(repo.tickets(), window, now, &config)))
}

pub fn get_kpi_cards(state: &AppState, now: NaiveDateTime) -> Result<Vec<KpiCard>, AppError> {
    let kpi = get_dashboard_kpi(state, now)?;
    Ok(build_kpi_cards(&kpi))
}
