use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::parser::types::Ticket;

/// Recency filter anchored to a caller-supplied "now".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    All,
    Week,
    Month,
    Quarter,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::All => "all",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Quarter => "quarter",
        }
    }

    /// Earliest opening date kept by the window, None for `All`.
    ///
    /// Month and quarter go back whole calendar months keeping the
    /// day-of-month, clamped to the last day of shorter months
    /// (2024-03-31 minus one month is 2024-02-29).
    pub fn start(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            TimeWindow::All => None,
            TimeWindow::Week => now.checked_sub_signed(Duration::days(7)),
            TimeWindow::Month => now.checked_sub_months(Months::new(1)),
            TimeWindow::Quarter => now.checked_sub_months(Months::new(3)),
        }
    }
}

impl FromStr for TimeWindow {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TimeWindow::All),
            "week" => Ok(TimeWindow::Week),
            "month" => Ok(TimeWindow::Month),
            "quarter" => Ok(TimeWindow::Quarter),
            _ => Err(AppError::InvalidWindow(s.to_string())),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keeps tickets opened at or after the window start, preserving input order.
pub fn filter_by_window(tickets: &[Ticket], window: TimeWindow, now: NaiveDateTime) -> Vec<&Ticket> {
    match window.start(now) {
        None => tickets.iter().collect(),
        Some(start) => tickets.iter().filter(|t| t.opened_at >= start).collect(),
    }
}
