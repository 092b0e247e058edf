use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use crate::parser::types::{Ticket, TicketPriority};

/// One calendar month of the priority trend. All four priority counts are
/// always present, zero when no ticket of that priority was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityTrendPoint {
    /// Sortable "YYYY-MM" key.
    pub period_key: String,
    /// pt-BR short label, e.g. "jan/24".
    pub period_label: String,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub urgent: usize,
}

impl PriorityTrendPoint {
    fn new(year: i32, month: u32) -> Self {
        PriorityTrendPoint {
            period_key: period_key(year, month),
            period_label: month_label(year, month),
            low: 0,
            medium: 0,
            high: 0,
            urgent: 0,
        }
    }

    pub fn get(&self, priority: TicketPriority) -> usize {
        match priority {
            TicketPriority::Low => self.low,
            TicketPriority::Medium => self.medium,
            TicketPriority::High => self.high,
            TicketPriority::Urgent => self.urgent,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.urgent
    }

    fn bump(&mut self, priority: TicketPriority) {
        match priority {
            TicketPriority::Low => self.low += 1,
            TicketPriority::Medium => self.medium += 1,
            TicketPriority::High => self.high += 1,
            TicketPriority::Urgent => self.urgent += 1,
        }
    }
}

/// (year, month) of a timestamp; the bucket identity of the trend series.
pub fn month_of(dt: NaiveDateTime) -> (i32, u32) {
    (dt.year(), dt.month())
}

pub fn period_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// Month labels are pinned to pt-BR so fixtures do not depend on the host locale.
pub fn month_label(year: i32, month: u32) -> String {
    format!("{}/{:02}", portuguese_month_abbr(month), year.rem_euclid(100))
}

fn portuguese_month_abbr(month: u32) -> &'static str {
    match month {
        1 => "jan",
        2 => "fev",
        3 => "mar",
        4 => "abr",
        5 => "mai",
        6 => "jun",
        7 => "jul",
        8 => "ago",
        9 => "set",
        10 => "out",
        11 => "nov",
        12 => "dez",
        _ => "???",
    }
}

/// Buckets tickets by opening month, counts each priority per bucket, and
/// keeps the `max_points` most recent buckets in ascending order. Months
/// without any ticket produce no bucket.
pub fn build_priority_trend(tickets: &[&Ticket], max_points: usize) -> Vec<PriorityTrendPoint> {
    let mut buckets: BTreeMap<(i32, u32), PriorityTrendPoint> = BTreeMap::new();
    for t in tickets {
        let (year, month) = month_of(t.opened_at);
        buckets
            .entry((year, month))
            .or_insert_with(|| PriorityTrendPoint::new(year, month))
            .bump(t.priority);
    }

    let skip = buckets.len().saturating_sub(max_points);
    buckets.into_values().skip(skip).collect()
}
