//! Dashboard KPIs: every summary view derived from one time-filtered ticket set.

use std::time::Instant;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::stats::{count_by, pct, rank_desc, rate_percent, rounded_mean};
use super::temporal::{build_priority_trend, PriorityTrendPoint};
use super::window::{filter_by_window, TimeWindow};
use crate::config::AppConfig;
use crate::parser::types::{Satisfaction, Ticket, TicketStatus};

// ─── Data Structures ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpi {
    pub meta: DashboardMeta,
    pub status_counts: StatusCounts,
    /// Mean TMA over every ticket of the set, None when the set is empty.
    pub avg_resolution_minutes: Option<u32>,
    /// Mean FRT, same convention as `avg_resolution_minutes`.
    pub avg_first_response_minutes: Option<u32>,
    /// Share of "Good" ratings, 0-100. 0 for an empty set.
    pub satisfaction_rate: u32,
    pub top_agents: Vec<RankingItem>,
    pub reasons: Vec<RankingItem>,
    pub departments: Vec<DepartmentItem>,
    pub priority_trend: Vec<PriorityTrendPoint>,
    pub highlights: Highlights,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    pub total_tickets: usize,
    pub window: TimeWindow,
    pub window_start: Option<NaiveDateTime>,
    /// (oldest, newest) opening date in the filtered set.
    pub date_range: Option<(NaiveDateTime, NaiveDateTime)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub open: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub closed: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TicketStatus) -> usize {
        match status {
            TicketStatus::Open => self.open,
            TicketStatus::Pending => self.pending,
            TicketStatus::InProgress => self.in_progress,
            TicketStatus::Resolved => self.resolved,
            TicketStatus::Closed => self.closed,
        }
    }

    pub fn total(&self) -> usize {
        TicketStatus::ALL.iter().map(|&s| self.get(s)).sum()
    }

    /// (status, count) for all five statuses, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (TicketStatus, usize)> + '_ {
        TicketStatus::ALL.iter().map(move |&s| (s, self.get(s)))
    }

    fn bump(&mut self, status: TicketStatus) {
        match status {
            TicketStatus::Open => self.open += 1,
            TicketStatus::Pending => self.pending += 1,
            TicketStatus::InProgress => self.in_progress += 1,
            TicketStatus::Resolved => self.resolved += 1,
            TicketStatus::Closed => self.closed += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingItem {
    pub label: String,
    pub count: usize,
    /// Share of the whole filtered set, one decimal.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentItem {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub top_agent: Option<RankingItem>,
    pub top_reason: Option<RankingItem>,
    pub top_department: Option<DepartmentItem>,
}

// ─── Aggregations ────────────────────────────────────────────────────────────

pub fn status_counts(tickets: &[&Ticket]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for t in tickets {
        counts.bump(t.status);
    }
    counts
}

pub fn average_resolution_minutes(tickets: &[&Ticket]) -> Option<u32> {
    let values: Vec<u32> = tickets.iter().map(|t| t.resolution_minutes).collect();
    rounded_mean(&values)
}

pub fn average_first_response_minutes(tickets: &[&Ticket]) -> Option<u32> {
    let values: Vec<u32> = tickets.iter().map(|t| t.first_response_minutes).collect();
    rounded_mean(&values)
}

pub fn satisfaction_rate(tickets: &[&Ticket]) -> u32 {
    let good = tickets
        .iter()
        .filter(|t| t.satisfaction == Satisfaction::Good)
        .count();
    rate_percent(good, tickets.len())
}

fn to_ranking(counts: Vec<(String, usize)>, total: usize) -> Vec<RankingItem> {
    counts
        .into_iter()
        .map(|(label, count)| RankingItem {
            label,
            count,
            percentage: pct(count, total),
        })
        .collect()
}

/// Agents by ticket count, descending, truncated to `limit`. Equal counts
/// keep the order in which agents first appear in the set.
pub fn top_agents(tickets: &[&Ticket], limit: usize) -> Vec<RankingItem> {
    let mut ranked = rank_desc(count_by(tickets, |t| t.agent.clone()));
    ranked.truncate(limit);
    to_ranking(ranked, tickets.len())
}

/// Every reason present in the set, descending by count.
pub fn reason_distribution(tickets: &[&Ticket]) -> Vec<RankingItem> {
    let ranked = rank_desc(count_by(tickets, |t| t.reason));
    to_ranking(
        ranked
            .into_iter()
            .map(|(reason, count)| (reason.label().to_string(), count))
            .collect(),
        tickets.len(),
    )
}

/// Every department present in the set, descending by count.
pub fn department_distribution(tickets: &[&Ticket]) -> Vec<DepartmentItem> {
    rank_desc(count_by(tickets, |t| t.department))
        .into_iter()
        .map(|(department, count)| DepartmentItem {
            label: department.label().to_string(),
            count,
        })
        .collect()
}

fn opening_range(tickets: &[&Ticket]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let oldest = tickets.iter().map(|t| t.opened_at).min()?;
    let newest = tickets.iter().map(|t| t.opened_at).max()?;
    Some((oldest, newest))
}

// ─── Builder Functions ───────────────────────────────────────────────────────

/// Computes every KPI for an already filtered set.
pub fn build_kpi_for_set(
    tickets: &[&Ticket],
    window: TimeWindow,
    window_start: Option<NaiveDateTime>,
    config: &AppConfig,
) -> DashboardKpi {
    let top_agents = top_agents(tickets, config.top_agents_limit);
    let reasons = reason_distribution(tickets);
    let departments = department_distribution(tickets);

    let highlights = Highlights {
        top_agent: top_agents.first().cloned(),
        top_reason: reasons.first().cloned(),
        top_department: departments.first().cloned(),
    };

    DashboardKpi {
        meta: DashboardMeta {
            total_tickets: tickets.len(),
            window,
            window_start,
            date_range: opening_range(tickets),
        },
        status_counts: status_counts(tickets),
        avg_resolution_minutes: average_resolution_minutes(tickets),
        avg_first_response_minutes: average_first_response_minutes(tickets),
        satisfaction_rate: satisfaction_rate(tickets),
        top_agents,
        reasons,
        departments,
        priority_trend: build_priority_trend(tickets, config.trend_months),
        highlights,
    }
}

/// Builds the complete dashboard payload.
///
/// # Arguments
/// * `tickets` - Repository snapshot, newest first
/// * `window` - Recency filter applied before any aggregation
/// * `now` - Anchor of the window, supplied by the caller
/// * `config` - Ranking and trend sizes
pub fn build_dashboard_kpi(
    tickets: &[Ticket],
    window: TimeWindow,
    now: NaiveDateTime,
    config: &AppConfig,
) -> DashboardKpi {
    let start = Instant::now();

    let filtered = filter_by_window(tickets, window, now);
    let kpi = build_kpi_for_set(&filtered, window, window.start(now), config);

    log::debug!(
        "Dashboard KPI computed for window {} ({} of {} tickets) in {} µs",
        window,
        filtered.len(),
        tickets.len(),
        start.elapsed().as_micros()
    );
    kpi
}

// ─── Tests ───────────────────────────────────────────────────────────────────
