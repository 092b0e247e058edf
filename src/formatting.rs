//! Display strings for the dashboard headline values.

use serde::Serialize;

use crate::analyzer::dashboard::DashboardKpi;

/// `45` → `"45min"`, `90` → `"1h 30min"`, `120` → `"2h"`.
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{}min", minutes);
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins > 0 {
        format!("{}h {}min", hours, mins)
    } else {
        format!("{}h", hours)
    }
}

/// An undefined average (empty set) renders as `"N/A"`.
pub fn format_average(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) => format_minutes(m),
        None => "N/A".to_string(),
    }
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn format_rate(rate: u32) -> String {
    format!("{}%", rate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardVariant {
    Default,
    Primary,
    Danger,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiCard {
    pub title: String,
    pub value: String,
    pub subtitle: Option<String>,
    pub variant: CardVariant,
}

fn card(title: &str, value: String, subtitle: Option<String>, variant: CardVariant) -> KpiCard {
    KpiCard {
        title: title.to_string(),
        value,
        subtitle,
        variant,
    }
}

/// The five headline cards, in display order.
pub fn build_kpi_cards(kpi: &DashboardKpi) -> Vec<KpiCard> {
    let counts = &kpi.status_counts;
    vec![
        card(
            "Total de Chamados",
            kpi.meta.total_tickets.to_string(),
            Some("Todos os chamados".to_string()),
            CardVariant::Primary,
        ),
        card(
            "Em Aberto",
            counts.open.to_string(),
            Some(format!("{} pendentes", counts.pending)),
            CardVariant::Danger,
        ),
        card(
            "Em Andamento",
            counts.in_progress.to_string(),
            None,
            CardVariant::Primary,
        ),
        card(
            "TMA Médio",
            format_average(kpi.avg_resolution_minutes),
            Some(format!("FRT: {}", format_average(kpi.avg_first_response_minutes))),
            CardVariant::Default,
        ),
        card(
            "Satisfação",
            format_rate(kpi.satisfaction_rate),
            Some("Avaliações boas".to_string()),
            CardVariant::Success,
        ),
    ]
}
