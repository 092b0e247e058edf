//! Fixtures shared by the unit tests.

use chrono::{Duration, NaiveDateTime};

use crate::parser::deserializers::parse_datetime;
use crate::parser::types::{
    Department, Satisfaction, Ticket, TicketPriority, TicketReason, TicketStatus,
};

pub fn dt(s: &str) -> NaiveDateTime {
    parse_datetime(s).unwrap_or_else(|| panic!("bad fixture datetime {s:?}"))
}

/// A valid ticket `CHAMADO-{n:05}`; terminal statuses get a close date one
/// day after opening and a resolution.
pub fn ticket(n: u32, opened: &str, status: TicketStatus) -> Ticket {
    let opened_at = dt(opened);
    let terminal = status.is_terminal();
    Ticket {
        id: format!("CHAMADO-{:05}", n),
        opened_at,
        closed_at: terminal.then(|| opened_at + Duration::days(1)),
        status,
        priority: TicketPriority::Medium,
        reason: TicketReason::LoginError,
        resolution: terminal.then(|| "Reset de senha e verificação de credenciais".to_string()),
        requester: "Pedro Alves".to_string(),
        agent: "João Silva".to_string(),
        department: Department::It,
        resolution_minutes: 60,
        first_response_minutes: 10,
        satisfaction: Satisfaction::Good,
    }
}

pub fn refs(tickets: &[Ticket]) -> Vec<&Ticket> {
    tickets.iter().collect()
}
