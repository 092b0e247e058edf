use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::AppError;
use crate::parser::types::Ticket;

static TICKET_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^CHAMADO-\d{5,}$").expect("ticket id regex is valid")
});

/// Checks the per-record invariants of a ticket. Returns a human-readable
/// reason on the first violation.
pub fn validate_ticket(ticket: &Ticket) -> Result<(), String> {
    if !TICKET_ID_REGEX.is_match(&ticket.id) {
        return Err(format!("identifier {:?} does not match CHAMADO-#####", ticket.id));
    }
    if ticket.requester.trim().is_empty() {
        return Err("requester is empty".to_string());
    }
    if ticket.agent.trim().is_empty() {
        return Err("assigned agent is empty".to_string());
    }

    let terminal = ticket.status.is_terminal();
    match (terminal, ticket.closed_at) {
        (true, None) => {
            return Err(format!("status {} requires a close date", ticket.status));
        }
        (false, Some(_)) => {
            return Err(format!("status {} must not have a close date", ticket.status));
        }
        (true, Some(closed)) if closed < ticket.opened_at => {
            return Err(format!(
                "close date {} is before open date {}",
                closed, ticket.opened_at
            ));
        }
        _ => {}
    }

    let has_resolution = ticket
        .resolution
        .as_deref()
        .is_some_and(|r| !r.trim().is_empty());
    if terminal && !has_resolution {
        return Err(format!("status {} requires a resolution", ticket.status));
    }
    if !terminal && ticket.resolution.is_some() {
        return Err(format!("status {} must not have a resolution", ticket.status));
    }

    Ok(())
}

/// Immutable, validated ticket snapshot ordered by opening date, newest first.
#[derive(Debug, Clone, Default)]
pub struct TicketRepository {
    tickets: Vec<Ticket>,
}

impl TicketRepository {
    /// Validates every ticket and identifier uniqueness, then sorts by
    /// `opened_at` descending. Ties keep their input order.
    pub fn new(mut tickets: Vec<Ticket>) -> Result<Self, AppError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(tickets.len());
        for ticket in &tickets {
            validate_ticket(ticket).map_err(|reason| AppError::InvalidTicket {
                id: ticket.id.clone(),
                reason,
            })?;
            if !seen.insert(ticket.id.as_str()) {
                return Err(AppError::DuplicateTicketId(ticket.id.clone()));
            }
        }

        tickets.sort_by(|a, b| b.opened_at.cmp(&a.opened_at));
        Ok(TicketRepository { tickets })
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// (oldest, newest) opening dates, None when empty.
    pub fn date_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let newest = self.tickets.first()?.opened_at;
        let oldest = self.tickets.last()?.opened_at;
        Some((oldest, newest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::types::TicketStatus;
    use crate::testing::{dt, ticket};

    #[test]
    fn test_sorted_newest_first() {
        let repo = TicketRepository::new(vec![
            ticket(1, "2024-01-05 10:00", TicketStatus::Open),
            ticket(2, "2024-02-01 09:00", TicketStatus::Open),
            ticket(3, "2024-01-10 08:00", TicketStatus::Open),
        ])
        .unwrap();
        let ids: Vec<&str> = repo.tickets().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["CHAMADO-00002", "CHAMADO-00003", "CHAMADO-00001"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let repo = TicketRepository::new(vec![
            ticket(7, "2024-01-05 10:00", TicketStatus::Open),
            ticket(3, "2024-01-05 10:00", TicketStatus::Pending),
        ])
        .unwrap();
        assert_eq!(repo.tickets()[0].id, "CHAMADO-00007");
        assert_eq!(repo.tickets()[1].id, "CHAMADO-00003");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = TicketRepository::new(vec![
            ticket(1, "2024-01-05 10:00", TicketStatus::Open),
            ticket(1, "2024-01-06 10:00", TicketStatus::Open),
        ])
        .unwrap_err();
        assert!(matches!(err, AppError::DuplicateTicketId(id) if id == "CHAMADO-00001"));
    }

    #[test]
    fn test_invalid_ticket_rejected() {
        let mut bad = ticket(1, "2024-01-05 10:00", TicketStatus::Open);
        bad.closed_at = Some(dt("2024-01-06 10:00"));
        let err = TicketRepository::new(vec![bad]).unwrap_err();
        match err {
            AppError::InvalidTicket { id, reason } => {
                assert_eq!(id, "CHAMADO-00001");
                assert!(reason.contains("must not have a close date"), "{reason}");
            }
            e => panic!("Expected InvalidTicket, got {:?}", e),
        }
    }

    #[test]
    fn test_validate_close_before_open() {
        let mut t = ticket(1, "2024-01-05 10:00", TicketStatus::Closed);
        t.closed_at = Some(dt("2024-01-04 10:00"));
        assert!(validate_ticket(&t).unwrap_err().contains("before open date"));
    }

    #[test]
    fn test_validate_terminal_requires_resolution() {
        let mut t = ticket(1, "2024-01-05 10:00", TicketStatus::Resolved);
        t.resolution = None;
        assert!(validate_ticket(&t).is_err());
        t.resolution = Some("   ".into());
        assert!(validate_ticket(&t).is_err());
    }

    #[test]
    fn test_validate_open_rejects_resolution() {
        let mut t = ticket(1, "2024-01-05 10:00", TicketStatus::Pending);
        t.resolution = Some("Reset de senha".into());
        assert!(validate_ticket(&t).is_err());
    }

    #[test]
    fn test_validate_identifier_format() {
        let mut t = ticket(1, "2024-01-05 10:00", TicketStatus::Open);
        assert!(validate_ticket(&t).is_ok());
        t.id = "TICKET-1".into();
        assert!(validate_ticket(&t).is_err());
        t.id = "CHAMADO-123456".into();
        assert!(validate_ticket(&t).is_ok());
    }

    #[test]
    fn test_get_and_date_range() {
        let repo = TicketRepository::new(vec![
            ticket(1, "2024-01-05 10:00", TicketStatus::Open),
            ticket(2, "2024-03-01 09:00", TicketStatus::Closed),
        ])
        .unwrap();
        assert_eq!(repo.len(), 2);
        assert!(repo.get("CHAMADO-00002").is_some());
        assert!(repo.get("CHAMADO-00009").is_none());
        assert_eq!(
            repo.date_range(),
            Some((dt("2024-01-05 10:00"), dt("2024-03-01 09:00")))
        );
    }

    #[test]
    fn test_empty_repository() {
        let repo = TicketRepository::new(Vec::new()).unwrap();
        assert!(repo.is_empty());
        assert!(repo.date_range().is_none());
    }
}
