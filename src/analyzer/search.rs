use crate::parser::types::Ticket;

/// True when `needle` (already lowercased) occurs in the id, requester or agent.
fn matches(ticket: &Ticket, needle: &str) -> bool {
    [&ticket.id, &ticket.requester, &ticket.agent]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Case-insensitive substring search over id, requester and agent.
///
/// An empty term matches every ticket. The term is not trimmed, so a lone
/// space only matches fields containing a space. Input order is preserved.
pub fn search<'a>(tickets: &[&'a Ticket], term: &str) -> Vec<&'a Ticket> {
    if term.is_empty() {
        return tickets.to_vec();
    }
    let needle = term.to_lowercase();
    tickets
        .iter()
        .copied()
        .filter(|t| matches(t, &needle))
        .collect()
}
