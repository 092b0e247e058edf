use chrono::NaiveDateTime;
use serde::Serialize;

use crate::analyzer::pagination::{page_window, paginate, total_pages, TicketPage};
use crate::analyzer::search::search;
use crate::analyzer::window::{filter_by_window, TimeWindow};
use crate::error::AppError;
use crate::parser::types::Ticket;
use crate::state::{AppState, StateAccess};

/// One rendered state of the ticket table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTable {
    pub page: TicketPage<Ticket>,
    /// Clickable page strip.
    pub page_numbers: Vec<usize>,
    pub search_term: String,
    pub window: TimeWindow,
}

/// Searches the window-filtered snapshot and returns one page of results.
///
/// A term different from the previous one resets the table to page 1, and
/// `page` (when given) is then applied and clamped. Without `page` the
/// current page is kept.
pub fn search_tickets(
    state: &AppState,
    term: &str,
    page: Option<usize>,
    now: NaiveDateTime,
) -> Result<TicketTable, AppError> {
    let config = state.config()?;

    state.with_repository(|repo| {
        let window = state.with_selection(|sel| {
            sel.set_search_term(term);
            sel.window()
        })?;

        let filtered = filter_by_window(repo.tickets(), window, now);
        let matches = search(&filtered, term);
        let pages = total_pages(matches.len(), config.page_size);

        let current = state.with_selection(|sel| {
            match page {
                Some(p) => sel.go_to_page(p, pages),
                None => sel.go_to_page(sel.page(), pages),
            }
            sel.page()
        })?;

        let page = paginate(&matches, current, config.page_size);
        let page = TicketPage {
            items: page.items.into_iter().cloned().collect(),
            page: page.page,
            total_pages: page.total_pages,
            total_count: page.total_count,
            page_size: page.page_size,
            first_item: page.first_item,
            last_item: page.last_item,
            has_previous: page.has_previous,
            has_next: page.has_next,
        };

        log::debug!(
            "Search {:?} in window {}: {} matches, page {}/{}",
            term,
            window,
            page.total_count,
            page.page,
            page.total_pages
        );

        Ok(TicketTable {
            page_numbers: page_window(page.page, page.total_pages, config.page_window),
            page,
            search_term: term.to_string(),
            window,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::dashboard::set_time_window;
    use crate::commands::import::load_tickets;
    use crate::parser::types::TicketStatus;
    use crate::testing::{dt, ticket};

    /// 25 tickets, one per day of January 2024; agents alternate.
    fn loaded_state() -> AppState {
        let tickets = (1..=25)
            .map(|n| {
                let mut t = ticket(n, &format!("2024-01-{:02} 09:00", n), TicketStatus::Open);
                t.agent = if n % 2 == 0 { "Rosa Brito" } else { "João Silva" }.to_string();
                t
            })
            .collect();
        let state = AppState::default();
        load_tickets(&state, tickets).unwrap();
        state
    }

    #[test]
    fn test_first_page_newest_first() {
        let state = loaded_state();
        let table = search_tickets(&state, "", None, dt("2024-02-01")).unwrap();
        assert_eq!(table.page.total_count, 25);
        assert_eq!(table.page.total_pages, 3);
        assert_eq!(table.page.items.len(), 10);
        assert_eq!(table.page.items[0].id, "CHAMADO-00025");
        assert_eq!(table.page_numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_page_is_clamped_and_remembered() {
        let state = loaded_state();
        let now = dt("2024-02-01");
        let table = search_tickets(&state, "", Some(9), now).unwrap();
        assert_eq!(table.page.page, 3);
        assert_eq!(table.page.items.len(), 5);
        assert_eq!((table.page.first_item, table.page.last_item), (21, 25));

        let again = search_tickets(&state, "", None, now).unwrap();
        assert_eq!(again.page.page, 3);
    }

    #[test]
    fn test_new_term_resets_page() {
        let state = loaded_state();
        let now = dt("2024-02-01");
        search_tickets(&state, "", Some(2), now).unwrap();

        let table = search_tickets(&state, "rosa", None, now).unwrap();
        assert_eq!(table.page.page, 1);
        assert_eq!(table.page.total_count, 12);
        assert!(table.page.items.iter().all(|t| t.agent == "Rosa Brito"));
        assert_eq!(table.search_term, "rosa");
    }

    #[test]
    fn test_window_change_resets_page() {
        let state = loaded_state();
        let now = dt("2024-01-26 00:00");
        search_tickets(&state, "", Some(3), now).unwrap();

        set_time_window(&state, "week").unwrap();
        let table = search_tickets(&state, "", None, now).unwrap();
        assert_eq!(table.window, TimeWindow::Week);
        assert_eq!(table.page.page, 1);
        // 2024-01-19 00:00 onwards
        assert_eq!(table.page.total_count, 7);
    }

    #[test]
    fn test_no_match_gives_single_empty_page() {
        let state = loaded_state();
        let table = search_tickets(&state, "inexistente", Some(4), dt("2024-02-01")).unwrap();
        assert_eq!(table.page.page, 1);
        assert_eq!(table.page.total_pages, 1);
        assert!(table.page.items.is_empty());
        assert_eq!(table.page_numbers, vec![1]);
    }

    #[test]
    fn test_no_tickets_loaded() {
        let state = AppState::default();
        assert!(matches!(
            search_tickets(&state, "", None, dt("2024-02-01")),
            Err(AppError::NoTicketsLoaded)
        ));
    }
}
