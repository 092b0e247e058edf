use std::path::Path;
use std::time::Instant;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::AppError;
use crate::parser::types::{ParseWarning, Ticket};
use crate::parser::ParseOutput;
use crate::repository::TicketRepository;
use crate::state::{AppState, StateAccess};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub total_tickets: usize,
    /// Tickets in a non-terminal status (open, pending, in progress).
    pub active_count: usize,
    /// Resolved or closed tickets.
    pub finished_count: usize,
    pub skipped_rows: usize,
    pub warnings: Vec<ParseWarning>,
    pub detected_columns: Vec<String>,
    pub missing_optional_columns: Vec<String>,
    pub unique_statuses: Vec<String>,
    pub date_range_from: Option<NaiveDateTime>,
    pub date_range_to: Option<NaiveDateTime>,
    pub parse_duration_ms: u64,
}

impl ImportResult {
    fn new(repository: &TicketRepository, parse_duration_ms: u64) -> Self {
        let finished_count = repository
            .tickets()
            .iter()
            .filter(|t| t.status.is_terminal())
            .count();
        let (date_range_from, date_range_to) = repository.date_range().unzip();

        let mut statuses: Vec<_> = repository.tickets().iter().map(|t| t.status).collect();
        statuses.sort();
        statuses.dedup();

        ImportResult {
            total_tickets: repository.len(),
            active_count: repository.len() - finished_count,
            finished_count,
            skipped_rows: 0,
            warnings: Vec::new(),
            detected_columns: Vec::new(),
            missing_optional_columns: Vec::new(),
            unique_statuses: statuses.iter().map(|s| s.label().to_string()).collect(),
            date_range_from,
            date_range_to,
            parse_duration_ms,
        }
    }

    fn with_parse_output(mut self, output: ParseOutput) -> Self {
        self.skipped_rows = output.skipped_rows;
        self.warnings = output.warnings;
        self.detected_columns = output.detected_columns;
        self.missing_optional_columns = output.missing_optional_columns;
        self.unique_statuses = output.unique_statuses;
        self
    }
}

/// Imports a `;`-delimited ticket export and makes it the current snapshot.
/// Malformed rows are skipped and reported in `warnings`.
pub fn import_csv(state: &AppState, path: impl AsRef<Path>) -> Result<ImportResult, AppError> {
    let path = path.as_ref();
    let config = state.config()?;

    let mut output = crate::parser::parse_csv(path, config.delimiter_byte(), |rows, accepted| {
        log::debug!("Parsing {}: {} rows read, {} accepted", path.display(), rows, accepted);
    })?;

    let tickets = std::mem::take(&mut output.tickets);
    let parse_duration_ms = output.parse_duration_ms;
    let repository = state.replace_repository(TicketRepository::new(tickets)?)?;
    let result = ImportResult::new(&repository, parse_duration_ms).with_parse_output(output);

    log::info!(
        "Imported {} tickets from {} ({} rows skipped) in {} ms",
        result.total_tickets,
        path.display(),
        result.skipped_rows,
        result.parse_duration_ms
    );
    Ok(result)
}

/// Imports a JSON array of tickets. Any invalid record rejects the whole file.
pub fn import_json(state: &AppState, path: impl AsRef<Path>) -> Result<ImportResult, AppError> {
    let path = path.as_ref();
    let start = Instant::now();
    let tickets = crate::parser::parse_json(path)?;
    let repository = state.replace_repository(TicketRepository::new(tickets)?)?;
    let result = ImportResult::new(&repository, start.elapsed().as_millis() as u64);

    log::info!("Imported {} tickets from {}", result.total_tickets, path.display());
    Ok(result)
}

/// Replaces the current snapshot with tickets supplied by the caller.
pub fn load_tickets(state: &AppState, tickets: Vec<Ticket>) -> Result<ImportResult, AppError> {
    let repository = state.replace_repository(TicketRepository::new(tickets)?)?;
    let result = ImportResult::new(&repository, 0);
    log::info!("Loaded {} tickets", result.total_tickets);
    Ok(result)
}
