use std::collections::{BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use crate::error::AppError;
use crate::parser::columns::{self, validate_columns, ColumnMap};
use crate::parser::deserializers::{parse_datetime, parse_minutes, parse_opt_text};
use crate::parser::types::{ParseWarning, Ticket, TicketRaw, TicketStatus, UnknownLabel};
use crate::repository::validate_ticket;

/// Output of `parse_csv`: accepted tickets plus import metadata.
#[derive(Debug)]
pub struct ParseOutput {
    pub tickets: Vec<Ticket>,
    pub warnings: Vec<ParseWarning>,
    pub total_rows_processed: usize,
    pub skipped_rows: usize,
    pub detected_columns: Vec<String>,
    pub missing_optional_columns: Vec<String>,
    pub unique_statuses: Vec<String>,
    pub parse_duration_ms: u64,
}

/// Parse a ticket CSV export from `path`.
/// `progress_cb(rows_processed, tickets_accepted)` is called every 500 rows.
pub fn parse_csv(
    path: impl AsRef<Path>,
    delimiter: u8,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let file = std::fs::File::open(path)?;
    parse_csv_reader(std::io::BufReader::new(file), delimiter, progress_cb)
}

/// Core parsing logic, accepts any `Read` source.
pub fn parse_csv_reader<R: Read>(
    reader: R,
    delimiter: u8,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let start = Instant::now();

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    // Phase 1: validate columns
    let headers = rdr.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::EmptyFile);
    }
    let col_map = ColumnMap::from_headers(&headers);
    let col_validation = validate_columns(&col_map)?;

    // Phase 2: type and validate records
    let mut tickets: Vec<Ticket> = Vec::new();
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut skipped = 0usize;
    let mut row_idx = 0usize;

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut statuses: BTreeSet<TicketStatus> = BTreeSet::new();

    for result in rdr.records() {
        row_idx += 1;
        if row_idx % 500 == 0 {
            progress_cb(row_idx, tickets.len());
        }

        let line = row_idx + 1; // +1 for the header row
        let outcome = result
            .map_err(|err| err.to_string())
            .and_then(|record| normalize_ticket(&record_to_raw(&col_map, &record)))
            .and_then(|ticket| {
                if seen_ids.insert(ticket.id.clone()) {
                    Ok(ticket)
                } else {
                    Err(format!("duplicate identifier {}", ticket.id))
                }
            });

        match outcome {
            Ok(ticket) => {
                statuses.insert(ticket.status);
                tickets.push(ticket);
            }
            Err(message) => {
                log::warn!("Skipping CSV line {}: {}", line, message);
                warnings.push(ParseWarning { line, message });
                skipped += 1;
            }
        }
    }

    if row_idx == 0 {
        return Err(AppError::EmptyFile);
    }

    Ok(ParseOutput {
        tickets,
        warnings,
        total_rows_processed: row_idx,
        skipped_rows: skipped,
        detected_columns: col_validation.present,
        missing_optional_columns: col_validation.missing_optional,
        unique_statuses: statuses.iter().map(|s| s.label().to_string()).collect(),
        parse_duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Parse a JSON array of tickets. Unlike the CSV path this is all-or-nothing:
/// one malformed record fails the whole document.
pub fn parse_json_reader<R: Read>(reader: R) -> Result<Vec<Ticket>, AppError> {
    let tickets: Vec<Ticket> = serde_json::from_reader(reader)?;
    Ok(tickets)
}

pub fn parse_json(path: impl AsRef<Path>) -> Result<Vec<Ticket>, AppError> {
    let file = std::fs::File::open(path)?;
    parse_json_reader(std::io::BufReader::new(file))
}

fn record_to_raw(col_map: &ColumnMap, record: &csv::StringRecord) -> TicketRaw {
    let cell = |col: &str| col_map.get(record, col).map(str::to_string);
    TicketRaw {
        id: cell(columns::COL_ID),
        opened_at: cell(columns::COL_OPENED),
        closed_at: cell(columns::COL_CLOSED),
        status: cell(columns::COL_STATUS),
        priority: cell(columns::COL_PRIORITY),
        reason: cell(columns::COL_REASON),
        resolution: cell(columns::COL_RESOLUTION),
        requester: cell(columns::COL_REQUESTER),
        agent: cell(columns::COL_AGENT),
        department: cell(columns::COL_DEPARTMENT),
        resolution_minutes: cell(columns::COL_TMA),
        first_response_minutes: cell(columns::COL_FRT),
        satisfaction: cell(columns::COL_SATISFACTION),
    }
}

fn required<'a>(value: &'a Option<String>, what: &str) -> Result<&'a str, String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("missing {}", what)),
    }
}

fn label<T>(value: &Option<String>, what: &str) -> Result<T, String>
where
    T: FromStr<Err = UnknownLabel>,
{
    required(value, what)?.parse().map_err(|e: UnknownLabel| e.to_string())
}

fn normalize_ticket(raw: &TicketRaw) -> Result<Ticket, String> {
    let id = required(&raw.id, "identifier")?.to_string();

    let opened_str = required(&raw.opened_at, "open date")?;
    let opened_at =
        parse_datetime(opened_str).ok_or_else(|| format!("invalid open date: {:?}", opened_str))?;

    let closed_at = match raw.closed_at.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(parse_datetime(s).ok_or_else(|| format!("invalid close date: {:?}", s))?),
    };

    let status = label(&raw.status, "status")?;
    let priority = label(&raw.priority, "priority")?;
    let reason = label(&raw.reason, "reason")?;
    let department = label(&raw.department, "department")?;
    let satisfaction = label(&raw.satisfaction, "satisfaction")?;

    let tma_str = required(&raw.resolution_minutes, "TMA")?;
    let resolution_minutes =
        parse_minutes(tma_str).ok_or_else(|| format!("invalid TMA: {:?}", tma_str))?;
    let frt_str = required(&raw.first_response_minutes, "FRT")?;
    let first_response_minutes =
        parse_minutes(frt_str).ok_or_else(|| format!("invalid FRT: {:?}", frt_str))?;

    let ticket = Ticket {
        id,
        opened_at,
        closed_at,
        status,
        priority,
        reason,
        resolution: raw.resolution.as_deref().and_then(parse_opt_text),
        requester: required(&raw.requester, "requester")?.to_string(),
        agent: required(&raw.agent, "assigned agent")?.to_string(),
        department,
        resolution_minutes,
        first_response_minutes,
        satisfaction,
    };

    validate_ticket(&ticket)?;
    Ok(ticket)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
