pub mod columns;
pub mod deserializers;
pub mod pipeline;
pub mod types;

pub use pipeline::{parse_csv, parse_csv_reader, parse_json, parse_json_reader, ParseOutput};
pub use types::{
    Department, ParseWarning, Satisfaction, Ticket, TicketPriority, TicketReason, TicketStatus,
};
