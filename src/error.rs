use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Empty file or no data rows")]
    EmptyFile,

    #[error("Invalid ticket {id}: {reason}")]
    InvalidTicket { id: String, reason: String },

    #[error("Duplicate ticket identifier: {0}")]
    DuplicateTicketId(String),

    #[error("Unknown time window: {0:?} (expected all, week, month or quarter)")]
    InvalidWindow(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No tickets loaded")]
    NoTicketsLoaded,

    #[error("State lock poisoned: {0}")]
    StatePoisoned(String),

    #[error("{0}")]
    Custom(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
