use std::collections::HashMap;

use crate::error::AppError;

pub const COL_ID: &str = "ID";
pub const COL_OPENED: &str = "Data de Abertura";
pub const COL_CLOSED: &str = "Data de Fechamento";
pub const COL_STATUS: &str = "Status";
pub const COL_PRIORITY: &str = "Prioridade";
pub const COL_REASON: &str = "Motivo";
pub const COL_RESOLUTION: &str = "Solução";
pub const COL_REQUESTER: &str = "Solicitante";
pub const COL_AGENT: &str = "Agente Responsável";
pub const COL_DEPARTMENT: &str = "Departamento";
pub const COL_TMA: &str = "TMA";
pub const COL_FRT: &str = "FRT";
pub const COL_SATISFACTION: &str = "Satisfação";

/// Required columns: the import fails if any of them is absent.
const REQUIRED: &[&str] = &[
    COL_ID,
    COL_OPENED,
    COL_STATUS,
    COL_PRIORITY,
    COL_REASON,
    COL_REQUESTER,
    COL_AGENT,
    COL_DEPARTMENT,
    COL_TMA,
    COL_FRT,
    COL_SATISFACTION,
];

/// Optional columns: only open tickets can be exported without them.
const OPTIONAL: &[&str] = &[COL_CLOSED, COL_RESOLUTION];

fn header_key(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Maps column names (case-insensitive) to their index in a CSV record.
pub struct ColumnMap {
    indices: HashMap<String, usize>,
    headers: Vec<String>,
}

impl ColumnMap {
    /// Header fields are trimmed; a leading UTF-8 BOM is dropped.
    pub fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut indices = HashMap::new();
        let mut header_list = Vec::new();
        for (i, field) in headers.iter().enumerate() {
            let name = field.trim_start_matches('\u{feff}').trim().to_string();
            // First occurrence wins for duplicated headers.
            indices.entry(header_key(&name)).or_insert(i);
            header_list.push(name);
        }
        ColumnMap {
            indices,
            headers: header_list,
        }
    }

    pub fn get<'a>(&self, record: &'a csv::StringRecord, col: &str) -> Option<&'a str> {
        self.indices
            .get(&header_key(col))
            .and_then(|&i| record.get(i))
    }

    pub fn has(&self, col: &str) -> bool {
        self.indices.contains_key(&header_key(col))
    }

    pub fn all_headers(&self) -> &[String] {
        &self.headers
    }
}

#[derive(Debug)]
pub struct ColumnValidation {
    /// All column names present in the CSV.
    pub present: Vec<String>,
    /// Optional columns that are absent from the CSV.
    pub missing_optional: Vec<String>,
}

/// Returns `AppError::MissingColumns` listing every absent required column.
pub fn validate_columns(col_map: &ColumnMap) -> Result<ColumnValidation, AppError> {
    let missing_required: Vec<String> = REQUIRED
        .iter()
        .filter(|&&c| !col_map.has(c))
        .map(|c| c.to_string())
        .collect();

    if !missing_required.is_empty() {
        return Err(AppError::MissingColumns(missing_required));
    }

    let missing_optional = OPTIONAL
        .iter()
        .filter(|&&c| !col_map.has(c))
        .map(|c| c.to_string())
        .collect();

    Ok(ColumnValidation {
        present: col_map.all_headers().to_vec(),
        missing_optional,
    })
}
