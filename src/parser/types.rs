use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::deserializers::de;

/// Lowercased alphanumerics only: "Em Andamento", "em_andamento" and
/// "EmAndamento" all compare equal.
fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Matches `s` against both the source label and the English variant name.
fn parse_variant<T: Copy>(
    s: &str,
    all: &[T],
    label: fn(&T) -> &'static str,
    name: fn(&T) -> &'static str,
) -> Option<T> {
    let key = normalize_key(s);
    if key.is_empty() {
        return None;
    }
    all.iter()
        .copied()
        .find(|v| normalize_key(label(v)) == key || normalize_key(name(v)) == key)
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TicketStatus {
    #[serde(rename = "Aberto", alias = "Open")]
    Open,
    #[serde(rename = "Pendente", alias = "Pending")]
    Pending,
    #[serde(rename = "Em Andamento", alias = "InProgress")]
    InProgress,
    #[serde(rename = "Resolvido", alias = "Resolved")]
    Resolved,
    #[serde(rename = "Fechado", alias = "Closed")]
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 5] = [
        TicketStatus::Open,
        TicketStatus::Pending,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Aberto",
            TicketStatus::Pending => "Pendente",
            TicketStatus::InProgress => "Em Andamento",
            TicketStatus::Resolved => "Resolvido",
            TicketStatus::Closed => "Fechado",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::Pending => "Pending",
            TicketStatus::InProgress => "InProgress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }

    /// Resolved and Closed tickets carry a close date and a resolution.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}

// ─── Priority ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TicketPriority {
    #[serde(rename = "Baixa", alias = "Low")]
    Low,
    #[serde(rename = "Média", alias = "Medium")]
    Medium,
    #[serde(rename = "Alta", alias = "High")]
    High,
    #[serde(rename = "Urgente", alias = "Urgent")]
    Urgent,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
        TicketPriority::Urgent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TicketPriority::Low => "Baixa",
            TicketPriority::Medium => "Média",
            TicketPriority::High => "Alta",
            TicketPriority::Urgent => "Urgente",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
            TicketPriority::Urgent => "Urgent",
        }
    }
}

// ─── Reason ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TicketReason {
    #[serde(rename = "Acesso Negado", alias = "AccessDenied")]
    AccessDenied,
    #[serde(rename = "Falha de Software", alias = "SoftwareFailure")]
    SoftwareFailure,
    #[serde(rename = "Hardware Defeituoso", alias = "DefectiveHardware")]
    DefectiveHardware,
    #[serde(rename = "Problema de Conexão com a Internet", alias = "InternetConnection")]
    InternetConnection,
    #[serde(rename = "Impressora Não Funciona", alias = "PrinterNotWorking")]
    PrinterNotWorking,
    #[serde(rename = "Erro de Login", alias = "LoginError")]
    LoginError,
    #[serde(rename = "Lentidão do Sistema", alias = "SlowSystem")]
    SlowSystem,
    #[serde(rename = "Instalação de Software", alias = "SoftwareInstallation")]
    SoftwareInstallation,
    #[serde(rename = "Configuração de E-mail", alias = "EmailConfiguration")]
    EmailConfiguration,
    #[serde(rename = "Backup de Dados", alias = "DataBackup")]
    DataBackup,
}

impl TicketReason {
    pub const ALL: [TicketReason; 10] = [
        TicketReason::AccessDenied,
        TicketReason::SoftwareFailure,
        TicketReason::DefectiveHardware,
        TicketReason::InternetConnection,
        TicketReason::PrinterNotWorking,
        TicketReason::LoginError,
        TicketReason::SlowSystem,
        TicketReason::SoftwareInstallation,
        TicketReason::EmailConfiguration,
        TicketReason::DataBackup,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TicketReason::AccessDenied => "Acesso Negado",
            TicketReason::SoftwareFailure => "Falha de Software",
            TicketReason::DefectiveHardware => "Hardware Defeituoso",
            TicketReason::InternetConnection => "Problema de Conexão com a Internet",
            TicketReason::PrinterNotWorking => "Impressora Não Funciona",
            TicketReason::LoginError => "Erro de Login",
            TicketReason::SlowSystem => "Lentidão do Sistema",
            TicketReason::SoftwareInstallation => "Instalação de Software",
            TicketReason::EmailConfiguration => "Configuração de E-mail",
            TicketReason::DataBackup => "Backup de Dados",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TicketReason::AccessDenied => "AccessDenied",
            TicketReason::SoftwareFailure => "SoftwareFailure",
            TicketReason::DefectiveHardware => "DefectiveHardware",
            TicketReason::InternetConnection => "InternetConnection",
            TicketReason::PrinterNotWorking => "PrinterNotWorking",
            TicketReason::LoginError => "LoginError",
            TicketReason::SlowSystem => "SlowSystem",
            TicketReason::SoftwareInstallation => "SoftwareInstallation",
            TicketReason::EmailConfiguration => "EmailConfiguration",
            TicketReason::DataBackup => "DataBackup",
        }
    }
}

// ─── Department ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Vendas", alias = "Sales")]
    Sales,
    #[serde(rename = "Marketing")]
    Marketing,
    #[serde(rename = "Financeiro", alias = "Finance")]
    Finance,
    #[serde(rename = "Produção", alias = "Production")]
    Production,
    #[serde(rename = "Recursos Humanos", alias = "HumanResources")]
    HumanResources,
    #[serde(rename = "TI", alias = "IT")]
    It,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Sales,
        Department::Marketing,
        Department::Finance,
        Department::Production,
        Department::HumanResources,
        Department::It,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Department::Sales => "Vendas",
            Department::Marketing => "Marketing",
            Department::Finance => "Financeiro",
            Department::Production => "Produção",
            Department::HumanResources => "Recursos Humanos",
            Department::It => "TI",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Department::Sales => "Sales",
            Department::Marketing => "Marketing",
            Department::Finance => "Finance",
            Department::Production => "Production",
            Department::HumanResources => "HumanResources",
            Department::It => "IT",
        }
    }
}

// ─── Satisfaction ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Satisfaction {
    #[serde(rename = "Regular", alias = "Poor")]
    Poor,
    #[serde(rename = "Médio", alias = "Medium")]
    Medium,
    #[serde(rename = "Bom", alias = "Good")]
    Good,
}

impl Satisfaction {
    pub const ALL: [Satisfaction; 3] = [Satisfaction::Poor, Satisfaction::Medium, Satisfaction::Good];

    pub fn label(&self) -> &'static str {
        match self {
            Satisfaction::Poor => "Regular",
            Satisfaction::Medium => "Médio",
            Satisfaction::Good => "Bom",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Satisfaction::Poor => "Poor",
            Satisfaction::Medium => "Medium",
            Satisfaction::Good => "Good",
        }
    }
}

// ─── Shared trait impls ──────────────────────────────────────────────────────

/// Error returned when a label matches no variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownLabel {}

macro_rules! label_enum_impls {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_variant(s, &<$ty>::ALL, <$ty>::label, <$ty>::name).ok_or_else(|| {
                    UnknownLabel {
                        kind: $kind,
                        value: s.trim().to_string(),
                    }
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

label_enum_impls!(TicketStatus, "status");
label_enum_impls!(TicketPriority, "priority");
label_enum_impls!(TicketReason, "reason");
label_enum_impls!(Department, "department");
label_enum_impls!(Satisfaction, "satisfaction");

// ─── Ticket records ──────────────────────────────────────────────────────────

/// One row of a ticket export, before typing. Every cell is optional so that
/// row-level problems can be reported instead of aborting the import.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketRaw {
    pub id: Option<String>,
    pub opened_at: Option<String>,
    pub closed_at: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub reason: Option<String>,
    pub resolution: Option<String>,
    pub requester: Option<String>,
    pub agent: Option<String>,
    pub department: Option<String>,
    pub resolution_minutes: Option<String>,
    pub first_response_minutes: Option<String>,
    pub satisfaction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    #[serde(deserialize_with = "de::flexible_datetime")]
    pub opened_at: NaiveDateTime,
    #[serde(
        default,
        deserialize_with = "de::flexible_datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub closed_at: Option<NaiveDateTime>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub reason: TicketReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    pub requester: String,
    pub agent: String,
    pub department: Department,
    /// TMA, in minutes.
    pub resolution_minutes: u32,
    /// FRT, in minutes.
    pub first_response_minutes: u32,
    pub satisfaction: Satisfaction,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}
