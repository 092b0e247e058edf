pub mod config;
pub mod dashboard;
pub mod import;
pub mod search;
