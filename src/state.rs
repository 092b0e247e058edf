use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::analyzer::pagination::clamp_page;
use crate::analyzer::window::TimeWindow;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::repository::TicketRepository;

/// What the user is currently looking at.
///
/// Any change to the criteria (window, search term, data) sends the table
/// back to page 1; only explicit navigation moves the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSelection {
    window: TimeWindow,
    search_term: String,
    page: usize,
}

impl Default for DashboardSelection {
    fn default() -> Self {
        DashboardSelection {
            window: TimeWindow::All,
            search_term: String::new(),
            page: 1,
        }
    }
}

impl DashboardSelection {
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_window(&mut self, window: TimeWindow) {
        if self.window != window {
            self.window = window;
            self.page = 1;
        }
    }

    pub fn set_search_term(&mut self, term: &str) {
        if self.search_term != term {
            self.search_term = term.to_string();
            self.page = 1;
        }
    }

    /// Called whenever a new repository replaces the current one.
    pub fn reset_for_new_data(&mut self) {
        self.page = 1;
    }

    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.page = clamp_page(page, total_pages);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.page = clamp_page(self.page + 1, total_pages);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}

pub struct AppState {
    pub repository: Mutex<Option<Arc<TicketRepository>>>,
    pub selection: Mutex<DashboardSelection>,
    pub config: Mutex<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        AppState {
            repository: Mutex::new(None),
            selection: Mutex::new(DashboardSelection::default()),
            config: Mutex::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(AppConfig::default())
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, AppError> {
    mutex
        .lock()
        .map_err(|e| AppError::StatePoisoned(format!("{}: {}", what, e)))
}

pub trait StateAccess {
    /// Runs `f` on the current snapshot. The lock is released before `f`
    /// runs, so long computations do not block a concurrent reload.
    fn with_repository<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&TicketRepository) -> Result<T, AppError>;

    fn replace_repository(&self, repository: TicketRepository) -> Result<Arc<TicketRepository>, AppError>;

    fn with_selection<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut DashboardSelection) -> T;

    fn config(&self) -> Result<AppConfig, AppError>;

    fn set_config(&self, config: AppConfig) -> Result<(), AppError>;
}

impl StateAccess for AppState {
    fn with_repository<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&TicketRepository) -> Result<T, AppError>,
    {
        let snapshot = lock(&self.repository, "repository")?
            .clone()
            .ok_or(AppError::NoTicketsLoaded)?;
        f(&snapshot)
    }

    fn replace_repository(&self, repository: TicketRepository) -> Result<Arc<TicketRepository>, AppError> {
        let snapshot = Arc::new(repository);
        *lock(&self.repository, "repository")? = Some(Arc::clone(&snapshot));
        lock(&self.selection, "selection")?.reset_for_new_data();
        Ok(snapshot)
    }

    fn with_selection<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut DashboardSelection) -> T,
    {
        let mut guard = lock(&self.selection, "selection")?;
        Ok(f(&mut guard))
    }

    fn config(&self) -> Result<AppConfig, AppError> {
        Ok(lock(&self.config, "config")?.clone())
    }

    fn set_config(&self, config: AppConfig) -> Result<(), AppError> {
        *lock(&self.config, "config")? = config;
        Ok(())
    }
}
