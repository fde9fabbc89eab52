mod dashboard;
mod db;
mod errors;
mod form;
mod location;
mod models;
mod projection;
mod records;
mod session;

pub use crate::dashboard::DashboardController;
pub use crate::db::{
    get_settings, load_or_default, save, update_settings, MemoryStore, PersistentStore, SqliteStore, SETTINGS_KEY,
};
pub use crate::errors::{AppError, AppResult, ValidationError};
pub use crate::form::{validate, EditBuffer, FormController, FormMode, ValidatedFields};
pub use crate::location::{encode_query, parse_query, QueryLocation, QueryParams, ViewLocation, PAGE_PARAM, SEARCH_PARAM};
pub use crate::models::{
    DashboardSettings, Employee, EmployeeFields, EmployeeId, FormField, PageResponse, Session, ViewState,
};
pub use crate::projection::{count_matches, project, total_pages};
pub use crate::records::{RecordStore, EMPLOYEES_KEY, EMPLOYEES_SEQ_KEY};
pub use crate::session::{AuthGate, SessionManager, StaticCredentials, SESSION_KEY};

use std::path::Path;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PersistentStore>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn dashboard<L: ViewLocation>(&self, location: L) -> AppResult<DashboardController<L>> {
        DashboardController::initialize(self.store.clone(), location, self.sessions.clone())
    }
}

pub fn bootstrap(app_data_dir: &Path) -> AppResult<AppState> {
    std::fs::create_dir_all(app_data_dir)?;
    let store: Arc<dyn PersistentStore> = Arc::new(SqliteStore::new(&app_data_dir.join("state.sqlite"))?);
    let sessions = Arc::new(SessionManager::new(store.clone(), StaticCredentials::default()));
    tracing::info!(data_dir = %app_data_dir.display(), "dashboard state opened");
    Ok(AppState { store, sessions })
}

pub fn init_tracing(app_data_dir: &Path) -> Result<(), String> {
    let log_dir = app_data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "dashboard.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}
