use crate::db::{get_settings, PersistentStore};
use crate::errors::{AppError, AppResult};
use crate::form::{EditBuffer, FormController};
use crate::location::ViewLocation;
use crate::models::{DashboardSettings, Employee, EmployeeId, FormField, PageResponse, ViewState};
use crate::projection::{count_matches, project, total_pages};
use crate::records::RecordStore;
use crate::session::AuthGate;
use std::sync::Arc;

pub struct DashboardController<L: ViewLocation> {
    records: RecordStore,
    form: FormController,
    location: L,
    auth: Arc<dyn AuthGate>,
    settings: DashboardSettings,
    view: ViewState,
}

impl<L: ViewLocation> DashboardController<L> {
    pub fn initialize(store: Arc<dyn PersistentStore>, location: L, auth: Arc<dyn AuthGate>) -> AppResult<Self> {
        if !auth.is_authorized() {
            return Err(unauthorized());
        }

        let settings = get_settings(store.as_ref())?;
        let records = RecordStore::initialize(store)?;
        let view = ViewState::from_query(&location.read());

        let mut this = Self {
            records,
            form: FormController::new(),
            location,
            auth,
            settings,
            view,
        };
        this.view.page = this.view.page.min(this.total_pages());
        this.publish();
        Ok(this)
    }

    pub fn employees(&self) -> AppResult<&[Employee]> {
        self.ensure_authorized()?;
        Ok(self.records.employees())
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn current_page(&self) -> AppResult<PageResponse> {
        self.ensure_authorized()?;
        Ok(project(
            self.records.employees(),
            &self.view.search_term,
            self.view.page,
            self.settings.page_size,
        ))
    }

    pub fn set_search_term(&mut self, search_term: impl Into<String>) -> AppResult<()> {
        self.ensure_authorized()?;
        let search_term = search_term.into();
        if search_term == self.view.search_term {
            return Ok(());
        }

        self.view.search_term = search_term;
        if self.settings.reset_page_on_search {
            self.view.page = 1;
        } else {
            self.view.page = self.view.page.min(self.total_pages());
        }
        self.publish();
        Ok(())
    }

    // Out-of-range requests are ignored; returns whether the page moved.
    pub fn handle_page_change(&mut self, requested: usize) -> AppResult<bool> {
        self.ensure_authorized()?;
        let total_pages = self.total_pages();
        if requested < 1 || requested > total_pages {
            tracing::debug!(requested, total_pages, "page change ignored");
            return Ok(false);
        }
        if requested == self.view.page {
            return Ok(false);
        }

        self.view.page = requested;
        self.publish();
        Ok(true)
    }

    pub fn next_page(&mut self) -> AppResult<bool> {
        self.handle_page_change(self.view.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> AppResult<bool> {
        self.handle_page_change(self.view.page.saturating_sub(1))
    }

    pub fn dialog(&self) -> Option<&EditBuffer> {
        self.form.buffer()
    }

    pub fn open_add_dialog(&mut self) -> AppResult<&EditBuffer> {
        self.ensure_authorized()?;
        Ok(self.form.open_for_create())
    }

    pub fn open_edit_dialog(&mut self, id: &EmployeeId) -> AppResult<&EditBuffer> {
        self.ensure_authorized()?;
        let Some(employee) = self.records.get(id) else {
            return Err(AppError::NotFound(format!("No employee with id {}", id)));
        };
        Ok(self.form.open_for_edit(employee))
    }

    pub fn update_form_field(&mut self, field: FormField, value: impl Into<String>) -> AppResult<&EditBuffer> {
        self.ensure_authorized()?;
        self.form.update_field(field, value)
    }

    pub fn submit_form(&mut self) -> AppResult<Employee> {
        self.ensure_authorized()?;
        let result = self.form.commit(&mut self.records);
        self.clamp_page();
        result
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    pub fn delete_employee(&mut self, id: &EmployeeId) -> AppResult<()> {
        self.ensure_authorized()?;
        let result = self.records.delete(id);
        self.clamp_page();
        result.map(|_| ())
    }

    fn ensure_authorized(&self) -> AppResult<()> {
        if self.auth.is_authorized() {
            Ok(())
        } else {
            Err(unauthorized())
        }
    }

    fn total_pages(&self) -> usize {
        let matches = count_matches(self.records.employees(), &self.view.search_term);
        total_pages(matches, self.settings.page_size)
    }

    // Runs after every collection change, including failed writes, since the
    // in-memory collection is not rolled back.
    fn clamp_page(&mut self) {
        let total_pages = self.total_pages();
        if self.view.page > total_pages {
            self.view.page = total_pages;
            self.publish();
        }
    }

    fn publish(&mut self) {
        let params = self.view.to_query();
        tracing::debug!(search = %self.view.search_term, page = self.view.page, "location replaced");
        self.location.replace(params);
    }
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("Sign in to manage employees".to_string())
}
