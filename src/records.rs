use crate::db::{load_or_default, save, PersistentStore};
use crate::errors::{AppError, AppResult};
use crate::form::ValidatedFields;
use crate::models::{Employee, EmployeeId};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

pub const EMPLOYEES_KEY: &str = "employees";
pub const EMPLOYEES_SEQ_KEY: &str = "employees_seq";

/// Canonical, ordered employee collection. Every mutation writes the whole
/// collection back to the store before returning.
///
/// A failed write leaves the in-memory change in place and hands the error to
/// the caller. `create` writes `employees_seq` before `employees`, so a reader
/// between the two writes may see an advanced sequence without the new row,
/// never the reverse.
///
/// Stored rows that do not decode, and later rows repeating an id, are kept
/// aside and written back after the collection unchanged.
pub struct RecordStore {
    store: Arc<dyn PersistentStore>,
    employees: Vec<Employee>,
    unreadable: Vec<Value>,
    // `None` once the numeric id space is used up.
    next_id: Option<u64>,
}

impl RecordStore {
    pub fn initialize(store: Arc<dyn PersistentStore>) -> AppResult<Self> {
        let rows = match store.get(EMPLOYEES_KEY)? {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                return Err(AppError::Persistence(format!(
                    "stored {} is not a list (found {})",
                    EMPLOYEES_KEY,
                    json_kind(&other)
                )));
            }
        };
        let stored_seq: u64 = load_or_default(store.as_ref(), EMPLOYEES_SEQ_KEY)?;

        let mut seen = HashSet::new();
        let mut employees = Vec::with_capacity(rows.len());
        let mut unreadable = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            match serde_json::from_value::<Employee>(row.clone()) {
                Ok(employee) if seen.insert(employee.id.clone()) => employees.push(employee),
                Ok(employee) => {
                    tracing::warn!(employee_id = %employee.id, "keeping stored employee with duplicate id aside");
                    unreadable.push(row);
                }
                Err(error) => {
                    tracing::warn!(index, error = %error, "keeping undecodable employee row aside");
                    unreadable.push(row);
                }
            }
        }

        let next_id = employees
            .iter()
            .filter_map(|employee| employee.id.as_number())
            .chain(unreadable.iter().filter_map(|row| row.get("id")?.as_u64()))
            .try_fold(stored_seq.max(1), |next, id| id.checked_add(1).map(|after| next.max(after)));
        if next_id.is_none() {
            tracing::warn!("stored employee ids exhaust the id space, creation is disabled");
        }

        tracing::info!(
            count = employees.len(),
            unreadable = unreadable.len(),
            next_id = ?next_id,
            "loaded employees"
        );
        Ok(Self {
            store,
            employees,
            unreadable,
            next_id,
        })
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn get(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| &employee.id == id)
    }

    pub fn create(&mut self, fields: ValidatedFields) -> AppResult<Employee> {
        let Some(raw_id) = self.next_id else {
            return Err(AppError::Internal("employee id space is exhausted".to_string()));
        };
        self.next_id = raw_id.checked_add(1);
        let id = EmployeeId::Number(raw_id);

        let fields = fields.into_inner();
        let employee = Employee {
            id: id.clone(),
            name: fields.name,
            phone: fields.phone,
            division: fields.division,
            position: fields.position,
        };
        self.employees.push(employee.clone());
        tracing::info!(employee_id = %id, "employee created");

        // u64::MAX stands in for an exhausted sequence.
        save(self.store.as_ref(), EMPLOYEES_SEQ_KEY, &self.next_id.unwrap_or(u64::MAX)).inspect_err(|error| {
            tracing::warn!(error = %error, "failed to persist employee id sequence");
        })?;
        self.persist()?;
        Ok(employee)
    }

    pub fn update(&mut self, id: &EmployeeId, fields: ValidatedFields) -> AppResult<Employee> {
        let Some(existing) = self.employees.iter_mut().find(|employee| &employee.id == id) else {
            return Err(AppError::NotFound(format!("No employee with id {}", id)));
        };

        let fields = fields.into_inner();
        existing.name = fields.name;
        existing.phone = fields.phone;
        existing.division = fields.division;
        existing.position = fields.position;
        let updated = existing.clone();
        tracing::info!(employee_id = %id, "employee updated");

        self.persist()?;
        Ok(updated)
    }

    pub fn delete(&mut self, id: &EmployeeId) -> AppResult<bool> {
        let before = self.employees.len();
        self.employees.retain(|employee| &employee.id != id);
        if self.employees.len() == before {
            tracing::debug!(employee_id = %id, "delete ignored, no such employee");
            return Ok(false);
        }

        tracing::info!(employee_id = %id, "employee deleted");
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> AppResult<()> {
        let mut rows = self
            .employees
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()?;
        rows.extend(self.unreadable.iter().cloned());
        save(self.store.as_ref(), EMPLOYEES_KEY, &rows).inspect_err(|error| {
            tracing::warn!(error = %error, "failed to persist employees");
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
