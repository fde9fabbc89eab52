use crate::errors::{AppError, AppResult, ValidationError};
use crate::models::{Employee, EmployeeFields, EmployeeId, FormField};
use crate::records::RecordStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "mode", content = "id")]
pub enum FormMode {
    Creating,
    Editing(EmployeeId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditBuffer {
    pub mode: FormMode,
    pub fields: EmployeeFields,
    pub error: Option<String>,
}

impl EditBuffer {
    pub fn for_create() -> Self {
        Self {
            mode: FormMode::Creating,
            fields: EmployeeFields::default(),
            error: None,
        }
    }

    pub fn for_edit(employee: &Employee) -> Self {
        Self {
            mode: FormMode::Editing(employee.id.clone()),
            fields: employee.fields(),
            error: None,
        }
    }

    pub fn with_field(mut self, field: FormField, value: impl Into<String>) -> Self {
        self.fields.set(field, value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields(EmployeeFields);

impl ValidatedFields {
    pub fn as_fields(&self) -> &EmployeeFields {
        &self.0
    }

    pub fn into_inner(self) -> EmployeeFields {
        self.0
    }
}

pub fn validate(fields: &EmployeeFields) -> Result<ValidatedFields, ValidationError> {
    let missing: Vec<FormField> = FormField::ALL
        .into_iter()
        .filter(|field| fields.get(*field).trim().is_empty())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingField { fields: missing });
    }

    Ok(ValidatedFields(EmployeeFields::new(
        fields.name.trim(),
        fields.phone.trim(),
        fields.division.trim(),
        fields.position.trim(),
    )))
}

#[derive(Debug, Default)]
pub struct FormController {
    buffer: Option<EditBuffer>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        self.buffer.as_ref()
    }

    pub fn open_for_create(&mut self) -> &EditBuffer {
        self.buffer.insert(EditBuffer::for_create())
    }

    pub fn open_for_edit(&mut self, employee: &Employee) -> &EditBuffer {
        self.buffer.insert(EditBuffer::for_edit(employee))
    }

    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) -> AppResult<&EditBuffer> {
        let Some(buffer) = self.buffer.take() else {
            return Err(AppError::InvalidState("no dialog is open".to_string()));
        };
        Ok(self.buffer.insert(buffer.with_field(field, value)))
    }

    /// Validation failures keep the dialog open with the entered values and
    /// the error line set. Once validation passes the dialog closes, whether
    /// or not the store accepted the change: a vanished record or a failed
    /// write is reported through the returned error instead.
    pub fn commit(&mut self, records: &mut RecordStore) -> AppResult<Employee> {
        let Some(buffer) = self.buffer.as_mut() else {
            return Err(AppError::InvalidState("no dialog is open".to_string()));
        };

        let validated = match validate(&buffer.fields) {
            Ok(validated) => validated,
            Err(error) => {
                buffer.error = Some(error.to_string());
                return Err(error.into());
            }
        };

        let mode = buffer.mode.clone();
        self.buffer = None;
        match mode {
            FormMode::Creating => records.create(validated),
            FormMode::Editing(id) => records.update(&id, validated),
        }
    }

    pub fn cancel(&mut self) {
        self.buffer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{validate, EditBuffer, FormController, FormMode};
    use crate::db::MemoryStore;
    use crate::errors::{AppError, ValidationError};
    use crate::models::{EmployeeFields, FormField};
    use crate::records::tests::valid;
    use crate::records::RecordStore;
    use std::sync::Arc;

    fn filled() -> EmployeeFields {
        EmployeeFields::new("Ana", "0812", "Finance", "Analyst")
    }

    #[test]
    fn validate_trims_and_accepts_complete_fields() {
        let validated = validate(&EmployeeFields::new("  Ana ", "0812", "Finance", " Analyst")).expect("valid");
        assert_eq!(validated.as_fields().name, "Ana");
        assert_eq!(validated.as_fields().position, "Analyst");
    }

    #[test]
    fn validate_rejects_each_blank_field() {
        for field in FormField::ALL {
            for blank in ["", "   ", "\t\n"] {
                let mut fields = filled();
                fields.set(field, blank.to_string());
                let error = validate(&fields).expect_err("blank field");
                assert_eq!(error, ValidationError::MissingField { fields: vec![field] });
                assert_eq!(error.to_string(), "All fields are required.");
            }
        }
    }

    #[test]
    fn with_field_only_touches_named_field() {
        let buffer = EditBuffer::for_create().with_field(FormField::Phone, "0812");
        assert_eq!(buffer.fields.phone, "0812");
        assert_eq!(buffer.fields.name, "");
        assert!(buffer.error.is_none());
    }

    #[test]
    fn failed_commit_keeps_dialog_open_and_store_untouched() {
        let mut records = RecordStore::initialize(Arc::new(MemoryStore::new())).expect("init");
        let mut form = FormController::new();
        form.open_for_create();
        form.update_field(FormField::Name, "Ana").expect("name");
        form.update_field(FormField::Phone, "0812").expect("phone");
        form.update_field(FormField::Division, "  ").expect("division");

        let error = form.commit(&mut records).expect_err("blank division");
        assert!(matches!(error, AppError::Validation(ValidationError::MissingField { .. })));
        assert!(records.employees().is_empty());

        let buffer = form.buffer().expect("still open");
        assert_eq!(buffer.fields.name, "Ana");
        assert_eq!(buffer.fields.phone, "0812");
        assert_eq!(buffer.error.as_deref(), Some("All fields are required."));
    }

    #[test]
    fn create_commit_closes_dialog() {
        let mut records = RecordStore::initialize(Arc::new(MemoryStore::new())).expect("init");
        let mut form = FormController::new();
        form.open_for_create();
        for (field, value) in FormField::ALL.into_iter().zip(["Ana", "0812", "Finance", "Analyst"]) {
            form.update_field(field, value).expect("update");
        }

        let created = form.commit(&mut records).expect("commit");
        assert!(!form.is_open());
        assert_eq!(records.employees(), &[created]);
    }

    #[test]
    fn edit_commit_updates_target_only() {
        let mut records = RecordStore::initialize(Arc::new(MemoryStore::new())).expect("init");
        let ana = records.create(valid("Ana")).expect("create");
        records.create(valid("Budi")).expect("create");

        let mut form = FormController::new();
        let buffer = form.open_for_edit(&ana);
        assert_eq!(buffer.mode, FormMode::Editing(ana.id.clone()));
        assert_eq!(buffer.fields.name, "Ana");

        form.update_field(FormField::Position, "Lead").expect("update");
        let updated = form.commit(&mut records).expect("commit");
        assert_eq!(updated.id, ana.id);
        assert_eq!(records.employees()[0].position, "Lead");
        assert_eq!(records.employees()[1].position, "Staff");
    }

    #[test]
    fn edit_of_vanished_record_closes_dialog_with_not_found() {
        let mut records = RecordStore::initialize(Arc::new(MemoryStore::new())).expect("init");
        let ana = records.create(valid("Ana")).expect("create");

        let mut form = FormController::new();
        form.open_for_edit(&ana);
        records.delete(&ana.id).expect("delete");

        let error = form.commit(&mut records).expect_err("record gone");
        assert!(matches!(error, AppError::NotFound(_)));
        assert!(!form.is_open());
        assert!(records.employees().is_empty());
    }

    #[test]
    fn cancel_discards_buffer() {
        let mut form = FormController::new();
        form.open_for_create();
        form.update_field(FormField::Name, "Draft").expect("update");
        form.cancel();
        assert!(form.buffer().is_none());

        let reopened = form.open_for_create();
        assert_eq!(reopened.fields, EmployeeFields::default());
    }

    #[test]
    fn closed_form_rejects_edits_and_commits() {
        let mut records = RecordStore::initialize(Arc::new(MemoryStore::new())).expect("init");
        let mut form = FormController::new();
        assert!(matches!(form.update_field(FormField::Name, "x"), Err(AppError::InvalidState(_))));
        assert!(matches!(form.commit(&mut records), Err(AppError::InvalidState(_))));
    }
}
