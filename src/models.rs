use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Rows written by older builds may carry string ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmployeeId {
    Number(u64),
    Text(String),
}

impl EmployeeId {
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

impl From<u64> for EmployeeId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "nomorTelepon")]
    pub phone: String,
    #[serde(rename = "divisi")]
    pub division: String,
    pub position: String,
}

impl Employee {
    pub fn fields(&self) -> EmployeeFields {
        EmployeeFields {
            name: self.name.clone(),
            phone: self.phone.clone(),
            division: self.division.clone(),
            position: self.position.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFields {
    pub name: String,
    pub phone: String,
    pub division: String,
    pub position: String,
}

impl EmployeeFields {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        division: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            division: division.into(),
            position: position.into(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Phone => &self.phone,
            FormField::Division => &self.division,
            FormField::Position => &self.position,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Phone => &mut self.phone,
            FormField::Division => &mut self.division,
            FormField::Position => &mut self.position,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormField {
    Name,
    Phone,
    Division,
    Position,
}

impl FormField {
    pub const ALL: [FormField; 4] = [Self::Name, Self::Phone, Self::Division, Self::Position];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Phone => "Phone",
            Self::Division => "Division",
            Self::Position => "Position",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub search_term: String,
    pub page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub visible: Vec<Employee>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

impl PageResponse {
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub logged_in_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSettings {
    pub page_size: usize,
    pub reset_page_on_search: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            page_size: 5,
            reset_page_on_search: false,
        }
    }
}
