//! Employee aggregate model.
//!
//! # Responsibility
//! - Define the onboarding record and its owned document/task checklists.
//! - Normalize and validate profile fields before persistence.
//! - Provide in-aggregate lookup for checklist items.
//!
//! # Invariants
//! - `id` is stable and never reused for another employee.
//! - `email` is stored trimmed and lowercase.
//! - Checklist item ids are unique within their own collection.
//! - `onboarding_progress` is finite; no range is enforced.
//!
//! # See also
//! - crate::model::checklist

use crate::model::checklist::{ChecklistItemId, Document, DocumentInput, Task, TaskInput};
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of one employee record.
pub type EmployeeId = Uuid;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
    )
    .expect("valid email regex")
});

/// Overall onboarding state of an employee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmployeeStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

impl EmployeeStatus {
    /// Stable wire/storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl Display for EmployeeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = EmployeeValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(EmployeeValidationError::InvalidStatus {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Field-level validation failures for employee aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    /// Nil UUID supplied where a stable id is required.
    NilId,
    /// Required text field is missing or blank after trim.
    MissingField(&'static str),
    /// Email does not match the accepted address syntax.
    InvalidEmail(String),
    /// Date field is not a valid calendar date.
    InvalidDate { field: &'static str, value: String },
    /// Enum field holds an undeclared value.
    InvalidStatus { field: &'static str, value: String },
    /// Progress is NaN or infinite.
    NonFiniteProgress,
    /// Two checklist items in one collection share the same id.
    DuplicateItemId(ChecklistItemId),
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "id must not be nil"),
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
            Self::InvalidDate { field, value } => {
                write!(f, "{field} is not a valid date: `{value}`")
            }
            Self::InvalidStatus { field, value } => {
                write!(f, "{field} has invalid value `{value}`")
            }
            Self::NonFiniteProgress => write!(f, "onboardingProgress must be a finite number"),
            Self::DuplicateItemId(id) => write!(f, "duplicate checklist item id: {id}"),
        }
    }
}

impl Error for EmployeeValidationError {}

/// Profile fields accepted when creating an employee.
///
/// `tasks: None` means "not supplied"; the onboarding service seeds the
/// default checklist in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub start_date: String,
    pub documents: Option<Vec<DocumentInput>>,
    pub tasks: Option<Vec<TaskInput>>,
}

/// Replace-style update. Supplied fields overwrite, omitted fields are kept.
///
/// Supplied checklists replace the stored collection wholesale.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub start_date: Option<String>,
    pub status: Option<String>,
    pub onboarding_progress: Option<f64>,
    pub documents: Option<Vec<DocumentInput>>,
    pub tasks: Option<Vec<TaskInput>>,
}

/// Onboarding record: profile, overall state and owned checklists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub start_date: NaiveDate,
    pub status: EmployeeStatus,
    /// Caller-managed indicator, independent of checklist state.
    pub onboarding_progress: f64,
    pub documents: Vec<Document>,
    pub tasks: Vec<Task>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed on every mutation.
    pub updated_at: i64,
}

impl Employee {
    /// Builds a new pending record from caller input.
    ///
    /// Checklists are taken from the input as-is (empty when omitted).
    /// Seeding defaults is a service concern.
    pub fn create(input: NewEmployee, now_ms: i64) -> Result<Self, EmployeeValidationError> {
        let documents = documents_from_input(input.documents.unwrap_or_default(), now_ms)?;
        let tasks = tasks_from_input(input.tasks.unwrap_or_default())?;

        let employee = Self {
            id: Uuid::new_v4(),
            first_name: required_text("firstName", &input.first_name)?,
            last_name: required_text("lastName", &input.last_name)?,
            email: normalize_email(&input.email)?,
            position: required_text("position", &input.position)?,
            department: required_text("department", &input.department)?,
            start_date: parse_calendar_date("startDate", &input.start_date)?,
            status: EmployeeStatus::Pending,
            onboarding_progress: 0.0,
            documents,
            tasks,
            created_at: now_ms,
            updated_at: now_ms,
        };
        employee.validate()?;
        Ok(employee)
    }

    /// Applies a replace-style update.
    ///
    /// Every supplied field is checked before anything is assigned, so a
    /// failed update leaves `self` untouched.
    pub fn apply_update(
        &mut self,
        update: EmployeeUpdate,
        now_ms: i64,
    ) -> Result<(), EmployeeValidationError> {
        let mut next = self.clone();

        if let Some(value) = update.first_name.as_deref() {
            next.first_name = required_text("firstName", value)?;
        }
        if let Some(value) = update.last_name.as_deref() {
            next.last_name = required_text("lastName", value)?;
        }
        if let Some(value) = update.email.as_deref() {
            next.email = normalize_email(value)?;
        }
        if let Some(value) = update.position.as_deref() {
            next.position = required_text("position", value)?;
        }
        if let Some(value) = update.department.as_deref() {
            next.department = required_text("department", value)?;
        }
        if let Some(value) = update.start_date.as_deref() {
            next.start_date = parse_calendar_date("startDate", value)?;
        }
        if let Some(value) = update.status.as_deref() {
            next.status = value.parse()?;
        }
        if let Some(value) = update.onboarding_progress {
            next.onboarding_progress = value;
        }
        if let Some(documents) = update.documents {
            next.documents = documents_from_input(documents, now_ms)?;
        }
        if let Some(tasks) = update.tasks {
            next.tasks = tasks_from_input(tasks)?;
        }

        next.validate()?;
        next.updated_at = now_ms;
        *self = next;
        Ok(())
    }

    /// Checks aggregate invariants.
    ///
    /// Called on every repository write and read.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.id.is_nil() {
            return Err(EmployeeValidationError::NilId);
        }

        for (field, value) in [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("position", &self.position),
            ("department", &self.department),
        ] {
            if value.trim().is_empty() {
                return Err(EmployeeValidationError::MissingField(field));
            }
        }

        if normalize_email(&self.email)? != self.email {
            return Err(EmployeeValidationError::InvalidEmail(self.email.clone()));
        }

        if !self.onboarding_progress.is_finite() {
            return Err(EmployeeValidationError::NonFiniteProgress);
        }

        ensure_unique_ids(self.documents.iter().map(|document| document.id))?;
        ensure_unique_ids(self.tasks.iter().map(|task| task.id))?;
        Ok(())
    }

    /// Refreshes `updated_at`.
    pub fn touch(&mut self, now_ms: i64) {
        self.updated_at = now_ms;
    }

    pub fn task(&self, task_id: ChecklistItemId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: ChecklistItemId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    pub fn document(&self, document_id: ChecklistItemId) -> Option<&Document> {
        self.documents
            .iter()
            .find(|document| document.id == document_id)
    }

    pub fn document_mut(&mut self, document_id: ChecklistItemId) -> Option<&mut Document> {
        self.documents
            .iter_mut()
            .find(|document| document.id == document_id)
    }
}

/// Trims and lowercases an email, then checks its syntax.
pub fn normalize_email(value: &str) -> Result<String, EmployeeValidationError> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(EmployeeValidationError::MissingField("email"));
    }
    if !EMAIL_RE.is_match(&normalized) {
        return Err(EmployeeValidationError::InvalidEmail(value.trim().to_string()));
    }
    Ok(normalized)
}

/// Parses `YYYY-MM-DD`, or an RFC 3339 timestamp keeping its date part.
pub fn parse_calendar_date(
    field: &'static str,
    value: &str,
) -> Result<NaiveDate, EmployeeValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EmployeeValidationError::MissingField(field));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|value| value.date_naive()))
        .map_err(|_| EmployeeValidationError::InvalidDate {
            field,
            value: trimmed.to_string(),
        })
}

fn required_text(field: &'static str, value: &str) -> Result<String, EmployeeValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EmployeeValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn documents_from_input(
    inputs: Vec<DocumentInput>,
    now_ms: i64,
) -> Result<Vec<Document>, EmployeeValidationError> {
    inputs
        .into_iter()
        .map(|input| input.into_document(now_ms))
        .collect()
}

fn tasks_from_input(inputs: Vec<TaskInput>) -> Result<Vec<Task>, EmployeeValidationError> {
    inputs.into_iter().map(TaskInput::into_task).collect()
}

fn ensure_unique_ids(
    ids: impl Iterator<Item = ChecklistItemId>,
) -> Result<(), EmployeeValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_nil() {
            return Err(EmployeeValidationError::NilId);
        }
        if !seen.insert(id) {
            return Err(EmployeeValidationError::DuplicateItemId(id));
        }
    }
    Ok(())
}
