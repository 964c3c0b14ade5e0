//! Checklist items embedded in the employee aggregate.
//!
//! # Responsibility
//! - Define the document and task entries owned by one `Employee`.
//! - Parse externally supplied status strings into closed enums.
//!
//! # Invariants
//! - Item ids are unique within their owning collection only.
//! - Status fields always hold a declared variant; unknown strings are
//!   rejected before any mutation happens.
//!
//! # See also
//! - crate::model::employee

use crate::model::employee::{parse_calendar_date, EmployeeValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a document or task inside one employee's checklist.
///
/// Only meaningful together with the owning `EmployeeId`.
pub type ChecklistItemId = Uuid;

/// Review state of a collected document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentStatus {
    /// Uploaded, waiting for review.
    #[default]
    Pending,
    /// Accepted by the reviewer.
    Approved,
    /// Rejected by the reviewer.
    Rejected,
}

impl DocumentStatus {
    /// Stable wire/storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl Display for DocumentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = EmployeeValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(EmployeeValidationError::InvalidStatus {
                field: "document.status",
                value: other.to_string(),
            }),
        }
    }
}

/// Progress state of an onboarding task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Pending,
    /// Work has started.
    InProgress,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// Stable wire/storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = EmployeeValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(EmployeeValidationError::InvalidStatus {
                field: "task.status",
                value: other.to_string(),
            }),
        }
    }
}

/// Document metadata collected during onboarding.
///
/// File bytes live elsewhere; `url` is an opaque reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: ChecklistItemId,
    pub name: String,
    pub url: String,
    /// Epoch milliseconds, stamped when the document is added.
    pub uploaded_at: i64,
    pub status: DocumentStatus,
}

impl Document {
    /// Creates a pending document with a fresh item id.
    pub fn new(name: impl Into<String>, url: impl Into<String>, uploaded_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            url: url.into(),
            uploaded_at,
            status: DocumentStatus::Pending,
        }
    }
}

/// One onboarding task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: ChecklistItemId,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
}

impl Task {
    /// Creates a pending task with a fresh item id.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            due_date,
            status: TaskStatus::Pending,
        }
    }
}

/// Caller-supplied document entry used by create/replace.
///
/// Entries without `id` get a new one; `uploadedAt` defaults to the write time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentInput {
    pub id: Option<ChecklistItemId>,
    pub name: String,
    pub url: String,
    pub uploaded_at: Option<i64>,
    pub status: Option<String>,
}

impl DocumentInput {
    /// Converts input into a checked `Document`.
    pub fn into_document(self, now_ms: i64) -> Result<Document, EmployeeValidationError> {
        let status = match self.status.as_deref() {
            Some(value) => value.parse()?,
            None => DocumentStatus::Pending,
        };
        Ok(Document {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name: self.name,
            url: self.url,
            uploaded_at: self.uploaded_at.unwrap_or(now_ms),
            status,
        })
    }
}

/// Caller-supplied task entry used by create/replace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskInput {
    pub id: Option<ChecklistItemId>,
    pub title: String,
    pub description: String,
    pub due_date: Option<String>,
    pub status: Option<String>,
}

impl TaskInput {
    /// Converts input into a checked `Task`.
    pub fn into_task(self) -> Result<Task, EmployeeValidationError> {
        let status = match self.status.as_deref() {
            Some(value) => value.parse()?,
            None => TaskStatus::Pending,
        };
        let due_date = parse_optional_date("task.dueDate", self.due_date.as_deref())?;
        Ok(Task {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            title: self.title,
            description: self.description,
            due_date,
            status,
        })
    }
}

/// Parses an optional calendar date; blank strings count as absent.
pub fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, EmployeeValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_calendar_date(field, raw).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentInput, DocumentStatus, TaskInput, TaskStatus};
    use crate::model::employee::EmployeeValidationError;

    #[test]
    fn task_status_uses_hyphenated_in_progress_label() {
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!(TaskStatus::InProgress.as_str(), "in-progress");
        assert!("in_progress".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn document_status_rejects_unknown_value() {
        let err = "archived".parse::<DocumentStatus>().unwrap_err();
        assert_eq!(
            err,
            EmployeeValidationError::InvalidStatus {
                field: "document.status",
                value: "archived".to_string(),
            }
        );
    }

    #[test]
    fn document_input_defaults_to_pending_and_stamps_upload_time() {
        let document = DocumentInput {
            name: "Contract".to_string(),
            url: "s3://docs/contract.pdf".to_string(),
            ..DocumentInput::default()
        }
        .into_document(1_700_000_000_000)
        .unwrap();

        assert_eq!(document.status, DocumentStatus::Pending);
        assert_eq!(document.uploaded_at, 1_700_000_000_000);
        assert!(!document.id.is_nil());
    }

    #[test]
    fn task_input_treats_blank_due_date_as_absent() {
        let task = TaskInput {
            title: "Badge".to_string(),
            due_date: Some("  ".to_string()),
            ..TaskInput::default()
        }
        .into_task()
        .unwrap();
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn task_input_rejects_malformed_due_date() {
        let err = TaskInput {
            due_date: Some("next week".to_string()),
            ..TaskInput::default()
        }
        .into_task()
        .unwrap_err();
        assert!(matches!(
            err,
            EmployeeValidationError::InvalidDate {
                field: "task.dueDate",
                ..
            }
        ));
    }
}
