//! Onboarding lifecycle service.
//!
//! # Responsibility
//! - Create employee records, seeding the default task checklist.
//! - Read and mutate single checklist items without resending the aggregate.
//! - Map persistence errors into the use-case error taxonomy.
//!
//! # Invariants
//! - Every mutation is load, mutate, persist of one aggregate.
//! - Failed operations leave stored state unchanged.
//! - `status` and `onboarding_progress` are never derived from checklist
//!   completion; callers set them explicitly.
//! - Concurrent writers on the same employee are last-write-wins.

use crate::model::checklist::{
    parse_optional_date, ChecklistItemId, Document, DocumentStatus, Task, TaskStatus,
};
use crate::model::employee::{
    Employee, EmployeeId, EmployeeUpdate, EmployeeValidationError, NewEmployee,
};
use crate::model::now_epoch_ms;
use crate::repo::employee_repo::{EmployeeRepository, RepoError};
use crate::service::seed::default_onboarding_tasks;
use log::{debug, error, info};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Coarse error class used by boundary adapters to pick a transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Uniqueness,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Uniqueness => "uniqueness",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

/// Service error for onboarding use-cases.
#[derive(Debug)]
pub enum OnboardingError {
    /// Malformed or missing input field.
    Validation(EmployeeValidationError),
    /// Email already used by another employee.
    DuplicateEmail(String),
    EmployeeNotFound(EmployeeId),
    TaskNotFound {
        employee_id: EmployeeId,
        task_id: ChecklistItemId,
    },
    DocumentNotFound {
        employee_id: EmployeeId,
        document_id: ChecklistItemId,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl OnboardingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::DuplicateEmail(_) => ErrorKind::Uniqueness,
            Self::EmployeeNotFound(_)
            | Self::TaskNotFound { .. }
            | Self::DocumentNotFound { .. } => ErrorKind::NotFound,
            Self::Repo(_) => ErrorKind::Internal,
        }
    }
}

impl Display for OnboardingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateEmail(email) => {
                write!(f, "employee with email `{email}` already exists")
            }
            Self::EmployeeNotFound(id) => write!(f, "employee not found: {id}"),
            Self::TaskNotFound {
                employee_id,
                task_id,
            } => write!(f, "task {task_id} not found for employee {employee_id}"),
            Self::DocumentNotFound {
                employee_id,
                document_id,
            } => write!(
                f,
                "document {document_id} not found for employee {employee_id}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for OnboardingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EmployeeValidationError> for OnboardingError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for OnboardingError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::EmployeeNotFound(id),
            RepoError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Request model for appending one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddTaskRequest {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD` or RFC 3339; blank or absent means no due date.
    pub due_date: Option<String>,
}

/// Request model for appending one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddDocumentRequest {
    pub name: String,
    pub url: String,
}

/// Onboarding lifecycle facade over a record store.
pub struct OnboardingService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> OnboardingService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a pending employee record.
    ///
    /// # Contract
    /// - `input.tasks == None`: tasks are seeded from the default template.
    /// - `input.tasks == Some(list)`: `list` is used as-is, even when empty.
    /// - Duplicate email (case-insensitive) fails with `DuplicateEmail` and
    ///   nothing is persisted.
    pub fn create_employee(&self, input: NewEmployee) -> Result<Employee, OnboardingError> {
        run("employee_create", || {
            let seed = input.tasks.is_none();
            let mut employee = Employee::create(input, now_epoch_ms())?;
            if seed {
                employee.tasks = default_onboarding_tasks();
            }

            self.repo.create_employee(&employee)?;
            info!(
                "event=employee_create module=service status=ok employee_id={} tasks={} seeded={}",
                employee.id,
                employee.tasks.len(),
                seed
            );
            Ok(employee)
        })
    }

    pub fn get_employee(&self, employee_id: EmployeeId) -> Result<Employee, OnboardingError> {
        run("employee_get", || self.load(employee_id))
    }

    /// Lists all employees in creation order.
    pub fn list_employees(&self) -> Result<Vec<Employee>, OnboardingError> {
        run("employee_list", || Ok(self.repo.list_employees()?))
    }

    /// Applies a replace-style update and returns the stored result.
    pub fn replace_employee(
        &self,
        employee_id: EmployeeId,
        update: EmployeeUpdate,
    ) -> Result<Employee, OnboardingError> {
        run("employee_replace", || {
            let mut employee = self.load(employee_id)?;
            employee.apply_update(update, now_epoch_ms())?;
            self.repo.update_employee(&employee)?;
            info!(
                "event=employee_replace module=service status=ok employee_id={}",
                employee.id
            );
            Ok(employee)
        })
    }

    /// Deletes an employee together with all checklist items.
    pub fn delete_employee(&self, employee_id: EmployeeId) -> Result<(), OnboardingError> {
        run("employee_delete", || {
            self.repo.delete_employee(employee_id)?;
            info!(
                "event=employee_delete module=service status=ok employee_id={}",
                employee_id
            );
            Ok(())
        })
    }

    /// Sets `onboarding_progress` without range checks.
    pub fn set_progress(
        &self,
        employee_id: EmployeeId,
        progress: f64,
    ) -> Result<Employee, OnboardingError> {
        run("employee_set_progress", || {
            self.repo
                .set_onboarding_progress(employee_id, progress, now_epoch_ms())?;
            self.load(employee_id)
        })
    }

    pub fn list_tasks(&self, employee_id: EmployeeId) -> Result<Vec<Task>, OnboardingError> {
        run("task_list", || Ok(self.load(employee_id)?.tasks))
    }

    /// Appends a pending task to the end of the checklist.
    pub fn add_task(
        &self,
        employee_id: EmployeeId,
        request: AddTaskRequest,
    ) -> Result<Task, OnboardingError> {
        run("task_add", || {
            let due_date = parse_optional_date("dueDate", request.due_date.as_deref())?;
            let mut employee = self.load(employee_id)?;
            let task = Task::new(request.title, request.description, due_date);
            employee.tasks.push(task.clone());
            employee.touch(now_epoch_ms());
            self.repo.update_employee(&employee)?;
            info!(
                "event=task_add module=service status=ok employee_id={} task_id={}",
                employee_id, task.id
            );
            Ok(task)
        })
    }

    /// Moves one task to `status`.
    ///
    /// The status is validated before the employee is loaded. Setting the
    /// current status again returns the task without writing.
    pub fn set_task_status(
        &self,
        employee_id: EmployeeId,
        task_id: ChecklistItemId,
        status: &str,
    ) -> Result<Task, OnboardingError> {
        run("task_set_status", || {
            let status: TaskStatus = status.parse()?;
            let mut employee = self.load(employee_id)?;
            let task = employee
                .task_mut(task_id)
                .ok_or(OnboardingError::TaskNotFound {
                    employee_id,
                    task_id,
                })?;
            if task.status == status {
                return Ok(task.clone());
            }

            task.status = status;
            let updated = task.clone();
            employee.touch(now_epoch_ms());
            self.repo.update_employee(&employee)?;
            info!(
                "event=task_set_status module=service status=ok employee_id={} task_id={} task_status={}",
                employee_id, task_id, status
            );
            Ok(updated)
        })
    }

    pub fn list_documents(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<Document>, OnboardingError> {
        run("document_list", || Ok(self.load(employee_id)?.documents))
    }

    /// Appends a pending document stamped with the current time.
    pub fn add_document(
        &self,
        employee_id: EmployeeId,
        request: AddDocumentRequest,
    ) -> Result<Document, OnboardingError> {
        run("document_add", || {
            let mut employee = self.load(employee_id)?;
            let now = now_epoch_ms();
            let document = Document::new(request.name, request.url, now);
            employee.documents.push(document.clone());
            employee.touch(now);
            self.repo.update_employee(&employee)?;
            info!(
                "event=document_add module=service status=ok employee_id={} document_id={}",
                employee_id, document.id
            );
            Ok(document)
        })
    }

    /// Moves one document to `status`; same contract as `set_task_status`.
    pub fn set_document_status(
        &self,
        employee_id: EmployeeId,
        document_id: ChecklistItemId,
        status: &str,
    ) -> Result<Document, OnboardingError> {
        run("document_set_status", || {
            let status: DocumentStatus = status.parse()?;
            let mut employee = self.load(employee_id)?;
            let document =
                employee
                    .document_mut(document_id)
                    .ok_or(OnboardingError::DocumentNotFound {
                        employee_id,
                        document_id,
                    })?;
            if document.status == status {
                return Ok(document.clone());
            }

            document.status = status;
            let updated = document.clone();
            employee.touch(now_epoch_ms());
            self.repo.update_employee(&employee)?;
            info!(
                "event=document_set_status module=service status=ok employee_id={} document_id={} document_status={}",
                employee_id, document_id, status
            );
            Ok(updated)
        })
    }

    fn load(&self, employee_id: EmployeeId) -> Result<Employee, OnboardingError> {
        self.repo
            .get_employee(employee_id)?
            .ok_or(OnboardingError::EmployeeNotFound(employee_id))
    }
}

// Rejections are logged without their message: validation and uniqueness
// errors can carry email addresses.
fn run<T>(
    event: &'static str,
    operation: impl FnOnce() -> Result<T, OnboardingError>,
) -> Result<T, OnboardingError> {
    let result = operation();
    if let Err(err) = &result {
        match err.kind() {
            ErrorKind::Internal => error!(
                "event={} module=service status=error error_code=internal error={}",
                event, err
            ),
            kind => debug!(
                "event={} module=service status=rejected error_code={}",
                event,
                kind.as_str()
            ),
        }
    }
    result
}
