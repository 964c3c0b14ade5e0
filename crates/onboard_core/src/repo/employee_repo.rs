//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide durable CRUD for whole employee aggregates.
//! - Keep SQL and checklist encoding inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Employee::validate()` before SQL mutations.
//! - One row per employee; documents and tasks are embedded as ordered JSON
//!   arrays in that row, so every aggregate write is one atomic statement
//!   and deleting the row removes every checklist item with it.
//! - Email uniqueness is enforced by a `COLLATE NOCASE` unique index.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::checklist::{Document, Task};
use crate::model::employee::{Employee, EmployeeId, EmployeeStatus, EmployeeValidationError};
use chrono::NaiveDate;
use rusqlite::{ffi, params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email,
    position,
    department,
    start_date,
    status,
    onboarding_progress,
    documents_json,
    tasks_json,
    created_at,
    updated_at
FROM employees";

const EMPLOYEE_COLUMNS: [&str; 13] = [
    "id",
    "first_name",
    "last_name",
    "email",
    "position",
    "department",
    "start_date",
    "status",
    "onboarding_progress",
    "documents_json",
    "tasks_json",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EmployeeValidationError),
    Db(DbError),
    NotFound(EmployeeId),
    /// Another record already owns this (normalized) email.
    DuplicateEmail(String),
    /// Checklist could not be encoded for storage.
    Encode(serde_json::Error),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::DuplicateEmail(email) => {
                write!(f, "employee with email `{email}` already exists")
            }
            Self::Encode(err) => write!(f, "failed to encode checklist: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "employee repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "employee repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "employee repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::NotFound(_)
            | Self::DuplicateEmail(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store interface for employee aggregates.
pub trait EmployeeRepository {
    /// Inserts a new aggregate. Fails with `DuplicateEmail` on email clash.
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeId>;
    /// Overwrites the stored aggregate with the same id.
    fn update_employee(&self, employee: &Employee) -> RepoResult<()>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Full population in creation order.
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    /// Hard-deletes one aggregate with all embedded checklist items.
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
    /// Updates only `onboarding_progress` and `updated_at`.
    fn set_onboarding_progress(
        &self,
        id: EmployeeId,
        progress: f64,
        updated_at: i64,
    ) -> RepoResult<()>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_employee_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        employee.validate()?;
        let documents_json = encode_checklist(&employee.documents)?;
        let tasks_json = encode_checklist(&employee.tasks)?;

        self.conn
            .execute(
                "INSERT INTO employees (
                    id,
                    first_name,
                    last_name,
                    email,
                    position,
                    department,
                    start_date,
                    status,
                    onboarding_progress,
                    documents_json,
                    tasks_json,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
                params![
                    employee.id.to_string(),
                    employee.first_name.as_str(),
                    employee.last_name.as_str(),
                    employee.email.as_str(),
                    employee.position.as_str(),
                    employee.department.as_str(),
                    employee.start_date.to_string(),
                    employee.status.as_str(),
                    employee.onboarding_progress,
                    documents_json,
                    tasks_json,
                    employee.created_at,
                    employee.updated_at,
                ],
            )
            .map_err(|err| map_write_error(err, &employee.email))?;

        Ok(employee.id)
    }

    fn update_employee(&self, employee: &Employee) -> RepoResult<()> {
        employee.validate()?;
        let documents_json = encode_checklist(&employee.documents)?;
        let tasks_json = encode_checklist(&employee.tasks)?;

        let changed = self
            .conn
            .execute(
                "UPDATE employees
                 SET
                    first_name = ?1,
                    last_name = ?2,
                    email = ?3,
                    position = ?4,
                    department = ?5,
                    start_date = ?6,
                    status = ?7,
                    onboarding_progress = ?8,
                    documents_json = ?9,
                    tasks_json = ?10,
                    updated_at = ?11
                 WHERE id = ?12;",
                params![
                    employee.first_name.as_str(),
                    employee.last_name.as_str(),
                    employee.email.as_str(),
                    employee.position.as_str(),
                    employee.department.as_str(),
                    employee.start_date.to_string(),
                    employee.status.as_str(),
                    employee.onboarding_progress,
                    documents_json,
                    tasks_json,
                    employee.updated_at,
                    employee.id.to_string(),
                ],
            )
            .map_err(|err| map_write_error(err, &employee.email))?;

        if changed == 0 {
            return Err(RepoError::NotFound(employee.id));
        }

        Ok(())
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn set_onboarding_progress(
        &self,
        id: EmployeeId,
        progress: f64,
        updated_at: i64,
    ) -> RepoResult<()> {
        if !progress.is_finite() {
            return Err(RepoError::Validation(
                EmployeeValidationError::NonFiniteProgress,
            ));
        }

        let changed = self.conn.execute(
            "UPDATE employees
             SET
                onboarding_progress = ?1,
                updated_at = ?2
             WHERE id = ?3;",
            params![progress, updated_at, id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn map_write_error(err: rusqlite::Error, email: &str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        let is_email_clash = failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
            && message
                .as_deref()
                .is_some_and(|text| text.contains("email"));
        if is_email_clash {
            return RepoError::DuplicateEmail(email.to_string());
        }
    }
    err.into()
}

fn encode_checklist<T: serde::Serialize>(items: &[T]) -> RepoResult<String> {
    serde_json::to_string(items).map_err(RepoError::Encode)
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in employees.id"))
    })?;

    let status_text: String = row.get("status")?;
    let status: EmployeeStatus = status_text.parse().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in employees.status"
        ))
    })?;

    let start_date_text: String = row.get("start_date")?;
    let start_date = NaiveDate::parse_from_str(&start_date_text, "%Y-%m-%d").map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{start_date_text}` in employees.start_date"
        ))
    })?;

    let documents_json: String = row.get("documents_json")?;
    let documents: Vec<Document> = serde_json::from_str(&documents_json).map_err(|err| {
        RepoError::InvalidData(format!("invalid employees.documents_json: {err}"))
    })?;

    let tasks_json: String = row.get("tasks_json")?;
    let tasks: Vec<Task> = serde_json::from_str(&tasks_json)
        .map_err(|err| RepoError::InvalidData(format!("invalid employees.tasks_json: {err}")))?;

    let employee = Employee {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        position: row.get("position")?,
        department: row.get("department")?,
        start_date,
        status,
        onboarding_progress: row.get("onboarding_progress")?,
        documents,
        tasks,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    employee
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("employee {id}: {err}")))?;
    Ok(employee)
}

fn ensure_employee_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "employees")? {
        return Err(RepoError::MissingRequiredTable("employees"));
    }

    let present = table_columns(conn, "employees")?;
    for column in EMPLOYEE_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "employees",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}
