//! Boundary adapter for transport layers.
//!
//! # Responsibility
//! - Accept plain JSON field maps already parsed from the wire.
//! - Run one onboarding use-case per call against a fresh connection.
//! - Map typed failures onto transport status codes.
//!
//! # Invariants
//! - Exported methods never panic and always return an `ApiResponse`.
//! - Persistence failures are logged and surfaced as an opaque 500.
//! - Unparseable identifiers are reported as not found.

use log::{debug, error};
use onboard_core::db::open_db;
use onboard_core::{
    AddDocumentRequest, AddTaskRequest, ChecklistItemId, DocumentStatus, EmployeeId,
    EmployeeUpdate, ErrorKind, NewEmployee, OnboardingError, OnboardingService,
    SqliteEmployeeRepository, TaskStatus,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const DB_PATH_ENV: &str = "ONBOARD_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "onboard.sqlite3";
const SERVER_ERROR_MESSAGE: &str = "Server error";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Transport-neutral response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    /// HTTP-style status code.
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "message": message.into() }),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Deserialize)]
struct ProgressBody {
    progress: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatusBody {
    status: String,
}

#[derive(Debug)]
enum ApiFailure {
    BadRequest(String),
    EmployeeNotFound,
    Service(OnboardingError),
    Unavailable(String),
}

impl From<OnboardingError> for ApiFailure {
    fn from(value: OnboardingError) -> Self {
        Self::Service(value)
    }
}

type ApiResult<T> = Result<T, ApiFailure>;

/// Onboarding API bound to one SQLite database file.
#[derive(Debug, Clone)]
pub struct OnboardingApi {
    db_path: PathBuf,
}

impl OnboardingApi {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Uses the database path resolved from `ONBOARD_DB_PATH`.
    pub fn from_env() -> Self {
        Self::new(resolve_db_path())
    }

    /// `GET /employees`
    pub fn list_employees(&self) -> ApiResponse {
        let result = self.with_service(|service| service.list_employees());
        respond("employee_list", 200, result)
    }

    /// `GET /employees/:id`
    pub fn get_employee(&self, employee_id: &str) -> ApiResponse {
        let result = parse_employee_id(employee_id)
            .and_then(|id| self.with_service(|service| service.get_employee(id)));
        respond("employee_get", 200, result)
    }

    /// `POST /employees`
    pub fn create_employee(&self, body: Value) -> ApiResponse {
        let result = parse_body::<NewEmployee>(body)
            .and_then(|input| self.with_service(|service| service.create_employee(input)));
        respond("employee_create", 201, result)
    }

    /// `PUT /employees/:id`
    pub fn replace_employee(&self, employee_id: &str, body: Value) -> ApiResponse {
        let result = parse_employee_id(employee_id).and_then(|id| {
            let update = parse_body::<EmployeeUpdate>(body)?;
            self.with_service(|service| service.replace_employee(id, update))
        });
        respond("employee_replace", 200, result)
    }

    /// `DELETE /employees/:id`
    pub fn delete_employee(&self, employee_id: &str) -> ApiResponse {
        let result = parse_employee_id(employee_id)
            .and_then(|id| self.with_service(|service| service.delete_employee(id)))
            .map(|()| json!({ "message": "Employee deleted successfully" }));
        respond("employee_delete", 200, result)
    }

    /// `PATCH /employees/:id/progress` with `{"progress": number}`.
    pub fn set_progress(&self, employee_id: &str, body: Value) -> ApiResponse {
        let result = parse_employee_id(employee_id).and_then(|id| {
            let request = parse_body::<ProgressBody>(body)?;
            self.with_service(|service| service.set_progress(id, request.progress))
        });
        respond("employee_set_progress", 200, result)
    }

    /// `GET /onboarding/:employeeId/tasks`
    pub fn list_tasks(&self, employee_id: &str) -> ApiResponse {
        let result = parse_employee_id(employee_id)
            .and_then(|id| self.with_service(|service| service.list_tasks(id)));
        respond("task_list", 200, result)
    }

    /// `POST /onboarding/:employeeId/tasks`
    pub fn add_task(&self, employee_id: &str, body: Value) -> ApiResponse {
        let result = parse_employee_id(employee_id).and_then(|id| {
            let request = parse_body::<AddTaskRequest>(body)?;
            self.with_service(|service| service.add_task(id, request))
        });
        respond("task_add", 201, result)
    }

    /// `PATCH /onboarding/:employeeId/tasks/:taskId` with `{"status": ...}`.
    pub fn set_task_status(&self, employee_id: &str, task_id: &str, body: Value) -> ApiResponse {
        let result = parse_employee_id(employee_id).and_then(|id| {
            let request = parse_body::<StatusBody>(body)?;
            self.with_service(|service| match parse_item_id(task_id) {
                Some(task_id) => service.set_task_status(id, task_id, &request.status),
                None => {
                    request.status.parse::<TaskStatus>()?;
                    service.get_employee(id)?;
                    Err(OnboardingError::TaskNotFound {
                        employee_id: id,
                        task_id: Uuid::nil(),
                    })
                }
            })
        });
        respond("task_set_status", 200, result)
    }

    /// `GET /onboarding/:employeeId/documents`
    pub fn list_documents(&self, employee_id: &str) -> ApiResponse {
        let result = parse_employee_id(employee_id)
            .and_then(|id| self.with_service(|service| service.list_documents(id)));
        respond("document_list", 200, result)
    }

    /// `POST /onboarding/:employeeId/documents`
    pub fn add_document(&self, employee_id: &str, body: Value) -> ApiResponse {
        let result = parse_employee_id(employee_id).and_then(|id| {
            let request = parse_body::<AddDocumentRequest>(body)?;
            self.with_service(|service| service.add_document(id, request))
        });
        respond("document_add", 201, result)
    }

    /// `PATCH /onboarding/:employeeId/documents/:documentId`
    pub fn set_document_status(
        &self,
        employee_id: &str,
        document_id: &str,
        body: Value,
    ) -> ApiResponse {
        let result = parse_employee_id(employee_id).and_then(|id| {
            let request = parse_body::<StatusBody>(body)?;
            self.with_service(|service| match parse_item_id(document_id) {
                Some(document_id) => service.set_document_status(id, document_id, &request.status),
                None => {
                    request.status.parse::<DocumentStatus>()?;
                    service.get_employee(id)?;
                    Err(OnboardingError::DocumentNotFound {
                        employee_id: id,
                        document_id: Uuid::nil(),
                    })
                }
            })
        });
        respond("document_set_status", 200, result)
    }

    fn with_service<T>(
        &self,
        f: impl FnOnce(&OnboardingService<SqliteEmployeeRepository<'_>>) -> Result<T, OnboardingError>,
    ) -> ApiResult<T> {
        let conn = open_db(&self.db_path)
            .map_err(|err| ApiFailure::Unavailable(format!("database open failed: {err}")))?;
        let repo = SqliteEmployeeRepository::try_new(&conn)
            .map_err(|err| ApiFailure::Unavailable(format!("repository init failed: {err}")))?;
        let service = OnboardingService::new(repo);
        Ok(f(&service)?)
    }
}

/// Resolves the database file path once per process.
///
/// `ONBOARD_DB_PATH` wins when set and non-blank; otherwise the file lives in
/// the system temp directory.
pub fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
        })
        .clone()
}

fn parse_employee_id(raw: &str) -> ApiResult<EmployeeId> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiFailure::EmployeeNotFound)
}

fn parse_item_id(raw: &str) -> Option<ChecklistItemId> {
    Uuid::parse_str(raw.trim()).ok()
}

fn parse_body<T: DeserializeOwned>(body: Value) -> ApiResult<T> {
    serde_json::from_value(body)
        .map_err(|err| ApiFailure::BadRequest(format!("invalid request body: {err}")))
}

fn respond<T: Serialize>(operation: &'static str, success: u16, result: ApiResult<T>) -> ApiResponse {
    let failure = match result {
        Ok(payload) => match serde_json::to_value(payload) {
            Ok(body) => {
                return ApiResponse {
                    status: success,
                    body,
                }
            }
            Err(err) => ApiFailure::Unavailable(format!("response encoding failed: {err}")),
        },
        Err(failure) => failure,
    };

    match failure {
        ApiFailure::BadRequest(message) => {
            debug!("event=api_request module=api op={operation} status=rejected code=400");
            ApiResponse::message(400, message)
        }
        ApiFailure::EmployeeNotFound => ApiResponse::message(404, "Employee not found"),
        ApiFailure::Service(err) => match err.kind() {
            ErrorKind::Validation => ApiResponse::message(400, err.to_string()),
            ErrorKind::Uniqueness => ApiResponse::message(409, err.to_string()),
            ErrorKind::NotFound => ApiResponse::message(404, not_found_message(&err)),
            ErrorKind::Internal => {
                error!("event=api_request module=api op={operation} status=error code=500 error={err}");
                ApiResponse::message(500, SERVER_ERROR_MESSAGE)
            }
        },
        ApiFailure::Unavailable(details) => {
            error!("event=api_request module=api op={operation} status=error code=500 error={details}");
            ApiResponse::message(500, SERVER_ERROR_MESSAGE)
        }
    }
}

fn not_found_message(err: &OnboardingError) -> &'static str {
    match err {
        OnboardingError::TaskNotFound { .. } => "Task not found",
        OnboardingError::DocumentNotFound { .. } => "Document not found",
        _ => "Employee not found",
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiResponse, OnboardingApi};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn api() -> (TempDir, OnboardingApi) {
        let dir = tempfile::tempdir().expect("temp dir");
        let api = OnboardingApi::new(dir.path().join("onboard.sqlite3"));
        (dir, api)
    }

    fn ada_body() -> Value {
        json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ADA@X.COM",
            "position": "Engineer",
            "department": "R&D",
            "startDate": "2024-01-01"
        })
    }

    fn id_of(response: &ApiResponse) -> String {
        response.body["id"]
            .as_str()
            .expect("response should carry an id")
            .to_string()
    }

    #[test]
    fn create_returns_201_with_seeded_record() {
        let (_dir, api) = api();

        let response = api.create_employee(ada_body());
        assert_eq!(response.status, 201);
        assert_eq!(response.body["email"], "ada@x.com");
        assert_eq!(response.body["status"], "pending");
        assert_eq!(response.body["onboardingProgress"], 0.0);
        assert_eq!(response.body["tasks"].as_array().map(Vec::len), Some(8));
        assert_eq!(response.body["documents"], json!([]));
    }

    #[test]
    fn create_maps_validation_and_uniqueness_failures() {
        let (_dir, api) = api();

        let mut invalid = ada_body();
        invalid["email"] = json!("nope");
        assert_eq!(api.create_employee(invalid).status, 400);

        let mut missing = ada_body();
        missing.as_object_mut().unwrap().remove("department");
        assert_eq!(api.create_employee(missing).status, 400);

        assert_eq!(api.create_employee(json!("not an object")).status, 400);

        assert_eq!(api.create_employee(ada_body()).status, 201);
        let duplicate = api.create_employee(ada_body());
        assert_eq!(duplicate.status, 409);

        let listed = api.list_employees();
        assert_eq!(listed.status, 200);
        assert_eq!(listed.body.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn unknown_or_malformed_ids_map_to_404() {
        let (_dir, api) = api();

        let response = api.get_employee("not-a-uuid");
        assert_eq!(response.status, 404);
        assert_eq!(response.body["message"], "Employee not found");

        let response = api.delete_employee("6f0e7c1e-0000-4000-8000-000000000000");
        assert_eq!(response.status, 404);
    }

    #[test]
    fn delete_then_get_is_404() {
        let (_dir, api) = api();
        let created = api.create_employee(ada_body());
        let id = id_of(&created);

        let deleted = api.delete_employee(&id);
        assert_eq!(deleted.status, 200);
        assert_eq!(deleted.body["message"], "Employee deleted successfully");
        assert_eq!(api.get_employee(&id).status, 404);
        assert_eq!(api.list_tasks(&id).status, 404);
    }

    #[test]
    fn replace_and_progress_roundtrip() {
        let (_dir, api) = api();
        let id = id_of(&api.create_employee(ada_body()));

        let replaced = api.replace_employee(&id, json!({ "status": "active" }));
        assert_eq!(replaced.status, 200);
        assert_eq!(replaced.body["status"], "active");

        let bad_status = api.replace_employee(&id, json!({ "status": "archived" }));
        assert_eq!(bad_status.status, 400);

        let progressed = api.set_progress(&id, json!({ "progress": 75 }));
        assert_eq!(progressed.status, 200);
        assert_eq!(progressed.body["onboardingProgress"], 75.0);
        assert_eq!(progressed.body["status"], "active");

        assert_eq!(api.set_progress(&id, json!({})).status, 400);
    }

    #[test]
    fn task_endpoints_follow_status_contract() {
        let (_dir, api) = api();
        let id = id_of(&api.create_employee(ada_body()));

        let added = api.add_task(
            &id,
            json!({ "title": "Meet the team", "description": "Lunch", "dueDate": "2024-01-05" }),
        );
        assert_eq!(added.status, 201);
        assert_eq!(added.body["status"], "pending");
        let task_id = id_of(&added);

        let updated = api.set_task_status(&id, &task_id, json!({ "status": "completed" }));
        assert_eq!(updated.status, 200);
        assert_eq!(updated.body["status"], "completed");

        let rejected = api.set_task_status(&id, &task_id, json!({ "status": "finished" }));
        assert_eq!(rejected.status, 400);

        let missing =
            api.set_task_status(&id, "nonexistent-task-id", json!({ "status": "completed" }));
        assert_eq!(missing.status, 404);
        assert_eq!(missing.body["message"], "Task not found");

        let tasks = api.list_tasks(&id);
        assert_eq!(tasks.status, 200);
        assert_eq!(tasks.body.as_array().map(Vec::len), Some(9));
        assert_eq!(tasks.body[8]["status"], "completed");

        let documents = api.list_documents(&id);
        assert_eq!(documents.body, json!([]));
    }

    #[test]
    fn document_endpoints_follow_status_contract() {
        let (_dir, api) = api();
        let id = id_of(&api.create_employee(ada_body()));

        let added = api.add_document(&id, json!({ "name": "Passport", "url": "vault://p" }));
        assert_eq!(added.status, 201);
        assert_eq!(added.body["status"], "pending");
        assert!(added.body["uploadedAt"].as_i64().is_some());
        let document_id = id_of(&added);

        let approved =
            api.set_document_status(&id, &document_id, json!({ "status": "approved" }));
        assert_eq!(approved.status, 200);
        assert_eq!(approved.body["status"], "approved");

        let missing = api.set_document_status(&id, "missing", json!({ "status": "approved" }));
        assert_eq!(missing.status, 404);
        assert_eq!(missing.body["message"], "Document not found");

        let unknown_employee =
            api.set_document_status("missing", &document_id, json!({ "status": "approved" }));
        assert_eq!(unknown_employee.status, 404);
        assert_eq!(unknown_employee.body["message"], "Employee not found");
    }

    #[test]
    fn unopenable_database_is_an_opaque_server_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a directory").expect("write blocker");
        let api = OnboardingApi::new(blocker.join("onboard.sqlite3"));

        let response = api.list_employees();
        assert_eq!(response.status, 500);
        assert_eq!(response.body["message"], "Server error");
        assert!(!response.is_success());
    }
}
