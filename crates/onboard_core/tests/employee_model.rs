use chrono::NaiveDate;
use onboard_core::{
    DocumentInput, Employee, EmployeeStatus, EmployeeUpdate, EmployeeValidationError,
    NewEmployee, Task, TaskInput, TaskStatus,
};
use uuid::Uuid;

fn ada() -> NewEmployee {
    NewEmployee {
        first_name: " Ada ".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ADA@X.COM".to_string(),
        position: "Engineer".to_string(),
        department: "R&D".to_string(),
        start_date: "2024-01-01".to_string(),
        ..NewEmployee::default()
    }
}

#[test]
fn create_sets_defaults_and_normalizes_profile() {
    let employee = Employee::create(ada(), 1_700_000_000_000).unwrap();

    assert!(!employee.id.is_nil());
    assert_eq!(employee.first_name, "Ada");
    assert_eq!(employee.email, "ada@x.com");
    assert_eq!(
        employee.start_date,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    );
    assert_eq!(employee.status, EmployeeStatus::Pending);
    assert_eq!(employee.onboarding_progress, 0.0);
    assert!(employee.documents.is_empty());
    assert!(employee.tasks.is_empty());
    assert_eq!(employee.created_at, 1_700_000_000_000);
    assert_eq!(employee.updated_at, 1_700_000_000_000);
}

#[test]
fn create_rejects_missing_required_fields() {
    let mut input = ada();
    input.department = "   ".to_string();
    assert_eq!(
        Employee::create(input, 0).unwrap_err(),
        EmployeeValidationError::MissingField("department")
    );

    let mut input = ada();
    input.email = "not-an-email".to_string();
    assert_eq!(
        Employee::create(input, 0).unwrap_err(),
        EmployeeValidationError::InvalidEmail("not-an-email".to_string())
    );

    let mut input = ada();
    input.start_date = "01/02/2024".to_string();
    assert!(matches!(
        Employee::create(input, 0).unwrap_err(),
        EmployeeValidationError::InvalidDate {
            field: "startDate",
            ..
        }
    ));
}

#[test]
fn create_rejects_duplicate_item_ids_in_supplied_checklist() {
    let shared = Uuid::new_v4();
    let mut input = ada();
    input.tasks = Some(vec![
        TaskInput {
            id: Some(shared),
            title: "one".to_string(),
            ..TaskInput::default()
        },
        TaskInput {
            id: Some(shared),
            title: "two".to_string(),
            ..TaskInput::default()
        },
    ]);

    assert_eq!(
        Employee::create(input, 0).unwrap_err(),
        EmployeeValidationError::DuplicateItemId(shared)
    );
}

#[test]
fn apply_update_replaces_supplied_fields_only() {
    let mut employee = Employee::create(ada(), 1_000).unwrap();
    let original_email = employee.email.clone();

    employee
        .apply_update(
            EmployeeUpdate {
                position: Some("Principal Engineer".to_string()),
                status: Some("active".to_string()),
                onboarding_progress: Some(40.0),
                documents: Some(vec![DocumentInput {
                    name: "Contract".to_string(),
                    url: "https://files.example/contract.pdf".to_string(),
                    ..DocumentInput::default()
                }]),
                ..EmployeeUpdate::default()
            },
            2_000,
        )
        .unwrap();

    assert_eq!(employee.position, "Principal Engineer");
    assert_eq!(employee.status, EmployeeStatus::Active);
    assert_eq!(employee.onboarding_progress, 40.0);
    assert_eq!(employee.email, original_email);
    assert_eq!(employee.documents.len(), 1);
    assert_eq!(employee.documents[0].uploaded_at, 2_000);
    assert_eq!(employee.updated_at, 2_000);
    assert_eq!(employee.created_at, 1_000);
}

#[test]
fn failed_update_leaves_employee_untouched() {
    let mut employee = Employee::create(ada(), 1_000).unwrap();
    let before = employee.clone();

    let err = employee
        .apply_update(
            EmployeeUpdate {
                first_name: Some("Augusta".to_string()),
                status: Some("onboarding".to_string()),
                ..EmployeeUpdate::default()
            },
            2_000,
        )
        .unwrap_err();

    assert_eq!(
        err,
        EmployeeValidationError::InvalidStatus {
            field: "status",
            value: "onboarding".to_string(),
        }
    );
    assert_eq!(employee, before);
}

#[test]
fn apply_update_rejects_non_finite_progress() {
    let mut employee = Employee::create(ada(), 1_000).unwrap();
    let err = employee
        .apply_update(
            EmployeeUpdate {
                onboarding_progress: Some(f64::NAN),
                ..EmployeeUpdate::default()
            },
            2_000,
        )
        .unwrap_err();
    assert_eq!(err, EmployeeValidationError::NonFiniteProgress);
}

#[test]
fn nested_lookup_scans_owning_collection() {
    let mut employee = Employee::create(ada(), 0).unwrap();
    let task = Task::new("Badge", "Print key card", None);
    let task_id = task.id;
    employee.tasks.push(task);

    assert_eq!(employee.task(task_id).unwrap().title, "Badge");
    assert!(employee.task(Uuid::new_v4()).is_none());
    assert!(employee.document(task_id).is_none());

    employee.task_mut(task_id).unwrap().status = TaskStatus::Completed;
    assert_eq!(employee.task(task_id).unwrap().status, TaskStatus::Completed);
}

#[test]
fn employee_serialization_uses_camel_case_wire_fields() {
    let mut employee = Employee::create(ada(), 1_700_000_000_000).unwrap();
    let mut task = Task::new(
        "Create system accesses",
        "Accounts",
        NaiveDate::from_ymd_opt(2024, 1, 15),
    );
    task.status = TaskStatus::InProgress;
    employee.tasks.push(task);

    let json = serde_json::to_value(&employee).unwrap();
    assert_eq!(json["firstName"], "Ada");
    assert_eq!(json["email"], "ada@x.com");
    assert_eq!(json["startDate"], "2024-01-01");
    assert_eq!(json["status"], "pending");
    assert_eq!(json["onboardingProgress"], 0.0);
    assert_eq!(json["tasks"][0]["status"], "in-progress");
    assert_eq!(json["tasks"][0]["dueDate"], "2024-01-15");
    assert_eq!(json["createdAt"], 1_700_000_000_000_i64);

    let decoded: Employee = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, employee);
}
