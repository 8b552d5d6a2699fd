mod common;

use axum::http::{Method, StatusCode};
use chrono::{TimeZone, Utc};
use common::{body_json, delete, get, send_json, test_app, Reply, StubRoutines};
use project_manager_api::database::{RoutineKind, SqlParam};
use serde_json::json;

#[tokio::test]
async fn alter_module_with_only_id_binds_nulls() {
    let stub = StubRoutines::new();
    let res = send_json(test_app(stub.clone()), Method::PUT, "/api/putAlterModule", r#"{"moduleId":3}"#).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({ "message": "Module updated successfully" }));

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].kind(), RoutineKind::Procedure);
    assert_eq!(calls[0].name(), "put_alter_module");
    assert_eq!(
        calls[0].params(),
        &[SqlParam::Int(3), SqlParam::OptText(None), SqlParam::OptText(None)]
    );
}

#[tokio::test]
async fn alter_module_failure_message() {
    let stub = StubRoutines::with_replies([Reply::Fail]);
    let res = send_json(test_app(stub), Method::PUT, "/api/putAlterModule", r#"{"moduleId":3,"moduleName":"n"}"#).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await, json!({ "error": "Failed to create module" }));
}

#[tokio::test]
async fn new_module_returns_message_object() {
    let stub = StubRoutines::new();
    let body = r#"{"projectId":2,"moduleName":"Billing","description":"Invoices","createdBy":6}"#;
    let res = send_json(test_app(stub.clone()), Method::POST, "/api/postNewModule", body).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({ "message": "Module created successfully" }));
    assert_eq!(
        stub.calls()[0].params(),
        &[
            SqlParam::Int(2),
            SqlParam::Text("Billing".into()),
            SqlParam::Text("Invoices".into()),
            SqlParam::Int(6),
        ]
    );
}

#[tokio::test]
async fn module_reads_take_their_own_ids() {
    let stub = StubRoutines::with_replies([Reply::Json("[1]"), Reply::Json("{\"m\":1}")]);
    let app = test_app(stub.clone());

    let res = get(app.clone(), "/api/getModulesOfProject?projectId=2").await;
    assert_eq!(common::body_string(res).await, "[1]");
    let res = get(app, "/api/getModuleDetails?moduleId=9").await;
    assert_eq!(common::body_string(res).await, "{\"m\":1}");

    let calls = stub.calls();
    assert_eq!(stub.call_names(), vec!["get_modules_of_project", "get_module_details"]);
    assert_eq!(calls[1].params(), &[SqlParam::Int(9)]);
}

#[tokio::test]
async fn new_sub_module_binds_all_eight_fields() {
    let stub = StubRoutines::new();
    let body = r#"{
        "projectId": 1,
        "subModuleName": "Auth",
        "description": "Login flow",
        "startDate": "2025-02-01T08:00:00Z",
        "targetDate": "2025-03-01T17:00:00Z",
        "createdBy": 4,
        "picId": 5,
        "priorityId": 2
    }"#;
    let res = send_json(test_app(stub.clone()), Method::POST, "/api/postNewSubModule", body).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!("Sub-module created successfully"));
    assert_eq!(
        stub.calls()[0].params(),
        &[
            SqlParam::Int(1),
            SqlParam::Text("Auth".into()),
            SqlParam::Text("Login flow".into()),
            SqlParam::Timestamp(Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap()),
            SqlParam::Timestamp(Utc.with_ymd_and_hms(2025, 3, 1, 17, 0, 0).unwrap()),
            SqlParam::Int(4),
            SqlParam::Int(5),
            SqlParam::Int(2),
        ]
    );
}

#[tokio::test]
async fn new_sub_module_without_dates_leaves_validation_to_routine() {
    let stub = StubRoutines::new();
    let body = r#"{"projectId":1,"subModuleName":"S"}"#;
    let res = send_json(test_app(stub.clone()), Method::POST, "/api/postNewSubModule", body).await;

    assert_eq!(res.status(), StatusCode::OK);
    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    let zero = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(calls[0].params()[3], SqlParam::Timestamp(zero));
    assert_eq!(calls[0].params()[4], SqlParam::Timestamp(zero));
}

#[tokio::test]
async fn new_sub_module_rejected_by_routine_reports_failure() {
    let stub = StubRoutines::with_replies([Reply::Fail]);
    let res = send_json(test_app(stub.clone()), Method::POST, "/api/postNewSubModule", r#"{"projectId":1}"#).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await, json!({ "error": "Failed to create sub-module" }));
    assert_eq!(stub.call_names(), vec!["post_new_sub_module"]);
}

#[tokio::test]
async fn alter_sub_module_mixes_present_and_absent_fields() {
    let stub = StubRoutines::new();
    let body = r#"{"subModuleId": 6, "priorityId": 1, "targetDate": "2025-04-01T00:00:00Z"}"#;
    let res = send_json(test_app(stub.clone()), Method::PUT, "/api/putAlterSubModule", body).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({ "message": "subModule updated successfully" }));
    assert_eq!(
        stub.calls()[0].params(),
        &[
            SqlParam::Int(6),
            SqlParam::OptText(None),
            SqlParam::OptText(None),
            SqlParam::OptTimestamp(None),
            SqlParam::OptTimestamp(Some(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap())),
            SqlParam::OptInt(None),
            SqlParam::OptInt(Some(1)),
        ]
    );
}

#[tokio::test]
async fn drop_sub_module_success_and_failure() {
    let stub = StubRoutines::with_replies([Reply::Done, Reply::Fail]);
    let app = test_app(stub.clone());

    let res = delete(app.clone(), "/api/dropSubModule?subModuleId=5").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!("subModule dropped successfully"));

    let res = delete(app, "/api/dropSubModule?subModuleId=5").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await, json!({ "error": "Failed to drop subModule" }));

    assert_eq!(stub.call_names(), vec!["drop_sub_module", "drop_sub_module"]);
}
