use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;

use examera::error::Error;
use examera::models::exam::SubmitExamDto;
use examera::models::user::{LoginUserDto, RegisterUserDto, UserRole};
use examera::session::ledger::AnswerLedger;
use examera::session::submission::build_submission;
use examera::AppState;

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base_url: &str) -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::from_parts(
        base_url,
        dir.path().join("session.json"),
        Duration::from_secs(5),
    );
    (state, dir)
}

fn login_envelope() -> Value {
    json!({
        "success": true,
        "data": {
            "success": true,
            "token": "tok-1",
            "refreshToken": "ref-1",
            "user": {
                "id": 7,
                "username": "amina",
                "email": "amina@example.com",
                "firstName": "Amina",
                "lastName": "Karimova",
                "role": 1
            },
            "message": "ok"
        },
        "message": "Login successful",
        "errors": []
    })
}

fn login_dto() -> LoginUserDto {
    LoginUserDto {
        username: "amina".to_string(),
        password: "secret-pw".to_string(),
    }
}

#[tokio::test]
async fn login_persists_all_three_session_keys() {
    let router = Router::new().route(
        "/Auth/login",
        post(|| async { Json(login_envelope()) }),
    );
    let base_url = spawn_backend(router).await;
    let (state, dir) = client_for(&base_url);

    let auth = state.auth_service.login(&login_dto()).await.unwrap();
    assert_eq!(auth.token, "tok-1");

    assert_eq!(state.store.token().as_deref(), Some("tok-1"));
    assert_eq!(state.store.refresh_token().as_deref(), Some("ref-1"));
    let user = state.store.user().unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.role, UserRole::Student);
    assert!(state.store.is_authenticated());
    assert!(state.auth_service.is_student());

    // The session survives a process restart via the file.
    let raw = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
    let on_disk: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(on_disk["token"], "tok-1");
    assert_eq!(on_disk["refreshToken"], "ref-1");
    assert_eq!(on_disk["user"]["username"], "amina");
}

#[tokio::test]
async fn bearer_token_is_attached_once_logged_in() {
    async fn active_exams(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "Bearer tok-1")
            .unwrap_or(false);
        if !authorized {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "data": null, "message": "missing bearer"})),
            );
        }
        (
            StatusCode::OK,
            Json(json!({"success": true, "data": [], "message": "ok"})),
        )
    }

    let router = Router::new()
        .route("/Auth/login", post(|| async { Json(login_envelope()) }))
        .route("/Exam/active", get(active_exams));
    let base_url = spawn_backend(router).await;
    let (state, _dir) = client_for(&base_url);

    state.auth_service.login(&login_dto()).await.unwrap();
    let exams = state.exam_service.get_available_exams().await.unwrap();
    assert!(exams.is_empty());
}

#[tokio::test]
async fn unauthorized_response_tears_down_the_session() {
    let router = Router::new()
        .route("/Auth/login", post(|| async { Json(login_envelope()) }))
        .route("/Exam/active", get(|| async { StatusCode::UNAUTHORIZED }));
    let base_url = spawn_backend(router).await;
    let (state, dir) = client_for(&base_url);

    state.auth_service.login(&login_dto()).await.unwrap();
    let session_file: PathBuf = dir.path().join("session.json");
    assert!(session_file.exists());

    let err = state.exam_service.get_available_exams().await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));

    assert_eq!(state.store.token(), None);
    assert_eq!(state.store.refresh_token(), None);
    assert!(state.store.user().is_none());
    assert!(!state.store.is_authenticated());
    assert!(!session_file.exists());
}

#[tokio::test]
async fn failure_envelope_surfaces_the_backend_message() {
    let router = Router::new().route(
        "/Exam/active",
        get(|| async {
            Json(json!({
                "success": false,
                "data": null,
                "message": "Exam window is closed",
                "errors": ["No active exams"]
            }))
        }),
    );
    let base_url = spawn_backend(router).await;
    let (state, _dir) = client_for(&base_url);

    let err = state.exam_service.get_available_exams().await.unwrap_err();
    match err {
        Error::Server(message) => {
            assert!(message.contains("Exam window is closed"));
            assert!(message.contains("No active exams"));
        }
        other => panic!("expected a server error, got {:?}", other),
    }
}

#[tokio::test]
async fn submission_wire_format_is_camel_case_and_ordered() {
    type Captured = Arc<Mutex<Option<Value>>>;

    async fn submit(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
        *captured.lock().unwrap() = Some(body);
        Json(json!({
            "success": true,
            "data": {
                "id": 11,
                "userId": 7,
                "username": "amina",
                "examId": 3,
                "examTitle": "Algebra Basics",
                "totalScore": 80,
                "isPassed": true,
                "submissionDate": "2026-08-30T10:00:00Z"
            },
            "message": "Exam submitted"
        }))
    }

    let captured: Captured = Arc::new(Mutex::new(None));
    let router = Router::new()
        .route("/Student/submit-exam", post(submit))
        .with_state(captured.clone());
    let base_url = spawn_backend(router).await;
    let (state, _dir) = client_for(&base_url);

    let mut ledger = AnswerLedger::new();
    ledger.set(1, "2x");
    ledger.set(3, "True");
    let payload: SubmitExamDto = build_submission(3, &ledger);

    let result = state.exam_service.submit_exam(&payload).await.unwrap();
    assert_eq!(result.total_score, 80);
    assert!(result.is_passed);

    let body = captured.lock().unwrap().take().unwrap();
    assert_eq!(
        body,
        json!({
            "examId": 3,
            "answers": [
                {"questionId": 1, "studentAnswer": "2x"},
                {"questionId": 3, "studentAnswer": "True"}
            ]
        })
    );
}

#[tokio::test]
async fn invalid_credentials_never_reach_the_network() {
    // No backend is running; local validation must reject first.
    let (state, _dir) = client_for("http://127.0.0.1:9");

    let err = state
        .auth_service
        .login(&LoginUserDto {
            username: String::new(),
            password: "secret-pw".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = state
        .auth_service
        .register(&RegisterUserDto {
            username: "amina".to_string(),
            email: "amina@example.com".to_string(),
            password: "secret-pw".to_string(),
            confirm_password: "different".to_string(),
            first_name: "Amina".to_string(),
            last_name: "Karimova".to_string(),
            role: UserRole::Student,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
