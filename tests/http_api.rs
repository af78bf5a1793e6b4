//! Black-box tests driving the three portals over HTTP.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};

use nexus_enroll::api;
use nexus_enroll::app_state::AppState;
use nexus_enroll::config::EnrollConfig;

struct TestServers {
    student: String,
    faculty: String,
    admin: String,
    state: AppState,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl TestServers {
    async fn spawn() -> Self {
        let config = EnrollConfig {
            event_bus_poll_interval: Duration::from_millis(20),
            ..EnrollConfig::default()
        };
        let state = AppState::build(&config).await;

        let mut handles = Vec::new();
        let student = bind(api::student_router().with_state(state.clone()), &mut handles).await;
        let faculty = bind(api::faculty_router().with_state(state.clone()), &mut handles).await;
        let admin = bind(api::admin_router().with_state(state.clone()), &mut handles).await;

        Self {
            student,
            faculty,
            admin,
            state,
            handles,
        }
    }
}

impl Drop for TestServers {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

async fn bind(app: axum::Router, handles: &mut Vec<tokio::task::JoinHandle<()>>) -> String {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind ephemeral port");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has no address");
    };
    handles.push(tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    }));
    format!("http://{addr}")
}

async fn get(client: &reqwest::Client, url: String) -> (StatusCode, Value) {
    let Ok(res) = client.get(url).send().await else {
        panic!("request failed");
    };
    let status = res.status();
    let Ok(body) = res.json::<Value>().await else {
        panic!("response is not JSON");
    };
    (status, body)
}

async fn post(client: &reqwest::Client, url: String, body: &Value) -> (StatusCode, Value) {
    let Ok(res) = client.post(url).json(body).send().await else {
        panic!("request failed");
    };
    let status = res.status();
    let Ok(body) = res.json::<Value>().await else {
        panic!("response is not JSON");
    };
    (status, body)
}

fn roster_contains(body: &Value, student_id: &str) -> bool {
    body["students"]
        .as_array()
        .is_some_and(|students| students.iter().any(|s| s["student_id"] == student_id))
}

async fn wait_for_roster(
    client: &reqwest::Client,
    srv: &TestServers,
    course_id: &str,
    student_id: &str,
    present: bool,
) -> bool {
    for _ in 0..50 {
        let (status, body) = get(client, format!("{}/roster/{course_id}", srv.faculty)).await;
        if status == StatusCode::OK && roster_contains(&body, student_id) == present {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn end_to_end_enrollment_flow() {
    let srv = TestServers::spawn().await;
    let client = reqwest::Client::new();

    // Role UIs
    let (_, ui) = get(&client, format!("{}/ui", srv.student)).await;
    assert_eq!(ui["role"], "student");
    let (_, ui) = get(&client, format!("{}/ui", srv.faculty)).await;
    assert_eq!(ui["role"], "faculty");
    let (_, ui) = get(&client, format!("{}/ui", srv.admin)).await;
    assert_eq!(ui["role"], "administrator");

    // Admin creates a course
    let (status, body) = post(
        &client,
        format!("{}/course", srv.admin),
        &json!({
            "course_id": "CS999",
            "name": "Systems Integration",
            "instructor": "Dr. Test",
            "capacity": 10,
            "prerequisites": ["CS201"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["course"]["course_id"], "CS999");
    assert_eq!(body["course"]["status"], "active");

    // Mistyped payload
    let (status, body) = post(
        &client,
        format!("{}/course", srv.admin),
        &json!({ "course_id": 123, "name": null, "instructor": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], 1001);

    // Listing
    let (status, body) = get(&client, format!("{}/courses", srv.student)).await;
    assert_eq!(status, StatusCode::OK);
    let Some(courses) = body["courses"].as_array() else {
        panic!("courses missing: {body}");
    };
    assert!(courses.iter().any(|c| c["course_id"] == "CS101"));
    assert!(courses.iter().any(|c| c["course_id"] == "CS999"));

    // Enroll and observe the roster catching up
    let (status, body) = post(
        &client,
        format!("{}/enroll", srv.student),
        &json!({ "student_id": "STU004", "course_id": "CS101" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Successfully enrolled in Intro to Programming");
    assert!(wait_for_roster(&client, &srv, "CS101", "STU004", true).await);

    // Unmet prerequisite
    let (status, body) = post(
        &client,
        format!("{}/enroll", srv.student),
        &json!({ "student_id": "STU002", "course_id": "CS201" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.contains("Missing prerequisites"))
    );
    assert!(body["validation_results"].is_array());

    // Grades: illegal value rejects the batch
    let (status, body) = post(
        &client,
        format!("{}/submit_grades", srv.faculty),
        &json!({ "course_id": "CS101", "grades": [{ "student_id": "STU004", "grade": "Z" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["processing"]["invalid_entries"][0]["grade"], "Z");

    let (status, body) = post(
        &client,
        format!("{}/submit_grades", srv.faculty),
        &json!({
            "course_id": "CS101",
            "grades": [
                { "student_id": "STU004", "grade": "A" },
                { "student_id": "STU001", "grade": "B+" },
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Grades submitted for 2 students in CS101");
    assert_eq!(body["processing"]["valid"], true);

    // Drop and observe removal
    let (status, body) = post(
        &client,
        format!("{}/drop", srv.student),
        &json!({ "student_id": "STU004", "course_id": "CS101" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Successfully dropped Intro to Programming");
    assert!(wait_for_roster(&client, &srv, "CS101", "STU004", false).await);

    // System announcement
    let (status, body) = post(
        &client,
        format!("{}/config", srv.admin),
        &json!({ "message": "System will undergo maintenance at 11 PM" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "System will undergo maintenance at 11 PM");
}

#[tokio::test]
async fn missing_prerequisites_are_all_listed() {
    let srv = TestServers::spawn().await;
    let client = reqwest::Client::new();

    let (status, _) = post(
        &client,
        format!("{}/course", srv.admin),
        &json!({
            "course_id": "CS401",
            "name": "Compilers",
            "instructor": "Dr. Lee",
            "prerequisites": ["CS201", "CS301"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(
        &client,
        format!("{}/enroll", srv.student),
        &json!({ "student_id": "STU002", "course_id": "CS401" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let Some(message) = body["message"].as_str() else {
        panic!("message missing: {body}");
    };
    assert!(message.contains("CS201"));
    assert!(message.contains("CS301"));

    let (_, report) = get(&client, format!("{}/reports/enrollment", srv.admin)).await;
    let Some(rows) = report["data"].as_array() else {
        panic!("report rows missing: {report}");
    };
    let cs401 = rows.iter().find(|row| row["course_id"] == "CS401");
    assert_eq!(cs401.map(|row| row["enrolled"].clone()), Some(json!(0)));
}

#[tokio::test]
async fn first_enrollment_with_met_prerequisite_succeeds() {
    let srv = TestServers::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = post(
        &client,
        format!("{}/enroll", srv.student),
        &json!({ "student_id": "STU001", "course_id": "CS201" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(
        body["validation_results"]
            .as_array()
            .is_some_and(|results| results.iter().all(|r| r["valid"] == true))
    );
}

#[tokio::test]
async fn unknown_course_is_not_found_everywhere() {
    let srv = TestServers::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = post(
        &client,
        format!("{}/enroll", srv.student),
        &json!({ "student_id": "STU001", "course_id": "NOPE" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2001);

    let (status, _) = get(&client, format!("{}/roster/NOPE", srv.faculty)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(
        &client,
        format!("{}/submit_grades", srv.faculty),
        &json!({ "course_id": "NOPE", "grades": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn capacity_holds_under_concurrent_enrollment() {
    let srv = TestServers::spawn().await;
    let client = reqwest::Client::new();

    let (status, _) = post(
        &client,
        format!("{}/course", srv.admin),
        &json!({ "course_id": "LAB1", "name": "Lab", "instructor": "Dr. Busy", "capacity": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut tasks = Vec::new();
    for n in 0..6 {
        let client = client.clone();
        let url = format!("{}/enroll", srv.student);
        tasks.push(tokio::spawn(async move {
            let body = json!({ "student_id": format!("STU1{n:02}"), "course_id": "LAB1" });
            client
                .post(url)
                .json(&body)
                .send()
                .await
                .map(|res| res.status())
        }));
    }

    let mut accepted = 0;
    for task in tasks {
        if matches!(task.await, Ok(Ok(StatusCode::OK))) {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 2);

    let (_, body) = get(&client, format!("{}/courses", srv.admin)).await;
    let Some(courses) = body["courses"].as_array() else {
        panic!("courses missing: {body}");
    };
    let lab = courses.iter().find(|c| c["course_id"] == "LAB1");
    assert_eq!(lab.map(|c| c["enrolled"].clone()), Some(json!(2)));
}

#[tokio::test]
async fn pass_fail_courses_accept_only_p_and_f() {
    let srv = TestServers::spawn().await;
    let client = reqwest::Client::new();

    let (status, _) = post(
        &client,
        format!("{}/course", srv.admin),
        &json!({
            "course_id": "SEM1",
            "name": "Seminar",
            "instructor": "Dr. Grey",
            "grading_scheme": "pass_fail",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(
        &client,
        format!("{}/submit_grades", srv.faculty),
        &json!({ "course_id": "SEM1", "grades": [{ "student_id": "STU001", "grade": "A" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["processing"]["scheme"], "pass_fail");

    let (status, _) = post(
        &client,
        format!("{}/submit_grades", srv.faculty),
        &json!({ "course_id": "SEM1", "grades": [{ "student_id": "STU001", "grade": "P" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn config_update_tolerates_any_body() {
    let srv = TestServers::spawn().await;
    let client = reqwest::Client::new();

    let Ok(res) = client
        .post(format!("{}/config", srv.admin))
        .body("not json")
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(res.status(), StatusCode::OK);
    let Ok(body) = res.json::<Value>().await else {
        panic!("response is not JSON");
    };
    assert_eq!(body["message"], "System maintenance scheduled");

    for _ in 0..50 {
        if srv
            .state
            .notifications
            .recent()
            .await
            .iter()
            .any(|n| n.message.contains("System maintenance scheduled"))
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("config notification never delivered");
}

#[tokio::test]
async fn health_and_docs_are_served_per_portal() {
    let srv = TestServers::spawn().await;
    let client = reqwest::Client::new();

    for (base, name) in [
        (&srv.student, "student"),
        (&srv.faculty, "faculty"),
        (&srv.admin, "admin"),
    ] {
        let (status, body) = get(&client, format!("{base}/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], name);
    }

    let (status, doc) = get(&client, format!("{}/api-docs/openapi.json", srv.faculty)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/submit_grades"].is_object());
}
