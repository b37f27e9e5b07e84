use serde_json::json;

use crate::common::{TestApp, routes};

fn assignment_body() -> serde_json::Value {
    json!({
        "title": "Week 1 assignment",
        "description": "Write about artificial intelligence",
        "score": 10,
        "start_date": "2024-08-05",
        "end_date": "2024-08-20",
        "prompt": "Write at least 500 words",
    })
}

#[tokio::test]
async fn professor_creates_then_lists_assignments() {
    let app = TestApp::spawn().await;

    let res = app
        .post_with_token(routes::ASSIGNMENT, &assignment_body(), &app.professor_token())
        .await;
    assert_eq!(res.status, 201);
    assert_eq!(res.code(), 2010);

    let res = app
        .get_with_token(routes::ASSIGNMENT_LIST, &app.student_token("S1"))
        .await;
    assert_eq!(res.code(), 2000);

    let assignments = res.body["data"]["assignments"].as_array().unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0]["title"], "Week 1 assignment");
    assert_eq!(assignments[0]["score"], 10);
}

#[tokio::test]
async fn students_cannot_create_assignments() {
    let app = TestApp::spawn().await;

    let res = app
        .post_with_token(routes::ASSIGNMENT, &assignment_body(), &app.student_token("S1"))
        .await;
    assert_eq!(res.status, 403);
    assert_eq!(res.code(), 4012);
}

#[tokio::test]
async fn an_inverted_window_is_rejected() {
    let app = TestApp::spawn().await;

    let mut body = assignment_body();
    body["start_date"] = json!("2024-08-20");
    body["end_date"] = json!("2024-08-05");

    let res = app
        .post_with_token(routes::ASSIGNMENT, &body, &app.professor_token())
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.code(), 4000);
}

#[tokio::test]
async fn a_blank_title_is_rejected() {
    let app = TestApp::spawn().await;

    let mut body = assignment_body();
    body["title"] = json!("   ");

    let res = app
        .post_with_token(routes::ASSIGNMENT, &body, &app.professor_token())
        .await;
    assert_eq!(res.code(), 4000);
}
