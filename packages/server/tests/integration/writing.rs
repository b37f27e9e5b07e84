use ::common::WritingState;
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use server::entity::{feedback, writing};

use crate::common::{DEFAULT_FEEDBACK, TestApp, routes, wait_until};

fn submission_body(assignment_id: i32, state: i16, content: &str) -> serde_json::Value {
    json!({
        "assignment_id": assignment_id,
        "writing_state": state,
        "content": content,
    })
}

async fn count_writings(app: &TestApp, assignment_id: i32) -> u64 {
    writing::Entity::find()
        .filter(writing::Column::AssignmentId.eq(assignment_id))
        .count(&app.db)
        .await
        .expect("count failed")
}

async fn find_writing(
    app: &TestApp,
    assignment_id: i32,
    student_id: &str,
) -> Option<writing::Model> {
    writing::Entity::find()
        .filter(writing::Column::AssignmentId.eq(assignment_id))
        .filter(writing::Column::StudentId.eq(student_id))
        .one(&app.db)
        .await
        .expect("lookup failed")
}

mod submission {
    use super::*;

    #[tokio::test]
    async fn first_submission_reports_created_then_updated() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, None).await;
        let token = app.student_token("S1");

        let res = app
            .post_with_token(
                routes::WRITING_STUDENT,
                &submission_body(assignment_id, 1, "hello"),
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
        assert_eq!(res.code(), 2010);

        let res = app
            .post_with_token(
                routes::WRITING_STUDENT,
                &submission_body(assignment_id, 1, "hello2"),
                &token,
            )
            .await;
        assert_eq!(res.code(), 2011);

        assert_eq!(count_writings(&app, assignment_id).await, 1);
        let row = find_writing(&app, assignment_id, "S1").await.unwrap();
        assert_eq!(row.content, "hello2");
        assert_eq!(row.state, WritingState::Submitted);
        assert_eq!(row.score, 10);
    }

    #[tokio::test]
    async fn rejected_state_values_write_nothing() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, None).await;
        let token = app.student_token("S1");

        // NOT_SUBMITTED, GRADED, and an unparseable value are all refused.
        for state in [0, 2, 9] {
            let res = app
                .post_with_token(
                    routes::WRITING_STUDENT,
                    &submission_body(assignment_id, state, "hello"),
                    &token,
                )
                .await;
            assert_eq!(res.status, 400);
            assert_eq!(res.code(), 4001);
        }

        assert_eq!(count_writings(&app, assignment_id).await, 0);
    }

    #[tokio::test]
    async fn submission_outside_the_window_is_expired() {
        let app = TestApp::spawn().await;
        let today = Utc::now().date_naive();
        let past = app
            .create_assignment(
                today - chrono::Days::new(10),
                today - chrono::Days::new(5),
                10,
                None,
            )
            .await;
        let future = app
            .create_assignment(
                today + chrono::Days::new(5),
                today + chrono::Days::new(10),
                10,
                None,
            )
            .await;
        let token = app.student_token("S1");

        for assignment_id in [past, future] {
            let res = app
                .post_with_token(
                    routes::WRITING_STUDENT,
                    &submission_body(assignment_id, 1, "too late or too early"),
                    &token,
                )
                .await;
            assert_eq!(res.status, 400);
            assert_eq!(res.code(), 4090);
            assert_eq!(count_writings(&app, assignment_id).await, 0);
        }
    }

    #[tokio::test]
    async fn missing_assignment_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.student_token("S1");

        let res = app
            .post_with_token(
                routes::WRITING_STUDENT,
                &submission_body(99999, 1, "hello"),
                &token,
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.code(), 4047);
    }

    #[tokio::test]
    async fn requires_authentication() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, None).await;

        let res = app
            .post_without_token(
                routes::WRITING_STUDENT,
                &submission_body(assignment_id, 1, "hello"),
            )
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.code(), 4011);
    }

    #[tokio::test]
    async fn concurrent_identical_submissions_produce_one_row() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, None).await;
        let token = app.student_token("S1");

        let body = submission_body(assignment_id, 1, "racing");
        let (a, b) = tokio::join!(
            app.post_with_token(routes::WRITING_STUDENT, &body, &token),
            app.post_with_token(routes::WRITING_STUDENT, &body, &token),
        );

        assert!(a.code() == 2010 || a.code() == 2011);
        assert!(b.code() == 2010 || b.code() == 2011);
        assert_eq!(count_writings(&app, assignment_id).await, 1);
    }
}

mod grading {
    use super::*;

    fn grading_body(assignment_id: i32, student_id: &str, state: i16, score: i32) -> serde_json::Value {
        json!({
            "assignment_id": assignment_id,
            "student_id": student_id,
            "writing_state": state,
            "score": score,
        })
    }

    #[tokio::test]
    async fn grading_updates_state_and_score() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, None).await;
        let student = app.student_token("S1");
        app.post_with_token(
            routes::WRITING_STUDENT,
            &submission_body(assignment_id, 1, "essay"),
            &student,
        )
        .await;

        let res = app
            .patch_with_token(
                routes::WRITING_PROFESSOR,
                &grading_body(assignment_id, "S1", 2, 8),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 2000);

        let row = find_writing(&app, assignment_id, "S1").await.unwrap();
        assert_eq!(row.state, WritingState::Graded);
        assert_eq!(row.score, 8);
    }

    #[tokio::test]
    async fn grading_a_nonexistent_pair_is_a_soft_miss() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, None).await;

        let res = app
            .patch_with_token(
                routes::WRITING_PROFESSOR,
                &grading_body(assignment_id, "GHOST", 2, 8),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.code(), 4047);
    }

    #[tokio::test]
    async fn unknown_state_value_is_rejected() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, None).await;

        let res = app
            .patch_with_token(
                routes::WRITING_PROFESSOR,
                &grading_body(assignment_id, "S1", 9, 8),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 4001);
    }

    #[tokio::test]
    async fn constraint_rejected_score_reports_bad_state() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, None).await;
        let student = app.student_token("S1");
        app.post_with_token(
            routes::WRITING_STUDENT,
            &submission_body(assignment_id, 1, "essay"),
            &student,
        )
        .await;

        // The score check constraint fires inside the database; the caller
        // sees a bad state request, not a server error.
        let res = app
            .patch_with_token(
                routes::WRITING_PROFESSOR,
                &grading_body(assignment_id, "S1", 2, -5),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 4001);

        let row = find_writing(&app, assignment_id, "S1").await.unwrap();
        assert_eq!(row.score, 10);
    }

    #[tokio::test]
    async fn students_cannot_grade() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, None).await;

        let res = app
            .patch_with_token(
                routes::WRITING_PROFESSOR,
                &grading_body(assignment_id, "S1", 2, 8),
                &app.student_token("S1"),
            )
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.code(), 4012);
    }
}

mod reads {
    use super::*;

    #[tokio::test]
    async fn missing_submission_reads_as_empty_content() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, None).await;
        let token = app.student_token("S1");

        let res = app
            .get_with_token(
                &format!("{}?assignment_id={assignment_id}", routes::WRITING_STUDENT),
                &token,
            )
            .await;
        assert_eq!(res.code(), 2000);
        assert_eq!(res.body["data"]["content"], "");
    }

    #[tokio::test]
    async fn student_reads_back_their_own_content() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, None).await;
        let token = app.student_token("S1");
        app.post_with_token(
            routes::WRITING_STUDENT,
            &submission_body(assignment_id, 1, "my essay"),
            &token,
        )
        .await;

        let res = app
            .get_with_token(
                &format!("{}?assignment_id={assignment_id}", routes::WRITING_STUDENT),
                &token,
            )
            .await;
        assert_eq!(res.body["data"]["content"], "my essay");
    }

    #[tokio::test]
    async fn professor_view_of_missing_submission_is_default_empty() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, None).await;

        let res = app
            .get_with_token(
                &format!(
                    "{}?assignment_id={assignment_id}&student_id=GHOST",
                    routes::WRITING_PROFESSOR
                ),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 2000);
        assert_eq!(res.body["data"]["content"], "");
        assert_eq!(res.body["data"]["writing_state"], 0);
    }

    #[tokio::test]
    async fn list_returns_page_total_and_assignment_score() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(15, None).await;

        for student in ["S1", "S2", "S3"] {
            let token = app.student_token(student);
            app.post_with_token(
                routes::WRITING_STUDENT,
                &submission_body(assignment_id, 1, "essay"),
                &token,
            )
            .await;
        }

        let res = app
            .get_with_token(
                &format!(
                    "{}?assignment_id={assignment_id}&page=0&page_size=2",
                    routes::WRITING_PROFESSOR_LIST
                ),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 2000);
        assert_eq!(res.body["data"]["total_elements"], 3);
        assert_eq!(res.body["data"]["score"], 15);
        assert_eq!(res.body["data"]["writings"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_for_missing_assignment_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(
                &format!("{}?assignment_id=99999", routes::WRITING_PROFESSOR_LIST),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 4047);
    }
}

mod feedback_flow {
    use super::*;

    #[tokio::test]
    async fn feedback_returns_generated_text_and_audits_in_background() {
        let app = TestApp::spawn().await;
        let assignment_id = app.create_open_assignment(10, Some("Write 500 words")).await;
        let token = app.student_token("S1");

        let res = app
            .post_with_token(
                routes::WRITING_FEEDBACK,
                &json!({"assignment_id": assignment_id, "content": "my draft"}),
                &token,
            )
            .await;
        assert_eq!(res.code(), 2000);
        assert_eq!(res.body["data"]["feedback"], DEFAULT_FEEDBACK);

        // The audit row lands after the response; poll for it.
        wait_until(|| async {
            feedback::Entity::find()
                .filter(feedback::Column::StudentId.eq("S1"))
                .one(&app.db)
                .await
                .expect("feedback lookup failed")
                .is_some()
        })
        .await;

        let record = feedback::Entity::find()
            .filter(feedback::Column::StudentId.eq("S1"))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.request, "my draft");
        assert_eq!(record.response, DEFAULT_FEEDBACK);
    }

    #[tokio::test]
    async fn feedback_for_missing_assignment_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.student_token("S1");

        let res = app
            .post_with_token(
                routes::WRITING_FEEDBACK,
                &json!({"assignment_id": 99999, "content": "my draft"}),
                &token,
            )
            .await;
        assert_eq!(res.code(), 4047);
    }

    #[tokio::test]
    async fn generation_outage_maps_to_cant_get_resources() {
        let app = TestApp::spawn_with_failing_generation().await;
        let assignment_id = app.create_open_assignment(10, None).await;
        let token = app.student_token("S1");

        let res = app
            .post_with_token(
                routes::WRITING_FEEDBACK,
                &json!({"assignment_id": assignment_id, "content": "my draft"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 502);
        assert_eq!(res.code(), 4044);

        // Nothing was audited for the failed call.
        let count = feedback::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(count, 0);
    }
}
