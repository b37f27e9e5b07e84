use ::common::ChatState;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use server::entity::{chat, chat_room};

use crate::common::{TestApp, routes};

async fn room_state(app: &TestApp, student_id: &str) -> Option<ChatState> {
    chat_room::Entity::find_by_id(student_id.to_string())
        .one(&app.db)
        .await
        .unwrap()
        .map(|r| r.state)
}

async fn thread_len(app: &TestApp, student_id: &str) -> u64 {
    chat::Entity::find()
        .filter(chat::Column::ChatRoomId.eq(student_id))
        .count(&app.db)
        .await
        .unwrap()
}

mod student_side {
    use super::*;

    #[tokio::test]
    async fn question_creates_the_room_waiting() {
        let app = TestApp::spawn().await;
        let token = app.student_token("S1");

        let res = app
            .post_with_token(
                routes::CHAT_STUDENT,
                &json!({"question": "When is the deadline?"}),
                &token,
            )
            .await;
        assert_eq!(res.code(), 2000);

        assert_eq!(room_state(&app, "S1").await, Some(ChatState::Waiting));
        assert_eq!(thread_len(&app, "S1").await, 1);
    }

    #[tokio::test]
    async fn second_question_reuses_the_room() {
        let app = TestApp::spawn().await;
        let token = app.student_token("S1");

        for q in ["First question", "Second question"] {
            app.post_with_token(routes::CHAT_STUDENT, &json!({"question": q}), &token)
                .await;
        }

        let rooms = chat_room::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(rooms, 1);
        assert_eq!(thread_len(&app, "S1").await, 2);
    }

    #[tokio::test]
    async fn a_new_question_reopens_a_completed_room() {
        let app = TestApp::spawn().await;
        let token = app.student_token("S1");
        let prof = app.professor_token();

        app.post_with_token(routes::CHAT_STUDENT, &json!({"question": "Q1"}), &token)
            .await;
        app.patch_with_token_no_body(
            &format!("{}?student_id=S1", routes::CHAT_PROF),
            &prof,
        )
        .await;
        assert_eq!(room_state(&app, "S1").await, Some(ChatState::Complete));

        app.post_with_token(routes::CHAT_STUDENT, &json!({"question": "Q2"}), &token)
            .await;
        assert_eq!(room_state(&app, "S1").await, Some(ChatState::Waiting));
    }

    #[tokio::test]
    async fn blank_question_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.student_token("S1");

        let res = app
            .post_with_token(routes::CHAT_STUDENT, &json!({"question": "   "}), &token)
            .await;
        assert_eq!(res.code(), 4000);
    }

    #[tokio::test]
    async fn empty_thread_reads_as_an_empty_list() {
        let app = TestApp::spawn().await;
        let token = app.student_token("S1");

        let res = app.get_with_token(routes::CHAT_STUDENT, &token).await;
        assert_eq!(res.code(), 2000);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 0);
    }
}

mod professor_side {
    use super::*;

    #[tokio::test]
    async fn opening_a_thread_marks_the_room_read() {
        let app = TestApp::spawn().await;
        let token = app.student_token("S1");
        app.post_with_token(routes::CHAT_STUDENT, &json!({"question": "Q"}), &token)
            .await;

        let res = app
            .get_with_token(
                &format!("{}?student_id=S1", routes::CHAT_PROF),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 2000);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["data"][0]["is_question"], true);

        assert_eq!(room_state(&app, "S1").await, Some(ChatState::Confirmation));
    }

    #[tokio::test]
    async fn answering_appends_and_completes() {
        let app = TestApp::spawn().await;
        let token = app.student_token("S1");
        app.post_with_token(routes::CHAT_STUDENT, &json!({"question": "Q"}), &token)
            .await;

        let res = app
            .post_with_token(
                routes::CHAT_PROF,
                &json!({"student_id": "S1", "comment": "The deadline is Friday."}),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 2000);

        assert_eq!(room_state(&app, "S1").await, Some(ChatState::Complete));
        assert_eq!(thread_len(&app, "S1").await, 2);
    }

    #[tokio::test]
    async fn answering_a_student_without_a_room_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                routes::CHAT_PROF,
                &json!({"student_id": "GHOST", "comment": "Hello?"}),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.code(), 4043);
    }

    #[tokio::test]
    async fn marking_an_unknown_room_complete_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .patch_with_token_no_body(
                &format!("{}?student_id=GHOST", routes::CHAT_PROF),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 4043);
    }

    #[tokio::test]
    async fn room_list_reports_totals_with_waiting_first() {
        let app = TestApp::spawn().await;
        for student in ["S1", "S2", "S3"] {
            let token = app.student_token(student);
            app.post_with_token(routes::CHAT_STUDENT, &json!({"question": "Q"}), &token)
                .await;
        }
        // Complete one room; it should sort after the waiting ones.
        app.patch_with_token_no_body(
            &format!("{}?student_id=S1", routes::CHAT_PROF),
            &app.professor_token(),
        )
        .await;

        let res = app
            .get_with_token(
                &format!("{}?page=0&page_size=10", routes::CHAT_PROF_LIST),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 2000);
        assert_eq!(res.body["data"]["total_elements"], 3);

        let list = res.body["data"]["chat_list"].as_array().unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0]["chat_state"], 0);
        assert_eq!(list.last().unwrap()["student_id"], "S1");
    }

    #[tokio::test]
    async fn students_cannot_use_professor_endpoints() {
        let app = TestApp::spawn().await;
        let token = app.student_token("S1");

        let res = app
            .get_with_token(&format!("{}?student_id=S2", routes::CHAT_PROF), &token)
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.code(), 4012);
    }
}
