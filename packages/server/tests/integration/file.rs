use serde_json::json;

use crate::common::{TestApp, routes};

async fn create_category(app: &TestApp, name: &str) -> i32 {
    let res = app
        .post_with_token(routes::CATEGORY, &json!({"name": name}), &app.professor_token())
        .await;
    assert_eq!(res.code(), 2010);

    let list = app
        .get_with_token(routes::CATEGORY_LIST, &app.professor_token())
        .await;
    list.body["data"]["categories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name)
        .and_then(|c| c["id"].as_i64())
        .expect("created category missing from list") as i32
}

mod categories {
    use super::*;

    #[tokio::test]
    async fn duplicate_category_names_conflict() {
        let app = TestApp::spawn().await;
        create_category(&app, "Lecture notes").await;

        let res = app
            .post_with_token(
                routes::CATEGORY,
                &json!({"name": "Lecture notes"}),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.status, 409);
        assert_eq!(res.code(), 4091);
    }

    #[tokio::test]
    async fn rename_and_delete_work_on_existing_categories() {
        let app = TestApp::spawn().await;
        let id = create_category(&app, "Notes").await;

        let res = app
            .put_with_token(
                routes::CATEGORY,
                &json!({"id": id, "name": "Slides"}),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 2000);

        let res = app
            .delete_with_token(&routes::category(id), &app.professor_token())
            .await;
        assert_eq!(res.code(), 2000);

        let res = app
            .delete_with_token(&routes::category(id), &app.professor_token())
            .await;
        assert_eq!(res.code(), 4046);
    }

    #[tokio::test]
    async fn renaming_a_missing_category_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .put_with_token(
                routes::CATEGORY,
                &json!({"id": 99999, "name": "Slides"}),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 4046);
    }

    #[tokio::test]
    async fn students_cannot_create_categories() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                routes::CATEGORY,
                &json!({"name": "Notes"}),
                &app.student_token("S1"),
            )
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.code(), 4012);
    }
}

mod files {
    use super::*;

    #[tokio::test]
    async fn upload_requires_an_existing_category() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_with_token(
                routes::FILE,
                "Lecture 1",
                99999,
                "slides.pdf",
                b"%PDF-1.4 fake".to_vec(),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.code(), 4046);
    }

    #[tokio::test]
    async fn upload_then_list_then_download_round_trip() {
        let app = TestApp::spawn().await;
        let category_id = create_category(&app, "Lectures").await;
        let content = b"%PDF-1.4 fake lecture".to_vec();

        let res = app
            .upload_with_token(
                routes::FILE,
                "Lecture 1",
                category_id,
                "slides-week1.pdf",
                content.clone(),
                &app.professor_token(),
            )
            .await;
        assert_eq!(res.code(), 2010);

        let list = app
            .get_with_token(
                &format!("{}?category_id={category_id}", routes::FILE_LIST),
                &app.student_token("S1"),
            )
            .await;
        assert_eq!(list.code(), 2000);
        assert_eq!(list.body["data"]["total_elements"], 1);

        let entry = &list.body["data"]["files"][0];
        assert_eq!(entry["name"], "Lecture 1");
        assert_eq!(entry["file_name"], "slides-week1.pdf");
        assert_eq!(entry["size"], content.len() as i64);

        let id = entry["id"].as_i64().unwrap() as i32;
        let (status, headers, bytes) = app
            .get_raw_with_token(&routes::file_download(id), &app.student_token("S1"))
            .await;
        assert_eq!(status, 200);
        assert_eq!(bytes, content);
        let disposition = headers
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(disposition.contains("slides-week1.pdf"));
    }

    #[tokio::test]
    async fn deleting_a_file_removes_it_from_the_listing() {
        let app = TestApp::spawn().await;
        let category_id = create_category(&app, "Lectures").await;
        app.upload_with_token(
            routes::FILE,
            "Lecture 1",
            category_id,
            "slides.pdf",
            b"bytes".to_vec(),
            &app.professor_token(),
        )
        .await;

        let list = app
            .get_with_token(routes::FILE_LIST, &app.professor_token())
            .await;
        let id = list.body["data"]["files"][0]["id"].as_i64().unwrap() as i32;

        let res = app
            .delete_with_token(&routes::file(id), &app.professor_token())
            .await;
        assert_eq!(res.code(), 2000);

        let list = app
            .get_with_token(routes::FILE_LIST, &app.professor_token())
            .await;
        assert_eq!(list.body["data"]["total_elements"], 0);

        let res = app
            .delete_with_token(&routes::file(id), &app.professor_token())
            .await;
        assert_eq!(res.code(), 4045);
    }

    #[tokio::test]
    async fn upload_without_a_file_field_is_rejected() {
        let app = TestApp::spawn().await;
        let category_id = create_category(&app, "Lectures").await;

        let form = reqwest::multipart::Form::new()
            .text("name", "No file")
            .text("category_id", category_id.to_string());
        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::FILE))
            .header(
                "Authorization",
                format!("Bearer {}", app.professor_token()),
            )
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 400);
    }
}
