use ::common::{RegisterState, Role};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use server::entity::{oauth, user};

use crate::common::{TestApp, routes, wait_until};

async fn count_users(app: &TestApp) -> u64 {
    user::Entity::find().count(&app.db).await.unwrap()
}

mod login {
    use super::*;

    #[tokio::test]
    async fn first_login_creates_an_inactive_account() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&routes::auth_login("kakao", "alice"))
            .await;
        assert_eq!(res.code(), 2000);
        assert_eq!(res.body["data"]["register_state"], "INACTIVE");
        assert!(res.body["data"]["student_id"].is_null());
        assert!(res.body["data"]["access_token"].as_str().is_some());
        assert!(res.body["data"]["refresh_token"].as_str().is_some());

        assert_eq!(count_users(&app).await, 1);
    }

    #[tokio::test]
    async fn second_login_through_the_same_identity_reuses_the_account() {
        let app = TestApp::spawn().await;

        app.get_without_token(&routes::auth_login("kakao", "alice"))
            .await;

        // The link row is written fire-and-forget; wait for it before the
        // second login so the lookup can find the account.
        wait_until(|| async {
            oauth::Entity::find()
                .filter(oauth::Column::OauthId.eq("subject-alice"))
                .one(&app.db)
                .await
                .unwrap()
                .is_some_and(|link| link.user_id.is_some())
        })
        .await;

        let res = app
            .get_without_token(&routes::auth_login("kakao", "alice"))
            .await;
        assert_eq!(res.code(), 2000);
        assert_eq!(count_users(&app).await, 1);
    }

    #[tokio::test]
    async fn unknown_provider_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&routes::auth_login("google", "alice"))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), 4000);
    }

    #[tokio::test]
    async fn provider_outage_maps_to_cant_get_resources() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&routes::auth_login("naver", "boom"))
            .await;
        assert_eq!(res.status, 502);
        assert_eq!(res.code(), 4044);
        assert_eq!(count_users(&app).await, 0);
    }
}

mod register {
    use super::*;

    async fn login_token(app: &TestApp, code: &str) -> String {
        let res = app
            .get_without_token(&routes::auth_login("kakao", code))
            .await;
        res.body["data"]["access_token"]
            .as_str()
            .expect("login returned no token")
            .to_string()
    }

    #[tokio::test]
    async fn register_links_the_student_identity() {
        let app = TestApp::spawn().await;
        app.create_student_info("2021111222", "alice@stu.example.ac.kr")
            .await;
        let token = login_token(&app, "alice").await;

        let res = app
            .post_with_token(
                routes::AUTH_REGISTER,
                &json!({"student_id": "2021111222", "name": "alice@stu.example.ac.kr"}),
                &token,
            )
            .await;
        assert_eq!(res.code(), 2000);
        assert_eq!(res.body["data"]["register_state"], "ACTIVE");
        assert_eq!(res.body["data"]["student_id"], "2021111222");

        let account = user::Entity::find()
            .filter(user::Column::StudentId.eq("2021111222"))
            .one(&app.db)
            .await
            .unwrap()
            .expect("account missing");
        assert_eq!(account.register_state, RegisterState::Active);
    }

    #[tokio::test]
    async fn register_rejects_a_student_not_in_the_directory() {
        let app = TestApp::spawn().await;
        let token = login_token(&app, "alice").await;

        let res = app
            .post_with_token(
                routes::AUTH_REGISTER,
                &json!({"student_id": "2021111222", "name": "someone else"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.code(), 4043);
    }

    #[tokio::test]
    async fn registering_twice_conflicts() {
        let app = TestApp::spawn().await;
        app.create_student_info("2021111222", "alice@stu.example.ac.kr")
            .await;
        let token = login_token(&app, "alice").await;

        let body = json!({"student_id": "2021111222", "name": "alice@stu.example.ac.kr"});
        let first = app.post_with_token(routes::AUTH_REGISTER, &body, &token).await;
        assert_eq!(first.code(), 2000);

        let again = first.body["data"]["access_token"].as_str().unwrap().to_string();
        let res = app.post_with_token(routes::AUTH_REGISTER, &body, &again).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.code(), 4091);
    }

    #[tokio::test]
    async fn register_merges_into_the_account_owning_the_student_id() {
        let app = TestApp::spawn().await;
        app.create_student_info("2021111222", "alice@stu.example.ac.kr")
            .await;
        let existing = app
            .create_user(Some("2021111222"), Role::Student, RegisterState::Active)
            .await;

        let token = login_token(&app, "alice-second-device").await;
        assert_eq!(count_users(&app).await, 2);

        let res = app
            .post_with_token(
                routes::AUTH_REGISTER,
                &json!({"student_id": "2021111222", "name": "alice@stu.example.ac.kr"}),
                &token,
            )
            .await;
        assert_eq!(res.code(), 2000);
        assert_eq!(res.body["data"]["student_id"], "2021111222");

        // The temporary account is gone; the student id still has one owner.
        assert_eq!(count_users(&app).await, 1);
        let owner = user::Entity::find()
            .filter(user::Column::StudentId.eq("2021111222"))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(owner.id, existing);
    }
}

mod refresh {
    use super::*;

    #[tokio::test]
    async fn refresh_exchanges_the_token_for_a_fresh_access_token() {
        let app = TestApp::spawn().await;
        let login = app
            .get_without_token(&routes::auth_login("kakao", "alice"))
            .await;
        let refresh_token = login.body["data"]["refresh_token"].as_str().unwrap();

        let res = app
            .patch_with_token_no_body(routes::AUTH_LOGIN, refresh_token)
            .await;
        assert_eq!(res.code(), 2000);
        assert_eq!(res.body["data"]["refresh_token"], *refresh_token);

        let access = res.body["data"]["access_token"].as_str().unwrap().to_string();
        let probe = app.get_with_token(routes::ASSIGNMENT_LIST, &access).await;
        assert_eq!(probe.code(), 2000);
    }

    #[tokio::test]
    async fn refresh_without_a_token_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .patch(format!("http://{}{}", app.addr, routes::AUTH_LOGIN))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 401);
    }
}
