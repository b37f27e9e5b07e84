use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/user", user_routes())
        .nest("/chat", chat_routes())
        .nest("/writing", writing_routes())
        .nest("/assignment", assignment_routes())
        .nest("/category", category_routes())
        .nest("/file", file_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::get_oauth_login))
        .routes(routes!(handlers::auth::post_register))
        .routes(routes!(handlers::auth::patch_login))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::user::get_user_list))
        .routes(routes!(handlers::user::get_user_search))
        .routes(routes!(handlers::user::put_user))
}

fn chat_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::chat::student_post_chat,
            handlers::chat::student_get_chat
        ))
        .routes(routes!(
            handlers::chat::prof_get_chat,
            handlers::chat::prof_post_chat,
            handlers::chat::prof_patch_chat
        ))
        .routes(routes!(handlers::chat::prof_get_chat_list))
}

fn writing_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::writing::student_post_writing,
            handlers::writing::student_get_writing
        ))
        .routes(routes!(handlers::writing::student_post_feedback))
        .routes(routes!(
            handlers::writing::professor_get_writing,
            handlers::writing::assignment_patch_writing
        ))
        .routes(routes!(handlers::writing::professor_get_writing_list))
}

fn assignment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::assignment::post_assignment))
        .routes(routes!(handlers::assignment::get_assignment_list))
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::category::post_category,
            handlers::category::put_category
        ))
        .routes(routes!(handlers::category::delete_category))
        .routes(routes!(handlers::category::get_category_list))
}

fn file_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::file::professor_post_file))
        .routes(routes!(handlers::file::get_file_list))
        .routes(routes!(handlers::file::download_file))
        .routes(routes!(handlers::file::delete_file))
        .layer(handlers::file::file_upload_body_limit())
}
