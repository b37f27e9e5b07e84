use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use common::{ResponseStatus, Role};
use sea_orm::*;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::entity::{category, file};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::file::{FileGetListElementRes, FileGetListRes, FileListQuery};
use crate::response::{Envelope, EnvelopeBody};
use crate::state::AppState;

pub fn file_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(64 * 1024 * 1024) // 64 MB
}

/// Storage name: a fresh UUID keeping the client extension.
fn stored_name_for(original: &str) -> String {
    let mut stored = Uuid::new_v4().to_string();
    if let Some(ext) = std::path::Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
    {
        stored.push('.');
        stored.push_str(ext);
    }
    stored
}

/// Professor uploads a file into a category.
#[utoipa::path(
    post,
    path = "/",
    tag = "Files",
    operation_id = "professorPostFile",
    summary = "Upload a file",
    description = "Multipart upload with `name`, `category_id` and `file` fields. The blob \
        is stored on disk under a generated name; the original filename is kept for \
        downloads.",
    request_body(content_type = "multipart/form-data", description = "File upload with title and category"),
    responses(
        (status = 201, description = "File stored (2010)", body = EnvelopeBody<serde_json::Value>),
        (status = 400, description = "Validation error (4000)", body = EnvelopeBody<serde_json::Value>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "Category not found (4046)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn professor_post_file(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Envelope<()>, AppError> {
    auth_user.require_role(Role::Professor)?;

    let mut name: Option<String> = None;
    let mut category_id: Option<i32> = None;
    let mut file_name: Option<String> = None;
    let mut file_bytes: Option<axum::body::Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("name") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read name: {e}")))?;
                name = Some(text);
            }
            Some("category_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read category: {e}")))?;
                let id = text
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| AppError::Validation("category_id must be an integer".into()))?;
                category_id = Some(id);
            }
            Some("file") => {
                file_name = field.file_name().map(|s| s.to_string());
                file_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?,
                );
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let name = name.ok_or_else(|| AppError::Validation("Missing 'name' field".into()))?;
    let category_id =
        category_id.ok_or_else(|| AppError::Validation("Missing 'category_id' field".into()))?;
    let bytes = file_bytes.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    let original_name =
        file_name.ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;

    // Category must exist before anything touches the disk.
    category::Entity::find_by_id(category_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFoundCategory)?;

    let upload_dir = std::path::Path::new(&state.config.file.upload_dir);
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {e}")))?;

    let stored_path = upload_dir.join(stored_name_for(&original_name));
    tokio::fs::write(&stored_path, &bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store upload: {e}")))?;

    let record = file::ActiveModel {
        name: Set(name.trim().to_string()),
        file_name: Set(original_name),
        path: Set(stored_path.to_string_lossy().into_owned()),
        size: Set(bytes.len() as i64),
        category_id: Set(category_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    record.insert(&state.db).await?;

    Ok(Envelope::status(ResponseStatus::Created))
}

/// List files, newest first, optionally within one category.
#[utoipa::path(
    get,
    path = "/list",
    tag = "Files",
    operation_id = "getFileList",
    summary = "List uploaded files",
    params(FileListQuery),
    responses(
        (status = 200, description = "Page of files", body = EnvelopeBody<FileGetListRes>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn get_file_list(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<FileListQuery>,
) -> Result<Envelope<FileGetListRes>, AppError> {
    let page = query.page.unwrap_or(0);
    let page_size = query.page_size.unwrap_or(10).clamp(1, 100);

    let mut base = file::Entity::find();
    if let Some(category_id) = query.category_id {
        base = base.filter(file::Column::CategoryId.eq(category_id));
    }

    let total_elements = base.clone().count(&state.db).await?;
    let files = base
        .order_by_desc(file::Column::CreatedAt)
        .offset(Some(page * page_size))
        .limit(Some(page_size))
        .all(&state.db)
        .await?;

    Ok(Envelope::new(
        ResponseStatus::Success,
        FileGetListRes {
            files: files.into_iter().map(FileGetListElementRes::from).collect(),
            total_elements,
        },
    ))
}

/// Download a stored file under its original name.
#[utoipa::path(
    get,
    path = "/{id}/download",
    tag = "Files",
    operation_id = "downloadFile",
    summary = "Download a file",
    params(("id" = i32, Path, description = "File ID")),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "File row or blob missing (4045)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(file_id = %id))]
pub async fn download_file(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let record = file::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFoundFile)?;

    let content = tokio::fs::read(&record.path)
        .await
        .map_err(|_| AppError::NotFoundFile)?;

    let mime = mime_guess::from_path(&record.file_name)
        .first_raw()
        .unwrap_or("application/octet-stream");

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", record.file_name),
            ),
        ],
        content,
    )
        .into_response())
}

/// Delete a file row and best-effort its blob.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Files",
    operation_id = "deleteFile",
    summary = "Delete a file",
    params(("id" = i32, Path, description = "File ID")),
    responses(
        (status = 200, description = "Deleted (2000)", body = EnvelopeBody<serde_json::Value>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "File not found (4045)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(file_id = %id))]
pub async fn delete_file(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Envelope<()>, AppError> {
    auth_user.require_role(Role::Professor)?;

    let record = file::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFoundFile)?;

    file::Entity::delete_by_id(id).exec(&state.db).await?;

    // The row is the source of truth; a stranded blob only costs disk.
    if let Err(e) = tokio::fs::remove_file(&record.path).await {
        warn!(path = %record.path, error = %e, "Failed to remove stored blob");
    }

    Ok(Envelope::status(ResponseStatus::Success))
}
