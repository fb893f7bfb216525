use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::{Extension, Form, Json};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::gate::Identity;
use crate::errors::AppError;
use crate::files::Row;
use crate::AppState;

// ── Request / Response DTOs ──────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub msg: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub file_id: Uuid,
    pub filename: String,
}

#[derive(Serialize)]
pub struct FileDataResponse {
    pub filename: String,
    pub data: Vec<Row>,
}

// ── Handlers ─────────────────────────────────────────────────

/// POST /signup — create a new account
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    state
        .accounts
        .register(&payload.username, &payload.password)
        .await?;

    Ok(Json(SignupResponse {
        msg: "User created successfully".to_string(),
    }))
}

/// POST /token — exchange a username/password form for a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = state
        .accounts
        .authenticate(&form.username, &form.password)
        .await?;

    let ttl = Duration::minutes(state.config.token_ttl_minutes);
    let access_token = state.tokens.issue(&user.username, Some(ttl))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// POST /upload — decode and persist a tabular file (bearer-gated)
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        // The file part is the one carrying a filename.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let record = state.files.upload(&identity, &filename, &bytes).await?;
        return Ok(Json(UploadResponse {
            file_id: record.id,
            filename: record.filename,
        }));
    }

    Err(AppError::BadRequest(
        "multipart body has no file field".to_string(),
    ))
}

/// GET /data/{file_id} — fetch a stored file by id (bearer-gated)
pub async fn get_data(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(file_id): Path<String>,
) -> Result<Json<FileDataResponse>, AppError> {
    // An id that is not a Uuid cannot name a record.
    let id = Uuid::parse_str(&file_id).map_err(|_| AppError::NotFound)?;

    let record = state.files.fetch(&identity, id).await?;
    Ok(Json(FileDataResponse {
        filename: record.filename,
        data: record.data,
    }))
}
