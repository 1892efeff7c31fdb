use super::types::{EnhanceRequest, EnhanceResponse, ErrorResponse};
use crate::{Error, upscaler::Upscaler};
use axum::{
    extract::{Path as UrlPath, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use base64::{Engine as _, engine::general_purpose};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub index_page: PathBuf,
    pub temp_dir: PathBuf,
    pub results_dir: PathBuf,
    pub upscaler: Arc<dyn Upscaler>,
}

pub async fn index(State(state): State<AppState>) -> Response {
    serve_file(&state.index_page).await
}

pub async fn result_image(
    State(state): State<AppState>,
    UrlPath(filename): UrlPath<String>,
) -> Response {
    if !is_safe_result_name(&filename) {
        return json_error(StatusCode::NOT_FOUND, "File not found");
    }

    serve_file(&state.results_dir.join(&filename)).await
}

pub async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not found")
}

pub async fn enhance(
    State(state): State<AppState>,
    payload: Result<Json<EnhanceRequest>, JsonRejection>,
) -> Result<Json<EnhanceResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Invalid JSON data: {}", rejection.body_text()),
            }),
        )
    })?;

    let image = match request.image {
        Some(image) if !image.is_empty() => image,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No image data provided".to_string(),
                }),
            ));
        }
    };

    let image_bytes = decode_image_payload(&image).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Failed to decode image: {}", e),
            }),
        )
    })?;

    info!("Received enhance request ({} bytes)", image_bytes.len());

    match run_enhancement(&state, &image_bytes).await {
        Ok(url) => Ok(Json(EnhanceResponse {
            success: true,
            enhanced_image_url: url,
            message: "Image enhanced successfully".to_string(),
        })),
        Err(Error::Upscaler(detail)) => {
            error!("Enhancement failed: {}", detail);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to enhance image: {}", detail),
                }),
            ))
        }
        Err(e) => {
            error!("Error in enhance request: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Server error: {}", e),
                }),
            ))
        }
    }
}

async fn run_enhancement(state: &AppState, image_bytes: &[u8]) -> Result<String, Error> {
    tokio::fs::create_dir_all(&state.temp_dir).await?;
    tokio::fs::create_dir_all(&state.results_dir).await?;

    let input_filename = format!("input_{}.jpg", Uuid::new_v4().simple());
    let output_filename = format!("output_{}.jpg", Uuid::new_v4().simple());

    let input_path = state.temp_dir.join(&input_filename);
    let output_path = state.results_dir.join(&output_filename);

    tokio::fs::write(&input_path, image_bytes).await?;

    let result = state.upscaler.upscale(&input_path, &output_path).await;

    // Best-effort cleanup, the temp file is never reused
    if let Err(e) = tokio::fs::remove_file(&input_path).await {
        warn!("Failed to remove temp file {}: {}", input_path.display(), e);
    }

    result?;

    if !output_path.exists() {
        return Err(Error::upscaler(format!(
            "no output file was produced: {}",
            output_path.display()
        )));
    }

    Ok(format!("/results/{}", output_filename))
}

fn decode_image_payload(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    // Strip a data:image/...;base64, prefix if present
    let encoded = match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    };

    general_purpose::STANDARD.decode(encoded)
}

fn is_safe_result_name(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains("..")
}

async fn serve_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(contents) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], contents).into_response()
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            json_error(StatusCode::NOT_FOUND, "File not found")
        }
        Err(e) => {
            error!("Error serving file {}: {}", path.display(), e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
