//! Avatar upload
//!
//! Accepts png / jpg / jpeg / webp / gif in the multipart field `avatar`,
//! downsizes to at most 512px and stores a JPEG under
//! `WORK_DIR/uploads/avatars`, served at `/uploads/avatars/<file>`.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;
use shared::models::{ActionType, Admin};
use uuid::Uuid;

use crate::activity::RequestMeta;
use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

const MAX_DIMENSION: u32 = 512;

const JPEG_QUALITY: u8 = 85;

/// Public URL prefix of stored avatars
const AVATAR_URL_PREFIX: &str = "/uploads/avatars/";

#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

/// Check size, extension, declared MIME type and actual image content
fn validate_image(data: &[u8], filename: &str, max_bytes: usize) -> AppResult<()> {
    if data.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::NoFileProvided,
            "Please upload an image file",
        ));
    }
    if data.len() > max_bytes {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large. Maximum size is {}KB", max_bytes / 1024),
        ));
    }

    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    let is_image_mime = mime_guess::from_path(filename)
        .first()
        .is_some_and(|m| m.type_() == mime_guess::mime::IMAGE);
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) || !is_image_mime {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Only image files are allowed ({})",
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("Invalid image file: {}", e),
        ));
    }
    Ok(())
}

/// Downscale and re-encode as JPEG
fn process_image(data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {}", e))
    })?;
    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        img
    };

    let mut buffer = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| AppError::internal(format!("Failed to encode avatar: {}", e)))?;
    Ok(buffer)
}

/// Remove a previously uploaded avatar file; generated avatars have no file
fn remove_stored_avatar(avatars_dir: &Path, admin: &Admin) {
    let Some(file) = admin
        .avatar
        .as_deref()
        .and_then(|a| a.strip_prefix(AVATAR_URL_PREFIX))
    else {
        return;
    };
    // Only plain file names, never a path
    if file.contains('/') || file.contains("..") {
        return;
    }
    let path = avatars_dir.join(file);
    if path.exists()
        && let Err(e) = std::fs::remove_file(&path)
    {
        tracing::warn!(path = %path.display(), "Failed to remove old avatar: {}", e);
    }
}

/// POST /api/profile/avatar
pub async fn upload(
    State(state): State<ServerState>,
    CurrentAdmin(mut admin): CurrentAdmin,
    meta: RequestMeta,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<AvatarResponse>>> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        if field.name() == Some("avatar") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?;
            upload = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, data) = upload.ok_or_else(|| {
        AppError::with_message(ErrorCode::NoFileProvided, "Please upload an image file")
    })?;
    validate_image(&data, &filename, state.config.max_avatar_bytes)?;
    let encoded = process_image(&data)?;

    let avatars_dir: PathBuf = state.config.avatars_dir();
    std::fs::create_dir_all(&avatars_dir)
        .map_err(|e| AppError::with_message(ErrorCode::StorageError, e.to_string()))?;
    let stored_name = format!("avatar-{}-{}.jpg", admin.id, Uuid::new_v4().simple());
    let stored_path = avatars_dir.join(&stored_name);
    std::fs::write(&stored_path, &encoded)
        .map_err(|e| AppError::with_message(ErrorCode::StorageError, e.to_string()))?;

    let previous = admin.clone();
    admin.avatar = Some(format!("{AVATAR_URL_PREFIX}{stored_name}"));
    let admin = match state.admins.save(&admin).await {
        Ok(saved) => saved,
        Err(e) => {
            // Keep storage consistent with the record
            let _ = std::fs::remove_file(&stored_path);
            return Err(e.into());
        }
    };
    remove_stored_avatar(&avatars_dir, &previous);

    tracing::info!(admin_id = %admin.id, file = %stored_name, bytes = encoded.len(), "Avatar uploaded");
    state.activity.record(
        &admin.id,
        ActionType::Update,
        "Uploaded new avatar",
        None,
        &meta,
    );

    Ok(Json(ApiResponse::success_with_message(
        "Avatar uploaded successfully",
        AvatarResponse {
            avatar: admin.avatar_url(),
        },
    )))
}

/// DELETE /api/profile/avatar
pub async fn remove(
    State(state): State<ServerState>,
    CurrentAdmin(mut admin): CurrentAdmin,
) -> AppResult<Json<ApiResponse<AvatarResponse>>> {
    remove_stored_avatar(&state.config.avatars_dir(), &admin);
    admin.avatar = None;
    let admin = state.admins.save(&admin).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Avatar deleted successfully",
        AvatarResponse {
            avatar: admin.avatar_url(),
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(w, h);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_validate_image() {
        let png = png_bytes(4, 4);
        assert!(validate_image(&png, "me.png", 1024 * 1024).is_ok());

        let err = validate_image(&png, "me.txt", 1024 * 1024).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);

        let err = validate_image(&png, "me.png", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);

        let err = validate_image(b"not an image", "me.png", 1024).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }

    #[test]
    fn test_process_image_downscales() {
        let big = png_bytes(1024, 600);
        let jpeg = process_image(&big).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), MAX_DIMENSION);
        assert!(decoded.height() <= MAX_DIMENSION);
    }
}
