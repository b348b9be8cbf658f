use std::path::Path;

use crate::api::errors::ApiError;

pub(crate) fn validate_document_upload(
    filename: &str,
    content_type: &str,
    allowed_extensions: &[String],
) -> Result<(), ApiError> {
    let extension = extension_of(filename, allowed_extensions)?;

    let mime = content_type.trim().to_ascii_lowercase();
    if mime_allowed_for_document_extension(&mime, &extension) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "MIME type '{mime}' does not match extension '.{extension}'"
        )))
    }
}

pub(crate) fn validate_video_upload(
    filename: &str,
    content_type: &str,
    allowed_extensions: &[String],
) -> Result<(), ApiError> {
    let extension = extension_of(filename, allowed_extensions)?;

    let mime = content_type.trim().to_ascii_lowercase();
    if mime_allowed_for_video_extension(&mime, &extension) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "MIME type '{mime}' does not match extension '.{extension}'"
        )))
    }
}

pub(crate) fn sanitized_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect()
}

fn extension_of(filename: &str, allowed_extensions: &[String]) -> Result<String, ApiError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| ApiError::BadRequest("File must have an extension".to_string()))?;

    if !allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(ApiError::BadRequest(format!("File extension '{extension}' is not allowed")));
    }

    Ok(extension)
}

fn mime_allowed_for_document_extension(mime: &str, extension: &str) -> bool {
    match extension {
        "pdf" => mime == "application/pdf",
        "doc" => mime == "application/msword",
        "docx" => {
            mime == "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => false,
    }
}

fn mime_allowed_for_video_extension(mime: &str, extension: &str) -> bool {
    match extension {
        "mp4" => mime == "video/mp4",
        "mov" => matches!(mime, "video/quicktime" | "video/mov"),
        "webm" => mime == "video/webm",
        "mkv" => mime == "video/x-matroska",
        "avi" => matches!(mime, "video/x-msvideo" | "video/avi"),
        _ => false,
    }
}
