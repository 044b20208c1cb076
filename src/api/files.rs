//! `POST /post-image`.

use crate::request::Request;
use crate::response::Json;
use crate::validation::{FailureReason, FieldError, Source, ValidationReport};

use super::error::ApiError;
use super::models::UploadSummary;

/// Name of the multipart part carrying the file.
const IMAGE_FIELD: &str = "image";

/// Accepts a `multipart/form-data` upload and reports the file's name,
/// declared content type, and size in kilobytes.
pub async fn upload_image(req: Request) -> Result<Json<UploadSummary>, ApiError> {
    let mut multipart = req
        .multipart()
        .ok_or_else(|| malformed("expected a multipart/form-data body"))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| malformed(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(ToString::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| malformed(format!("invalid multipart body: {e}")))?;

        return Ok(Json(UploadSummary {
            filename,
            content_type,
            size_kb: size_in_kb(data.len()),
        }));
    }

    Err(ValidationReport::single(FieldError::new(
        Source::Body,
        IMAGE_FIELD,
        FailureReason::MissingRequired,
        "field required",
    ))
    .into())
}

/// Byte count to kilobytes, rounding half to even (1536 B → 2, 2560 B → 2).
pub fn size_in_kb(len: usize) -> u64 {
    (len as f64 / 1024.0).round_ties_even() as u64
}

fn malformed(message: impl Into<String>) -> ApiError {
    ValidationReport::single(FieldError::at_source(
        Source::Body,
        FailureReason::InvalidType,
        message,
    ))
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilobytes_round_half_to_even() {
        assert_eq!(size_in_kb(0), 0);
        assert_eq!(size_in_kb(1500), 1);
        assert_eq!(size_in_kb(1536), 2);
        assert_eq!(size_in_kb(2048), 2);
        assert_eq!(size_in_kb(2560), 2);
        assert_eq!(size_in_kb(3584), 4);
    }
}
