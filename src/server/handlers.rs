//! Form submission and download API handlers.
//!
//! The submit path re-derives the same `RenderRequest` the live preview
//! uses, renders it server-side, persists the export and returns its path.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::export::OutputFormat;
use crate::form::QrForm;
use crate::logo::LogoImage;
use crate::preview::Preview;

use super::state::AppState;

/// Response body for POST /api/qr/generate. Mirrors the form-state shape
/// the frontend consumes: per-field errors, a banner message, or the path
/// of the generated file.
#[derive(Debug, Default, Serialize)]
pub struct GenerateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

fn field_errors(err: ValidationError) -> GenerateResponse {
    let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for field_error in err.errors {
        errors
            .entry(field_error.field)
            .or_default()
            .push(field_error.message);
    }
    GenerateResponse {
        errors: Some(errors),
        message: Some("Failed to generate QR code. Please check the form for errors.".to_string()),
        result: None,
    }
}

/// Handle POST /api/qr/generate - render the submitted form and persist
/// the output file.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, (StatusCode, String)> {
    let mut form = QrForm::default();
    let mut logo: Option<LogoImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "logo" {
            let bytes = field.bytes().await.map_err(|e| {
                (StatusCode::BAD_REQUEST, format!("Failed to read logo: {}", e))
            })?;
            // An empty file input still posts a zero-length part.
            if !bytes.is_empty() {
                logo = Some(LogoImage::new(bytes.to_vec()));
            }
            continue;
        }

        let value = field.text().await.map_err(|e| {
            (StatusCode::BAD_REQUEST, format!("Failed to read field: {}", e))
        })?;
        match name.as_str() {
            "input" => form.input = value,
            "qVersion" => form.version = Some(value),
            "errorCorrection" => form.error_correction = Some(value),
            "mask" => form.mask = Some(value),
            "outputType" => form.output_type = Some(value),
            "lightTransparent" => form.light_transparent = Some(value),
            "darkTransparent" => form.dark_transparent = Some(value),
            "scale" => form.scale = Some(value),
            "margin" => form.margin = Some(value),
            "lightColor" => form.light_color = Some(value),
            "darkColor" => form.dark_color = Some(value),
            _ => {}
        }
    }

    // Submission requires content; only the live preview accepts blank.
    let mut extra = ValidationError::default();
    if form.input.trim().is_empty() {
        extra.push("input", "Input is required");
    }
    let format = match form.output_type.as_deref() {
        None | Some("") => OutputFormat::Png,
        Some(raw) => OutputFormat::parse(raw).unwrap_or_else(|| {
            extra.push("outputType", "must be one of png, svg, utf8");
            OutputFormat::Png
        }),
    };

    let request = match form.normalize(logo) {
        Ok(request) if extra.is_empty() => request,
        Ok(_) => return Ok(Json(field_errors(extra))),
        Err(mut invalid) => {
            invalid.errors.extend(extra.errors);
            return Ok(Json(field_errors(invalid)));
        }
    };

    let preview = Preview::new();
    if let Err(e) = preview.request_render(&request).await {
        return Ok(Json(GenerateResponse {
            message: Some(format!("Failed to generate QR code: {}", e)),
            ..Default::default()
        }));
    }
    let export = preview
        .export(format)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let filename = format!(
        "qr-code-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        format.extension()
    );
    let path = state.config.output_dir.join(&filename);
    tokio::fs::write(&path, export.into_bytes())
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to write {}: {}", path.display(), e),
            )
        })?;

    Ok(Json(GenerateResponse {
        result: Some(format!("/generated/{}", filename)),
        ..Default::default()
    }))
}

/// Handle GET /generated/:name - serve a previously generated file.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    // Generated names are flat; anything path-like is not ours.
    if name.contains('/') || name.contains("..") || !name.starts_with("qr-code-") {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    let path = state.config.output_dir.join(&name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&name)
                .first_or_text_plain()
                .to_string();
            ([(header::CONTENT_TYPE, mime)], bytes).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;

    #[test]
    fn test_field_errors_group_by_field() {
        let err = ValidationError {
            errors: vec![
                FieldError::new("scale", "must be between 1 and 40"),
                FieldError::new("margin", "must be between 0 and 10"),
                FieldError::new("scale", "is required"),
            ],
        };
        let response = field_errors(err);
        let errors = response.errors.unwrap();
        assert_eq!(errors["scale"].len(), 2);
        assert_eq!(errors["margin"].len(), 1);
        assert!(response.result.is_none());
    }

    #[test]
    fn test_generate_response_serialization() {
        // Success responses carry only the result path; None fields are
        // omitted, matching the shape the frontend consumes.
        let ok = GenerateResponse {
            result: Some("/generated/qr-code-1.png".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({ "result": "/generated/qr-code-1.png" })
        );

        let err = ValidationError {
            errors: vec![FieldError::new("scale", "must be between 1 and 40")],
        };
        let json = serde_json::to_value(field_errors(err)).unwrap();
        assert_eq!(json["errors"]["scale"][0], "must be between 1 and 40");
        assert!(json.get("result").is_none());
    }
}
