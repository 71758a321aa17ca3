//! Maps domain errors onto HTTP responses.
//!
//! Every code-verification failure already arrives collapsed to
//! `InvalidCode`; this layer keeps that property by never putting internal
//! detail (storage messages, upstream statuses) into a response body.

use actix_web::HttpResponse;
use validator::ValidationErrors;

use tb_core::errors::{DomainError, VerificationError};
use tb_shared::types::response::ErrorResponse;

/// Convert a domain error into its HTTP response.
///
/// `request_id` ties the response to the handler's log lines.
pub fn domain_error_response(request_id: &str, error: &DomainError) -> HttpResponse {
    match error {
        DomainError::ValidationErr(e) => {
            log::warn!("[{}] Validation failed: {}", request_id, e);
            HttpResponse::BadRequest()
                .json(ErrorResponse::new("validation_error", e.to_string()))
        }
        DomainError::Verification(VerificationError::InvalidCode) => {
            log::info!("[{}] Verification rejected", request_id);
            HttpResponse::BadRequest().json(ErrorResponse::new(
                "invalid_code",
                "Invalid or expired verification code",
            ))
        }
        DomainError::Verification(VerificationError::CredentialMismatch) => {
            log::info!("[{}] Current credential mismatch", request_id);
            HttpResponse::BadRequest().json(ErrorResponse::new(
                "invalid_credentials",
                "Current password is incorrect",
            ))
        }
        DomainError::Verification(VerificationError::NotifierFailure) => {
            log::error!("[{}] Verification code delivery failed", request_id);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "delivery_failed",
                "Could not deliver the verification code. Please try again later",
            ))
        }
        DomainError::Verification(VerificationError::VerifiedNotApplied { .. }) => {
            log::error!(
                "[{}] Code consumed but credential update failed",
                request_id
            );
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "verified_not_applied",
                "The code was accepted but the password update failed. Please retry",
            ))
        }
        DomainError::Store { message } => {
            log::error!("[{}] Storage error: {}", request_id, message);
            internal_error_response()
        }
        DomainError::Internal { message } => {
            log::error!("[{}] Internal error: {}", request_id, message);
            internal_error_response()
        }
    }
}

fn internal_error_response() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        "internal_error",
        "An internal error occurred",
    ))
}

/// Convert request-shape validation failures into a 400 with per-field
/// messages.
pub fn validation_error_response(request_id: &str, errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new("validation_error", "Invalid request data");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.with_detail(field.to_string(), serde_json::json!(messages));
    }

    log::warn!("[{}] Request validation failed", request_id);
    HttpResponse::BadRequest().json(response)
}
