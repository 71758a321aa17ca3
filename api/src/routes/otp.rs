//! Handlers for the OTP login flow.

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use tb_core::domain::entities::verification_code::mask_subject;
use tb_core::errors::{DomainError, ValidationError, VerificationError};
use tb_core::services::verification::{CodeStore, CredentialStore, EmailNotifier};

use crate::dto::{is_six_digits, CodeIssuedResponse, OtpVerifiedResponse, SendOtpRequest, VerifyOtpRequest};
use crate::handlers::error::{domain_error_response, validation_error_response};
use crate::routes::AppState;

/// Handler for POST /otp/send
///
/// Issues a fresh login code for the email address and delivers it.
/// Reissuing while a code is outstanding supersedes the old one.
pub async fn send_otp<S, N, P>(
    state: web::Data<AppState<S, N, P>>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse
where
    S: CodeStore + 'static,
    N: EmailNotifier + 'static,
    P: CredentialStore + 'static,
{
    let request_id = Uuid::new_v4().to_string();

    if let Err(errors) = request.0.validate() {
        return validation_error_response(&request_id, &errors);
    }

    log::info!(
        "[{}] OTP requested for {}",
        request_id,
        mask_subject(&request.email)
    );

    match state.verification.send_otp(&request.email).await {
        Ok(result) => {
            log::info!(
                "[{}] OTP delivered to {}, message_id: {}",
                request_id,
                mask_subject(&request.email),
                result.message_id
            );
            HttpResponse::Ok().json(CodeIssuedResponse {
                message: "Verification code sent".to_string(),
                expires_at: result.expires_at,
            })
        }
        Err(error) => domain_error_response(&request_id, &error),
    }
}

/// Handler for POST /otp/verify
///
/// Consumes the outstanding code for the email address. A valid code
/// verifies exactly once; any retry gets the same 400 as a wrong code.
pub async fn verify_otp<S, N, P>(
    state: web::Data<AppState<S, N, P>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    S: CodeStore + 'static,
    N: EmailNotifier + 'static,
    P: CredentialStore + 'static,
{
    let request_id = Uuid::new_v4().to_string();

    if let Err(errors) = request.0.validate() {
        return validation_error_response(&request_id, &errors);
    }
    if !is_six_digits(&request.otp) {
        let error = DomainError::from(ValidationError::InvalidFormat {
            field: "otp".to_string(),
        });
        return domain_error_response(&request_id, &error);
    }

    match state.verification.verify_otp(&request.email, &request.otp).await {
        Ok(outcome) if outcome.is_valid() => {
            log::info!(
                "[{}] OTP verified for {}",
                request_id,
                mask_subject(&request.email)
            );
            HttpResponse::Ok().json(OtpVerifiedResponse {
                verified: true,
                message: "Code accepted".to_string(),
            })
        }
        Ok(_) => {
            let error = DomainError::from(VerificationError::InvalidCode);
            domain_error_response(&request_id, &error)
        }
        Err(error) => domain_error_response(&request_id, &error),
    }
}
