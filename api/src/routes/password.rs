//! Handlers for the password change flow.

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use tb_core::domain::entities::verification_code::mask_subject;
use tb_core::errors::{DomainError, ValidationError};
use tb_core::services::verification::{CodeStore, CredentialStore, EmailNotifier};

use tb_shared::types::response::MessageResponse;

use crate::dto::{is_six_digits, ChangePasswordRequest, CodeIssuedResponse, VerifyPasswordRequest};
use crate::handlers::error::{domain_error_response, validation_error_response};
use crate::routes::AppState;

/// Handler for POST /password/change
///
/// Checks the current password, stages the new one and sends a
/// confirmation code to the user's registered email address. Nothing
/// changes until the code is confirmed.
pub async fn change_password<S, N, P>(
    state: web::Data<AppState<S, N, P>>,
    request: web::Json<ChangePasswordRequest>,
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
        "[{}] Password change requested by {}",
        request_id,
        mask_subject(&request.user_id)
    );

    match state
        .verification
        .initiate_password_change(
            &request.user_id,
            &request.current_password,
            &request.new_password,
        )
        .await
    {
        Ok(result) => HttpResponse::Ok().json(CodeIssuedResponse {
            message: "Confirmation code sent".to_string(),
            expires_at: result.expires_at,
        }),
        Err(error) => domain_error_response(&request_id, &error),
    }
}

/// Handler for POST /password/verify
///
/// Consumes the confirmation code and applies the staged password. The
/// code spends even if the apply fails; that case returns a distinct
/// 500 so the client can retry the confirmation.
pub async fn verify_password<S, N, P>(
    state: web::Data<AppState<S, N, P>>,
    request: web::Json<VerifyPasswordRequest>,
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
    if !is_six_digits(&request.code) {
        let error = DomainError::from(ValidationError::InvalidFormat {
            field: "code".to_string(),
        });
        return domain_error_response(&request_id, &error);
    }

    match state
        .verification
        .confirm_password_change(&request.user_id, &request.code)
        .await
    {
        Ok(()) => {
            log::info!(
                "[{}] Password change confirmed by {}",
                request_id,
                mask_subject(&request.user_id)
            );
            HttpResponse::Ok().json(MessageResponse::new("Password updated"))
        }
        Err(error) => domain_error_response(&request_id, &error),
    }
}
