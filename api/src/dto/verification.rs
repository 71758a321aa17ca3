//! DTOs for the OTP-login and password-change endpoints.
//!
//! Shape validation only (presence, email format, code length); the
//! 6-digit numeric check and all semantic decisions live behind the
//! handlers in `tb_core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for POST /otp/send
#[derive(Debug, Deserialize, Validate)]
pub struct SendOtpRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Request body for POST /otp/verify
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Verification code must be exactly 6 digits"))]
    pub otp: String,
}

/// Request body for POST /password/change
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,

    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Request body for POST /password/verify
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyPasswordRequest {
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,

    #[validate(length(equal = 6, message = "Verification code must be exactly 6 digits"))]
    pub code: String,
}

/// Response body after a code was issued and delivered
#[derive(Debug, Serialize, Deserialize)]
pub struct CodeIssuedResponse {
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

/// Response body for a successful OTP verification
#[derive(Debug, Serialize, Deserialize)]
pub struct OtpVerifiedResponse {
    pub verified: bool,
    pub message: String,
}

/// True when the submitted code has the expected 6-digit shape.
///
/// Checked in handlers rather than rejected by deserialization so that a
/// malformed code produces the same 400 envelope as other field errors.
pub fn is_six_digits(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_otp_request_accepts_valid_email() {
        let request = SendOtpRequest {
            email: "user@example.com".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn send_otp_request_rejects_malformed_email() {
        let request = SendOtpRequest {
            email: "not-an-email".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn verify_otp_request_rejects_wrong_code_length() {
        let request = VerifyOtpRequest {
            email: "user@example.com".to_string(),
            otp: "12345".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("otp"));
    }

    #[test]
    fn change_password_request_requires_all_fields() {
        let request = ChangePasswordRequest {
            user_id: "user-1".to_string(),
            current_password: String::new(),
            new_password: "hunter3".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("current_password"));
    }

    #[test]
    fn six_digit_check_accepts_leading_zeros() {
        assert!(is_six_digits("012345"));
        assert!(is_six_digits("000000"));
        assert!(!is_six_digits("12345"));
        assert!(!is_six_digits("1234567"));
        assert!(!is_six_digits("12a456"));
        assert!(!is_six_digits("１２３４５６"));
    }
}
