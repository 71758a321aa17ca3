//! Domain entities.

pub mod verification_code;

pub use verification_code::{
    digest_code, mask_subject, CodePurpose, CodeStatus, VerificationCode, CODE_LENGTH,
    CODE_TTL_MINUTES,
};
