//! Cryptographically secure code generation.

use rand::{rngs::OsRng, RngCore};

use crate::domain::entities::verification_code::CODE_LENGTH;

/// Generates fixed-length numeric verification codes from the OS CSPRNG.
///
/// Stateless; every call draws fresh randomness. There is deliberately no
/// fallback to a weaker source: if the OS RNG is unavailable the process
/// aborts rather than silently issuing guessable codes.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodeGenerator;

/// Largest multiple of 1_000_000 that fits in a u32. Draws at or above this
/// bound are rejected so the result stays uniform over 000000-999999.
const REJECTION_BOUND: u32 = (u32::MAX / 1_000_000) * 1_000_000;

impl CodeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Produce a 6-digit numeric code, leading zeros preserved, uniformly
    /// distributed over 000000-999999.
    pub fn generate(&self) -> String {
        let mut rng = OsRng;
        let mut bytes = [0u8; 4];
        loop {
            rng.fill_bytes(&mut bytes);
            let draw = u32::from_le_bytes(bytes);
            if draw < REJECTION_BOUND {
                return format!("{:0width$}", draw % 1_000_000, width = CODE_LENGTH);
            }
        }
    }
}
