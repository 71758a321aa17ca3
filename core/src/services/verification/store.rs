//! Durable keyed storage for outstanding verification codes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::verification_code::CodePurpose;
use crate::errors::DomainResult;

/// Result of an atomic consume attempt.
///
/// Only `Consumed` transitions the stored code; every other outcome leaves
/// it untouched (except `Expired`, which may delete the dead record).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// The code matched a pending, unexpired entry and was atomically
    /// marked consumed. Carries the staged payload, if any.
    Consumed { payload: Option<String> },
    /// A pending code exists for the key but the value differs. Not
    /// consumed.
    Mismatch,
    /// A code exists but is past its expiry. Treated as invalid; the
    /// record may be deleted as a side effect.
    Expired,
    /// No code is stored for the key.
    NotFound,
    /// The code was already consumed by an earlier attempt.
    AlreadyConsumed,
}

/// Keyed storage for outstanding codes over `(subject, purpose)`.
///
/// The single load-bearing contract: `try_consume` must be one atomic
/// compare-and-swap at the storage layer, never a read-then-write pair.
/// When two callers race on the same key, exactly one observes
/// `Consumed`; the other observes `AlreadyConsumed` or `NotFound`
/// depending on ordering. This must hold across processes, not just
/// threads, which is why the serialization lives in the store and not in
/// an application lock.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Upsert a pending code for the key, superseding any existing pending
    /// code for the same `(subject, purpose)` pair. The superseded code is
    /// simply overwritten; it never reaches consumed or expired.
    async fn put(
        &self,
        subject: &str,
        purpose: CodePurpose,
        code: &str,
        expires_at: DateTime<Utc>,
        payload: Option<String>,
    ) -> DomainResult<()>;

    /// Atomically check-and-consume: if a pending, unexpired code exists
    /// for the key and `code` matches, transition it to consumed and
    /// return the staged payload.
    async fn try_consume(
        &self,
        subject: &str,
        purpose: CodePurpose,
        code: &str,
    ) -> DomainResult<ConsumeOutcome>;

    /// Read-only expiry lookup for the pending code on a key, if any.
    /// Hook for rate-limit/backoff decisions by outer collaborators; no
    /// throttling policy lives in this subsystem.
    async fn peek_expiry(
        &self,
        subject: &str,
        purpose: CodePurpose,
    ) -> DomainResult<Option<DateTime<Utc>>>;
}
