//! Redis-backed verification code store.
//!
//! One record per `(subject, purpose)` key, stored as JSON with a Redis
//! TTL. The consume path is a single Lua script, so the whole
//! check-and-swap executes server-side without interleaving; concurrent
//! verifiers race inside Redis, and exactly one wins. Codes are stored as
//! SHA-256 digests, never cleartext.
//!
//! Consumed records are retained until their original expiry rather than
//! deleted, so a replayed code reads as `AlreadyConsumed` in logs instead
//! of `NotFound`; the Redis TTL collects them afterwards.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use redis::Script;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use tb_core::domain::entities::verification_code::{
    digest_code, mask_subject, CodePurpose, CodeStatus, VerificationCode,
};
use tb_core::errors::{DomainError, DomainResult};
use tb_core::services::verification::{CodeStore, ConsumeOutcome};

use crate::cache::RedisClient;
use crate::InfrastructureError;

/// Redis key prefix for verification code records
const CODE_KEY_PREFIX: &str = "verify";

/// Atomic check-and-consume. KEYS[1] = record key, ARGV[1] = submitted
/// code digest, ARGV[2] = current unix time. Returns a status tag plus,
/// on success, the staged payload.
const CONSUME_SCRIPT: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then
  return {'not_found'}
end
local rec = cjson.decode(raw)
if tonumber(ARGV[2]) >= rec.expires_at then
  redis.call('DEL', KEYS[1])
  return {'expired'}
end
if rec.status == 'consumed' then
  return {'already_consumed'}
end
if rec.code_digest ~= ARGV[1] then
  return {'mismatch'}
end
rec.status = 'consumed'
local ttl = redis.call('TTL', KEYS[1])
if ttl <= 0 then
  ttl = 1
end
redis.call('SET', KEYS[1], cjson.encode(rec), 'EX', ttl)
if rec.payload == cjson.null or rec.payload == nil then
  return {'consumed'}
end
return {'consumed', rec.payload}
"#;

/// Wire form of a [`VerificationCode`]: the digest instead of the
/// cleartext value, unix timestamps for the Lua side
#[derive(Debug, Serialize, Deserialize)]
struct CodeRecord {
    code_digest: String,
    issued_at: i64,
    expires_at: i64,
    status: CodeStatus,
    payload: Option<String>,
}

impl From<&VerificationCode> for CodeRecord {
    fn from(entry: &VerificationCode) -> Self {
        Self {
            code_digest: digest_code(&entry.code),
            issued_at: entry.issued_at.timestamp(),
            expires_at: entry.expires_at.timestamp(),
            status: entry.status,
            payload: entry.pending_payload.clone(),
        }
    }
}

/// `CodeStore` implementation over Redis
#[derive(Clone)]
pub struct RedisCodeStore {
    redis_client: RedisClient,
    consume_script: Arc<Script>,
}

impl RedisCodeStore {
    pub fn new(redis_client: RedisClient) -> Self {
        Self {
            redis_client,
            consume_script: Arc::new(Script::new(CONSUME_SCRIPT)),
        }
    }

    fn format_key(subject: &str, purpose: CodePurpose) -> String {
        format!("{}:{}:{}", CODE_KEY_PREFIX, purpose.as_str(), subject)
    }
}

fn store_error(e: InfrastructureError) -> DomainError {
    DomainError::Store {
        message: e.to_string(),
    }
}

/// Translate the script reply into a `ConsumeOutcome`
fn parse_consume_reply(reply: Vec<String>) -> DomainResult<ConsumeOutcome> {
    let mut parts = reply.into_iter();
    let tag = parts.next().unwrap_or_default();
    match tag.as_str() {
        "consumed" => Ok(ConsumeOutcome::Consumed {
            payload: parts.next(),
        }),
        "mismatch" => Ok(ConsumeOutcome::Mismatch),
        "expired" => Ok(ConsumeOutcome::Expired),
        "not_found" => Ok(ConsumeOutcome::NotFound),
        "already_consumed" => Ok(ConsumeOutcome::AlreadyConsumed),
        other => Err(DomainError::Store {
            message: format!("Unexpected consume script reply: {:?}", other),
        }),
    }
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn put(
        &self,
        subject: &str,
        purpose: CodePurpose,
        code: &str,
        expires_at: DateTime<Utc>,
        payload: Option<String>,
    ) -> DomainResult<()> {
        let key = Self::format_key(subject, purpose);
        let now = Utc::now();
        let entry = VerificationCode::with_expiry(
            subject.to_string(),
            purpose,
            code.to_string(),
            now,
            expires_at,
            payload,
        );
        let record = CodeRecord::from(&entry);
        let json = serde_json::to_string(&record)
            .map_err(InfrastructureError::Serialization)
            .map_err(store_error)?;

        let ttl_seconds = (expires_at - now).num_seconds().max(1) as u64;

        // Plain SET with expiry: the upsert itself is the supersession,
        // any previous pending record for this key is overwritten in one
        // write.
        self.redis_client
            .set_with_expiry(&key, &json, ttl_seconds)
            .await
            .map_err(store_error)?;

        debug!(
            subject = mask_subject(subject),
            purpose = %purpose,
            ttl_seconds,
            "Stored verification code record"
        );
        Ok(())
    }

    async fn try_consume(
        &self,
        subject: &str,
        purpose: CodePurpose,
        code: &str,
    ) -> DomainResult<ConsumeOutcome> {
        let key = Self::format_key(subject, purpose);
        let digest = digest_code(code);
        let now = Utc::now().timestamp().to_string();

        let reply = self
            .redis_client
            .eval(&self.consume_script, &[&key], &[&digest, &now])
            .await
            .map_err(store_error)?;

        parse_consume_reply(reply)
    }

    async fn peek_expiry(
        &self,
        subject: &str,
        purpose: CodePurpose,
    ) -> DomainResult<Option<DateTime<Utc>>> {
        let key = Self::format_key(subject, purpose);
        let Some(json) = self.redis_client.get(&key).await.map_err(store_error)? else {
            return Ok(None);
        };

        let record: CodeRecord = serde_json::from_str(&json)
            .map_err(InfrastructureError::Serialization)
            .map_err(store_error)?;

        if record.status != CodeStatus::Pending || Utc::now().timestamp() >= record.expires_at {
            return Ok(None);
        }

        let expires_at = Utc
            .timestamp_opt(record.expires_at, 0)
            .single()
            .ok_or_else(|| DomainError::Store {
                message: format!("Invalid stored expiry: {}", record.expires_at),
            })?;
        Ok(Some(expires_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_scoped_by_purpose_and_subject() {
        assert_eq!(
            RedisCodeStore::format_key("a@x.com", CodePurpose::OtpLogin),
            "verify:otp_login:a@x.com"
        );
        assert_eq!(
            RedisCodeStore::format_key("user-1", CodePurpose::PasswordChange),
            "verify:password_change:user-1"
        );
    }

    #[test]
    fn record_derives_from_the_entity() {
        let now = Utc::now();
        let entry = VerificationCode::with_expiry(
            "user-1".to_string(),
            CodePurpose::PasswordChange,
            "123456".to_string(),
            now,
            now + chrono::Duration::minutes(10),
            Some("staged-credential".to_string()),
        );
        let record = CodeRecord::from(&entry);

        assert_eq!(record.code_digest, digest_code("123456"));
        assert_eq!(record.status, CodeStatus::Pending);
        assert_eq!(record.issued_at, entry.issued_at.timestamp());
        assert_eq!(record.expires_at, entry.expires_at.timestamp());
        assert_eq!(record.payload.as_deref(), Some("staged-credential"));
    }

    #[test]
    fn record_serializes_digest_not_code() {
        let entry = VerificationCode::new(
            "a@x.com".to_string(),
            CodePurpose::OtpLogin,
            "123456".to_string(),
            None,
        );
        let record = CodeRecord::from(&entry);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("123456"));
        assert!(json.contains(&digest_code("123456")));
        // Status and absent payload must read back cleanly in Lua's cjson
        assert!(json.contains("\"status\":\"pending\""));
        assert!(json.contains("\"payload\":null"));
    }

    #[test]
    fn consume_reply_parsing_covers_all_tags() {
        assert_eq!(
            parse_consume_reply(vec!["consumed".into(), "staged".into()]).unwrap(),
            ConsumeOutcome::Consumed {
                payload: Some("staged".into())
            }
        );
        assert_eq!(
            parse_consume_reply(vec!["consumed".into()]).unwrap(),
            ConsumeOutcome::Consumed { payload: None }
        );
        assert_eq!(
            parse_consume_reply(vec!["mismatch".into()]).unwrap(),
            ConsumeOutcome::Mismatch
        );
        assert_eq!(
            parse_consume_reply(vec!["expired".into()]).unwrap(),
            ConsumeOutcome::Expired
        );
        assert_eq!(
            parse_consume_reply(vec!["not_found".into()]).unwrap(),
            ConsumeOutcome::NotFound
        );
        assert_eq!(
            parse_consume_reply(vec!["already_consumed".into()]).unwrap(),
            ConsumeOutcome::AlreadyConsumed
        );
        assert!(parse_consume_reply(vec!["garbage".into()]).is_err());
    }
}
