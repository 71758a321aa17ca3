//! Cache module - Redis client and the Redis-backed code store.

pub mod code_store;
pub mod redis_client;

pub use code_store::RedisCodeStore;
pub use redis_client::RedisClient;
