//! Adapters Layer (Driven Adapters)
//!
//! Implementations of `ScriptExecutor`:
//!
//! - `RedisScriptClient` - pooled Redis connections running `EVAL`
//! - `InMemoryScriptStore` - in-process store with the same atomicity

pub mod memory_store;
pub mod redis_client;

pub use memory_store::InMemoryScriptStore;
pub use redis_client::{RedisConfig, RedisScriptClient};
