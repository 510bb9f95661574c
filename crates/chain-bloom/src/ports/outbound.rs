//! Outbound Ports (Driven Ports)
//!
//! The remote filter needs exactly one capability from its store: run a
//! script atomically against one key. Redis `EVAL` provides it; so does
//! `adapters::InMemoryScriptStore`.

use async_trait::async_trait;
use std::fmt;

use crate::error::StoreError;

/// Marker raised by the test script when `GETBIT` yields no reply
pub const BIT_ABSENT_MARKER: &str = "BIT_ABSENT";

/// Sets `ARGV[2..=ARGV[1]+1]` under `KEYS[1]`, replies 1
pub const LUA_BATCH_SET_BITS: &str = r#"
local key = KEYS[1]
local count = tonumber(ARGV[1])
for i = 1, count do
  redis.call('SETBIT', key, ARGV[1 + i], 1)
end
return 1
"#;

/// Replies 1 if every offset is set, 0 at the first unset one
pub const LUA_BATCH_GET_BITS: &str = r#"
local key = KEYS[1]
local count = tonumber(ARGV[1])
for i = 1, count do
  local reply = redis.call('GETBIT', key, ARGV[1 + i])
  if not reply then
    return redis.error_reply('BIT_ABSENT')
  end
  if reply == 0 then
    return 0
  end
end
return 1
"#;

/// Scripts a store must be able to run atomically
///
/// Both take one key and `ARGV = [k, offset_1, ..., offset_k]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BloomScript {
    BatchSetBits,
    BatchGetBits,
}

impl BloomScript {
    pub fn source(self) -> &'static str {
        match self {
            BloomScript::BatchSetBits => LUA_BATCH_SET_BITS,
            BloomScript::BatchGetBits => LUA_BATCH_GET_BITS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BloomScript::BatchSetBits => "batch_set_bits",
            BloomScript::BatchGetBits => "batch_get_bits",
        }
    }
}

/// Raw reply of a script execution
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptReply {
    Int(i64),
    Nil,
    Text(String),
    /// Any other reply shape, rendered for diagnostics
    Other(String),
}

impl fmt::Display for ScriptReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptReply::Int(v) => write!(f, "int {}", v),
            ScriptReply::Nil => write!(f, "nil"),
            ScriptReply::Text(s) => write!(f, "text {:?}", s),
            ScriptReply::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Atomic script execution (Driven Port)
///
/// Implementations must run the whole script as one indivisible operation:
/// other callers observe either none or all of its effects. A connection
/// acquired for the call must be released on every exit path, including
/// when the returned future is dropped.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    /// Run `script` with `keys` (key count = `keys.len()`) and `args`
    async fn eval(
        &self,
        script: BloomScript,
        keys: &[&str],
        args: &[u64],
    ) -> Result<ScriptReply, StoreError>;
}
