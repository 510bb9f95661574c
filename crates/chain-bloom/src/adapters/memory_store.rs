//! In-process script store
//!
//! Interprets the two bloom scripts the way Redis runs them: one script at a
//! time, each to completion, so every call is atomic with respect to every
//! other. Bitmaps are sparse sets of offsets, which keeps raw 31-bit offsets
//! cheap. Useful for tests and for running without a Redis server.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::error::StoreError;
use crate::ports::{BloomScript, ScriptExecutor, ScriptReply};

/// Largest offset `SETBIT`/`GETBIT` accept
pub const MAX_BIT_OFFSET: u64 = u32::MAX as u64;

#[derive(Default)]
struct StoreState {
    bitmaps: HashMap<String, HashSet<u64>>,
    pending_failure: Option<StoreError>,
    evals: u64,
}

/// Atomic in-memory stand-in for a Redis server
#[derive(Default)]
pub struct InMemoryScriptStore {
    state: Mutex<StoreState>,
}

impl InMemoryScriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        // A panic inside a script leaves the state consistent: scripts
        // validate before they mutate.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make the next `eval` fail with `error` without touching any bitmap
    pub fn fail_next(&self, error: StoreError) {
        self.state().pending_failure = Some(error);
    }

    /// `GETBIT key offset`
    pub fn get_bit(&self, key: &str, offset: u64) -> bool {
        self.state()
            .bitmaps
            .get(key)
            .is_some_and(|bits| bits.contains(&offset))
    }

    /// `BITCOUNT key`
    pub fn bit_count(&self, key: &str) -> usize {
        self.state().bitmaps.get(key).map_or(0, HashSet::len)
    }

    /// Number of script executions attempted
    pub fn eval_count(&self) -> u64 {
        self.state().evals
    }
}

/// Offsets named by `ARGV = [k, offset_1, ..., offset_k]`
fn parse_offsets(args: &[u64]) -> Result<&[u64], StoreError> {
    let (&count, offsets) = args
        .split_first()
        .ok_or_else(|| StoreError::Script("missing bit count argument".to_string()))?;

    let offsets = usize::try_from(count)
        .ok()
        .and_then(|count| offsets.get(..count))
        .ok_or_else(|| {
            StoreError::Script(format!(
                "bit count {} exceeds {} supplied offsets",
                count,
                offsets.len()
            ))
        })?;

    if let Some(bad) = offsets.iter().find(|&&offset| offset > MAX_BIT_OFFSET) {
        return Err(StoreError::Script(format!(
            "ERR bit offset {} is not an integer or out of range",
            bad
        )));
    }

    Ok(offsets)
}

#[async_trait]
impl ScriptExecutor for InMemoryScriptStore {
    async fn eval(
        &self,
        script: BloomScript,
        keys: &[&str],
        args: &[u64],
    ) -> Result<ScriptReply, StoreError> {
        let mut state = self.state();
        state.evals += 1;

        if let Some(error) = state.pending_failure.take() {
            debug!(script = script.name(), error = %error, "Injected failure");
            return Err(error);
        }

        let key = match keys {
            [key] => *key,
            _ => {
                return Err(StoreError::Script(format!(
                    "{} expects 1 key, got {}",
                    script.name(),
                    keys.len()
                )))
            }
        };
        let offsets = parse_offsets(args)?;

        match script {
            BloomScript::BatchSetBits => {
                state
                    .bitmaps
                    .entry(key.to_string())
                    .or_default()
                    .extend(offsets.iter().copied());
                Ok(ScriptReply::Int(1))
            }
            BloomScript::BatchGetBits => {
                let all_set = match state.bitmaps.get(key) {
                    Some(bits) => offsets.iter().all(|offset| bits.contains(offset)),
                    None => offsets.is_empty(),
                };
                Ok(ScriptReply::Int(i64::from(all_set)))
            }
        }
    }
}
