//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for callers
//! - Driven Ports (outbound) - the script-executing store

pub mod inbound;
pub mod outbound;

pub use inbound::BloomFilterApi;
pub use outbound::{BloomScript, ScriptExecutor, ScriptReply, BIT_ABSENT_MARKER};
