//! Domain layer for ordered writes
//!
//! - `attributes`: typed per-connection attribute map
//! - `promise`: complete-once handle for a write's outcome
//! - `errors`: write and event loop failures
//! - `value_objects`: connection identity and write kinds
//! - `invariants`: ordering predicates over observed traffic

pub mod attributes;
pub mod errors;
pub mod invariants;
pub mod promise;
pub mod value_objects;

pub use attributes::{AttributeKey, AttributeMap};
pub use errors::{LoopError, WriteError};
pub use promise::{WritePromise, WriteResult};
pub use value_objects::{ChannelId, WriteKind};
