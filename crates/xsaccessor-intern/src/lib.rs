//! xsaccessor interning
//!
//! Maps repeated hash keys and repeated array positions to small, stable
//! integer ids for generated field accessors:
//! - [`InternContext::intern_key`] assigns key ids in first-seen order
//! - [`InternContext::resolve_array_index`] assigns internal indices to
//!   external array positions
//!
//! Both registries are append-only and share a single global lock.

pub mod config;
pub mod context;
pub mod error;
pub mod global;
pub mod growable;
pub mod indices;
pub mod keys;
pub mod lock;

pub use config::{GrowthPolicy, InternConfig};
pub use context::{InternContext, InternStats};
pub use error::{InternError, Result};
pub use global::{intern_key, resolve_array_index};
pub use indices::SlotIndex;
pub use keys::{InternedKey, KeyId};
pub use lock::{GlobalLock, GlobalLockGuard};
