use crate::config::InternConfig;
use crate::context::InternContext;
use crate::error::{InternError, Result};
use crate::indices::SlotIndex;
use crate::keys::KeyId;
use std::sync::OnceLock;

static CONTEXT: OnceLock<InternContext> = OnceLock::new();

/// Returns the process-wide context, creating it with defaults on first use.
pub fn context() -> &'static InternContext {
    CONTEXT.get_or_init(InternContext::new)
}

/// Install a configured process-wide context.
///
/// Fails if the context already exists, including when an earlier call to
/// [`context`] created the default one.
pub fn init_with(config: &InternConfig) -> Result<&'static InternContext> {
    let ctx = InternContext::with_config(config)?;
    CONTEXT
        .set(ctx)
        .map_err(|_| InternError::AlreadyInitialized)?;
    Ok(context())
}

/// Interns a key in the process-wide context.
pub fn intern_key(key: impl AsRef<[u8]>) -> KeyId {
    context().intern_key(key)
}

/// Resolves an array position in the process-wide context.
pub fn resolve_array_index(position: usize) -> SlotIndex {
    context().resolve_array_index(position)
}
