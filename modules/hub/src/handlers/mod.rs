//! Country event handlers
//!
//! One handler per employee event type. Each applies the event's effect to
//! the cache, invalidates the country's tagged entries, and triggers the
//! best-effort broadcast. Cache errors propagate unchanged into the
//! consumer's retry machinery; broadcast failures never do.

pub mod created;
pub mod deleted;
pub mod updated;

use crate::cache::CacheError;

/// Errors a handler can surface to the consumer's retry logic
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Cache(#[from] CacheError),
}
