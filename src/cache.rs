// Process-wide artifact cache.
//
// One dataset per process, so the cache has no key: it holds either nothing
// or a shared, immutable `Artifacts`. Readers clone the `Arc` and keep using
// whatever set they got; a rebuild replaces the whole set at once and never
// touches one that is already handed out.

use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Result;
use tracing::{debug, info};

use crate::artifacts::Artifacts;

static ARTIFACTS: RwLock<Option<Arc<Artifacts>>> = RwLock::new(None);

/// The cached artifacts, if they have been built.
pub fn get() -> Option<Arc<Artifacts>> {
    ARTIFACTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// The cached artifacts, running `build` first if the cache is empty.
///
/// The write lock is held while building, so concurrent first callers
/// build once and the rest wait for that result.
pub fn get_or_build<F>(build: F) -> Result<Arc<Artifacts>>
where
    F: FnOnce() -> Result<Artifacts>,
{
    if let Some(artifacts) = get() {
        debug!("Artifact cache hit");
        return Ok(artifacts);
    }

    let mut slot = ARTIFACTS.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(artifacts) = slot.as_ref() {
        return Ok(Arc::clone(artifacts));
    }

    let artifacts = Arc::new(build()?);
    *slot = Some(Arc::clone(&artifacts));
    info!("Artifact cache populated");
    Ok(artifacts)
}

/// Swap in a new artifact set (or put back a shared one), returning it.
pub fn replace(artifacts: impl Into<Arc<Artifacts>>) -> Arc<Artifacts> {
    let artifacts = artifacts.into();
    *ARTIFACTS.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&artifacts));
    info!("Artifact cache replaced");
    artifacts
}

/// Drop the cached set. The next `get_or_build` rebuilds.
pub fn clear() {
    *ARTIFACTS.write().unwrap_or_else(PoisonError::into_inner) = None;
    info!("Artifact cache cleared");
}
