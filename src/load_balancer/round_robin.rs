//! Round-robin target pool.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::load_balancer::{endpoint::Endpoint, LoadBalancer};

/// Rotating pool of endpoints.
///
/// The live set sits behind a read/write lock and is only ever swapped
/// wholesale. The rotation cursor is a separate atomic, so selections never
/// wait on each other and a refresh does not reset the rotation.
#[derive(Debug)]
pub struct RoundRobin {
    targets: RwLock<Arc<[Endpoint]>>,
    cursor: AtomicU64,
}

impl RoundRobin {
    pub fn new(targets: Vec<Endpoint>) -> Self {
        Self {
            targets: RwLock::new(targets.into()),
            cursor: AtomicU64::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The set currently being handed out.
    pub fn snapshot(&self) -> Arc<[Endpoint]> {
        // A panicking writer can only have been mid pointer-swap; the value is intact.
        self.targets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::empty()
    }
}

impl LoadBalancer for RoundRobin {
    fn next(&self) -> Option<Endpoint> {
        let targets = self.snapshot();
        if targets.is_empty() {
            return None;
        }

        // Advance first, then index with the new value.
        let n = self.cursor.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        let index = (n % targets.len() as u64) as usize;
        Some(targets[index].clone())
    }

    fn replace(&self, targets: Vec<Endpoint>) {
        let targets: Arc<[Endpoint]> = targets.into();
        let mut guard = self
            .targets
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = targets;
    }
}
