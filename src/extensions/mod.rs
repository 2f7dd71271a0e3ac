/*
    'Extensions' is a map of type-indexed values shared with filters during a run, so a filter can reach
    a shared resource (a cancellation token, a thread pool handle, a progress sink) without global statics.

    A fresh map always contains the CancellationToken that acts as the run's cancellation flag.
    The runner polls it between filters; long-running execute phases poll it between chunks.
*/

use crate::imports::*;
use std::any::{Any, TypeId};
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct Extensions {
    map: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.map.len())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl Default for Extensions {
    fn default() -> Self {
        let mut ext = Extensions {
            map: HashMap::new(),
        };
        ext.insert::<CancellationToken>(CancellationToken::new());
        ext
    }
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Send + Sync + 'static>(&mut self, val: T) {
        self.map.insert(TypeId::of::<T>(), Arc::new(val));
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map.get(&TypeId::of::<T>())?.downcast_ref()
    }

    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    // Cancellation helpers
    pub fn cancel_token(&self) -> Option<&CancellationToken> {
        self.get::<CancellationToken>()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token().is_some_and(CancellationToken::is_cancelled)
    }

    pub fn cancel(&self) {
        if let Some(token) = self.cancel_token() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct ChunkSize(usize);

    #[test]
    fn new_extensions_hold_an_uncancelled_token() {
        let ext = Extensions::new();
        assert!(ext.cancel_token().is_some());
        assert!(!ext.is_cancelled());
    }

    #[test]
    fn clones_share_cancellation() {
        let ext = Extensions::new();
        let clone = ext.clone();
        ext.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn values_are_looked_up_by_type() {
        let mut ext = Extensions::new();
        assert!(!ext.contains::<ChunkSize>());
        ext.insert(ChunkSize(64));
        assert_eq!(ext.get::<ChunkSize>(), Some(&ChunkSize(64)));
        ext.insert(ChunkSize(128));
        assert_eq!(ext.get::<ChunkSize>(), Some(&ChunkSize(128)));
    }
}
