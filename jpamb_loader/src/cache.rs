use crate::{OpcodeSource, Result};
use dashmap::DashMap;
use jpamb_opcode::{MethodId, Opcode};
use std::sync::Arc;
use tracing::debug;

/// A lazy, process-wide mapping from method identifier to opcode sequence
/// (§3 Bytecode cache).
///
/// Entries are never evicted: opcode sequences are immutable once loaded
/// (§3 Lifecycle) and methods live for the lifetime of the analyzer (§5
/// Resource policy). Wraps an arbitrary [`OpcodeSource`] so the real
/// bytecode loader can be swapped in without touching the analyzer.
#[derive(Debug)]
pub struct BytecodeCache<S> {
    source: S,
    entries: DashMap<MethodId, Arc<Vec<Opcode>>>,
}

impl<S: OpcodeSource> BytecodeCache<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        BytecodeCache {
            source,
            entries: DashMap::new(),
        }
    }

    /// Returns the opcode sequence for `method`, loading and memoizing it on
    /// first access.
    ///
    /// # Errors
    /// Propagates the underlying [`OpcodeSource::opcodes`] error unchanged.
    pub fn opcodes(&self, method: &MethodId) -> Result<Arc<Vec<Opcode>>> {
        if let Some(cached) = self.entries.get(method) {
            return Ok(Arc::clone(&cached));
        }
        debug!(%method, "loading opcodes (cache miss)");
        let loaded = Arc::new(self.source.opcodes(method)?);
        self.entries
            .insert(method.clone(), Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Number of methods currently memoized. Exposed for tests and
    /// diagnostics only.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use jpamb_opcode::{Literal, Opcode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl OpcodeSource for CountingSource {
        fn opcodes(&self, method: &MethodId) -> Result<Vec<Opcode>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if method.method_name == "missing" {
                return Err(Error::MethodNotFound(method.to_string()));
            }
            Ok(vec![Opcode::Push(Literal::Int(1))])
        }
    }

    #[test]
    fn memoizes_across_calls() {
        let cache = BytecodeCache::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let method = MethodId::parse("pkg/C.f:()I").unwrap();
        cache.opcodes(&method).unwrap();
        cache.opcodes(&method).unwrap();
        assert_eq!(cache.source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn propagates_loader_errors_without_caching() {
        let cache = BytecodeCache::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let method = MethodId::parse("pkg/C.missing:()I").unwrap();
        assert!(cache.opcodes(&method).is_err());
        assert!(cache.is_empty());
    }
}
