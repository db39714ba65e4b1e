//! Verbs and the verb registry.
//!
//! A verb names the action of an activity ("follow", "comment", ...). The
//! compact codec stores only the verb id, so decoding depends on a registry
//! that maps ids back to verbs. Ids are stable for the lifetime of stored
//! data and must never be reassigned.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// An interned activity verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verb {
    /// Small stable id, the only part persisted by the compact codec.
    pub id: u16,
    /// Infinitive form, e.g. "follow".
    pub infinitive: String,
}

impl Verb {
    /// Create a verb.
    pub fn new(id: u16, infinitive: impl Into<String>) -> Self {
        Self {
            id,
            infinitive: infinitive.into(),
        }
    }
}

/// Id -> verb lookup used by codecs.
///
/// Implementations must be injective and stable: the same id always
/// resolves to the same verb across process restarts.
pub trait VerbRegistry: Send + Sync {
    /// Resolve a verb by id. None when the id was never registered.
    fn lookup(&self, id: u16) -> Option<Verb>;

    /// Register a verb under its id.
    fn register(&self, verb: Verb);
}

/// In-memory registry, suitable as the process-wide default.
#[derive(Debug, Default)]
pub struct InMemoryVerbRegistry {
    verbs: RwLock<FxHashMap<u16, Verb>>,
}

impl InMemoryVerbRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered verbs.
    pub fn len(&self) -> usize {
        self.verbs.read().len()
    }

    /// Whether no verbs are registered.
    pub fn is_empty(&self) -> bool {
        self.verbs.read().is_empty()
    }
}

impl VerbRegistry for InMemoryVerbRegistry {
    fn lookup(&self, id: u16) -> Option<Verb> {
        self.verbs.read().get(&id).cloned()
    }

    fn register(&self, verb: Verb) {
        self.verbs.write().insert(verb.id, verb);
    }
}

/// Process-wide default registry, pre-seeded with the built-in verbs.
pub fn default_registry() -> Arc<InMemoryVerbRegistry> {
    static REGISTRY: Lazy<Arc<InMemoryVerbRegistry>> = Lazy::new(|| {
        let registry = InMemoryVerbRegistry::new();
        registry.register(Verb::new(1, "follow"));
        registry.register(Verb::new(2, "comment"));
        registry.register(Verb::new(3, "love"));
        registry.register(Verb::new(4, "add"));
        Arc::new(registry)
    });
    Arc::clone(&REGISTRY)
}
