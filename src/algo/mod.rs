//! Processing algorithms.
//!
//! The plugin delegates all sample processing to an [`Algorithm`] resolved by
//! name from an [`AlgorithmRegistry`] when the plugin is constructed. New
//! algorithms are added by registering a factory, without touching the
//! lifecycle or configuration code.

use std::collections::BTreeMap;

mod dummy;

pub use dummy::Dummy;

/// A block processing algorithm.
///
/// `transfer` is invoked once per audio block from the host's I/O loop,
/// strictly serialized with `init` and `close` for the same instance. Buffers
/// hold raw interleaved sample bytes in one of the formats the plugin
/// advertises (S32/S16).
pub trait Algorithm: Send {
    /// Called once before streaming starts.
    fn init(&mut self) {}

    /// Called once at stream teardown.
    fn close(&mut self) {}

    /// Process one block: read `src`, write the result to `dst`, and return
    /// the number of bytes written.
    fn transfer(&mut self, dst: &mut [u8], src: &[u8]) -> usize;
}

/// Factory producing a fresh algorithm instance for one plugin instance.
pub type AlgorithmFactory = fn() -> Box<dyn Algorithm>;

/// Registry mapping algorithm names to factories.
///
/// Lookup happens once, at plugin construction; an `algo` key naming an
/// unregistered algorithm is a fatal configuration error.
#[derive(Clone)]
pub struct AlgorithmRegistry {
    factories: BTreeMap<&'static str, AlgorithmFactory>,
}

impl AlgorithmRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry pre-populated with the algorithms shipped in this crate.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("dummy", || Box::new(Dummy));
        registry
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &'static str, factory: AlgorithmFactory) {
        self.factories.insert(name, factory);
    }

    /// Instantiate the algorithm registered under `name`.
    pub fn create(&self, name: &str) -> Option<Box<dyn Algorithm>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Names of all registered algorithms, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
