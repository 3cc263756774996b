//! In-process symbol table
//!
//! Stands in for a shared library when the glue is linked into the current
//! binary, e.g. a Rust module exporting the same functions as the generated
//! C++ would.

use std::ffi::c_void;
use std::ptr::NonNull;

use rustc_hash::FxHashMap;

use super::SymbolSource;

/// A named set of function addresses.
///
/// # Example
///
/// ```ignore
/// let module = StaticModule::new("player")
///     .with("getGeneratedScripts", getGeneratedScripts as *const c_void)
///     .with("createPlayer", createPlayer as *const c_void);
/// ```
#[derive(Debug, Clone)]
pub struct StaticModule {
    name: String,
    symbols: FxHashMap<String, NonNull<c_void>>,
}

// Only addresses of functions with static lifetime are stored.
unsafe impl Send for StaticModule {}
unsafe impl Sync for StaticModule {}

impl StaticModule {
    /// Create an empty module
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols: FxHashMap::default(),
        }
    }

    /// Register a symbol. A null address unregisters it.
    pub fn insert(&mut self, symbol: impl Into<String>, address: *const c_void) -> &mut Self {
        let symbol = symbol.into();
        match NonNull::new(address as *mut c_void) {
            Some(address) => {
                self.symbols.insert(symbol, address);
            }
            None => {
                self.symbols.remove(&symbol);
            }
        }
        self
    }

    /// Builder form of [`StaticModule::insert`]
    pub fn with(mut self, symbol: impl Into<String>, address: *const c_void) -> Self {
        self.insert(symbol, address);
        self
    }

    /// Remove a symbol, returning whether it was present
    pub fn remove(&mut self, symbol: &str) -> bool {
        self.symbols.remove(symbol).is_some()
    }

    /// Number of registered symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether no symbols are registered
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolSource for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn address(&self, symbol: &str) -> Option<NonNull<c_void>> {
        self.symbols.get(symbol).copied()
    }
}
