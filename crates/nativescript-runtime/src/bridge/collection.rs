//! Loading a module into a set of script interfaces

use std::ffi::c_int;
use std::path::Path;
use std::ptr;

use rustc_hash::FxHashMap;

use nativescript_sdk::abi::{decode_table, GetGeneratedScriptsFn, RawScriptInfo};
use nativescript_sdk::{TypeInfo, REGISTRATION_SYMBOL};

use crate::error::{BridgeError, BridgeResult};
use crate::ffi::{cast_fn, Library, SymbolSource};

use super::interface::ScriptInterface;
use super::options::{DuplicatePolicy, LoadOptions, ResolvePolicy};

/// Every type a module registers, resolved and keyed by name.
///
/// Owns the module. Dropping the collection releases it, and the borrow
/// checker keeps interfaces and instances from outliving it.
pub struct ScriptCollection<S: SymbolSource> {
    scripts: Vec<ScriptInterface>,
    index: FxHashMap<String, usize>,
    skipped: Vec<BridgeError>,
    module: S,
}

impl ScriptCollection<Library> {
    /// Open a shared library and resolve its registration table.
    ///
    /// Returns `Ok(None)` when the path cannot be opened as a module.
    pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> BridgeResult<Option<Self>> {
        let library = match Library::open(path) {
            Ok(library) => library,
            Err(e) => {
                log::warn!("{}", e);
                return Ok(None);
            }
        };
        Self::from_module(library, options).map(Some)
    }
}

impl<S: SymbolSource> ScriptCollection<S> {
    /// Resolve the registration table of an already-open module.
    pub fn from_module(module: S, options: &LoadOptions) -> BridgeResult<Self> {
        let types = registered_types(&module)?;
        log::debug!("{}: registration table lists {} type(s)", module.name(), types.len());

        let mut collection = ScriptCollection {
            scripts: Vec::with_capacity(types.len()),
            index: FxHashMap::default(),
            skipped: Vec::new(),
            module,
        };

        for info in types {
            let result = match ScriptInterface::resolve(&collection.module, info) {
                Ok(interface) => collection.insert(interface, options.duplicates),
                Err(e) => Err(e),
            };

            if let Err(e) = result {
                match options.unresolved {
                    ResolvePolicy::Strict => return Err(e),
                    ResolvePolicy::SkipBroken => {
                        log::warn!("{}: skipping type: {}", collection.module.name(), e);
                        collection.skipped.push(e);
                    }
                }
            }
        }

        Ok(collection)
    }

    fn insert(&mut self, interface: ScriptInterface, policy: DuplicatePolicy) -> BridgeResult<()> {
        match self.index.get(interface.name()) {
            Some(&slot) => match policy {
                DuplicatePolicy::Reject => Err(BridgeError::DuplicateType {
                    type_name: interface.name().to_string(),
                }),
                DuplicatePolicy::Overwrite => {
                    log::debug!("{}: replacing earlier registration", interface.name());
                    self.scripts[slot] = interface;
                    Ok(())
                }
            },
            None => {
                self.index.insert(interface.name().to_string(), self.scripts.len());
                self.scripts.push(interface);
                Ok(())
            }
        }
    }

    /// Interface for a type name
    pub fn get(&self, name: &str) -> Option<&ScriptInterface> {
        self.index.get(name).map(|&slot| &self.scripts[slot])
    }

    /// Whether a type of this name was resolved
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Interfaces in registration order
    pub fn iter(&self) -> std::slice::Iter<'_, ScriptInterface> {
        self.scripts.iter()
    }

    /// Type names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.scripts.iter().map(|s| s.name())
    }

    /// Number of resolved types
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Whether no types were resolved
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Errors for types left out under [`ResolvePolicy::SkipBroken`]
    pub fn skipped(&self) -> &[BridgeError] {
        &self.skipped
    }

    /// The module this collection was resolved from
    pub fn module(&self) -> &S {
        &self.module
    }
}

impl<'a, S: SymbolSource> IntoIterator for &'a ScriptCollection<S> {
    type Item = &'a ScriptInterface;
    type IntoIter = std::slice::Iter<'a, ScriptInterface>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: SymbolSource> std::fmt::Debug for ScriptCollection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptCollection")
            .field("module", &self.module.name())
            .field("scripts", &self.names().collect::<Vec<_>>())
            .field("skipped", &self.skipped.len())
            .finish()
    }
}

fn registered_types<S: SymbolSource + ?Sized>(module: &S) -> BridgeResult<Vec<TypeInfo>> {
    let entry = module
        .address(REGISTRATION_SYMBOL)
        .ok_or_else(|| BridgeError::MissingEntryPoint {
            module: module.name().to_string(),
            symbol: REGISTRATION_SYMBOL.to_string(),
        })?;

    let mut count: c_int = 0;
    let mut table: *const RawScriptInfo = ptr::null();
    unsafe {
        let register: GetGeneratedScriptsFn = cast_fn(entry);
        register(&mut count, &mut table);
        decode_table(count, table)
    }
    .map_err(|e| BridgeError::InvalidMetadata(e.to_string()))
}
