//! Exported symbol collision detection.
//!
//! The naming template is injective within one type but not across types:
//! two types with the same name define the same symbols, and so do type `A`
//! with field `get_x` and type `A_get` with field `x`.

use std::fmt;

use rustc_hash::FxHashMap;

use nativescript_sdk::TypeInfo;

/// One symbol name that would be defined more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolCollision {
    /// The exported name
    pub symbol: String,
    /// Every definition of it, e.g. `TypeA (create)` or `TypeA.health (getter)`
    pub owners: Vec<String>,
}

impl fmt::Display for SymbolCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol '{}' defined by {}", self.symbol, self.owners.join(", "))
    }
}

/// Find every symbol defined more than once by the generated glue for
/// `types`. Results are in order of the symbol's first definition.
pub fn find_collisions(types: &[TypeInfo]) -> Vec<SymbolCollision> {
    let mut definitions: Vec<(&str, String)> = Vec::new();
    for info in types {
        definitions.push((info.create.as_str(), format!("{} (create)", info.name)));
        definitions.push((info.destroy.as_str(), format!("{} (destroy)", info.name)));
        for field in info.fields.iter().filter(|f| f.ty.is_accessible()) {
            definitions.push((field.getter.as_str(), format!("{}.{} (getter)", info.name, field.name)));
            definitions.push((field.setter.as_str(), format!("{}.{} (setter)", info.name, field.name)));
        }
    }

    let mut first_seen: Vec<&str> = Vec::new();
    let mut owners: FxHashMap<&str, Vec<String>> = FxHashMap::default();
    for (symbol, owner) in definitions {
        owners
            .entry(symbol)
            .or_insert_with(|| {
                first_seen.push(symbol);
                Vec::new()
            })
            .push(owner);
    }

    first_seen
        .into_iter()
        .filter_map(|symbol| {
            let defs = owners.remove(symbol)?;
            (defs.len() > 1).then(|| SymbolCollision {
                symbol: symbol.to_string(),
                owners: defs,
            })
        })
        .collect()
}
