//! Front-end query seams consumed by the engine.

use crate::shared::models::{SymbolId, SymbolKind, SymbolTable};

/// Symbol-level facts the engine needs from the semantic model.
pub trait SymbolResolver {
    fn kind(&self, symbol: SymbolId) -> SymbolKind;

    /// Whether calling `symbol` is proven free of observable side effects.
    /// Anything not proven pure conservatively invalidates field and static
    /// bindings at the call site.
    fn is_known_pure(&self, symbol: SymbolId) -> bool;

    fn declared_type(&self, symbol: SymbolId) -> Option<&str>;

    /// Value types can never be null; their first read is constrained
    /// `NotNull`.
    fn is_value_type(&self, symbol: SymbolId) -> bool;
}

impl SymbolResolver for SymbolTable {
    fn kind(&self, symbol: SymbolId) -> SymbolKind {
        self.info(symbol).map(|i| i.kind).unwrap_or(SymbolKind::Local)
    }

    fn is_known_pure(&self, symbol: SymbolId) -> bool {
        self.info(symbol).map(|i| i.known_pure).unwrap_or(false)
    }

    fn declared_type(&self, symbol: SymbolId) -> Option<&str> {
        self.info(symbol).and_then(|i| i.declared_type.as_deref())
    }

    fn is_value_type(&self, symbol: SymbolId) -> bool {
        self.info(symbol).map(|i| i.is_value_type).unwrap_or(false)
    }
}
