//! Symbol contract consumed from the front end.
//!
//! The engine never resolves names; it only needs stable identities plus the
//! few semantic queries listed here (kind, purity, declared type, value-ness).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a symbol within one function body.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym{}", self.0)
    }
}

/// Storage class of a symbol. Fields and statics are invalidated at impure
/// call boundaries; locals and parameters never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Local,
    Parameter,
    Field,
    Static,
}

impl SymbolKind {
    /// Whether the symbol can be observed or mutated outside the current
    /// function body (so the engine must drop its binding at call sites).
    pub fn escapes(self) -> bool {
        matches!(self, SymbolKind::Field | SymbolKind::Static)
    }
}

/// Front-end facts about one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    pub declared_type: Option<String>,
    pub is_value_type: bool,
    pub known_pure: bool,
}

impl SymbolInfo {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            declared_type: None,
            is_value_type: false,
            known_pure: false,
        }
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.declared_type = Some(ty.into());
        self
    }

    pub fn value_type(mut self) -> Self {
        self.is_value_type = true;
        self
    }

    pub fn pure(mut self) -> Self {
        self.known_pure = true;
        self
    }
}

/// Flat table of the symbols mentioned by one function body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    symbols: Vec<SymbolInfo>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, info: SymbolInfo) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(info);
        id
    }

    /// Shorthand for declaring a local variable.
    pub fn local(&mut self, name: impl Into<String>) -> SymbolId {
        self.declare(SymbolInfo::new(name, SymbolKind::Local))
    }

    /// Shorthand for declaring a parameter.
    pub fn parameter(&mut self, name: impl Into<String>) -> SymbolId {
        self.declare(SymbolInfo::new(name, SymbolKind::Parameter))
    }

    /// Shorthand for declaring an instance field.
    pub fn field(&mut self, name: impl Into<String>) -> SymbolId {
        self.declare(SymbolInfo::new(name, SymbolKind::Field))
    }

    pub fn info(&self, id: SymbolId) -> Option<&SymbolInfo> {
        self.symbols.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &SymbolInfo)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, info)| (SymbolId(i as u32), info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_and_query() {
        let mut table = SymbolTable::new();
        let a = table.local("a");
        let f = table.field("backing");
        assert_eq!(table.info(a).map(|i| i.kind), Some(SymbolKind::Local));
        assert!(table.info(f).map(|i| i.kind.escapes()).unwrap_or(false));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn builder_flags() {
        let info = SymbolInfo::new("n", SymbolKind::Parameter)
            .with_type("int")
            .value_type();
        assert_eq!(info.declared_type.as_deref(), Some("int"));
        assert!(info.is_value_type);
        assert!(!info.known_pure);
    }
}
