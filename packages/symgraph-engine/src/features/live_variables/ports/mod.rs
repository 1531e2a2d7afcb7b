use rustc_hash::FxHashSet;

use crate::shared::models::{BlockId, SymbolId};

/// Per-block liveness facts consumed by the exploration driver.
pub trait LiveVariables {
    /// Symbols live on exit from `block`. Bindings for symbols outside this
    /// set are forgotten before successors are enqueued.
    fn live_out(&self, block: BlockId) -> &FxHashSet<SymbolId>;
}
