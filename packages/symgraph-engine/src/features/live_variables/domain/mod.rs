//! Liveness facts per basic block.

use rustc_hash::FxHashSet;

use super::ports::LiveVariables;
use crate::shared::models::{BlockId, SymbolId};

/// Live-out sets for every block of one CFG.
#[derive(Debug, Clone, Default)]
pub struct LivenessResult {
    live_out: Vec<FxHashSet<SymbolId>>,
}

impl LivenessResult {
    pub(crate) fn new(live_out: Vec<FxHashSet<SymbolId>>) -> Self {
        Self { live_out }
    }

    /// Everything-is-live result for `block_count` blocks. Useful when the
    /// caller has no liveness information; state growth is then bounded only
    /// by the driver's own limits.
    pub fn all_live(block_count: usize, symbols: impl IntoIterator<Item = SymbolId>) -> Self {
        let all: FxHashSet<SymbolId> = symbols.into_iter().collect();
        Self {
            live_out: vec![all; block_count],
        }
    }
}

impl LiveVariables for LivenessResult {
    fn live_out(&self, block: BlockId) -> &FxHashSet<SymbolId> {
        &self.live_out[block.index()]
    }
}
