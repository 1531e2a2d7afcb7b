//! Backward dataflow liveness analyzer.
//!
//! Classic use/def formulation:
//! `live_out(b) = ∪ live_in(s)` over successors,
//! `live_in(b) = use(b) ∪ (live_out(b) − def(b))`,
//! iterated in reverse block order until stable.
//!
//! Fields and statics escape the function body, so they are treated as live
//! everywhere; only locals and parameters ever die.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::features::live_variables::domain::LivenessResult;
use crate::shared::models::{ControlFlowGraph, SymbolId, SymbolTable};

pub struct LiveVariableAnalyzer;

impl LiveVariableAnalyzer {
    pub fn analyze(cfg: &ControlFlowGraph, symbols: &SymbolTable) -> LivenessResult {
        let n = cfg.block_count();
        let mut uses: Vec<FxHashSet<SymbolId>> = vec![FxHashSet::default(); n];
        let mut defs: Vec<FxHashSet<SymbolId>> = vec![FxHashSet::default(); n];
        let mut escaped: FxHashSet<SymbolId> = FxHashSet::default();

        for (id, block) in cfg.blocks() {
            let i = id.index();
            for instruction in &block.instructions {
                if let Some(read) = instruction.reads() {
                    if escapes(symbols, read) {
                        escaped.insert(read);
                    } else if !defs[i].contains(&read) {
                        // upward-exposed use
                        uses[i].insert(read);
                    }
                }
                if let Some(written) = instruction.writes() {
                    if escapes(symbols, written) {
                        escaped.insert(written);
                    } else {
                        defs[i].insert(written);
                    }
                }
            }
        }

        let mut live_in: Vec<FxHashSet<SymbolId>> = vec![FxHashSet::default(); n];
        let mut live_out: Vec<FxHashSet<SymbolId>> = vec![FxHashSet::default(); n];

        let mut rounds = 0usize;
        let mut changed = true;
        while changed {
            changed = false;
            rounds += 1;
            for i in (0..n).rev() {
                let mut out: FxHashSet<SymbolId> = FxHashSet::default();
                for edge in cfg.successors(crate::shared::models::BlockId(i as u32)) {
                    out.extend(live_in[edge.target.index()].iter().copied());
                }
                let mut inn = uses[i].clone();
                inn.extend(out.iter().filter(|s| !defs[i].contains(s)).copied());
                if out != live_out[i] || inn != live_in[i] {
                    live_out[i] = out;
                    live_in[i] = inn;
                    changed = true;
                }
            }
        }
        debug!("liveness fixpoint after {rounds} rounds over {n} blocks");

        // Escaped symbols stay live across the whole body.
        if !escaped.is_empty() {
            for set in live_out.iter_mut() {
                set.extend(escaped.iter().copied());
            }
        }

        LivenessResult::new(live_out)
    }
}

fn escapes(symbols: &SymbolTable, id: SymbolId) -> bool {
    symbols.info(id).map(|i| i.kind.escapes()).unwrap_or(false)
}
