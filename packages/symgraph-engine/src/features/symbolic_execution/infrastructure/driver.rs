//! Worklist-driven exploration of the exploded graph.
//!
//! One node of the exploded graph is a `(program point, program state)` pair.
//! The driver pulls nodes FIFO, runs the block's transfer functions depth
//! first through in-block forks, and enqueues successor block entries. A
//! node already in the visited set is a fixpoint and expands to nothing.
//!
//! The visited key folds the per-path block visit counters into node
//! identity: a loop re-entry with an unchanged state is still a fresh node
//! until `max_block_visits` cuts the path. Without the counters an empty
//! infinite loop would dedup into silent completion.

use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use ahash::AHashSet;
use tracing::{debug, trace};

use crate::errors::{EngineError, Result};
use crate::features::live_variables::ports::LiveVariables;
use crate::features::symbolic_execution::domain::{
    AbortReason, AnalysisEvent, Constraint, ConstraintDomain, ExplorationLimits,
    ExplorationStatus, ProgramPoint, ProgramState, ValueFactory,
};
use crate::features::symbolic_execution::ports::SymbolResolver;
use crate::shared::models::{BlockId, ControlFlowGraph, SymbolId};

use super::transfer::{self, TransferContext};

/// Pending exploded-graph node.
struct Node {
    point: ProgramPoint,
    state: ProgramState,
}

/// Visited-set key: point plus state, with visit counters made significant.
struct NodeKey {
    point: ProgramPoint,
    state: ProgramState,
}

impl PartialEq for NodeKey {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
            && self.state == other.state
            && self.state.same_visits(&other.state)
    }
}

impl Eq for NodeKey {}

impl Hash for NodeKey {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.point.hash(hasher);
        self.state.hash(hasher);
        self.state.hash_visits(hasher);
    }
}

/// Bounded exploration over one CFG. Owned by a walk; callers consume it
/// through [`next_event`](Driver::next_event).
pub struct Driver<'a> {
    cfg: &'a ControlFlowGraph,
    liveness: &'a dyn LiveVariables,
    symbols: &'a dyn SymbolResolver,
    limits: ExplorationLimits,
    values: ValueFactory,
    worklist: VecDeque<Node>,
    visited: AHashSet<NodeKey>,
    steps: usize,
    states_created: usize,
    events: VecDeque<AnalysisEvent>,
    status: ExplorationStatus,
}

impl<'a> Driver<'a> {
    pub fn new(
        cfg: &'a ControlFlowGraph,
        liveness: &'a dyn LiveVariables,
        symbols: &'a dyn SymbolResolver,
        limits: ExplorationLimits,
    ) -> Self {
        let mut worklist = VecDeque::new();
        worklist.push_back(Node {
            point: ProgramPoint::block_start(cfg.entry()),
            state: ProgramState::empty(),
        });
        Self {
            cfg,
            liveness,
            symbols,
            limits,
            values: ValueFactory::new(),
            worklist,
            visited: AHashSet::new(),
            steps: 0,
            states_created: 1,
            events: VecDeque::new(),
            status: ExplorationStatus::Ready,
        }
    }

    pub fn status(&self) -> ExplorationStatus {
        self.status
    }

    /// Produces the next event, advancing the exploration as far as needed.
    /// Returns `None` once the walk has completed or aborted.
    pub fn next_event(&mut self) -> Option<AnalysisEvent> {
        loop {
            if let Some(event) = self.events.pop_front() {
                return Some(event);
            }
            match self.status {
                ExplorationStatus::Completed | ExplorationStatus::Aborted(_) => return None,
                ExplorationStatus::Ready | ExplorationStatus::Running => {}
            }
            self.pump();
        }
    }

    /// Expands one worklist node (or finishes the walk).
    fn pump(&mut self) {
        self.status = ExplorationStatus::Running;
        let Some(node) = self.worklist.pop_front() else {
            debug!(
                steps = self.steps,
                states = self.states_created,
                "exploration ended"
            );
            self.events.push_back(AnalysisEvent::ExplorationEnded);
            self.status = ExplorationStatus::Completed;
            return;
        };

        let key = NodeKey {
            point: node.point,
            state: node.state.clone(),
        };
        if !self.visited.insert(key) {
            trace!(point = %node.point, "state already explored");
            return;
        }

        let entering = node.point.offset == 0;
        let state = if entering {
            let (count, state) = node.state.add_visit(node.point.block);
            if count > self.limits.max_block_visits {
                debug!(point = %node.point, count, "visit bound hit, cutting path");
                self.events
                    .push_back(AnalysisEvent::VisitCountExceeded { point: node.point });
                return;
            }
            state
        } else {
            node.state
        };

        if let Err(error) = self.expand(node.point, state) {
            debug!(%error, "engine fault, aborting");
            // drop the failing node's partial events; earlier ones were
            // already delivered
            self.events.clear();
            self.status = ExplorationStatus::Aborted(AbortReason::EngineFault);
        }
    }

    /// Runs the transfer functions from `point` to the end of its block,
    /// depth first through in-block forks, then hands each surviving state
    /// to the block's outgoing edges.
    fn expand(&mut self, point: ProgramPoint, state: ProgramState) -> Result<()> {
        let cfg = self.cfg;
        let block = cfg.block(point.block);
        let mut pending: Vec<(usize, ProgramState)> = vec![(point.offset as usize, state)];

        while let Some((offset, state)) = pending.pop() {
            if self.status != ExplorationStatus::Running {
                return Ok(());
            }
            if offset >= block.instructions.len() {
                self.leave_block(point.block, state)?;
                continue;
            }
            let instruction = block.instructions[offset];

            self.steps += 1;
            if self.steps > self.limits.max_steps {
                debug!(limit = self.limits.max_steps, "step budget exhausted");
                self.events.push_back(AnalysisEvent::MaxStepCountReached);
                self.status = ExplorationStatus::Aborted(AbortReason::MaxStepCountReached);
                return Ok(());
            }

            let mut ctx = TransferContext {
                symbols: self.symbols,
                values: &mut self.values,
            };
            let successors = transfer::apply(&state, instruction, &mut ctx)?;
            if !self.charge_states(successors.len()) {
                return Ok(());
            }

            let here = ProgramPoint::new(point.block, offset as u32);
            for successor in &successors {
                self.events.push_back(AnalysisEvent::InstructionProcessed {
                    point: here,
                    instruction,
                    state: successor.clone(),
                });
            }

            if instruction.is_terminator() {
                for successor in successors {
                    self.leave_block(point.block, successor)?;
                }
                continue;
            }
            // reversed push keeps the first successor on top of the stack
            for successor in successors.into_iter().rev() {
                pending.push((offset + 1, successor));
            }
        }
        Ok(())
    }

    /// Routes a state that survived to the end of `block` along its edges.
    fn leave_block(&mut self, block: BlockId, state: ProgramState) -> Result<()> {
        let cfg = self.cfg;
        let edge_point = ProgramPoint::new(block, cfg.block(block).instructions.len() as u32);

        if cfg.is_exit(block) {
            let state = self.tidy(block, state);
            self.events.push_back(AnalysisEvent::ExitBlockReached {
                point: edge_point,
                state,
            });
            return Ok(());
        }

        if let Some((on_true, on_false)) = cfg.branch_targets(block) {
            let (condition, state) = state
                .pop()
                .ok_or(EngineError::StackUnderflow("branch condition"))?;
            if let Some(Constraint::Bool(value)) =
                state.constraint_of(condition, ConstraintDomain::Boolean)
            {
                // the condition is settled on this path: single edge
                self.events.push_back(AnalysisEvent::ConditionEvaluated {
                    point: edge_point,
                    value,
                });
                let target = if value { on_true } else { on_false };
                self.enqueue(block, target, state);
                return Ok(());
            }
            if let Some(true_state) = state.constrain(condition, Constraint::Bool(true)) {
                if !self.charge_states(1) {
                    return Ok(());
                }
                self.enqueue(block, on_true, true_state);
            }
            if let Some(false_state) = state.constrain(condition, Constraint::Bool(false)) {
                if !self.charge_states(1) {
                    return Ok(());
                }
                self.enqueue(block, on_false, false_state);
            }
            return Ok(());
        }

        for edge in cfg.successors(block) {
            self.enqueue(block, edge.target, state.clone());
        }
        Ok(())
    }

    fn enqueue(&mut self, from: BlockId, target: BlockId, state: ProgramState) {
        let state = self.tidy(from, state);
        trace!(from = %from, to = %target, "enqueue");
        self.worklist.push_back(Node {
            point: ProgramPoint::block_start(target),
            state,
        });
    }

    /// Drops dead bindings (liveness) and unreachable constraints before a
    /// state crosses a block boundary, so spurious differences do not defeat
    /// the visited set.
    fn tidy(&self, block: BlockId, state: ProgramState) -> ProgramState {
        let live = self.liveness.live_out(block);
        let dead: Vec<SymbolId> = state
            .bound_symbols()
            .filter(|symbol| !live.contains(symbol))
            .collect();
        let state = if dead.is_empty() {
            state
        } else {
            state.forget(dead)
        };
        state.cleaned()
    }

    /// Charges `count` freshly constructed states against the state budget.
    /// Returns `false` after emitting the abort event when the budget is
    /// exhausted.
    fn charge_states(&mut self, count: usize) -> bool {
        self.states_created += count;
        if self.states_created > self.limits.max_states {
            debug!(limit = self.limits.max_states, "state budget exhausted");
            self.events
                .push_back(AnalysisEvent::MaxInternalStateCountReached);
            self.status = ExplorationStatus::Aborted(AbortReason::MaxInternalStateCountReached);
            false
        } else {
            true
        }
    }
}
