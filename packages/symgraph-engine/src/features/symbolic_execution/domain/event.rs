//! Events produced during one exploration.
//!
//! A walk yields a finite, non-restartable sequence of these; rule checks
//! subscribe by iterating. The engine itself never reports diagnostics; it
//! only supplies (point, state) facts.

use super::program_point::ProgramPoint;
use super::program_state::ProgramState;
use crate::shared::models::Instruction;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEvent {
    /// An instruction was applied; `state` is the resulting program state
    /// (one event per feasible successor state).
    InstructionProcessed {
        point: ProgramPoint,
        instruction: Instruction,
        state: ProgramState,
    },
    /// A branch condition carried a definite Boolean constraint, so only
    /// one edge was taken on this path.
    ConditionEvaluated { point: ProgramPoint, value: bool },
    /// A path reached an exit block with `state`.
    ExitBlockReached {
        point: ProgramPoint,
        state: ProgramState,
    },
    /// The worklist drained normally; the exploration is complete.
    ExplorationEnded,
    /// Global instruction budget exhausted; exploration aborted.
    MaxStepCountReached,
    /// Distinct-state budget exhausted; exploration aborted.
    MaxInternalStateCountReached,
    /// A block's per-path visit counter passed the loop-unrolling bound;
    /// the path was cut there (deliberate, documented unsoundness).
    VisitCountExceeded { point: ProgramPoint },
}

impl AnalysisEvent {
    /// Short tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisEvent::InstructionProcessed { .. } => "instruction_processed",
            AnalysisEvent::ConditionEvaluated { .. } => "condition_evaluated",
            AnalysisEvent::ExitBlockReached { .. } => "exit_block_reached",
            AnalysisEvent::ExplorationEnded => "exploration_ended",
            AnalysisEvent::MaxStepCountReached => "max_step_count_reached",
            AnalysisEvent::MaxInternalStateCountReached => "max_internal_state_count_reached",
            AnalysisEvent::VisitCountExceeded { .. } => "visit_count_exceeded",
        }
    }
}

/// Terminal disposition of one exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorationStatus {
    Ready,
    Running,
    Completed,
    Aborted(AbortReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    MaxStepCountReached,
    MaxInternalStateCountReached,
    /// A transfer function reported a contract violation; the exploration
    /// stops with no further events rather than producing doubtful facts.
    EngineFault,
}
