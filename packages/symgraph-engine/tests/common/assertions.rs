use symgraph_engine::{AnalysisEvent, ProgramState};

/// Program states carried by `ExitBlockReached` events, in emission order.
pub fn exit_states(events: &[AnalysisEvent]) -> Vec<&ProgramState> {
    events
        .iter()
        .filter_map(|e| match e {
            AnalysisEvent::ExitBlockReached { state, .. } => Some(state),
            _ => None,
        })
        .collect()
}

/// Boolean outcomes of `ConditionEvaluated` events, in emission order.
pub fn condition_values(events: &[AnalysisEvent]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|e| match e {
            AnalysisEvent::ConditionEvaluated { value, .. } => Some(*value),
            _ => None,
        })
        .collect()
}

pub fn count_kind(events: &[AnalysisEvent], kind: &str) -> usize {
    events.iter().filter(|e| e.kind() == kind).count()
}
