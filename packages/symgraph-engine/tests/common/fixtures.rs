use symgraph_engine::{
    AnalysisEvent, CfgBuilder, ControlFlowGraph, ExplorationLimits, ExplorationStatus, Explorer,
    Instruction, LiteralValue, LiveVariableAnalyzer, SymbolTable,
};

/// Runs one full exploration and collects its event stream.
pub fn explore(
    cfg: &ControlFlowGraph,
    symbols: &SymbolTable,
    limits: ExplorationLimits,
) -> (Vec<AnalysisEvent>, ExplorationStatus) {
    let liveness = LiveVariableAnalyzer::analyze(cfg, symbols);
    let mut walk = Explorer::new(cfg, &liveness, symbols)
        .with_limits(limits)
        .walk();
    let mut events = Vec::new();
    for event in walk.by_ref() {
        events.push(event);
    }
    (events, walk.status())
}

pub fn explore_default(
    cfg: &ControlFlowGraph,
    symbols: &SymbolTable,
) -> (Vec<AnalysisEvent>, ExplorationStatus) {
    explore(cfg, symbols, ExplorationLimits::default())
}

/// `while (true) {}`: a loop whose condition is the `true` literal.
pub fn infinite_loop() -> ControlFlowGraph {
    let mut b = CfgBuilder::new();
    let body = b.block();
    let exit = b.block();
    b.push(body, Instruction::Literal(LiteralValue::True));
    b.branch(body, body, exit);
    b.build().unwrap()
}

/// A loop whose condition is opaque, so each iteration forks.
pub fn opaque_loop() -> ControlFlowGraph {
    let mut b = CfgBuilder::new();
    let header = b.block();
    let exit = b.block();
    b.push(header, Instruction::Opaque { pops: 0 });
    b.branch(header, header, exit);
    b.build().unwrap()
}
