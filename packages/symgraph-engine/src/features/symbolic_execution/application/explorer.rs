//! Entry point for one bounded exploration.

use tracing::debug;

use crate::features::live_variables::ports::LiveVariables;
use crate::features::symbolic_execution::domain::{
    AnalysisEvent, ExplorationLimits, ExplorationStatus,
};
use crate::features::symbolic_execution::infrastructure::Driver;
use crate::features::symbolic_execution::ports::SymbolResolver;
use crate::shared::models::ControlFlowGraph;

/// Configures an exploration of one function body.
///
/// The explorer borrows its inputs read-only, so one CFG can back any number
/// of sequential or concurrent walks.
///
/// ```
/// use symgraph_engine::{CfgBuilder, Explorer, LiveVariableAnalyzer, SymbolTable};
///
/// let mut builder = CfgBuilder::new();
/// builder.block();
/// let cfg = builder.build()?;
/// let symbols = SymbolTable::new();
/// let liveness = LiveVariableAnalyzer::analyze(&cfg, &symbols);
///
/// for event in Explorer::new(&cfg, &liveness, &symbols).walk() {
///     println!("{}", event.kind());
/// }
/// # Ok::<(), symgraph_engine::EngineError>(())
/// ```
pub struct Explorer<'a> {
    cfg: &'a ControlFlowGraph,
    liveness: &'a dyn LiveVariables,
    symbols: &'a dyn SymbolResolver,
    limits: ExplorationLimits,
}

impl<'a> Explorer<'a> {
    pub fn new(
        cfg: &'a ControlFlowGraph,
        liveness: &'a dyn LiveVariables,
        symbols: &'a dyn SymbolResolver,
    ) -> Self {
        Self {
            cfg,
            liveness,
            symbols,
            limits: ExplorationLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ExplorationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Starts a single-use walk. Nothing runs until the walk is iterated.
    pub fn walk(self) -> Walk<'a> {
        debug!(
            blocks = self.cfg.block_count(),
            max_steps = self.limits.max_steps,
            max_states = self.limits.max_states,
            max_block_visits = self.limits.max_block_visits,
            "starting exploration"
        );
        Walk {
            driver: Driver::new(self.cfg, self.liveness, self.symbols, self.limits),
        }
    }
}

/// Lazy event stream of one exploration. Each `next` call advances the
/// engine just far enough to produce the next event; dropping the walk
/// abandons the remaining work.
pub struct Walk<'a> {
    driver: Driver<'a>,
}

impl Walk<'_> {
    /// Disposition so far: `Completed` only after `ExplorationEnded` has
    /// been yielded, `Aborted` once a bound or fault has fired.
    pub fn status(&self) -> ExplorationStatus {
        self.driver.status()
    }
}

impl Iterator for Walk<'_> {
    type Item = AnalysisEvent;

    fn next(&mut self) -> Option<AnalysisEvent> {
        self.driver.next_event()
    }
}
