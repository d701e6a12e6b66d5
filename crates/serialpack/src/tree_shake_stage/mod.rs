mod determine_side_effects;
mod include_modules;
mod prune_graph;

use oxc_index::IndexVec;
use rustc_hash::FxHashMap;
use serialpack_common::{ModuleGraph, ModuleIdx, UsedExports, side_effects::DeterminedSideEffects};
use tracing::instrument;

/// Removes modules whose exports are never read and whose evaluation can't be observed.
///
/// Works on an immutable graph and returns a derived one. Per-module state lives in the stage,
/// never on the records, so shaking the same graph twice gives the same result.
pub struct TreeShakeStage<'a> {
  graph: &'a ModuleGraph,
  side_effects: IndexVec<ModuleIdx, DeterminedSideEffects>,
  /// `None` means not reached from any entry point.
  used_exports: IndexVec<ModuleIdx, Option<UsedExports>>,
  prunable_edges: FxHashMap<(ModuleIdx, usize), bool>,
}

impl<'a> TreeShakeStage<'a> {
  pub fn new(graph: &'a ModuleGraph) -> Self {
    Self {
      graph,
      side_effects: IndexVec::default(),
      used_exports: IndexVec::default(),
      prunable_edges: FxHashMap::default(),
    }
  }

  #[instrument(level = "debug", skip_all)]
  pub fn shake(mut self) -> ModuleGraph {
    self.determine_side_effects();
    self.include_modules();
    self.prune_graph()
  }

  /// Used exports of every module after the fixed point, in graph order.
  pub fn analyze(mut self) -> IndexVec<ModuleIdx, Option<UsedExports>> {
    self.determine_side_effects();
    self.include_modules();
    self.used_exports
  }
}
