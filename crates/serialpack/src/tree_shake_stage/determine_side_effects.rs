use oxc_index::{IndexVec, index_vec};
use serialpack_common::{ModuleIdx, ModuleRecord, side_effects::DeterminedSideEffects};
use serialpack_ecmascript::analyze_module_body;
use serialpack_utils::rayon::{IntoParallelIterator, ParallelIterator};

use super::TreeShakeStage;

#[derive(Debug, Clone, Copy)]
enum SideEffectCache {
  None,
  Visited,
  Cache(DeterminedSideEffects),
}

fn analyze_module(module: &ModuleRecord) -> DeterminedSideEffects {
  if let Some(side_effects) = module.side_effects {
    return DeterminedSideEffects::UserDefined(side_effects);
  }
  if module.has_ambiguous_usage() {
    return DeterminedSideEffects::NoTreeshake;
  }
  if module.path.ends_with(".json") {
    return DeterminedSideEffects::Analyzed(false);
  }
  let Some(output) = module.js_output() else {
    return DeterminedSideEffects::NoTreeshake;
  };
  let analysis = analyze_module_body(&output.data.code);
  DeterminedSideEffects::Analyzed(!analysis.is_empty && analysis.has_side_effects)
}

impl TreeShakeStage<'_> {
  pub(super) fn determine_side_effects(&mut self) {
    let graph = self.graph;
    let analyzed: IndexVec<ModuleIdx, DeterminedSideEffects> = (0..graph.len())
      .into_par_iter()
      .map(|index| analyze_module(graph.module(ModuleIdx::from_usize(index))))
      .collect::<Vec<_>>()
      .into();

    let mut cache = index_vec![SideEffectCache::None; graph.len()];
    self.side_effects = analyzed
      .indices()
      .map(|idx| self.determine_side_effects_for_module(idx, &analyzed, &mut cache))
      .collect();
  }

  /// A module analyzed as pure still has side effects when something it synchronously
  /// imports does.
  fn determine_side_effects_for_module(
    &self,
    module_idx: ModuleIdx,
    analyzed: &IndexVec<ModuleIdx, DeterminedSideEffects>,
    cache: &mut IndexVec<ModuleIdx, SideEffectCache>,
  ) -> DeterminedSideEffects {
    match cache[module_idx] {
      SideEffectCache::None => {
        cache[module_idx] = SideEffectCache::Visited;
      }
      SideEffectCache::Visited => {
        return analyzed[module_idx];
      }
      SideEffectCache::Cache(v) => {
        return v;
      }
    }

    let module_side_effects = analyzed[module_idx];
    if let DeterminedSideEffects::Analyzed(false) = module_side_effects {
      let module = self.graph.module(module_idx);
      let side_effects = DeterminedSideEffects::Analyzed(
        module
          .dependencies
          .values()
          .filter(|dependency| dependency.is_sync())
          .filter_map(|dependency| self.graph.resolve(dependency))
          .any(|dependency_idx| {
            self.determine_side_effects_for_module(dependency_idx, analyzed, cache).has_side_effects()
          }),
      );
      cache[module_idx] = SideEffectCache::Cache(side_effects);
      return side_effects;
    }

    cache[module_idx] = SideEffectCache::Cache(module_side_effects);
    module_side_effects
  }
}
