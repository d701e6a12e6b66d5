use serialpack_common::ModuleGraph;
use serialpack_ecmascript::blank_dependency_calls;
use tracing::debug;

use super::TreeShakeStage;

impl TreeShakeStage<'_> {
  /// Build the derived graph: unreached modules are dropped and edges pointing at them are
  /// cut. Call sites of a cut edge become `void 0` and its slot renders as `null`.
  pub(super) fn prune_graph(self) -> ModuleGraph {
    let graph = self.graph;
    let mut derived = ModuleGraph::new(graph.transform_options.clone());
    derived.entry_points = graph.entry_points.clone();

    for (module_idx, module) in graph.iter_enumerated() {
      if self.used_exports[module_idx].is_none() {
        debug!(path = %module.path, "removed unused module");
        continue;
      }

      let mut module = module.clone();
      let pruned_slots = module
        .dependencies
        .values()
        .enumerate()
        .filter(|(_, dependency)| {
          !dependency.is_weak()
            && graph.resolve(dependency).is_some_and(|target| self.used_exports[target].is_none())
        })
        .map(|(slot, _)| slot)
        .collect::<Vec<_>>();

      if !pruned_slots.is_empty() {
        let mut code = module.js_output().map(|output| output.data.code.to_string());
        for slot in pruned_slots {
          let dependency = &mut module.dependencies[slot];
          // `None` means an enclosing call was blanked already.
          if let Some(current) = code.as_mut() {
            if let Some(rewritten) = blank_dependency_calls(current, &dependency.data.locs, slot) {
              *current = rewritten;
            }
          }
          debug!(importer = %module.path, specifier = %dependency.name, "pruned dependency");
          dependency.absolute_path = None;
          dependency.data.is_optional = true;
        }
        if let (Some(code), Some(output)) = (code, module.js_output_mut()) {
          output.data.code = code.into();
        }
      }

      derived.add_module(module);
    }

    derived.recompute_inverse_dependencies();
    derived
  }
}
