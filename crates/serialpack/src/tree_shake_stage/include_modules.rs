use std::collections::{BTreeSet, VecDeque};

use oxc_index::index_vec;
use serialpack_common::{Dependency, ExportNames, ModuleIdx, ReExports, UsedExports};
use serialpack_ecmascript::blank_dependency_calls;
use tracing::trace;

use super::TreeShakeStage;

impl TreeShakeStage<'_> {
  /// Propagate used exports from the entry points until nothing changes.
  ///
  /// Terminates because a module is only revisited when its used set grows.
  pub(super) fn include_modules(&mut self) {
    let graph = self.graph;
    self.used_exports = index_vec![None; graph.len()];

    let mut queue = graph
      .entry_point_indices()
      .into_iter()
      .map(|entry| (entry, UsedExports::All))
      .collect::<VecDeque<_>>();

    while let Some((module_idx, requested)) = queue.pop_front() {
      match self.used_exports[module_idx].as_mut() {
        Some(used) => {
          if !used.merge(&requested) {
            continue;
          }
        }
        None => self.used_exports[module_idx] = Some(requested),
      }
      let Some(used) = self.used_exports[module_idx].clone() else {
        continue;
      };

      let module = graph.module(module_idx);
      let is_ambiguous = module.has_ambiguous_usage();
      for (slot, dependency) in module.dependencies.values().enumerate() {
        if dependency.is_weak() {
          continue;
        }
        let Some(target) = graph.resolve(dependency) else {
          continue;
        };

        let contribution = if is_ambiguous || dependency.is_chunk_boundary() {
          UsedExports::All
        } else {
          contribution_of(dependency, &used)
        };

        if contribution.is_empty()
          && !self.side_effects[target].has_side_effects()
          && self.is_prunable_edge(module_idx, slot, dependency)
        {
          trace!(importer = %module.path, slot, "edge contributes nothing");
          continue;
        }
        if self.used_exports[target].as_ref().is_some_and(|used| used.covers(&contribution)) {
          continue;
        }
        queue.push_back((target, contribution));
      }
    }
  }

  /// The edge can be removed without running its target: every call site is known and
  /// verifiably a call through this edge's slot.
  pub(super) fn is_prunable_edge(
    &mut self,
    module_idx: ModuleIdx,
    slot: usize,
    dependency: &Dependency,
  ) -> bool {
    if !dependency.is_sync() || dependency.data.locs.is_empty() {
      return false;
    }
    let graph = self.graph;
    *self.prunable_edges.entry((module_idx, slot)).or_insert_with(|| {
      graph.module(module_idx).js_output().is_some_and(|output| {
        blank_dependency_calls(&output.data.code, &dependency.data.locs, slot).is_some()
      })
    })
  }
}

/// Exports of the target read by the importer's own code plus those it forwards and that are
/// used in turn.
fn contribution_of(dependency: &Dependency, importer_used: &UsedExports) -> UsedExports {
  let ExportNames::Named(names) = &dependency.data.export_names else {
    return UsedExports::All;
  };
  let mut contribution = names.iter().cloned().collect::<BTreeSet<_>>();

  match &dependency.data.re_exports {
    None => {}
    Some(ReExports::Star) => match importer_used {
      UsedExports::All => return UsedExports::All,
      // `export *` never forwards `default`.
      UsedExports::Names(used) => {
        contribution.extend(used.iter().filter(|name| name.as_str() != "default").cloned());
      }
    },
    Some(ReExports::Named(bindings)) => {
      contribution.extend(
        bindings
          .iter()
          .filter(|binding| importer_used.contains(&binding.exported))
          .map(|binding| binding.imported.clone()),
      );
    }
  }

  UsedExports::Names(contribution)
}

#[cfg(test)]
mod tests {
  use serialpack_common::{Dependency, ReExportBinding};

  use super::*;

  fn names(names: &[&str]) -> UsedExports {
    names.iter().copied().collect()
  }

  #[test]
  fn star_re_exports_forward_everything_but_default() {
    let dependency =
      Dependency::new("./a", "/app/a.js").with_export_names(Vec::<&str>::new()).with_re_exports(ReExports::Star);
    assert_eq!(contribution_of(&dependency, &names(&["default", "a"])), names(&["a"]));
    assert_eq!(contribution_of(&dependency, &UsedExports::All), UsedExports::All);
  }

  #[test]
  fn named_re_exports_forward_used_bindings() {
    let dependency = Dependency::new("./a", "/app/a.js").with_export_names(["x"]).with_re_exports(
      ReExports::Named(vec![
        ReExportBinding { exported: "b".into(), imported: "a".into() },
        ReExportBinding { exported: "d".into(), imported: "c".into() },
      ]),
    );
    assert_eq!(contribution_of(&dependency, &names(&["b"])), names(&["a", "x"]));
    assert_eq!(contribution_of(&dependency, &UsedExports::All), names(&["a", "c", "x"]));
  }

  #[test]
  fn star_export_names_use_everything() {
    let dependency = Dependency::new("./a", "/app/a.js");
    assert_eq!(contribution_of(&dependency, &names(&[])), UsedExports::All);
  }
}
