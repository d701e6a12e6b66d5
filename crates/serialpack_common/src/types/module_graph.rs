use serde::{Deserialize, Serialize};
use serialpack_utils::indexmap::{FxIndexMap, FxIndexSet};

use crate::{Dependency, ModuleIdx, ModulePath, ModuleRecord, TransformOptions};

/// An arena of module records keyed by path.
///
/// Insertion order is the canonical order of the graph: every traversal that produces output
/// walks modules in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleGraph {
  pub dependencies: FxIndexMap<ModulePath, ModuleRecord>,
  pub entry_points: FxIndexSet<ModulePath>,
  #[serde(default)]
  pub transform_options: TransformOptions,
}

impl ModuleGraph {
  pub fn new(transform_options: TransformOptions) -> Self {
    Self { transform_options, ..Self::default() }
  }

  /// Replacing an existing record keeps its position.
  pub fn add_module(&mut self, module: ModuleRecord) -> ModuleIdx {
    let (index, _) = self.dependencies.insert_full(module.path.clone(), module);
    ModuleIdx::from_usize(index)
  }

  pub fn with_module(mut self, module: ModuleRecord) -> Self {
    self.add_module(module);
    self
  }

  pub fn with_entry_point(mut self, path: impl Into<ModulePath>) -> Self {
    self.entry_points.insert(path.into());
    self
  }

  pub fn len(&self) -> usize {
    self.dependencies.len()
  }

  pub fn is_empty(&self) -> bool {
    self.dependencies.is_empty()
  }

  pub fn idx_of(&self, path: &str) -> Option<ModuleIdx> {
    self.dependencies.get_index_of(path).map(ModuleIdx::from_usize)
  }

  pub fn get(&self, path: &str) -> Option<&ModuleRecord> {
    self.dependencies.get(path)
  }

  pub fn module(&self, idx: ModuleIdx) -> &ModuleRecord {
    &self.dependencies[idx.index()]
  }

  pub fn iter_enumerated(&self) -> impl Iterator<Item = (ModuleIdx, &ModuleRecord)> {
    self.dependencies.values().enumerate().map(|(index, module)| (ModuleIdx::from_usize(index), module))
  }

  /// The target of `dependency`, if it is resolved and part of the graph.
  pub fn resolve(&self, dependency: &Dependency) -> Option<ModuleIdx> {
    dependency.absolute_path.as_ref().and_then(|path| self.idx_of(path))
  }

  /// Entry points present in the graph, in declaration order.
  pub fn entry_point_indices(&self) -> Vec<ModuleIdx> {
    self.entry_points.iter().filter_map(|path| self.idx_of(path)).collect()
  }

  /// Rebuild every `inverse_dependencies` set from the forward edges.
  pub fn recompute_inverse_dependencies(&mut self) {
    let mut inverse = vec![FxIndexSet::<ModulePath>::default(); self.len()];
    for module in self.dependencies.values() {
      for dependency in module.dependencies.values() {
        if let Some(target) = self.resolve(dependency) {
          inverse[target.index()].insert(module.path.clone());
        }
      }
    }
    self
      .dependencies
      .values_mut()
      .zip(inverse)
      .for_each(|(module, inverse)| module.inverse_dependencies = inverse);
  }
}
