use serialpack_common::{AsyncDependencyType, ChunkIdx};
use serialpack_utils::{
  indexmap::FxIndexSet,
  rayon::{IntoParallelRefIterator, ParallelIterator},
};

use crate::graph::ChunkGraph;

use super::GenerateStage;

impl GenerateStage<'_> {
  /// Record which chunks each chunk loads lazily, in discovery order.
  pub(super) fn compute_cross_chunk_links(&self, chunk_graph: &mut ChunkGraph) {
    let links = chunk_graph
      .chunk_table
      .raw
      .par_iter()
      .map(|chunk| {
        let mut async_imports = FxIndexSet::<ChunkIdx>::default();
        let mut prefetches = FxIndexSet::<ChunkIdx>::default();
        for module_idx in &chunk.modules {
          for dependency in self.graph.module(*module_idx).dependencies.values() {
            let Some(async_type) = dependency.data.async_type else {
              continue;
            };
            let Some(target_chunk) = self
              .graph
              .resolve(dependency)
              .and_then(|target| chunk_graph.root_to_chunk.get(&target).copied())
            else {
              continue;
            };
            if chunk.modules.contains(&chunk_graph.chunk_table[target_chunk].root()) {
              continue;
            }
            match async_type {
              AsyncDependencyType::Prefetch => {
                prefetches.insert(target_chunk);
              }
              AsyncDependencyType::Async | AsyncDependencyType::MaybeSync => {
                async_imports.insert(target_chunk);
              }
              AsyncDependencyType::Weak => {}
            }
          }
        }
        (async_imports.into_iter().collect::<Vec<_>>(), prefetches.into_iter().collect::<Vec<_>>())
      })
      .collect::<Vec<_>>();

    chunk_graph.chunk_table.iter_mut().zip(links).for_each(|(chunk, (async_imports, prefetches))| {
      chunk.async_imports = async_imports;
      chunk.prefetches = prefetches;
    });
  }
}
