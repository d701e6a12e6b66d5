use oxc_index::{IndexVec, index_vec};
use serialpack_common::{Chunk, ChunkKind, ModuleIdx};
use serialpack_error::{BuildDiagnostic, BuildResult};
use serialpack_utils::{indexmap::FxIndexSet, xxhash::xxhash_short};
use tracing::debug;

use crate::graph::ChunkGraph;

use super::GenerateStage;

const CHUNK_HASH_LEN: usize = 8;

impl GenerateStage<'_> {
  /// Every problem of the graph is reported at once.
  pub(super) fn validate_graph(&self) -> BuildResult<()> {
    let mut errors: Vec<anyhow::Error> = vec![];
    for module in self.graph.dependencies.values() {
      for dependency in module.dependencies.values() {
        let location = dependency.data.locs.first().map(ToString::to_string);
        match &dependency.absolute_path {
          None if !dependency.data.is_optional => {
            errors.push(
              BuildDiagnostic::UnresolvedDependency {
                importer: module.path.inner().clone(),
                specifier: dependency.name.clone(),
                location: location.clone(),
              }
              .into(),
            );
          }
          Some(path) if self.graph.get(path).is_none() => {
            let is_allowed = dependency.data.is_optional
              || dependency.is_weak()
              || (dependency.is_chunk_boundary() && self.options.is_lazy_dev_server());
            if !is_allowed {
              errors.push(
                BuildDiagnostic::MissingModule {
                  importer: module.path.inner().clone(),
                  specifier: dependency.name.clone(),
                  path: path.inner().clone(),
                }
                .into(),
              );
            }
          }
          _ => {}
        }

        if self.options.split_chunks && dependency.is_require_context() {
          errors.push(
            BuildDiagnostic::UnsupportedRequireContext {
              importer: module.path.inner().clone(),
              specifier: dependency.name.clone(),
              location,
            }
            .into(),
          );
        }
      }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors.into()) }
  }

  pub(super) fn generate_chunks(&self) -> BuildResult<ChunkGraph> {
    let Some(entry) = self.graph.idx_of(self.entry_point) else {
      return Err(BuildDiagnostic::MissingEntryPoint { path: self.entry_point.inner().clone() }.into());
    };
    let mut chunk_graph = ChunkGraph::new(self.graph);

    if !self.options.split_chunks {
      let modules = self.graph.iter_enumerated().map(|(idx, _)| idx).collect::<Vec<_>>();
      modules.iter().for_each(|idx| chunk_graph.in_main_chunk[*idx] = true);
      let chunk = self.create_chunk(ChunkKind::Main { entry }, modules);
      chunk_graph.add_chunk(chunk);
      return Ok(chunk_graph);
    }

    let mut entries = vec![entry];
    entries.extend(self.graph.entry_point_indices().into_iter().filter(|idx| *idx != entry));

    let mut async_roots = FxIndexSet::default();
    let nothing_excluded = index_vec![false; self.graph.len()];
    chunk_graph.in_main_chunk =
      self.collect_sync_reachable(&entries, &nothing_excluded, &mut async_roots);
    let main_modules = self.modules_in_graph_order(&chunk_graph.in_main_chunk);
    chunk_graph.add_chunk(self.create_chunk(ChunkKind::Main { entry }, main_modules));

    // Roots discovered while collecting a chunk are appended and handled in turn.
    let mut next_root = 0;
    while let Some(&root) = async_roots.get_index(next_root) {
      next_root += 1;
      if chunk_graph.in_main_chunk[root] {
        continue;
      }
      let members = self.collect_sync_reachable(&[root], &chunk_graph.in_main_chunk, &mut async_roots);
      let modules = self.modules_in_graph_order(&members);
      let chunk = self.create_chunk(ChunkKind::Async { root }, modules);
      debug!(id = %chunk.id, modules = chunk.modules.len(), "created async chunk");
      chunk_graph.add_chunk(chunk);
    }

    Ok(chunk_graph)
  }

  /// Modules reachable from `roots` over synchronous edges, skipping `excluded` ones. Targets
  /// of chunk-boundary edges are recorded in `async_roots` instead of being followed.
  fn collect_sync_reachable(
    &self,
    roots: &[ModuleIdx],
    excluded: &IndexVec<ModuleIdx, bool>,
    async_roots: &mut FxIndexSet<ModuleIdx>,
  ) -> IndexVec<ModuleIdx, bool> {
    let mut visited = index_vec![false; self.graph.len()];
    let mut stack = roots.iter().rev().copied().collect::<Vec<_>>();

    while let Some(module_idx) = stack.pop() {
      if visited[module_idx] || excluded[module_idx] {
        continue;
      }
      visited[module_idx] = true;

      let mut sync_dependencies = vec![];
      for dependency in self.graph.module(module_idx).dependencies.values() {
        if dependency.is_weak() {
          continue;
        }
        let Some(target) = self.graph.resolve(dependency) else {
          continue;
        };
        if dependency.is_chunk_boundary() {
          async_roots.insert(target);
        } else {
          sync_dependencies.push(target);
        }
      }
      stack.extend(sync_dependencies.into_iter().rev());
    }

    visited
  }

  fn modules_in_graph_order(&self, members: &IndexVec<ModuleIdx, bool>) -> Vec<ModuleIdx> {
    members.iter_enumerated().filter(|(_, is_member)| **is_member).map(|(idx, _)| idx).collect()
  }

  fn create_chunk(&self, kind: ChunkKind, modules: Vec<ModuleIdx>) -> Chunk {
    let project_root = &self.options.project_root;
    let id = self.graph.module(kind.root()).path.stabilize(project_root);

    // Member code is part of the hash so a changed module gets a new url.
    let mut members = modules
      .iter()
      .map(|idx| {
        let module = self.graph.module(*idx);
        (module.path.stabilize(project_root), module)
      })
      .collect::<Vec<_>>();
    members.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
    let mut hash_input = id.clone();
    for (path, module) in &members {
      hash_input.push('\n');
      hash_input.push_str(path);
      for output in &module.output {
        hash_input.push('\0');
        hash_input.push_str(&output.data.code);
      }
    }

    let mut chunk = Chunk::new(id.into(), kind, modules);
    chunk.hash = xxhash_short(hash_input.as_bytes(), CHUNK_HASH_LEN).into();
    chunk
  }
}
