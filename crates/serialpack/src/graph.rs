use oxc_index::{IndexVec, index_vec};
use rustc_hash::FxHashMap;
use serialpack_common::{Chunk, ChunkIdx, ModuleGraph, ModuleIdx};

#[derive(Debug)]
pub struct ChunkGraph {
  /// The main chunk comes first, async chunks follow in discovery order.
  pub chunk_table: IndexVec<ChunkIdx, Chunk>,
  /// The async chunk loaded for each async root.
  pub root_to_chunk: FxHashMap<ModuleIdx, ChunkIdx>,
  pub in_main_chunk: IndexVec<ModuleIdx, bool>,
}

impl ChunkGraph {
  pub fn new(graph: &ModuleGraph) -> Self {
    Self {
      chunk_table: IndexVec::default(),
      root_to_chunk: FxHashMap::default(),
      in_main_chunk: index_vec![false; graph.len()],
    }
  }

  pub fn add_chunk(&mut self, chunk: Chunk) -> ChunkIdx {
    let is_async = chunk.kind.is_async();
    let root = chunk.root();
    let chunk_idx = self.chunk_table.push(chunk);
    if is_async {
      self.root_to_chunk.insert(root, chunk_idx);
    }
    chunk_idx
  }

  pub fn chunk_rooted_at(&self, module_idx: ModuleIdx) -> Option<&Chunk> {
    self.root_to_chunk.get(&module_idx).map(|chunk_idx| &self.chunk_table[*chunk_idx])
  }
}
