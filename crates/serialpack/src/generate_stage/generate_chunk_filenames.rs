use std::{collections::hash_map::Entry, path::Path};

use arcstr::ArcStr;
use rustc_hash::FxHashMap;
use serialpack_utils::{chunk_name::chunk_name_of, concat_string};

use crate::graph::ChunkGraph;

use super::GenerateStage;

impl GenerateStage<'_> {
  /// Filenames only depend on module paths, so they are stable across builds and machines.
  pub(super) fn generate_chunk_filenames(&self, chunk_graph: &mut ChunkGraph) {
    let mut used_name_counts: FxHashMap<ArcStr, u32> = FxHashMap::default();
    let mut make_unique_name = |name: &ArcStr| {
      let mut candidate = name.clone();
      loop {
        match used_name_counts.entry(candidate.clone()) {
          Entry::Occupied(mut occ) => {
            // This name is already used
            let next_count = *occ.get();
            occ.insert(next_count + 1);
            candidate = ArcStr::from(concat_string!(name, next_count.to_string()));
          }
          Entry::Vacant(vac) => {
            let name = vac.key().clone();
            vac.insert(2);
            break name;
          }
        }
      }
    };

    for chunk in chunk_graph.chunk_table.iter_mut() {
      let root = self.graph.module(chunk.root());
      let name = ArcStr::from(chunk_name_of(Path::new(&*root.path)));
      let filename = chunk.generate_filename(self.options, &name, &mut make_unique_name);
      chunk.name = Some(name);
      chunk.filename = Some(filename);
    }
  }
}
