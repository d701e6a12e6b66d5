oxc_index::define_index_type! {
  /// Position of a module in the graph's insertion order.
  pub struct ModuleIdx = u32;
}

oxc_index::define_index_type! {
  /// Position of a chunk in the chunk table. The main chunk comes first.
  pub struct ChunkIdx = u32;
}
