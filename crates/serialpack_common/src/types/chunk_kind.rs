use crate::ModuleIdx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
  /// Everything synchronously reachable from the entry points. Executed on load.
  Main { entry: ModuleIdx },
  /// Loaded when `root` is imported asynchronously.
  Async { root: ModuleIdx },
}

impl ChunkKind {
  pub fn root(&self) -> ModuleIdx {
    match self {
      Self::Main { entry } => *entry,
      Self::Async { root } => *root,
    }
  }

  pub fn is_async(&self) -> bool {
    matches!(self, Self::Async { .. })
  }
}
