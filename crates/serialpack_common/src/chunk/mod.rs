use std::borrow::Cow;

use arcstr::ArcStr;

use crate::{ChunkIdx, ChunkKind, FilenameTemplate, ModuleIdx, NormalizedSerializerOptions};

#[derive(Debug, Clone)]
pub struct Chunk {
  /// Stabilized path of the root module.
  pub id: ArcStr,
  /// Hash over the root and the member paths, used for `[hash]`.
  pub hash: ArcStr,
  pub kind: ChunkKind,
  /// Members in graph order.
  pub modules: Vec<ModuleIdx>,
  pub name: Option<ArcStr>,
  pub filename: Option<ArcStr>,
  /// Chunks loaded by `import()` from this chunk, in discovery order.
  pub async_imports: Vec<ChunkIdx>,
  /// Chunks prefetched from this chunk, in discovery order.
  pub prefetches: Vec<ChunkIdx>,
}

impl Chunk {
  pub fn new(id: ArcStr, kind: ChunkKind, modules: Vec<ModuleIdx>) -> Self {
    Self {
      id,
      hash: ArcStr::default(),
      kind,
      modules,
      name: None,
      filename: None,
      async_imports: vec![],
      prefetches: vec![],
    }
  }

  pub fn root(&self) -> ModuleIdx {
    self.kind.root()
  }

  pub fn filename_template(&self, options: &NormalizedSerializerOptions) -> FilenameTemplate {
    match self.kind {
      ChunkKind::Main { .. } => options.entry_filename_template(),
      ChunkKind::Async { .. } => options.chunk_filename_template(),
    }
  }

  /// Render the filename of the chunk. Names only need to be unique when the template has no
  /// `[hash]` to tell chunks apart.
  pub fn generate_filename(
    &self,
    options: &NormalizedSerializerOptions,
    chunk_name: &ArcStr,
    make_unique_name: &mut impl FnMut(&ArcStr) -> ArcStr,
  ) -> ArcStr {
    let filename_template = self.filename_template(options);

    let name = if filename_template.has_hash_pattern() {
      make_unique_name(chunk_name);
      Cow::Borrowed(chunk_name)
    } else {
      Cow::Owned(make_unique_name(chunk_name))
    };

    filename_template.render(Some(&name), Some(&self.hash)).into()
  }
}
