use serialpack_common::ModuleId;
use serialpack_sourcemap::SourceMap;
use serialpack_utils::indexmap::FxIndexMap;

/// A module rendered into the runtime's module-definition call.
#[derive(Debug)]
pub struct WrappedModule {
  pub id: ModuleId,
  pub src: String,
  /// URLs the runtime fetches for async dependencies that live in another chunk.
  pub paths: FxIndexMap<ModuleId, String>,
  /// Already shifted to the position of the code inside `src`.
  pub map: Option<SourceMap>,
}
