use arcstr::ArcStr;
use serde::Serialize;

use crate::ModuleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialAssetKind {
  Js,
  Css,
  Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerialAssetMetadata {
  pub chunk_id: Option<ArcStr>,
  pub is_async: bool,
  /// Filenames of the chunks this chunk may load asynchronously.
  pub requires: Vec<ArcStr>,
  /// Filenames of the chunks this chunk prefetches.
  pub prefetch: Vec<ArcStr>,
  /// Filenames of the stylesheets belonging to this chunk.
  pub css: Vec<ArcStr>,
  /// Id the loader requires once the chunk has registered its modules.
  pub root_module_id: Option<ModuleId>,
}

/// The final output of serialization. Graph -> Chunks -> Serial assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerialAsset {
  pub filename: ArcStr,
  pub source: String,
  /// Source map JSON, present when source maps are enabled.
  pub map: Option<String>,
  pub kind: SerialAssetKind,
  pub metadata: SerialAssetMetadata,
}

impl SerialAsset {
  pub fn filename(&self) -> &str {
    &self.filename
  }
}
