pub mod filename_template;
pub mod normalized_serializer_options;

use std::path::PathBuf;

use serde::Deserialize;

/// Options of one serialization. Every field is optional; unset fields fall back to the
/// conservative choice (no tree shaking, a single bundle).
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializerOptions {
  // --- Must match the graph's transform options when set
  pub dev: Option<bool>,
  pub platform: Option<String>,
  pub minify: Option<bool>,

  // --- Optimization
  pub treeshake: Option<bool>,
  pub split_chunks: Option<bool>,

  // --- Output
  pub source_maps: Option<bool>,
  pub base_url: Option<String>,
  pub project_root: Option<PathBuf>,
  pub include_async_paths: Option<bool>,
  pub run_module: Option<bool>,
  pub run_before_main_module: Option<Vec<String>>,
  pub skip_wrapping: Option<bool>,
  pub entry_filenames: Option<String>,
  pub chunk_filenames: Option<String>,
}
