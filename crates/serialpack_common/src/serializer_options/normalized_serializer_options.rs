use std::path::PathBuf;

use arcstr::ArcStr;

use crate::FilenameTemplate;

#[allow(clippy::struct_excessive_bools)] // Using raw booleans is more clear in this case
#[derive(Debug, Clone)]
pub struct NormalizedSerializerOptions {
  pub dev: bool,
  pub platform: Option<ArcStr>,
  pub minify: bool,

  pub treeshake: bool,
  pub split_chunks: bool,

  pub source_maps: bool,
  pub base_url: String,
  pub project_root: PathBuf,
  pub include_async_paths: bool,
  pub run_module: bool,
  pub run_before_main_module: Vec<String>,
  pub skip_wrapping: bool,
  pub entry_filenames: String,
  pub chunk_filenames: String,
}

impl NormalizedSerializerOptions {
  /// Async dependencies outside the graph are fetched from the dev server on demand.
  pub fn is_lazy_dev_server(&self) -> bool {
    self.include_async_paths && !self.split_chunks
  }

  pub fn entry_filename_template(&self) -> FilenameTemplate {
    FilenameTemplate::new(self.entry_filenames.clone())
  }

  pub fn chunk_filename_template(&self) -> FilenameTemplate {
    FilenameTemplate::new(self.chunk_filenames.clone())
  }
}
