use anyhow::Context;
use serialpack_common::{NormalizedSerializerOptions, SerializerOptions, TransformOptions};
use serialpack_error::{BuildDiagnostic, BuildResult};

/// Fill in defaults and check the options against the graph's transform options.
pub fn normalize_options(
  raw_options: SerializerOptions,
  transform_options: &TransformOptions,
) -> BuildResult<NormalizedSerializerOptions> {
  let mut errors = vec![];
  let mut check = |option: &'static str, requested: Option<String>, graph: String| {
    if let Some(requested) = requested {
      if requested != graph {
        errors.push(BuildDiagnostic::TransformOptionsMismatch { option, graph, requested }.into());
      }
    }
  };
  check("dev", raw_options.dev.map(|v| v.to_string()), transform_options.dev.to_string());
  check("minify", raw_options.minify.map(|v| v.to_string()), transform_options.minify.to_string());
  check(
    "platform",
    raw_options.platform.clone(),
    transform_options.platform.as_ref().map_or_else(|| "unset".to_string(), ToString::to_string),
  );
  if !errors.is_empty() {
    return Err(errors.into());
  }

  let project_root = match raw_options.project_root {
    Some(project_root) => project_root,
    None => std::env::current_dir().context("Failed to get current dir")?,
  };

  Ok(NormalizedSerializerOptions {
    dev: transform_options.dev,
    platform: transform_options.platform.clone(),
    minify: transform_options.minify,
    treeshake: raw_options.treeshake.unwrap_or(false),
    split_chunks: raw_options.split_chunks.unwrap_or(false),
    source_maps: raw_options.source_maps.unwrap_or(false),
    base_url: raw_options.base_url.unwrap_or_else(|| "/".to_string()),
    project_root,
    include_async_paths: raw_options.include_async_paths.unwrap_or(false),
    run_module: raw_options.run_module.unwrap_or(true),
    run_before_main_module: raw_options.run_before_main_module.unwrap_or_default(),
    skip_wrapping: raw_options.skip_wrapping.unwrap_or(false),
    entry_filenames: raw_options.entry_filenames.unwrap_or_else(|| "[name].js".to_string()),
    chunk_filenames: raw_options.chunk_filenames.unwrap_or_else(|| "[name]-[hash].js".to_string()),
  })
}
