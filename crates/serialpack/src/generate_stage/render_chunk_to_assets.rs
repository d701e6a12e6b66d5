use std::path::Path;

use arcstr::ArcStr;
use rustc_hash::FxHashSet;
use serialpack_common::{Chunk, ChunkIdx, ModuleRecord, SerialAsset, SerialAssetKind, SerialAssetMetadata};
use serialpack_error::{BuildDiagnostic, BuildResult};
use serialpack_sourcemap::{SourceJoiner, SourceMapSource, code_lines_count, collapse_segments};
use serialpack_utils::{
  concat_string,
  rayon::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
};
use tracing::debug;

use crate::{
  graph::ChunkGraph,
  serializer::default_run_module_statement,
  types::serial_output::SerialOutput,
  utils::bundle_url::join_url,
};

use super::{GenerateStage, WrapModuleContext, wrap_module};

const CHUNK_MANIFEST_FILENAME: &str = "chunk-manifest.json";

struct RenderedChunk {
  assets: Vec<SerialAsset>,
  warnings: Vec<anyhow::Error>,
}

impl GenerateStage<'_> {
  pub(super) fn render_chunk_to_assets(
    &self,
    chunk_graph: &ChunkGraph,
  ) -> BuildResult<SerialOutput> {
    let rendered = chunk_graph
      .chunk_table
      .raw
      .par_iter()
      .enumerate()
      .map(|(index, chunk)| self.render_chunk(chunk_graph, ChunkIdx::from_usize(index), chunk))
      .collect::<Vec<_>>();

    let mut assets = vec![];
    let mut warnings = vec![];
    let mut errors = vec![];
    for result in rendered {
      match result {
        Ok(chunk) => {
          assets.extend(chunk.assets);
          warnings.extend(chunk.warnings);
        }
        Err(err) => errors.extend(err.0),
      }
    }
    if !errors.is_empty() {
      return Err(errors.into());
    }

    if self.options.split_chunks {
      assets.push(self.render_chunk_manifest(chunk_graph));
    }

    let entry_module_id = self.module_ids.module_id(self.entry_point);
    Ok(SerialOutput { assets, warnings, entry_module_id })
  }

  fn render_chunk(
    &self,
    chunk_graph: &ChunkGraph,
    chunk_idx: ChunkIdx,
    chunk: &Chunk,
  ) -> BuildResult<RenderedChunk> {
    let is_main = !chunk.kind.is_async();
    let filename = chunk_filename(chunk);
    let modules = chunk.modules.iter().map(|idx| self.graph.module(*idx)).collect::<Vec<_>>();

    let mut warnings: Vec<anyhow::Error> = vec![];
    let mut errors: Vec<anyhow::Error> = vec![];
    let pre_modules = if is_main { self.pre_modules } else { &[] };
    for module in pre_modules.iter().chain(modules.iter().copied()) {
      let Some(output) = module.js_output() else {
        continue;
      };
      let actual = code_lines_count(&output.data.code);
      if output.data.line_count != actual {
        let diagnostic = BuildDiagnostic::LineCountMismatch {
          path: module.path.inner().clone(),
          declared: output.data.line_count,
          actual,
        };
        if self.options.dev {
          errors.push(diagnostic.into());
        } else {
          warnings.push(diagnostic.into());
        }
      }
    }
    if !errors.is_empty() {
      return Err(errors.into());
    }

    let chunk_members = chunk.modules.iter().copied().collect::<FxHashSet<_>>();
    let ctx = WrapModuleContext {
      graph: self.graph,
      options: self.options,
      module_ids: self.module_ids.as_ref(),
      chunk_graph: self.options.split_chunks.then_some(chunk_graph),
      chunk_members: &chunk_members,
    };
    let wrapped_modules =
      modules.par_iter().filter_map(|module| wrap_module(module, &ctx)).collect::<Vec<_>>();

    let mut joiner = SourceJoiner::with_sourcemap(self.options.source_maps);
    for module in pre_modules {
      self.append_pre_module(&mut joiner, module);
    }
    for wrapped in wrapped_modules {
      match wrapped.map {
        Some(map) => joiner.append_source(SourceMapSource::new(wrapped.src, map)),
        None => joiner.append_source(wrapped.src),
      }
    }
    if is_main {
      for path in &self.options.run_before_main_module {
        // Modules loaded by an async chunk are not registered yet when the main chunk runs.
        if self.graph.idx_of(path).is_some_and(|idx| chunk_graph.in_main_chunk[idx]) {
          let id = self.module_ids.module_id(&path.as_str().into());
          joiner.append_source(default_run_module_statement(&id));
        }
      }
      if self.options.run_module {
        let id = self.module_ids.module_id(self.entry_point);
        joiner.append_source((self.run_module_statement)(&id));
      }
    }

    let (mut source, map) = joiner.join();
    let map = map.map(|map| {
      source.push_str(&concat_string!("\n//# sourceMappingURL=", map_file_name(&filename), ".map"));
      map.to_json_string()
    });

    let css_filename = self.css_filename(&filename, &modules);
    let metadata = SerialAssetMetadata {
      chunk_id: Some(chunk.id.clone()),
      is_async: !is_main,
      requires: chunk_filenames(chunk_graph, &chunk.async_imports),
      prefetch: chunk_filenames(chunk_graph, &chunk.prefetches),
      css: css_filename.iter().cloned().collect(),
      root_module_id: Some(self.module_ids.module_id(&self.graph.module(chunk.root()).path)),
    };
    debug!(chunk = ?chunk_idx, %filename, modules = modules.len(), "rendered chunk");

    let mut assets = vec![SerialAsset {
      filename,
      source,
      map,
      kind: SerialAssetKind::Js,
      metadata: metadata.clone(),
    }];
    if let Some(css_filename) = css_filename {
      let css = modules
        .iter()
        .flat_map(|module| module.css_outputs())
        .map(|output| output.data.code.as_str())
        .collect::<Vec<_>>()
        .join("\n");
      assets.push(SerialAsset {
        filename: css_filename,
        source: css,
        map: None,
        kind: SerialAssetKind::Css,
        metadata: SerialAssetMetadata { css: vec![], ..metadata },
      });
    }

    Ok(RenderedChunk { assets, warnings })
  }

  /// Pre-modules are emitted exactly as the transformer produced them.
  fn append_pre_module<'a>(&self, joiner: &mut SourceJoiner<'a>, module: &'a ModuleRecord) {
    let Some(output) = module.js_output() else {
      return;
    };
    let code = output.data.code.as_str();
    if self.options.source_maps && !output.data.map.is_empty() {
      let map = collapse_segments(&output.data.map, &module.path, module.source.as_deref(), 0);
      joiner.append_source(SourceMapSource::new(code.to_string(), map));
    } else {
      joiner.append_source(code);
    }
  }

  fn css_filename(&self, filename: &str, modules: &[&ModuleRecord]) -> Option<ArcStr> {
    modules
      .iter()
      .any(|module| module.css_outputs().next().is_some())
      .then(|| Path::new(filename).with_extension("css").to_string_lossy().into_owned().into())
  }

  /// Maps every chunk id to the URL it is served from.
  fn render_chunk_manifest(&self, chunk_graph: &ChunkGraph) -> SerialAsset {
    let manifest = chunk_graph
      .chunk_table
      .iter()
      .map(|chunk| {
        let url = join_url(&self.options.base_url, &chunk_filename(chunk));
        (chunk.id.to_string(), serde_json::Value::String(url))
      })
      .collect::<serde_json::Map<_, _>>();
    SerialAsset {
      filename: CHUNK_MANIFEST_FILENAME.into(),
      source: serde_json::Value::Object(manifest).to_string(),
      map: None,
      kind: SerialAssetKind::Json,
      metadata: SerialAssetMetadata::default(),
    }
  }
}

fn chunk_filename(chunk: &Chunk) -> ArcStr {
  chunk.filename.clone().unwrap_or_else(|| chunk.id.clone())
}

fn chunk_filenames(chunk_graph: &ChunkGraph, chunks: &[ChunkIdx]) -> Vec<ArcStr> {
  chunks.iter().map(|idx| chunk_filename(&chunk_graph.chunk_table[*idx])).collect()
}

fn map_file_name(filename: &str) -> &str {
  filename.rsplit('/').next().unwrap_or(filename)
}
