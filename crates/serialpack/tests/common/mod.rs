#![allow(dead_code)]

use serialpack::{
  BuildError, Dependency, ModuleGraph, ModuleRecord, Position, SerialAsset, SerialOutput,
  Serializer, SerializerOptions, SourceLocation,
};

pub const PROJECT_ROOT: &str = "/app";

pub fn path(relative: &str) -> String {
  format!("{PROJECT_ROOT}/{relative}")
}

pub fn options() -> SerializerOptions {
  SerializerOptions { project_root: Some(PROJECT_ROOT.into()), ..SerializerOptions::default() }
}

/// `_$$_REQUIRE(_dependencyMap[slot])`, the call a transformed module uses for a dependency.
pub fn require(slot: usize) -> String {
  format!("_$$_REQUIRE(_dependencyMap[{slot}])")
}

/// Locations of every `call` in `code`, in the 1-based line / 0-based column form the
/// transformer reports.
pub fn locate(code: &str, call: &str) -> Vec<SourceLocation> {
  let mut locs = vec![];
  for (line_index, line) in code.split('\n').enumerate() {
    let line_number = u32::try_from(line_index).unwrap() + 1;
    for (column, _) in line.match_indices(call) {
      let start = u32::try_from(column).unwrap();
      let end = start + u32::try_from(call.len()).unwrap();
      locs.push(SourceLocation {
        start: Position::new(line_number, start),
        end: Position::new(line_number, end),
      });
    }
  }
  locs
}

/// A synchronous edge whose call sites are every `require(slot)` of `code`.
pub fn edge(code: &str, slot: usize, specifier: &str, target: &str) -> Dependency {
  Dependency::new(specifier, path(target)).with_locs(locate(code, &require(slot)))
}

pub fn module(relative: &str, code: &str) -> ModuleRecord {
  ModuleRecord::js(path(relative), code.to_string())
}

pub fn graph(modules: impl IntoIterator<Item = ModuleRecord>) -> ModuleGraph {
  let mut graph = ModuleGraph::default();
  for module in modules {
    graph.add_module(module);
  }
  graph.with_entry_point(path("index.js"))
}

/// Run with `SERIALPACK_LOG=serialpack=trace` to see tree-shaking and chunking decisions.
pub fn serialize(options: SerializerOptions, graph: &ModuleGraph) -> Result<SerialOutput, BuildError> {
  serialpack::enable_tracing_by_env();
  Serializer::new(options).serialize(&path("index.js"), &[], graph)
}

pub fn js_assets(output: &SerialOutput) -> Vec<&SerialAsset> {
  output.assets.iter().filter(|asset| asset.kind == serialpack::SerialAssetKind::Js).collect()
}

/// Number of `__d(` module definitions in a bundle.
pub fn define_calls(source: &str) -> usize {
  source.matches("__d(function").count()
}
