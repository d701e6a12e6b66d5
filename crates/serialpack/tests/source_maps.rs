mod common;

use common::{graph, js_assets, options, path};
use serialpack::{
  MappingSegment, ModuleOutput, ModuleOutputType, ModuleRecord, Position, SerializerOptions,
  SourceMap,
};

/// A module whose map sends every generated line to the same original line.
fn mapped_module(relative: &str, code: &str) -> ModuleRecord {
  let mut output = ModuleOutput::new(ModuleOutputType::JsModule, code.to_string());
  output.data.map = (1..=u32::try_from(code.split('\n').count()).unwrap())
    .map(|line| MappingSegment::new(Position::new(line, 0), Position::new(line, 0)))
    .collect();
  ModuleRecord::new(path(relative)).with_output(output).with_source(code.to_string())
}

fn two_module_graph() -> serialpack::ModuleGraph {
  // The entry has 3 lines, the second module 2.
  let mut index = mapped_module("index.js", "var a = 1;\nvar b = 2;\nvar c = 3;");
  index = index.with_dependency(serialpack::Dependency::new("./second", path("second.js")));
  graph([index, mapped_module("second.js", "console.log(a);\nconsole.log(b);")])
}

fn bundle_map(options: SerializerOptions) -> (String, SourceMap) {
  let output = common::serialize(options, &two_module_graph()).unwrap();
  let asset = js_assets(&output)[0].clone();
  let map = SourceMap::from_json_string(asset.map.as_deref().unwrap()).unwrap();
  (asset.source, map)
}

/// Original (source, 1-based line) of the first token on a 1-based bundle line.
fn original_of(map: &SourceMap, bundle_line: u32) -> (String, u32) {
  let token = map.get_tokens().find(|token| token.get_dst_line() + 1 == bundle_line).unwrap();
  let source = map.get_source(token.get_source_id().unwrap()).unwrap().to_string();
  (source, token.get_src_line() + 1)
}

#[test]
fn unwrapped_modules_are_offset_by_preceding_lines() {
  let options = SerializerOptions {
    source_maps: Some(true),
    skip_wrapping: Some(true),
    run_module: Some(false),
    ..options()
  };
  let (source, map) = bundle_map(options);
  assert!(source.ends_with("\n//# sourceMappingURL=app.js.map"));

  let n1 = 3;
  for bundle_line in n1 + 1..=n1 + 2 {
    assert_eq!(original_of(&map, bundle_line), (path("second.js"), bundle_line - n1));
  }
  assert_eq!(original_of(&map, 2), (path("index.js"), 2));
}

#[test]
fn wrapped_modules_account_for_the_define_call() {
  let options = SerializerOptions { source_maps: Some(true), ..options() };
  let (source, map) = bundle_map(options);

  let lines = source.split('\n').collect::<Vec<_>>();
  // Header, 3 body lines, `},...);` for the entry, then the same for the second module.
  assert!(lines[0].starts_with("__d(function"));
  assert_eq!(lines[1], "var a = 1;");
  assert_eq!(lines[6], "console.log(a);");
  assert_eq!(original_of(&map, 2), (path("index.js"), 1));
  assert_eq!(original_of(&map, 4), (path("index.js"), 3));
  assert_eq!(original_of(&map, 7), (path("second.js"), 1));
  assert_eq!(original_of(&map, 8), (path("second.js"), 2));
  assert_eq!(map.get_source_content(0), Some("var a = 1;\nvar b = 2;\nvar c = 3;"));
}

#[test]
fn no_maps_unless_requested() {
  let output = common::serialize(options(), &two_module_graph()).unwrap();
  let asset = js_assets(&output)[0];
  assert!(asset.map.is_none());
  assert!(!asset.source.contains("sourceMappingURL"));
}
