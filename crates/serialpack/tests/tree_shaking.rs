mod common;

use common::{edge, graph, js_assets, module, options, path, require, serialize};
use serialpack::{
  Dependency, ModuleGraph, ModuleRecord, ReExportBinding, ReExports, SerializerOptions,
  TreeShakeStage, UsedExports,
};

fn treeshake() -> SerializerOptions {
  SerializerOptions { treeshake: Some(true), ..options() }
}

fn re_export(code: &str, slot: usize, target: &str, name: &str) -> Dependency {
  edge(code, slot, &format!("./{name}"), target)
    .with_export_names(Vec::<&str>::new())
    .with_re_exports(ReExports::Named(vec![ReExportBinding {
      exported: name.into(),
      imported: name.into(),
    }]))
}

fn barrel_graph() -> ModuleGraph {
  let index = format!("var _barrel = {};\nconsole.log(_barrel.a);", require(0));
  let barrel = format!(
    "Object.defineProperty(exports, \"__esModule\", {{ value: true }});
var _a = {};
var _b = {};
Object.defineProperty(exports, \"a\", {{ enumerable: true, get: function () {{ return _a.a; }} }});
Object.defineProperty(exports, \"b\", {{ enumerable: true, get: function () {{ return _b.b; }} }});",
    require(0),
    require(1)
  );
  graph([
    module("index.js", &index)
      .with_dependency(edge(&index, 0, "./barrel", "barrel.js").with_export_names(["a"])),
    module("barrel.js", &barrel)
      .with_dependency(re_export(&barrel, 0, "a.js", "a"))
      .with_dependency(re_export(&barrel, 1, "b.js", "b")),
    module("a.js", "exports.a = 'a';"),
    module("b.js", "exports.b = 'b';"),
  ])
}

#[test]
fn re_export_narrowing_prunes_unused_branch() {
  let output = serialize(treeshake(), &barrel_graph()).unwrap();
  let bundle = &js_assets(&output)[0].source;

  assert_eq!(common::define_calls(bundle), 3);
  assert!(bundle.contains("exports.a = 'a';"));
  assert!(!bundle.contains("exports.b = 'b';"));
  // Ids are assigned before shaking: a.js 0, b.js 1, barrel.js 2, index.js 3.
  assert!(bundle.contains("},2,[0,null],\"barrel.js\");"));
  assert!(bundle.contains(&format!("var _b = void 0{};", " ".repeat(require(1).len() - 6))));
}

#[test]
fn without_treeshake_every_module_is_kept() {
  let output = serialize(options(), &barrel_graph()).unwrap();
  let bundle = &js_assets(&output)[0].source;
  assert_eq!(common::define_calls(bundle), 4);
  assert!(bundle.contains("},2,[0,1],\"barrel.js\");"));
}

#[test]
fn used_exports_accumulate_per_module() {
  let graph = barrel_graph();
  let used = TreeShakeStage::new(&graph).analyze();
  let used_of = |relative: &str| used[graph.idx_of(&path(relative)).unwrap()].clone();

  assert_eq!(used_of("index.js"), Some(UsedExports::All));
  assert_eq!(used_of("barrel.js"), Some(UsedExports::from_iter(["a"])));
  assert_eq!(used_of("a.js"), Some(UsedExports::from_iter(["a"])));
  assert_eq!(used_of("b.js"), None);
}

fn with_cjs_exports(mut module: ModuleRecord) -> ModuleRecord {
  if let Some(output) = module.js_output_mut() {
    output.data.has_cjs_exports = true;
  }
  module
}

#[test]
fn ambiguous_modules_use_all_of_their_dependencies() {
  let index = format!("var _lib = {};", require(0));
  let lib = format!("module.exports = {{ ...{} }};", require(0));
  let graph = graph([
    module("index.js", &index)
      .with_dependency(edge(&index, 0, "./lib", "lib.js").with_export_names(Vec::<&str>::new())),
    with_cjs_exports(module("lib.js", &lib))
      .with_dependency(edge(&lib, 0, "./util", "util.js").with_export_names(Vec::<&str>::new())),
    module("util.js", "exports.util = 1;"),
  ]);

  let used = TreeShakeStage::new(&graph).analyze();
  assert!(used[graph.idx_of(&path("lib.js")).unwrap()].is_some());
  assert_eq!(used[graph.idx_of(&path("util.js")).unwrap()], Some(UsedExports::All));

  let output = serialize(treeshake(), &graph).unwrap();
  assert_eq!(common::define_calls(&js_assets(&output)[0].source), 3);
}

#[test]
fn side_effects_keep_unused_imports() {
  let index = format!("{};\n{};\nconsole.log('ready');", require(0), require(1));
  let graph = graph([
    module("index.js", &index)
      .with_dependency(
        edge(&index, 0, "./polyfill", "polyfill.js").with_export_names(Vec::<&str>::new()),
      )
      .with_dependency(edge(&index, 1, "./unused", "unused.js").with_export_names(Vec::<&str>::new())),
    module("polyfill.js", "globalThis.ready = true;"),
    module("unused.js", "exports.unused = function () {};"),
  ]);

  let output = serialize(treeshake(), &graph).unwrap();
  let bundle = &js_assets(&output)[0].source;
  assert!(bundle.contains("globalThis.ready = true;"));
  assert!(!bundle.contains("exports.unused"));
  // Ids: index.js 0, polyfill.js 1, unused.js 2.
  assert!(bundle.contains("},0,[1,null],\"index.js\");"));
}

#[test]
fn user_defined_side_effects_override_analysis() {
  let index = format!("{};", require(0));
  let graph = graph([
    module("index.js", &index)
      .with_dependency(edge(&index, 0, "./styles", "styles.js").with_export_names(Vec::<&str>::new())),
    module("styles.js", "document.title = 'x';").with_side_effects(false),
  ]);

  let shaken = TreeShakeStage::new(&graph).shake();
  assert!(shaken.get(&path("styles.js")).is_none());
  let index = shaken.get(&path("index.js")).unwrap();
  assert!(index.dependencies.values().all(|dependency| dependency.absolute_path.is_none()));
  assert!(index.js_output().unwrap().data.code.starts_with("void 0"));
}

#[test]
fn edges_without_known_call_sites_are_kept() {
  let index = format!("var _x = {};", require(0));
  let graph = graph([
    module("index.js", &index).with_dependency(
      Dependency::new("./pure", path("pure.js")).with_export_names(Vec::<&str>::new()),
    ),
    module("pure.js", "exports.pure = 1;"),
  ]);

  let shaken = TreeShakeStage::new(&graph).shake();
  assert!(shaken.get(&path("pure.js")).is_some());
  assert_eq!(shaken.get(&path("index.js")).unwrap().js_output().unwrap().data.code, index);
}

#[test]
fn retained_modules_never_call_pruned_dependencies() {
  let graph = barrel_graph();
  let shaken = TreeShakeStage::new(&graph).shake();

  for module in shaken.dependencies.values() {
    let original = graph.get(&module.path).unwrap();
    let code = &module.js_output().unwrap().data.code;
    assert_eq!(code.len(), original.js_output().unwrap().data.code.len());
    assert!(module.inverse_dependencies.iter().all(|importer| shaken.get(importer).is_some()));

    for (slot, dependency) in module.dependencies.values().enumerate() {
      match &dependency.absolute_path {
        Some(target) => assert!(shaken.get(target).is_some()),
        None => assert!(!code.contains(&require(slot))),
      }
    }
  }
}

#[test]
fn edges_with_unreported_call_sites_are_kept() {
  let index = format!("{};\nvar late = {}.x;", require(0), require(0));
  let first_call = common::locate(&index, &require(0)).into_iter().take(1).collect();
  let graph = graph([
    module("index.js", &index).with_dependency(
      Dependency::new("./foo", path("foo.js"))
        .with_export_names(Vec::<&str>::new())
        .with_locs(first_call),
    ),
    module("foo.js", "exports.foo = 'foo';"),
  ]);

  let output = serialize(treeshake(), &graph).unwrap();
  let bundle = &js_assets(&output)[0].source;
  assert_eq!(common::define_calls(bundle), 2);
  assert!(bundle.contains(&index));
  assert!(bundle.contains("},1,[0],\"index.js\");"));
}
