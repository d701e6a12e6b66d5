use itertools::Itertools;
use rustc_hash::FxHashSet;
use serialpack_common::{
  ModuleGraph, ModuleId, ModuleIdFactory, ModuleIdx, ModulePath, ModuleRecord,
  NormalizedSerializerOptions,
};
use serialpack_sourcemap::collapse_segments;
use serialpack_utils::{concat_string, indexmap::FxIndexMap};

use crate::{
  graph::ChunkGraph,
  types::wrapped_module::WrappedModule,
  utils::bundle_url::{dev_server_bundle_url, join_url},
};

const FACTORY_HEADER: &str = "__d(function (global, _$$_REQUIRE, _$$_IMPORT_DEFAULT, _$$_IMPORT_ALL, module, exports, _dependencyMap) {";
const WRAPPED_PREFIX: &str = "__d(function";

/// What wrapping a module of one chunk needs to know about the rest of the build.
pub struct WrapModuleContext<'a> {
  pub graph: &'a ModuleGraph,
  pub options: &'a NormalizedSerializerOptions,
  pub module_ids: &'a dyn ModuleIdFactory,
  /// `None` when the modules are not split into chunks.
  pub chunk_graph: Option<&'a ChunkGraph>,
  /// Modules emitted alongside the one being wrapped.
  pub chunk_members: &'a FxHashSet<ModuleIdx>,
}

impl WrapModuleContext<'_> {
  /// URL of the chunk the runtime has to fetch before `target` can be required.
  fn async_path(&self, target: &ModulePath) -> Option<String> {
    if self.options.split_chunks {
      let target_idx = self.graph.idx_of(target)?;
      if self.chunk_members.contains(&target_idx) {
        return None;
      }
      let filename = self.chunk_graph?.chunk_rooted_at(target_idx)?.filename.as_ref()?;
      Some(join_url(&self.options.base_url, filename))
    } else if self.options.include_async_paths {
      Some(dev_server_bundle_url(target, self.options))
    } else {
      None
    }
  }
}

/// Render `module` as a call to the runtime's module-definition primitive:
/// `__d(factory, moduleId, dependencyMap, moduleName[, inverseDependencies])`.
///
/// Returns `None` for modules without JavaScript output.
pub fn wrap_module(module: &ModuleRecord, ctx: &WrapModuleContext) -> Option<WrappedModule> {
  let output = module.js_output()?;
  let id = ctx.module_ids.module_id(&module.path);
  let code = output.data.code.as_str();

  let collapse_map = |line_shift: u32| {
    (ctx.options.source_maps && !output.data.map.is_empty()).then(|| {
      collapse_segments(&output.data.map, &module.path, module.source.as_deref(), line_shift)
    })
  };

  if ctx.options.skip_wrapping || output.kind.is_script() {
    return Some(WrappedModule {
      id,
      src: code.to_string(),
      paths: FxIndexMap::default(),
      map: collapse_map(0),
    });
  }

  let (dependency_map, paths) = render_dependency_map(module, ctx);
  let mut params = vec![
    id.to_string(),
    dependency_map,
    json_string(&module.path.stabilize(&ctx.options.project_root)),
  ];
  if ctx.options.dev {
    params.push(render_inverse_dependencies(module, ctx));
  }
  let params = params.join(",");

  let (src, line_shift) = if code.starts_with(WRAPPED_PREFIX) {
    (add_params_to_define_call(code, &params), 0)
  } else {
    (concat_string!(FACTORY_HEADER, "\n", code, "\n},", params, ");"), 1)
  };

  Some(WrappedModule { id, src, paths, map: collapse_map(line_shift) })
}

/// One slot per dependency, in declaration order. A plain array unless some slot is async.
fn render_dependency_map(
  module: &ModuleRecord,
  ctx: &WrapModuleContext,
) -> (String, FxIndexMap<ModuleId, String>) {
  let mut slots = Vec::with_capacity(module.dependencies.len());
  let mut async_slots = vec![];
  let mut paths = FxIndexMap::default();

  for (slot, dependency) in module.dependencies.values().enumerate() {
    let Some(target) = &dependency.absolute_path else {
      slots.push("null".to_string());
      continue;
    };
    let is_rendered = ctx.graph.get(target).is_some()
      || dependency.is_weak()
      || (dependency.is_chunk_boundary() && ctx.options.is_lazy_dev_server());
    if !is_rendered {
      slots.push("null".to_string());
      continue;
    }

    let id = ctx.module_ids.module_id(target);
    if dependency.is_chunk_boundary() {
      async_slots.push(slot);
      if let Some(url) = ctx.async_path(target) {
        paths.insert(id.clone(), url);
      }
    }
    slots.push(id.to_string());
  }

  if async_slots.is_empty() && paths.is_empty() {
    return (concat_string!("[", slots.join(","), "]"), paths);
  }

  let mut entries =
    slots.iter().enumerate().map(|(slot, id)| format!("\"{slot}\":{id}")).collect::<Vec<_>>();
  entries.push(concat_string!("\"async\":[", async_slots.iter().join(","), "]"));
  if !paths.is_empty() {
    let paths = paths
      .iter()
      .map(|(id, url)| concat_string!(json_string(&id_key(id)), ":", json_string(url)))
      .join(",");
    entries.push(concat_string!("\"paths\":{", paths, "}"));
  }
  (concat_string!("{", entries.join(","), "}"), paths)
}

/// Sorted ids of the importers that are part of the graph.
fn render_inverse_dependencies(module: &ModuleRecord, ctx: &WrapModuleContext) -> String {
  let ids = module
    .inverse_dependencies
    .iter()
    .filter(|importer| ctx.graph.get(importer).is_some())
    .map(|importer| ctx.module_ids.module_id(importer))
    .sorted()
    .join(",");
  concat_string!("[", ids, "]")
}

/// Insert `params` before the closing parenthesis of an existing `__d(...)` call.
fn add_params_to_define_call(code: &str, params: &str) -> String {
  match code.rfind(')') {
    Some(index) => concat_string!(&code[..index], ",", params, &code[index..]),
    None => code.to_string(),
  }
}

fn id_key(id: &ModuleId) -> String {
  match id {
    ModuleId::Numeric(id) => id.to_string(),
    ModuleId::Named(name) => name.to_string(),
  }
}

fn json_string(value: &str) -> String {
  serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use serialpack_common::{
    AsyncDependencyType, Dependency, ModuleOutput, ModuleOutputType, SequentialModuleIds,
  };
  use serialpack_sourcemap::{MappingSegment, Position};

  use super::*;

  fn options() -> NormalizedSerializerOptions {
    NormalizedSerializerOptions {
      dev: false,
      platform: None,
      minify: false,
      treeshake: false,
      split_chunks: false,
      source_maps: false,
      base_url: "/".to_string(),
      project_root: PathBuf::from("/app"),
      include_async_paths: false,
      run_module: true,
      run_before_main_module: vec![],
      skip_wrapping: false,
      entry_filenames: "[name].js".to_string(),
      chunk_filenames: "[name]-[hash].js".to_string(),
    }
  }

  fn graph() -> ModuleGraph {
    let mut graph = ModuleGraph::default()
      .with_module(
        ModuleRecord::js(
          "/app/index.js",
          "var _a = _$$_REQUIRE(_dependencyMap[0]);\nvar _b = _$$_REQUIRE(_dependencyMap[1]);",
        )
        .with_dependency(Dependency::new("./a", "/app/a.js"))
        .with_dependency(Dependency::new("./b", "/app/b.js")),
      )
      .with_module(ModuleRecord::js("/app/a.js", "exports.a = 1;"))
      .with_module(
        ModuleRecord::js("/app/b.js", "exports.b = 1;")
          .with_dependency(Dependency::new("./a", "/app/a.js")),
      );
    graph.recompute_inverse_dependencies();
    graph
  }

  fn ids(graph: &ModuleGraph) -> SequentialModuleIds {
    let ids = SequentialModuleIds::new();
    for path in graph.dependencies.keys() {
      ids.module_id(path);
    }
    ids
  }

  fn wrap(graph: &ModuleGraph, options: &NormalizedSerializerOptions, path: &str) -> WrappedModule {
    let ids = ids(graph);
    let members = FxHashSet::default();
    let ctx = WrapModuleContext {
      graph,
      options,
      module_ids: &ids,
      chunk_graph: None,
      chunk_members: &members,
    };
    wrap_module(graph.get(path).unwrap(), &ctx).unwrap()
  }

  #[test]
  fn wraps_in_define_call() {
    let graph = graph();
    let wrapped = wrap(&graph, &options(), "/app/index.js");
    assert_eq!(
      wrapped.src,
      format!(
        "{FACTORY_HEADER}\nvar _a = _$$_REQUIRE(_dependencyMap[0]);\nvar _b = _$$_REQUIRE(_dependencyMap[1]);\n}},0,[1,2],\"index.js\");"
      )
    );
    assert!(wrapped.paths.is_empty());
  }

  #[test]
  fn dependency_map_slots_match_declaration_order() {
    let graph = graph();
    let ids = ids(&graph);
    let module = graph.get("/app/index.js").unwrap();
    let wrapped = wrap(&graph, &options(), "/app/index.js");

    let (_, params) = wrapped.src.rsplit_once("\n},").unwrap();
    let params: serde_json::Value =
      serde_json::from_str(&format!("[{}]", params.trim_end_matches(");"))).unwrap();
    for (slot, dependency) in module.dependencies.values().enumerate() {
      let code = &module.js_output().unwrap().data.code;
      assert!(code.contains(&format!("_dependencyMap[{slot}]")));
      let id = ids.module_id(dependency.absolute_path.as_ref().unwrap());
      assert_eq!(params[1][slot], serde_json::json!(id.as_numeric().unwrap()));
    }
  }

  #[test]
  fn dev_appends_inverse_dependencies() {
    let graph = graph();
    let options = NormalizedSerializerOptions { dev: true, ..options() };
    let wrapped = wrap(&graph, &options, "/app/a.js");
    assert!(wrapped.src.ends_with("\n},1,[],\"a.js\",[0,2]);"));
  }

  #[test]
  fn unresolved_optional_slots_render_null() {
    let mut optional = Dependency::new("./missing", "/app/missing.js").optional();
    optional.absolute_path = None;
    let graph = ModuleGraph::default().with_module(
      ModuleRecord::js("/app/index.js", "")
        .with_dependency(optional)
        .with_dependency(Dependency::new("./index", "/app/index.js")),
    );
    let wrapped = wrap(&graph, &options(), "/app/index.js");
    assert!(wrapped.src.ends_with("},0,[null,0],\"index.js\");"));
  }

  #[test]
  fn async_slots_and_dev_server_paths() {
    let graph = ModuleGraph::default()
      .with_module(
        ModuleRecord::js("/app/index.js", "")
          .with_dependency(Dependency::new("./a", "/app/a.js"))
          .with_dependency(
            Dependency::new("./lazy", "/app/lazy.js").with_async_type(AsyncDependencyType::Async),
          ),
      )
      .with_module(ModuleRecord::js("/app/a.js", ""));
    let options = NormalizedSerializerOptions {
      include_async_paths: true,
      base_url: "http://localhost:8081".to_string(),
      ..options()
    };
    let wrapped = wrap(&graph, &options, "/app/index.js");
    let url = "http://localhost:8081/lazy.bundle?dev=false&minify=false&modulesOnly=true&runModule=false";
    assert!(wrapped.src.ends_with(&format!(
      "}},0,{{\"0\":1,\"1\":2,\"async\":[1],\"paths\":{{\"2\":\"{url}\"}}}},\"index.js\");"
    )));
    assert_eq!(wrapped.paths.get(&ModuleId::Numeric(2)).map(String::as_str), Some(url));
  }

  #[test]
  fn scripts_and_prewrapped_modules() {
    let graph = ModuleGraph::default()
      .with_module(
        ModuleRecord::new("/app/polyfill.js")
          .with_output(ModuleOutput::new(ModuleOutputType::JsScript, "(function(){})();")),
      )
      .with_module(ModuleRecord::js("/app/wrapped.js", "__d(function (global) {\n  run();\n});"));
    let script = wrap(&graph, &options(), "/app/polyfill.js");
    assert_eq!(script.src, "(function(){})();");

    let wrapped = wrap(&graph, &options(), "/app/wrapped.js");
    assert_eq!(wrapped.src, "__d(function (global) {\n  run();\n},1,[],\"wrapped.js\");");
  }

  #[test]
  fn maps_are_shifted_below_the_header() {
    let mut output = ModuleOutput::new(ModuleOutputType::JsModule, "console.log('hello');");
    output.data.map = vec![MappingSegment::new(Position::new(1, 0), Position::new(1, 0))];
    let graph =
      ModuleGraph::default().with_module(ModuleRecord::new("/app/index.js").with_output(output));
    let options = NormalizedSerializerOptions { source_maps: true, ..options() };
    let wrapped = wrap(&graph, &options, "/app/index.js");
    let map = wrapped.map.unwrap();
    let token = map.get_tokens().next().unwrap();
    assert_eq!((token.get_dst_line(), token.get_src_line()), (1, 0));
  }
}
