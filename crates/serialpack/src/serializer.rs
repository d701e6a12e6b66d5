use std::{path::Path, sync::Arc};

use serialpack_common::{
  ModuleGraph, ModuleId, ModuleIdFactory, ModulePath, ModuleRecord, SequentialModuleIds,
  SerializerOptions,
};
use serialpack_error::{BuildDiagnostic, BuildResult};
use serialpack_utils::concat_string;
use tracing::{debug, instrument};

use crate::{
  plugin::{ChunkSerializerPlugin, PluginOutput, SerializerArgs, SerializerPlugin, TreeShakePlugin},
  types::{RunModuleStatement, SharedModuleIdFactory, serial_output::SerialOutput},
  utils::normalize_options::normalize_options,
};

/// Turns a resolved module graph into runtime-loadable bundles.
///
/// The pipeline runs the tree-shake plugin, then any added plugins in order, and finally the
/// chunk serializer unless a plugin already produced the output.
pub struct Serializer {
  options: SerializerOptions,
  plugins: Vec<Box<dyn SerializerPlugin>>,
  module_ids: Option<SharedModuleIdFactory>,
  run_module_statement: RunModuleStatement,
}

impl Serializer {
  pub fn new(options: SerializerOptions) -> Self {
    Self {
      options,
      plugins: vec![Box::new(TreeShakePlugin)],
      module_ids: None,
      run_module_statement: Arc::new(default_run_module_statement),
    }
  }

  #[must_use]
  pub fn with_plugin(mut self, plugin: impl SerializerPlugin + 'static) -> Self {
    self.plugins.push(Box::new(plugin));
    self
  }

  /// Use `factory` instead of numeric ids. The factory is shared by every serialization.
  #[must_use]
  pub fn with_module_id_factory(mut self, factory: impl ModuleIdFactory + 'static) -> Self {
    self.module_ids = Some(Arc::new(factory));
    self
  }

  #[must_use]
  pub fn with_run_module_statement(
    mut self,
    statement: impl Fn(&ModuleId) -> String + Send + Sync + 'static,
  ) -> Self {
    self.run_module_statement = Arc::new(statement);
    self
  }

  /// `graph` is never modified; stages work on their own copy.
  #[instrument(skip_all, fields(entry_point = entry_point))]
  pub fn serialize(
    &self,
    entry_point: &str,
    pre_modules: &[ModuleRecord],
    graph: &ModuleGraph,
  ) -> BuildResult<SerialOutput> {
    let options = Arc::new(normalize_options(self.options.clone(), &graph.transform_options)?);

    if graph.get(entry_point).is_none() {
      return Err(BuildDiagnostic::MissingEntryPoint { path: entry_point.into() }.into());
    }

    let mut graph = graph.clone();
    graph.entry_points.insert(ModulePath::from(entry_point));
    graph.recompute_inverse_dependencies();

    let module_ids: SharedModuleIdFactory =
      self.module_ids.clone().unwrap_or_else(|| Arc::new(SequentialModuleIds::new()));
    // Seeded before any stage rewrites the graph, so ids don't depend on tree shaking.
    seed_module_ids(&*module_ids, &graph, &options.project_root);

    let mut args = SerializerArgs {
      entry_point: ModulePath::from(entry_point),
      pre_modules: pre_modules.to_vec(),
      graph,
      options,
      module_ids,
      run_module_statement: Arc::clone(&self.run_module_statement),
    };

    for plugin in &self.plugins {
      debug!(plugin = plugin.name(), "running serializer plugin");
      match plugin.serialize(args)? {
        PluginOutput::Continue(next) => args = next,
        PluginOutput::Done(output) => return Ok(output),
      }
    }

    ChunkSerializerPlugin::generate(&args)
  }
}

/// Graph modules first, then edge targets outside the graph. Weak and lazily built targets
/// are asked for an id while chunks render in parallel, so they must have one already.
fn seed_module_ids(module_ids: &dyn ModuleIdFactory, graph: &ModuleGraph, project_root: &Path) {
  let modules = graph.dependencies.keys().cloned().collect::<Vec<_>>();
  module_ids.seed(&modules, project_root);

  let external = graph
    .dependencies
    .values()
    .flat_map(|module| module.dependencies.values())
    .filter_map(|dependency| dependency.absolute_path.as_ref())
    .filter(|target| !graph.dependencies.contains_key(*target))
    .cloned()
    .collect::<Vec<_>>();
  module_ids.seed(&external, project_root);
}

pub fn default_run_module_statement(id: &ModuleId) -> String {
  concat_string!("__r(", id.to_string(), ");")
}
