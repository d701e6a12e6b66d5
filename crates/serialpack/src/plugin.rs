use serialpack_common::{ModuleGraph, ModulePath, ModuleRecord};
use serialpack_error::BuildResult;

use crate::{
  generate_stage::GenerateStage,
  tree_shake_stage::TreeShakeStage,
  types::{RunModuleStatement, SharedModuleIdFactory, SharedOptions, serial_output::SerialOutput},
};

/// Everything a plugin needs to describe one bundle.
pub struct SerializerArgs {
  pub entry_point: ModulePath,
  /// Scripts emitted verbatim at the top of the main chunk, in order.
  pub pre_modules: Vec<ModuleRecord>,
  pub graph: ModuleGraph,
  pub options: SharedOptions,
  pub module_ids: SharedModuleIdFactory,
  pub run_module_statement: RunModuleStatement,
}

pub enum PluginOutput {
  /// Hand the (possibly modified) bundle description to the next plugin.
  Continue(SerializerArgs),
  /// Stop the pipeline with final assets.
  Done(SerialOutput),
}

/// One order-sensitive stage of serialization.
pub trait SerializerPlugin: Send + Sync {
  fn name(&self) -> &str;

  fn serialize(&self, args: SerializerArgs) -> BuildResult<PluginOutput>;
}

impl<F> SerializerPlugin for F
where
  F: Fn(SerializerArgs) -> BuildResult<PluginOutput> + Send + Sync,
{
  fn name(&self) -> &str {
    "anonymous"
  }

  fn serialize(&self, args: SerializerArgs) -> BuildResult<PluginOutput> {
    self(args)
  }
}

/// Replaces the graph with the subgraph reachable through used exports.
/// Does nothing unless `treeshake` is enabled.
pub struct TreeShakePlugin;

impl SerializerPlugin for TreeShakePlugin {
  fn name(&self) -> &'static str {
    "serialpack:tree-shake"
  }

  fn serialize(&self, mut args: SerializerArgs) -> BuildResult<PluginOutput> {
    if args.options.treeshake {
      args.graph = TreeShakeStage::new(&args.graph).shake();
    }
    Ok(PluginOutput::Continue(args))
  }
}

/// Splits the graph into chunks and renders them. Always terminal.
pub struct ChunkSerializerPlugin;

impl ChunkSerializerPlugin {
  pub fn generate(args: &SerializerArgs) -> BuildResult<SerialOutput> {
    GenerateStage::new(args).generate()
  }
}

impl SerializerPlugin for ChunkSerializerPlugin {
  fn name(&self) -> &'static str {
    "serialpack:chunk-serializer"
  }

  fn serialize(&self, args: SerializerArgs) -> BuildResult<PluginOutput> {
    Self::generate(&args).map(PluginOutput::Done)
  }
}
