mod generate_stage;
mod graph;
mod plugin;
mod serializer;
mod tree_shake_stage;
mod types;
mod utils;

pub use crate::{
  generate_stage::{WrapModuleContext, wrap_module},
  graph::ChunkGraph,
  plugin::{ChunkSerializerPlugin, PluginOutput, SerializerArgs, SerializerPlugin, TreeShakePlugin},
  serializer::{Serializer, default_run_module_statement},
  tree_shake_stage::TreeShakeStage,
  types::{
    RunModuleStatement, SharedModuleIdFactory, SharedOptions, serial_output::SerialOutput,
    wrapped_module::WrappedModule,
  },
  utils::{
    bundle_url::{dev_server_bundle_url, join_url},
    enable_tracing::enable_tracing_by_env,
    normalize_options::normalize_options,
  },
};
pub use serialpack_common::*;
pub use serialpack_error::{BuildDiagnostic, BuildError, BuildResult};
pub use serialpack_sourcemap::{MappingSegment, Position, SourceLocation, SourceMap};
