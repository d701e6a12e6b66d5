mod code_splitting;
mod compute_cross_chunk_links;
mod generate_chunk_filenames;
mod render_chunk_to_assets;
mod wrap_module;

pub use wrap_module::{WrapModuleContext, wrap_module};

use serialpack_common::{ModuleGraph, ModulePath, ModuleRecord};
use serialpack_error::BuildResult;
use tracing::instrument;

use crate::{
  plugin::SerializerArgs,
  types::{RunModuleStatement, SharedModuleIdFactory, SharedOptions, serial_output::SerialOutput},
};

pub struct GenerateStage<'a> {
  entry_point: &'a ModulePath,
  pre_modules: &'a [ModuleRecord],
  graph: &'a ModuleGraph,
  options: &'a SharedOptions,
  module_ids: &'a SharedModuleIdFactory,
  run_module_statement: &'a RunModuleStatement,
}

impl<'a> GenerateStage<'a> {
  pub fn new(args: &'a SerializerArgs) -> Self {
    Self {
      entry_point: &args.entry_point,
      pre_modules: &args.pre_modules,
      graph: &args.graph,
      options: &args.options,
      module_ids: &args.module_ids,
      run_module_statement: &args.run_module_statement,
    }
  }

  #[instrument(level = "debug", skip_all)]
  pub fn generate(&self) -> BuildResult<SerialOutput> {
    self.validate_graph()?;

    let mut chunk_graph = self.generate_chunks()?;
    self.generate_chunk_filenames(&mut chunk_graph);
    self.compute_cross_chunk_links(&mut chunk_graph);

    self.render_chunk_to_assets(&chunk_graph)
  }
}
