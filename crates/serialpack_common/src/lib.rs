mod chunk;
mod module;
mod serializer_options;
mod types;

pub use serializer_options::{
  SerializerOptions, filename_template::FilenameTemplate,
  normalized_serializer_options::NormalizedSerializerOptions,
};

pub use crate::{
  chunk::Chunk,
  module::{
    dependency::{
      AsyncDependencyType, Dependency, DependencyData, ExportNames, ReExportBinding, ReExports,
      RequireContextFilter, RequireContextMode, RequireContextParams,
    },
    module_output::{ModuleOutput, ModuleOutputData, ModuleOutputType},
    module_record::ModuleRecord,
  },
  types::{
    chunk_kind::ChunkKind,
    idx::{ChunkIdx, ModuleIdx},
    module_graph::ModuleGraph,
    module_id::ModuleId,
    module_id_factory::{ModuleIdFactory, PathModuleIds, SequentialModuleIds},
    module_path::ModulePath,
    serial_asset::{SerialAsset, SerialAssetKind, SerialAssetMetadata},
    side_effects,
    transform_options::TransformOptions,
    used_exports::UsedExports,
  },
};
