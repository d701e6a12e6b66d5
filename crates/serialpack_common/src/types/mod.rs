pub mod chunk_kind;
pub mod idx;
pub mod module_graph;
pub mod module_id;
pub mod module_id_factory;
pub mod module_path;
pub mod serial_asset;
pub mod side_effects;
pub mod transform_options;
pub mod used_exports;
