pub mod serial_output;
pub mod wrapped_module;

use std::sync::Arc;

use serialpack_common::{ModuleId, ModuleIdFactory, NormalizedSerializerOptions};

pub type SharedOptions = Arc<NormalizedSerializerOptions>;
pub type SharedModuleIdFactory = Arc<dyn ModuleIdFactory>;
/// Renders the statement that starts executing the entry module.
pub type RunModuleStatement = Arc<dyn Fn(&ModuleId) -> String + Send + Sync>;
