mod dependency_call;
mod module_body;

pub use crate::{
  dependency_call::blank_dependency_calls,
  module_body::{ModuleBodyAnalysis, analyze_module_body},
};
