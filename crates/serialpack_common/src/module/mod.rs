pub mod dependency;
pub mod module_output;
pub mod module_record;
