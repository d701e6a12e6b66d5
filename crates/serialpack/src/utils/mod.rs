pub mod bundle_url;
pub mod enable_tracing;
pub mod normalize_options;
