use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

/// Options every module of a graph was transformed with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
  pub dev: bool,
  pub platform: Option<ArcStr>,
  pub minify: bool,
}
