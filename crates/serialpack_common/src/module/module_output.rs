use arcstr::ArcStr;
use serde::{Deserialize, Serialize};
use serialpack_sourcemap::MappingSegment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleOutputType {
  #[serde(rename = "js/module")]
  JsModule,
  #[serde(rename = "js/script")]
  JsScript,
  #[serde(rename = "js/script/virtual")]
  JsScriptVirtual,
  #[serde(rename = "js/module/asset")]
  JsModuleAsset,
  #[serde(rename = "css")]
  Css,
}

impl ModuleOutputType {
  pub fn is_js(self) -> bool {
    !matches!(self, Self::Css)
  }

  /// Scripts are self-executing and emitted without a module wrapper.
  pub fn is_script(self) -> bool {
    matches!(self, Self::JsScript | Self::JsScriptVirtual)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleOutputData {
  pub code: ArcStr,
  pub line_count: u32,
  pub map: Vec<MappingSegment>,
  /// The module assigns `module.exports` or `exports` in ways the transformer couldn't follow.
  pub has_cjs_exports: bool,
  /// The module calls `require` with a non-literal argument.
  pub has_dynamic_require: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOutput {
  #[serde(rename = "type")]
  pub kind: ModuleOutputType,
  pub data: ModuleOutputData,
}

impl ModuleOutput {
  /// An output whose line count is taken from `code`.
  pub fn new(kind: ModuleOutputType, code: impl Into<ArcStr>) -> Self {
    let code = code.into();
    let line_count = serialpack_sourcemap::code_lines_count(&code);
    Self { kind, data: ModuleOutputData { code, line_count, ..ModuleOutputData::default() } }
  }
}
