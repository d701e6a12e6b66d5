use arcstr::ArcStr;
use serde::{Deserialize, Serialize};
use serialpack_utils::indexmap::{FxIndexMap, FxIndexSet};

use crate::{Dependency, ModuleOutput, ModuleOutputType, ModulePath};

/// One compiled source file and its outgoing edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
  pub path: ModulePath,
  #[serde(default)]
  pub source: Option<ArcStr>,
  #[serde(default)]
  pub output: Vec<ModuleOutput>,
  /// Keyed by `data.key`. The position of an entry is its slot in the runtime dependency map.
  #[serde(default)]
  pub dependencies: FxIndexMap<ArcStr, Dependency>,
  /// Recomputed from forward edges by the graph, never trusted from input.
  #[serde(default)]
  pub inverse_dependencies: FxIndexSet<ModulePath>,
  /// Overrides side-effect analysis when set.
  #[serde(default)]
  pub side_effects: Option<bool>,
}

impl ModuleRecord {
  pub fn new(path: impl Into<ModulePath>) -> Self {
    Self {
      path: path.into(),
      source: None,
      output: vec![],
      dependencies: FxIndexMap::default(),
      inverse_dependencies: FxIndexSet::default(),
      side_effects: None,
    }
  }

  /// A `js/module` record with `code` as its only output.
  pub fn js(path: impl Into<ModulePath>, code: impl Into<ArcStr>) -> Self {
    Self::new(path).with_output(ModuleOutput::new(ModuleOutputType::JsModule, code))
  }

  pub fn with_output(mut self, output: ModuleOutput) -> Self {
    self.output.push(output);
    self
  }

  pub fn with_source(mut self, source: impl Into<ArcStr>) -> Self {
    self.source = Some(source.into());
    self
  }

  pub fn with_dependency(mut self, dependency: Dependency) -> Self {
    self.dependencies.insert(dependency.data.key.clone(), dependency);
    self
  }

  pub fn with_side_effects(mut self, side_effects: bool) -> Self {
    self.side_effects = Some(side_effects);
    self
  }

  /// The JavaScript output that gets wrapped. A module has at most one.
  pub fn js_output(&self) -> Option<&ModuleOutput> {
    self.output.iter().find(|output| output.kind.is_js())
  }

  pub fn js_output_mut(&mut self) -> Option<&mut ModuleOutput> {
    self.output.iter_mut().find(|output| output.kind.is_js())
  }

  pub fn css_outputs(&self) -> impl Iterator<Item = &ModuleOutput> {
    self.output.iter().filter(|output| output.kind == ModuleOutputType::Css)
  }

  /// Exports of this module can't be tracked statically.
  pub fn has_ambiguous_usage(&self) -> bool {
    match self.js_output() {
      Some(output) => {
        output.kind != ModuleOutputType::JsModule
          || output.data.has_cjs_exports
          || output.data.has_dynamic_require
          || self.output.iter().any(|output| !output.kind.is_js())
      }
      None => true,
    }
  }
}
