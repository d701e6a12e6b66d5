use arcstr::ArcStr;
use serde::{Deserialize, Serialize};
use serialpack_sourcemap::SourceLocation;

use crate::ModulePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AsyncDependencyType {
  /// `import('./foo')`
  Async,
  /// `__prefetchImport('./foo')`
  Prefetch,
  /// An `import()` the runtime may satisfy synchronously when the target is already loaded.
  MaybeSync,
  /// `require.resolveWeak('./foo')`. Yields the id only, the target is never loaded.
  Weak,
}

impl AsyncDependencyType {
  /// Whether the target is loaded in a chunk of its own.
  pub fn is_chunk_boundary(self) -> bool {
    matches!(self, Self::Async | Self::Prefetch | Self::MaybeSync)
  }
}

/// Exports of the target that the importer's code reads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ArcStr>", into = "Vec<ArcStr>")]
pub enum ExportNames {
  /// `['*']`: the whole namespace escapes, no narrowing is possible.
  #[default]
  All,
  Named(Vec<ArcStr>),
}

impl From<Vec<ArcStr>> for ExportNames {
  fn from(names: Vec<ArcStr>) -> Self {
    if names.iter().any(|name| name == "*") { Self::All } else { Self::Named(names) }
  }
}

impl From<ExportNames> for Vec<ArcStr> {
  fn from(names: ExportNames) -> Self {
    match names {
      ExportNames::All => vec![arcstr::literal!("*")],
      ExportNames::Named(names) => names,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReExportBinding {
  /// Name the importer exports the binding under.
  pub exported: ArcStr,
  /// Name of the binding in the target.
  pub imported: ArcStr,
}

/// Bindings of the target that the importer forwards as its own exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReExportsRepr", into = "ReExportsRepr")]
pub enum ReExports {
  /// `export * from './foo'`
  Star,
  /// `export { a as b } from './foo'`
  Named(Vec<ReExportBinding>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ReExportsRepr {
  Star(String),
  Named(Vec<ReExportBinding>),
}

impl TryFrom<ReExportsRepr> for ReExports {
  type Error = String;

  fn try_from(repr: ReExportsRepr) -> Result<Self, Self::Error> {
    match repr {
      ReExportsRepr::Star(star) if star == "*" => Ok(Self::Star),
      ReExportsRepr::Star(other) => Err(format!("Invalid reExports: {other:?}")),
      ReExportsRepr::Named(bindings) => Ok(Self::Named(bindings)),
    }
  }
}

impl From<ReExports> for ReExportsRepr {
  fn from(re_exports: ReExports) -> Self {
    match re_exports {
      ReExports::Star => Self::Star("*".to_string()),
      ReExports::Named(bindings) => Self::Named(bindings),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequireContextMode {
  Sync,
  Eager,
  Lazy,
  LazyOnce,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequireContextFilter {
  pub pattern: String,
  pub flags: String,
}

/// Arguments of a `require.context(dir, recursive, filter, mode)` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequireContextParams {
  pub recursive: bool,
  pub filter: RequireContextFilter,
  pub mode: RequireContextMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencyData {
  pub async_type: Option<AsyncDependencyType>,
  pub key: ArcStr,
  pub locs: Vec<SourceLocation>,
  pub export_names: ExportNames,
  pub re_exports: Option<ReExports>,
  pub is_optional: bool,
  pub context_params: Option<RequireContextParams>,
}

/// A directed edge from an importer to the module one of its specifiers resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
  /// `None` while unresolved.
  pub absolute_path: Option<ModulePath>,
  /// The specifier as written in the source.
  pub name: ArcStr,
  #[serde(default)]
  pub data: DependencyData,
}

impl Dependency {
  pub fn new(name: impl Into<ArcStr>, absolute_path: impl Into<ModulePath>) -> Self {
    let name = name.into();
    Self {
      absolute_path: Some(absolute_path.into()),
      data: DependencyData { key: name.clone(), ..DependencyData::default() },
      name,
    }
  }

  pub fn with_async_type(mut self, async_type: AsyncDependencyType) -> Self {
    self.data.async_type = Some(async_type);
    self
  }

  pub fn with_export_names<T: Into<ArcStr>>(mut self, names: impl IntoIterator<Item = T>) -> Self {
    self.data.export_names = ExportNames::Named(names.into_iter().map(Into::into).collect());
    self
  }

  pub fn with_re_exports(mut self, re_exports: ReExports) -> Self {
    self.data.re_exports = Some(re_exports);
    self
  }

  pub fn with_locs(mut self, locs: Vec<SourceLocation>) -> Self {
    self.data.locs = locs;
    self
  }

  pub fn optional(mut self) -> Self {
    self.data.is_optional = true;
    self
  }

  pub fn is_chunk_boundary(&self) -> bool {
    self.data.async_type.is_some_and(AsyncDependencyType::is_chunk_boundary)
  }

  pub fn is_weak(&self) -> bool {
    self.data.async_type == Some(AsyncDependencyType::Weak)
  }

  pub fn is_sync(&self) -> bool {
    self.data.async_type.is_none()
  }

  pub fn is_require_context(&self) -> bool {
    self.data.context_params.is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deserializes_transformer_records() {
    let dependency: Dependency = serde_json::from_value(serde_json::json!({
      "absolutePath": "/app/foo.js",
      "name": "./foo",
      "data": {
        "asyncType": "maybeSync",
        "key": "./foo",
        "locs": [{ "start": { "line": 1, "column": 0 }, "end": { "line": 1, "column": 12 } }],
        "exportNames": ["foo"],
        "reExports": "*",
        "isOptional": false
      }
    }))
    .unwrap();
    assert!(dependency.is_chunk_boundary());
    assert_eq!(dependency.data.export_names, ExportNames::Named(vec!["foo".into()]));
    assert_eq!(dependency.data.re_exports, Some(ReExports::Star));
    assert_eq!(dependency.data.locs.len(), 1);
  }

  #[test]
  fn star_export_names_mean_all() {
    let names: ExportNames = serde_json::from_str(r#"["default", "*"]"#).unwrap();
    assert_eq!(names, ExportNames::All);
    assert_eq!(serde_json::to_string(&ExportNames::All).unwrap(), r#"["*"]"#);
    let dependency: Dependency =
      serde_json::from_str(r#"{ "absolutePath": null, "name": "x", "data": { "asyncType": "weak" } }"#)
        .unwrap();
    assert!(dependency.is_weak());
    assert!(!dependency.is_chunk_boundary());
    assert_eq!(dependency.data.export_names, ExportNames::All);
  }
}
