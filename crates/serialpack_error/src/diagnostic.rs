use arcstr::ArcStr;

#[derive(Debug, thiserror::Error)]
pub enum BuildDiagnostic {
  #[error("Unable to resolve {specifier:?} from {importer:?}{}.", at(.location.as_ref()))]
  UnresolvedDependency { importer: ArcStr, specifier: ArcStr, location: Option<String> },

  #[error("Module {path:?} imported as {specifier:?} from {importer:?} is missing from the graph.")]
  MissingModule { importer: ArcStr, specifier: ArcStr, path: ArcStr },

  #[error(
    "require.context({specifier:?}) in {importer:?}{} can not be split into chunks.",
    at(.location.as_ref())
  )]
  UnsupportedRequireContext { importer: ArcStr, specifier: ArcStr, location: Option<String> },

  #[error(
    "Module {path:?} declares {declared} lines but its code has {actual}; source maps of the following modules would be misaligned."
  )]
  LineCountMismatch { path: ArcStr, declared: u32, actual: u32 },

  #[error("Entry point {path:?} is not part of the graph.")]
  MissingEntryPoint { path: ArcStr },

  #[error(
    "Option `{option}` is {requested} but the graph was transformed with {graph}; all modules of one serialization must share the same transform options."
  )]
  TransformOptionsMismatch { option: &'static str, graph: String, requested: String },
}

fn at(location: Option<&String>) -> String {
  location.map_or_else(String::new, |location| format!(" at {location}"))
}

impl BuildDiagnostic {
  /// The module whose code or edges caused the diagnostic.
  pub fn importer(&self) -> Option<&str> {
    match self {
      Self::UnresolvedDependency { importer, .. }
      | Self::MissingModule { importer, .. }
      | Self::UnsupportedRequireContext { importer, .. } => Some(importer),
      Self::LineCountMismatch { path, .. } | Self::MissingEntryPoint { path } => Some(path),
      Self::TransformOptionsMismatch { .. } => None,
    }
  }
}

#[test]
fn test_unresolved_dependency_message() {
  let diagnostic = BuildDiagnostic::UnresolvedDependency {
    importer: "/app/index.js".into(),
    specifier: "./missing".into(),
    location: Some("3:10".to_string()),
  };
  assert_eq!(
    diagnostic.to_string(),
    "Unable to resolve \"./missing\" from \"/app/index.js\" at 3:10."
  );
  assert_eq!(diagnostic.importer(), Some("/app/index.js"));
}
