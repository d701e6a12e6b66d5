mod diagnostic;

use std::ops::{Deref, DerefMut};

pub use crate::diagnostic::BuildDiagnostic;

#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl BuildError {
  /// Iterate over the typed diagnostics, skipping errors that did not originate from
  /// [BuildDiagnostic].
  pub fn diagnostics(&self) -> impl Iterator<Item = &BuildDiagnostic> {
    self.0.iter().filter_map(|error| error.downcast_ref::<BuildDiagnostic>())
  }
}

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl std::fmt::Display for BuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (index, error) in self.0.iter().enumerate() {
      if index > 0 {
        writeln!(f)?;
      }
      write!(f, "{error}")?;
    }
    Ok(())
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl From<BuildDiagnostic> for BuildError {
  fn from(diagnostic: BuildDiagnostic) -> Self {
    Self(vec![diagnostic.into()])
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;

#[test]
fn test_diagnostics_are_downcastable() {
  let error = BuildError::from(vec![
    BuildDiagnostic::MissingEntryPoint { path: "/app/index.js".into() }.into(),
    anyhow::anyhow!("plain"),
  ]);
  assert_eq!(error.diagnostics().count(), 1);
  assert_eq!(error.to_string(), "Entry point \"/app/index.js\" is not part of the graph.\nplain");
}
