use std::path::Path;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};
use sugar_path::SugarPath;

/// `ModulePath` is the absolute path of a module and the primary key of the graph.
/// - Edges refer to their target by `ModulePath`, resolved through the graph at traversal time.
/// - Use [ModulePath::stabilize] for anything that ends up in the output, so bundles don't
///   depend on where the project is checked out.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModulePath(ArcStr);

impl ModulePath {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  pub fn stabilize(&self, project_root: &Path) -> String {
    if self.as_path().is_absolute() {
      self.relative(project_root).as_path().to_slash_lossy().into_owned()
    } else {
      self.to_string()
    }
  }

  pub fn inner(&self) -> &ArcStr {
    &self.0
  }
}

impl std::ops::Deref for ModulePath {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl std::borrow::Borrow<str> for ModulePath {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl AsRef<str> for ModulePath {
  fn as_ref(&self) -> &str {
    self
  }
}

impl std::fmt::Display for ModulePath {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<ArcStr> for ModulePath {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl From<&str> for ModulePath {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<String> for ModulePath {
  fn from(value: String) -> Self {
    Self::new(value)
  }
}

#[test]
fn test_stabilize() {
  let root = Path::new("/home/user/app");
  assert_eq!(ModulePath::from("/home/user/app/src/index.js").stabilize(root), "src/index.js");
  assert_eq!(ModulePath::from("/home/user/node_modules/a.js").stabilize(root), "../node_modules/a.js");
  assert_eq!(ModulePath::from("virtual:prelude").stabilize(root), "virtual:prelude");
}
