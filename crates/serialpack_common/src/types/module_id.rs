use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

/// The id a module registers under in the runtime's module cache.
///
/// Ids are assigned once per module path for the whole build, so a module duplicated into
/// several chunks still initializes once.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleId {
  Numeric(u32),
  Named(ArcStr),
}

impl ModuleId {
  pub fn as_numeric(&self) -> Option<u32> {
    match self {
      Self::Numeric(id) => Some(*id),
      Self::Named(_) => None,
    }
  }
}

impl From<u32> for ModuleId {
  fn from(value: u32) -> Self {
    Self::Numeric(value)
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self::Named(value)
  }
}

impl From<&str> for ModuleId {
  fn from(value: &str) -> Self {
    Self::Named(value.into())
  }
}

/// Renders the id as a JavaScript literal.
impl std::fmt::Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Numeric(id) => write!(f, "{id}"),
      Self::Named(name) => {
        write!(f, "{}", serde_json::to_string(name.as_str()).map_err(|_| std::fmt::Error)?)
      }
    }
  }
}

#[test]
fn test_display_as_js_literal() {
  assert_eq!(ModuleId::Numeric(3).to_string(), "3");
  assert_eq!(ModuleId::from("src/a \"b\".js").to_string(), r#""src/a \"b\".js""#);
}
