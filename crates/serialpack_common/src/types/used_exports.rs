use std::collections::BTreeSet;

use arcstr::ArcStr;

/// The exports of a module that reachable code reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsedExports {
  All,
  Names(BTreeSet<ArcStr>),
}

impl Default for UsedExports {
  fn default() -> Self {
    Self::Names(BTreeSet::new())
  }
}

impl UsedExports {
  pub fn is_all(&self) -> bool {
    matches!(self, Self::All)
  }

  pub fn is_empty(&self) -> bool {
    matches!(self, Self::Names(names) if names.is_empty())
  }

  pub fn contains(&self, name: &str) -> bool {
    match self {
      Self::All => true,
      Self::Names(names) => names.contains(name),
    }
  }

  /// Returns `true` if `other` added anything.
  pub fn merge(&mut self, other: &UsedExports) -> bool {
    match (&mut *self, other) {
      (Self::All, _) => false,
      (this, Self::All) => {
        *this = Self::All;
        true
      }
      (Self::Names(names), Self::Names(other)) => {
        let before = names.len();
        names.extend(other.iter().cloned());
        names.len() != before
      }
    }
  }

  /// Whether merging `other` would change nothing.
  pub fn covers(&self, other: &UsedExports) -> bool {
    match (self, other) {
      (Self::All, _) => true,
      (Self::Names(_), Self::All) => false,
      (Self::Names(names), Self::Names(other)) => other.is_subset(names),
    }
  }
}

impl<T: Into<ArcStr>> FromIterator<T> for UsedExports {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    Self::Names(iter.into_iter().map(Into::into).collect())
  }
}
