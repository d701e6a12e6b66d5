#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeterminedSideEffects {
  /// Analyzed from the compiled module body.
  Analyzed(bool),
  /// Set upstream, e.g. from the `sideEffects` field of a package.json.
  UserDefined(bool),
  /// Usage of the module can't be determined statically. The module is kept as a whole and
  /// everything it imports is considered used.
  NoTreeshake,
}

impl DeterminedSideEffects {
  pub fn has_side_effects(&self) -> bool {
    match self {
      Self::Analyzed(v) | Self::UserDefined(v) => *v,
      Self::NoTreeshake => true,
    }
  }
}
